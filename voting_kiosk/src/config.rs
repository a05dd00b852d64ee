// ********* Configuration data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A party or candidate that can receive a ballot.
///
/// The `id` is the stable key used in the tally. The `name` is what the
/// operator sees and what appears in the exports.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    /// A reference to the logo displayed on the ballot button.
    pub logo_ref: String,
}

impl Candidate {
    pub fn new(id: &str, name: &str, logo_ref: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: name.to_string(),
            logo_ref: logo_ref.to_string(),
        }
    }
}

/// One pre-authorized voter.
///
/// The secret is compared as an opaque string. In the demonstration
/// directory it happens to be a date of birth, but it is never parsed.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Credential {
    pub identifier: String,
    pub secret: String,
}

impl Credential {
    pub fn new(identifier: &str, secret: &str) -> Credential {
        Credential {
            identifier: identifier.to_string(),
            secret: secret.to_string(),
        }
    }

    pub fn key(&self) -> CredentialKey {
        CredentialKey::new(&self.identifier, &self.secret)
    }
}

/// The unit of "already used" tracking: `identifier:secret`.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct CredentialKey(String);

impl CredentialKey {
    pub fn new(identifier: &str, secret: &str) -> CredentialKey {
        CredentialKey(format!("{}:{}", identifier, secret))
    }

    /// Wraps a key read back from storage. No validation is done on the format.
    pub fn from_stored(raw: String) -> CredentialKey {
        CredentialKey(raw)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for CredentialKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ******** Errors *********

/// The reasons an operator action is refused.
///
/// None of them is fatal: the kiosk stays in the state it was in before the
/// action.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum KioskError {
    /// The identifier or the secret is empty once trimmed.
    MissingInput,
    /// No entry of the directory matches both the identifier and the secret.
    InvalidCredential,
    /// The credential matched, but it has already been used to vote.
    CredentialAlreadyUsed,
    /// A ballot action was attempted after the end of the voting.
    VotingClosed,
    /// A ballot refers to a candidate that is not configured.
    UnknownCandidate(String),
    /// A ballot action was attempted while no voter is authenticated.
    NotUnlocked,
    /// The reset was confirmed without being requested first.
    ResetNotRequested,
    /// A stored tally does not match the configured candidates.
    InconsistentStore(String),
}

impl Error for KioskError {}

impl Display for KioskError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KioskError::MissingInput => write!(
                f,
                "Please enter both a National Identification Number and Date of birth!"
            ),
            KioskError::InvalidCredential => {
                write!(f, "Invalid National Identification Number or Date of birth!")
            }
            KioskError::CredentialAlreadyUsed => write!(
                f,
                "National Identification Number and Date of birth has been used, kindly enter another to vote."
            ),
            KioskError::VotingClosed => write!(f, "Voting has ended"),
            KioskError::UnknownCandidate(id) => write!(f, "Unknown candidate: {}", id),
            KioskError::NotUnlocked => write!(f, "Enter credentials to vote"),
            KioskError::ResetNotRequested => write!(f, "No reset was requested"),
            KioskError::InconsistentStore(msg) => write!(f, "Inconsistent ballot store: {}", msg),
        }
    }
}

// ********* Defaults **********

// The parties and the voters of the demonstration kiosk. They are only used
// when no configuration is provided.

pub const DEFAULT_STORAGE_KEY: &str = "evoting.portal.v1";

pub fn default_candidates() -> Vec<Candidate> {
    vec![
        Candidate::new("candidate1", "ADC", "/ADC logo.jpeg"),
        Candidate::new("candidate2", "APC", "/APC.jpg"),
        Candidate::new("candidate3", "LP", "/LP%20logo.jpg"),
        Candidate::new("candidate4", "NNPP", "/nnpp.jpg"),
        Candidate::new("candidate5", "PDP", "/PDP.png"),
    ]
}

pub fn default_credentials() -> Vec<Credential> {
    [
        ("1234567890", "1990-01-01"),
        ("2345678901", "1991-02-02"),
        ("3456789012", "1992-03-03"),
        ("4567890123", "1993-04-04"),
        ("5678901234", "1994-05-05"),
        ("6789012345", "1995-06-06"),
        ("7890123456", "1996-07-07"),
        ("8901234567", "1997-08-08"),
        ("9012345678", "1998-09-09"),
        ("0123456789", "1999-10-10"),
    ]
    .iter()
    .map(|(identifier, secret)| Credential::new(identifier, secret))
    .collect()
}
