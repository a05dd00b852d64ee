use log::{debug, info, warn};

use crate::config::*;
use crate::directory::CredentialDirectory;
use crate::persistence::Persistence;
use crate::store::BallotStore;
use crate::tally;

/// Whether a voter is currently allowed to cast a ballot.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SessionPhase {
    Locked,
    Unlocked,
}

/// The voter currently at the kiosk, if any. Never persisted.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct SessionState {
    current_credential: Option<Credential>,
}

impl SessionState {
    pub fn current_credential(&self) -> Option<&Credential> {
        self.current_credential.as_ref()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.current_credential.is_some() {
            SessionPhase::Unlocked
        } else {
            SessionPhase::Locked
        }
    }
}

/// The kiosk: one ballot store, one voter session at a time.
///
/// Every method runs to completion and leaves the kiosk in a consistent
/// state. When a method changes the ballot store, the new store is handed to
/// the persistence before the method returns.
pub struct Kiosk<P: Persistence> {
    candidates: Vec<Candidate>,
    directory: CredentialDirectory,
    store: BallotStore,
    session: SessionState,
    persistence: P,
    authenticated_once: bool,
    reset_requested: bool,
}

impl<P: Persistence> Kiosk<P> {
    /// Opens the kiosk with the store found in the persistence.
    ///
    /// A missing store, or one that does not fit the candidates, is replaced
    /// by a fresh one.
    pub fn open(
        candidates: Vec<Candidate>,
        directory: CredentialDirectory,
        mut persistence: P,
    ) -> Kiosk<P> {
        let store = match persistence.load() {
            Some(s) => match s.check_against(&candidates) {
                Ok(()) => {
                    info!(
                        "open: resuming election with {} ballots, {} used credentials",
                        s.total_votes(),
                        s.used_credentials().len()
                    );
                    s
                }
                Err(e) => {
                    warn!("open: ignoring stored ballots: {}", e);
                    BallotStore::fresh(&candidates)
                }
            },
            None => {
                info!("open: no stored ballots, starting a new election");
                BallotStore::fresh(&candidates)
            }
        };
        persistence.save(&store);
        info!(
            "open: {} candidates, {} registered voters",
            candidates.len(),
            directory.len()
        );
        Kiosk {
            candidates,
            directory,
            store,
            session: SessionState::default(),
            persistence,
            authenticated_once: false,
            reset_requested: false,
        }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn store(&self) -> &BallotStore {
        &self.store
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn results_visible(&self) -> bool {
        tally::results_visible(&self.store, self.authenticated_once)
    }

    pub fn reset_requested(&self) -> bool {
        self.reset_requested
    }

    fn commit(&mut self, next: BallotStore) {
        self.store = next;
        self.persistence.save(&self.store);
    }

    // ********* Voter session **********

    /// Authenticates a voter and unlocks the ballot.
    ///
    /// While a voter is already authenticated, this does nothing and returns
    /// that voter's credential.
    pub fn submit_credential(
        &mut self,
        identifier: &str,
        secret: &str,
    ) -> Result<&Credential, KioskError> {
        let credential = match self.session.current_credential.take() {
            Some(current) => {
                debug!("submit_credential: session already open, ignoring");
                current
            }
            None => self.authenticate(identifier, secret)?,
        };
        let current: &Credential = self.session.current_credential.insert(credential);
        Ok(current)
    }

    // Lookup and consumption of a credential. The session is left to the caller.
    fn authenticate(&mut self, identifier: &str, secret: &str) -> Result<Credential, KioskError> {
        let identifier = identifier.trim();
        let secret = secret.trim();
        if identifier.is_empty() || secret.is_empty() {
            return Err(KioskError::MissingInput);
        }
        let credential = match self.directory.lookup(identifier, secret) {
            Some(c) => c.clone(),
            None => {
                info!("submit_credential: no match for identifier {}", identifier);
                return Err(KioskError::InvalidCredential);
            }
        };
        let next = self.store.with_used(credential.key())?;
        info!("submit_credential: unlocked for identifier {}", identifier);
        self.commit(next);
        self.authenticated_once = true;
        Ok(credential)
    }

    /// Records one ballot for a candidate and locks the kiosk again.
    pub fn cast_vote(&mut self, candidate_id: &str) -> Result<(), KioskError> {
        if self.session.current_credential.is_none() {
            return Err(KioskError::NotUnlocked);
        }
        let next = self.store.with_vote(candidate_id)?;
        self.commit(next);
        self.session = SessionState::default();
        info!("cast_vote: ballot recorded, kiosk locked");
        Ok(())
    }

    /// Records one void ballot and locks the kiosk again.
    pub fn cast_void(&mut self) -> Result<(), KioskError> {
        if self.session.current_credential.is_none() {
            return Err(KioskError::NotUnlocked);
        }
        let next = self.store.with_void()?;
        self.commit(next);
        self.session = SessionState::default();
        info!("cast_void: void ballot recorded, kiosk locked");
        Ok(())
    }

    // ********* Election controls **********

    pub fn end_voting(&mut self) {
        let next = self.store.with_ended(true);
        self.commit(next);
        info!("end_voting: voting closed");
    }

    /// Accepts ballots again. Credentials already used stay used.
    pub fn reopen_voting(&mut self) {
        let next = self.store.with_ended(false);
        self.commit(next);
        info!("reopen_voting: voting open");
    }

    /// First step of the reset. Nothing is erased until `confirm_reset`.
    pub fn request_reset(&mut self) {
        self.reset_requested = true;
    }

    pub fn cancel_reset(&mut self) {
        self.reset_requested = false;
    }

    /// Erases all the ballots and used credentials, and locks the kiosk.
    pub fn confirm_reset(&mut self) -> Result<(), KioskError> {
        if !self.reset_requested {
            return Err(KioskError::ResetNotRequested);
        }
        self.reset_requested = false;
        let next = BallotStore::fresh(&self.candidates);
        self.commit(next);
        self.session = SessionState::default();
        self.authenticated_once = false;
        warn!("confirm_reset: election data erased");
        Ok(())
    }
}
