use crate::config::Credential;

/// The fixed list of voters allowed to authenticate.
///
/// Loaded once at startup and never mutated. Entries are matched in order,
/// so with a duplicated identifier the first matching pair wins.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CredentialDirectory {
    entries: Vec<Credential>,
}

impl CredentialDirectory {
    pub fn new(entries: Vec<Credential>) -> CredentialDirectory {
        CredentialDirectory { entries }
    }

    /// Exact match on both fields. The caller is responsible for trimming.
    pub fn lookup(&self, identifier: &str, secret: &str) -> Option<&Credential> {
        self.entries
            .iter()
            .find(|c| c.identifier == identifier && c.secret == secret)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CredentialDirectory {
    fn default() -> Self {
        CredentialDirectory::new(crate::config::default_credentials())
    }
}
