use log::debug;
use std::collections::{BTreeMap, HashSet};

use crate::config::*;

/// The persisted aggregate of an election.
///
/// A store is never mutated in place by the kiosk: every transition builds
/// the next value and replaces the previous one, so a reader always sees a
/// complete aggregate.
///
/// Invariants:
/// - `votes` has exactly one entry per configured candidate.
/// - `used_credentials` contains no duplicate.
/// - every transition adds exactly 1 to exactly one counter, or adds one key.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct BallotStore {
    votes: BTreeMap<String, u64>,
    void_votes: u64,
    ended: bool,
    // Insertion order is kept, it is the order of the persisted layout.
    used_credentials: Vec<CredentialKey>,
}

impl BallotStore {
    /// A store with zero votes for each candidate, open, with no used credential.
    pub fn fresh(candidates: &[Candidate]) -> BallotStore {
        BallotStore {
            votes: candidates.iter().map(|c| (c.id.clone(), 0)).collect(),
            void_votes: 0,
            ended: false,
            used_credentials: Vec::new(),
        }
    }

    /// Rebuilds a store from its persisted parts.
    ///
    /// Nothing is checked here; see `check_against` for the validation done
    /// when a stored value is loaded.
    pub fn from_parts(
        votes: BTreeMap<String, u64>,
        void_votes: u64,
        ended: bool,
        used_credentials: Vec<CredentialKey>,
    ) -> BallotStore {
        BallotStore {
            votes,
            void_votes,
            ended,
            used_credentials,
        }
    }

    pub fn votes(&self) -> &BTreeMap<String, u64> {
        &self.votes
    }

    /// The count for one candidate, if it is configured.
    pub fn votes_for(&self, candidate_id: &str) -> Option<u64> {
        self.votes.get(candidate_id).cloned()
    }

    pub fn void_votes(&self) -> u64 {
        self.void_votes
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    pub fn used_credentials(&self) -> &[CredentialKey] {
        &self.used_credentials
    }

    pub fn is_used(&self, key: &CredentialKey) -> bool {
        self.used_credentials.contains(key)
    }

    /// All the ballots cast since the last reset, void ones included.
    ///
    /// Saturates instead of overflowing; a store accepted by `check_against`
    /// never reaches the bound.
    pub fn total_votes(&self) -> u64 {
        self.checked_total().unwrap_or(u64::MAX)
    }

    fn checked_total(&self) -> Option<u64> {
        self.votes
            .values()
            .try_fold(self.void_votes, |acc, count| acc.checked_add(*count))
    }

    /// Checks that a store read back from storage can be used with the given
    /// candidates.
    pub fn check_against(&self, candidates: &[Candidate]) -> Result<(), KioskError> {
        let configured: HashSet<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        let stored: HashSet<&str> = self.votes.keys().map(|k| k.as_str()).collect();
        if configured != stored {
            let mut missing: Vec<&str> = configured.difference(&stored).cloned().collect();
            let mut unknown: Vec<&str> = stored.difference(&configured).cloned().collect();
            missing.sort_unstable();
            unknown.sort_unstable();
            return Err(KioskError::InconsistentStore(format!(
                "missing candidates {:?}, unknown candidates {:?}",
                missing, unknown
            )));
        }
        if self.checked_total().is_none() {
            return Err(KioskError::InconsistentStore(
                "the vote counts overflow".to_string(),
            ));
        }
        let distinct: HashSet<&CredentialKey> = self.used_credentials.iter().collect();
        if distinct.len() != self.used_credentials.len() {
            return Err(KioskError::InconsistentStore(
                "a credential is recorded more than once".to_string(),
            ));
        }
        Ok(())
    }

    // ********* Transitions **********

    pub(crate) fn with_vote(&self, candidate_id: &str) -> Result<BallotStore, KioskError> {
        if self.ended {
            return Err(KioskError::VotingClosed);
        }
        self.ensure_room()?;
        let mut next = self.clone();
        match next.votes.get_mut(candidate_id) {
            Some(count) => *count += 1,
            None => return Err(KioskError::UnknownCandidate(candidate_id.to_string())),
        }
        debug!("with_vote: {} -> {:?}", candidate_id, next.votes);
        Ok(next)
    }

    pub(crate) fn with_void(&self) -> Result<BallotStore, KioskError> {
        if self.ended {
            return Err(KioskError::VotingClosed);
        }
        self.ensure_room()?;
        let mut next = self.clone();
        next.void_votes += 1;
        Ok(next)
    }

    // One more ballot must keep the total representable.
    fn ensure_room(&self) -> Result<(), KioskError> {
        match self.checked_total().and_then(|t| t.checked_add(1)) {
            Some(_) => Ok(()),
            None => Err(KioskError::InconsistentStore(
                "the vote counts overflow".to_string(),
            )),
        }
    }

    // Authentication is still accepted after the end of the voting, so this
    // does not look at `ended`.
    pub(crate) fn with_used(&self, key: CredentialKey) -> Result<BallotStore, KioskError> {
        if self.is_used(&key) {
            return Err(KioskError::CredentialAlreadyUsed);
        }
        let mut next = self.clone();
        next.used_credentials.push(key);
        Ok(next)
    }

    pub(crate) fn with_ended(&self, ended: bool) -> BallotStore {
        let mut next = self.clone();
        next.ended = ended;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Candidate> {
        vec![Candidate::new("A", "A", ""), Candidate::new("B", "B", "")]
    }

    #[test]
    fn fresh_store() {
        let s = BallotStore::fresh(&candidates());
        assert_eq!(s.votes().len(), 2);
        assert_eq!(s.votes_for("A"), Some(0));
        assert_eq!(s.total_votes(), 0);
        assert!(!s.ended());
        assert!(s.used_credentials().is_empty());
        assert_eq!(s.check_against(&candidates()), Ok(()));
    }

    #[test]
    fn transitions_leave_the_previous_store_intact() {
        let s = BallotStore::fresh(&candidates());
        let s2 = s.with_vote("B").unwrap().with_void().unwrap();
        assert_eq!(s.total_votes(), 0);
        assert_eq!(s2.votes_for("B"), Some(1));
        assert_eq!(s2.void_votes(), 1);
        assert_eq!(s2.total_votes(), 2);
    }

    #[test]
    fn closed_store_refuses_ballots() {
        let s = BallotStore::fresh(&candidates()).with_ended(true);
        assert_eq!(s.with_vote("A"), Err(KioskError::VotingClosed));
        assert_eq!(s.with_void(), Err(KioskError::VotingClosed));
        // Closing wins over an unknown candidate.
        assert_eq!(s.with_vote("Z"), Err(KioskError::VotingClosed));
        assert!(s.with_used(CredentialKey::new("1", "2")).is_ok());
    }

    #[test]
    fn unknown_candidate() {
        let s = BallotStore::fresh(&candidates());
        assert_eq!(
            s.with_vote("C"),
            Err(KioskError::UnknownCandidate("C".to_string()))
        );
    }

    #[test]
    fn used_keys_are_unique() {
        let k = CredentialKey::new("111", "2000-01-01");
        let s = BallotStore::fresh(&candidates())
            .with_used(k.clone())
            .unwrap();
        assert!(s.is_used(&k));
        assert_eq!(s.with_used(k), Err(KioskError::CredentialAlreadyUsed));
    }

    #[test]
    fn check_against_other_candidates() {
        let s = BallotStore::fresh(&candidates());
        let others = vec![Candidate::new("A", "A", ""), Candidate::new("C", "C", "")];
        assert!(matches!(
            s.check_against(&others),
            Err(KioskError::InconsistentStore(_))
        ));
        assert!(s.check_against(&candidates()[..1]).is_err());
    }

    #[test]
    fn overflowing_counts() {
        let votes: BTreeMap<String, u64> = vec![("A".to_string(), u64::MAX), ("B".to_string(), 1)]
            .into_iter()
            .collect();
        let s = BallotStore::from_parts(votes, 0, false, vec![]);
        assert_eq!(s.total_votes(), u64::MAX);
        assert!(matches!(
            s.check_against(&candidates()),
            Err(KioskError::InconsistentStore(_))
        ));

        let votes: BTreeMap<String, u64> = vec![("A".to_string(), u64::MAX - 1), ("B".to_string(), 0)]
            .into_iter()
            .collect();
        let full = BallotStore::from_parts(votes, 1, false, vec![]);
        assert_eq!(full.check_against(&candidates()), Ok(()));
        assert!(full.with_vote("B").is_err());
        assert!(full.with_void().is_err());
    }

    #[test]
    fn check_against_duplicate_keys() {
        let k = CredentialKey::new("1", "2");
        let s = BallotStore::from_parts(
            BallotStore::fresh(&candidates()).votes().clone(),
            0,
            false,
            vec![k.clone(), k],
        );
        assert!(s.check_against(&candidates()).is_err());
    }
}
