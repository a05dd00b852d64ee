use crate::store::BallotStore;

/// Where the ballot store is kept between runs.
///
/// `load` returns `None` when nothing is stored or when the stored value
/// cannot be read back. `save` is called after every transition and does not
/// report failures: implementations log them.
pub trait Persistence {
    fn load(&self) -> Option<BallotStore>;
    fn save(&mut self, store: &BallotStore);
}

/// Keeps the last saved store in memory. Used in tests and for dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryPersistence {
    saved: Option<BallotStore>,
    saves: usize,
}

impl MemoryPersistence {
    pub fn new() -> MemoryPersistence {
        MemoryPersistence::default()
    }

    /// Starts with a store already saved.
    pub fn with_store(store: BallotStore) -> MemoryPersistence {
        MemoryPersistence {
            saved: Some(store),
            saves: 0,
        }
    }

    pub fn saved(&self) -> Option<&BallotStore> {
        self.saved.as_ref()
    }

    /// The number of calls to `save`.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Option<BallotStore> {
        self.saved.clone()
    }

    fn save(&mut self, store: &BallotStore) {
        self.saved = Some(store.clone());
        self.saves += 1;
    }
}
