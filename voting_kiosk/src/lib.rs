/*!
The core of a single-screen demonstration voting kiosk.

A voter authenticates against a fixed list of credentials, which unlocks the
ballot for exactly one action: a vote for one of the configured candidates, or
a void ballot. The kiosk then locks itself again. The running tally is kept in
a [`BallotStore`], which is handed to a [`Persistence`] after every change.

```
use voting_kiosk::*;

let candidates = vec![Candidate::new("A", "Alice", ""), Candidate::new("B", "Bob", "")];
let directory = CredentialDirectory::new(vec![Credential::new("111", "2000-01-01")]);
let mut kiosk = Kiosk::open(candidates, directory, MemoryPersistence::new());

kiosk.submit_credential("111", "2000-01-01")?;
kiosk.cast_vote("A")?;
assert_eq!(kiosk.phase(), SessionPhase::Locked);
assert_eq!(
    export_csv(kiosk.candidates(), kiosk.store()),
    "Candidate,Votes\nAlice,1\nBob,0\nVoid,0\nTotal,1"
);
# Ok::<(), KioskError>(())
```

This is not a secure voting system: there is no ballot secrecy beyond not
displaying the other voters, and whoever has access to the storage can change
the tally.
*/

mod config;
mod directory;
pub mod manual;
mod persistence;
mod session;
mod store;
mod tally;

pub use crate::config::*;
pub use crate::directory::CredentialDirectory;
pub use crate::persistence::{MemoryPersistence, Persistence};
pub use crate::session::{Kiosk, SessionPhase, SessionState};
pub use crate::store::BallotStore;
pub use crate::tally::*;
