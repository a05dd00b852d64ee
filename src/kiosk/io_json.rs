// The ballot store, as a JSON file.

use crate::kiosk::*;

use std::collections::BTreeMap;
use std::io::Write;

/// The layout of the stored tally.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PersistedStore {
    pub votes: BTreeMap<String, u64>,
    #[serde(rename = "voidVotes")]
    pub void_votes: u64,
    pub ended: bool,
    #[serde(rename = "usedCredentials")]
    pub used_credentials: Vec<String>,
}

impl From<&BallotStore> for PersistedStore {
    fn from(store: &BallotStore) -> Self {
        PersistedStore {
            votes: store.votes().clone(),
            void_votes: store.void_votes(),
            ended: store.ended(),
            used_credentials: store
                .used_credentials()
                .iter()
                .map(|k| k.as_str().to_string())
                .collect(),
        }
    }
}

impl From<PersistedStore> for BallotStore {
    fn from(ps: PersistedStore) -> Self {
        BallotStore::from_parts(
            ps.votes,
            ps.void_votes,
            ps.ended,
            ps.used_credentials
                .into_iter()
                .map(CredentialKey::from_stored)
                .collect(),
        )
    }
}

pub fn store_to_json(store: &BallotStore) -> KResult<String> {
    serde_json::to_string(&PersistedStore::from(store)).context(SerializingJsonSnafu {})
}

/// Reads the stored tally. A missing file is not an error.
pub fn read_store(path: &Path) -> KResult<Option<BallotStore>> {
    let path_s = path.display().to_string();
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path: path_s.clone() })?;
    let ps: PersistedStore =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path: path_s })?;
    Ok(Some(ps.into()))
}

/// Replaces the stored tally. The payload goes to a temporary file in the
/// same directory first, then is renamed over the previous one, so a reader
/// never sees a partial write.
pub fn write_store(path: &Path, store: &BallotStore) -> KResult<()> {
    let path_s = path.display().to_string();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).context(WritingFileSnafu { path: path_s.clone() })?;
    let js = store_to_json(store)?;
    let mut temp_file =
        tempfile::NamedTempFile::new_in(parent).context(WritingFileSnafu { path: path_s.clone() })?;
    temp_file
        .write_all(js.as_bytes())
        .context(WritingFileSnafu { path: path_s.clone() })?;
    temp_file
        .as_file()
        .sync_all()
        .context(WritingFileSnafu { path: path_s.clone() })?;
    temp_file
        .persist(path)
        .context(ReplacingFileSnafu { path: path_s })?;
    Ok(())
}

/// Keeps the ballot store in `<dir>/<storage key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(dir: &Path, storage_key: &str) -> JsonFilePersistence {
        JsonFilePersistence {
            path: dir.join(format!("{}.json", storage_key)),
        }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self) -> Option<BallotStore> {
        match read_store(&self.path) {
            Ok(store) => store,
            Err(e) => {
                warn!("Could not read the stored ballots, starting afresh: {}", e);
                None
            }
        }
    }

    fn save(&mut self, store: &BallotStore) {
        if let Err(e) = write_store(&self.path, store) {
            warn!("Could not save the ballots: {}", e);
        } else {
            debug!("saved ballots to {}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Candidate> {
        vec![Candidate::new("A", "A", ""), Candidate::new("B", "B", "")]
    }

    #[test]
    fn layout() {
        let store: BallotStore = PersistedStore {
            votes: vec![("A".to_string(), 2), ("B".to_string(), 0)]
                .into_iter()
                .collect(),
            void_votes: 1,
            ended: true,
            used_credentials: vec!["111:2000-01-01".to_string()],
        }
        .into();
        let js: serde_json::Value = serde_json::from_str(&store_to_json(&store).unwrap()).unwrap();
        assert_eq!(
            js,
            serde_json::json!({
                "votes": {"A": 2, "B": 0},
                "voidVotes": 1,
                "ended": true,
                "usedCredentials": ["111:2000-01-01"]
            })
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = JsonFilePersistence::new(dir.path(), DEFAULT_STORAGE_KEY);
        assert_eq!(p.load(), None);

        let mut kiosk = Kiosk::open(
            candidates(),
            CredentialDirectory::new(vec![
                Credential::new("111", "2000-01-01"),
                Credential::new("222", "2000-02-02"),
            ]),
            p.clone(),
        );
        kiosk.submit_credential("111", "2000-01-01").unwrap();
        kiosk.cast_vote("B").unwrap();
        kiosk.submit_credential("222", "2000-02-02").unwrap();
        kiosk.end_voting();

        let loaded = p.load().unwrap();
        assert_eq!(&loaded, kiosk.store());
        assert!(dir.path().join("evoting.portal.v1.json").exists());

        p.save(&loaded);
        assert_eq!(p.load(), Some(loaded));
    }

    #[test]
    fn unreadable_payloads() {
        let dir = tempfile::tempdir().unwrap();
        let p = JsonFilePersistence::new(dir.path(), "k");
        let payloads = [
            "not json",
            "{}",
            r#"{"votes": {"A": -1}, "voidVotes": 0, "ended": false, "usedCredentials": []}"#,
            r#"{"votes": {"A": 1.5}, "voidVotes": 0, "ended": false, "usedCredentials": []}"#,
        ];
        for payload in payloads.iter() {
            fs::write(p.path(), payload).unwrap();
            assert_eq!(p.load(), None, "accepted {}", payload);
        }
    }

    #[test]
    fn counts_that_overflow_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let p = JsonFilePersistence::new(dir.path(), "k");
        fs::write(
            p.path(),
            r#"{"votes": {"A": 18446744073709551615, "B": 1}, "voidVotes": 0, "ended": false, "usedCredentials": []}"#,
        )
        .unwrap();
        // The payload parses, but does not pass the checks on opening.
        assert!(p.load().is_some());
        let kiosk = Kiosk::open(candidates(), CredentialDirectory::default(), p.clone());
        assert_eq!(kiosk.store(), &BallotStore::fresh(&candidates()));
        assert_eq!(kiosk.store().total_votes(), 0);
    }

    #[test]
    fn saving_replaces_the_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = JsonFilePersistence::new(dir.path(), "k");
        // Leftovers of an interrupted save next to the store.
        fs::write(dir.path().join(".tmpAbC123"), "{\"votes\": {\"A\"").unwrap();
        fs::write(p.path(), "{\"votes\": {\"A\": 1, \"B\"").unwrap();
        assert_eq!(p.load(), None);

        let fresh = BallotStore::fresh(&candidates());
        let store = BallotStore::from_parts(fresh.votes().clone(), 2, true, vec![]);
        p.save(&store);
        assert_eq!(p.load(), Some(store.clone()));
        p.save(&BallotStore::fresh(&candidates()));
        assert_eq!(p.load(), Some(BallotStore::fresh(&candidates())));

        // Only the store and the unrelated leftover remain.
        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec![".tmpAbC123".to_string(), "k.json".to_string()]);
    }

    #[test]
    fn unreadable_file_falls_back_to_fresh_store() {
        let dir = tempfile::tempdir().unwrap();
        let p = JsonFilePersistence::new(dir.path(), "k");
        fs::write(p.path(), "{{{").unwrap();
        let kiosk = Kiosk::open(candidates(), CredentialDirectory::default(), p.clone());
        assert_eq!(kiosk.store(), &BallotStore::fresh(&candidates()));
        // The fresh store replaced the corrupt one.
        assert_eq!(p.load(), Some(BallotStore::fresh(&candidates())));
    }
}
