use crate::kiosk::*;

use std::collections::HashSet;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCandidate {
    pub id: String,
    pub name: String,
    pub logo: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCredential {
    pub username: String,
    pub passcode: String,
}

/// The configuration file. Every field is optional and falls back to the
/// demonstration kiosk.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct KioskConfig {
    #[serde(rename = "storageKey")]
    pub storage_key: Option<String>,
    pub candidates: Option<Vec<ConfigCandidate>>,
    pub credentials: Option<Vec<ConfigCredential>>,
}

/// A validated configuration, ready to open a kiosk.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct KioskSetup {
    pub storage_key: String,
    pub candidates: Vec<Candidate>,
    pub directory: CredentialDirectory,
}

pub fn read_config(path: &str) -> KResult<KioskConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: KioskConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    info!("config: {:?}", config);
    Ok(config)
}

pub fn validate_config(config: &KioskConfig) -> KResult<KioskSetup> {
    let storage_key = match &config.storage_key {
        None => DEFAULT_STORAGE_KEY.to_string(),
        Some(k) if k.is_empty() => whatever!("storageKey must not be empty"),
        Some(k) if k.contains(|c: char| c == '/' || c == '\\') || k == "." || k == ".." => {
            whatever!("storageKey {:?} must be a plain file name", k)
        }
        Some(k) => k.clone(),
    };

    let candidates: Vec<Candidate> = match &config.candidates {
        None => default_candidates(),
        Some(cs) => cs
            .iter()
            .map(|c| Candidate {
                id: c.id.clone(),
                name: c.name.clone(),
                logo_ref: c.logo.clone().unwrap_or_default(),
            })
            .collect(),
    };
    if candidates.is_empty() {
        whatever!("At least one candidate is required")
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for c in candidates.iter() {
        if c.id.trim().is_empty() {
            whatever!("Candidate {:?} has an empty id", c.name)
        }
        if !seen.insert(c.id.as_str()) {
            whatever!("Candidate id {:?} is used more than once", c.id)
        }
        // The export does not quote its fields.
        if c.name.contains(',') || c.name.contains('\n') {
            whatever!("Candidate name {:?} must not contain commas or newlines", c.name)
        }
    }

    let directory = match &config.credentials {
        None => CredentialDirectory::default(),
        Some(creds) => CredentialDirectory::new(
            creds
                .iter()
                .map(|c| Credential::new(&c.username, &c.passcode))
                .collect(),
        ),
    };
    if directory.is_empty() {
        warn!("No registered voter: nobody will be able to vote");
    }

    Ok(KioskSetup {
        storage_key,
        candidates,
        directory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(js: &str) -> KioskConfig {
        serde_json::from_str(js).unwrap()
    }

    #[test]
    fn empty_config_is_the_demonstration_kiosk() {
        let setup = validate_config(&parse("{}")).unwrap();
        assert_eq!(setup.storage_key, "evoting.portal.v1");
        let names: Vec<&str> = setup.candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ADC", "APC", "LP", "NNPP", "PDP"]);
        assert_eq!(setup.directory.len(), 10);
    }

    #[test]
    fn full_config() {
        let setup = validate_config(&parse(
            r#"{
                "storageKey": "mock.v2",
                "candidates": [
                    {"id": "A", "name": "Alpha", "logo": "/a.png"},
                    {"id": "B", "name": "Bravo"}
                ],
                "credentials": [{"username": "111", "passcode": "2000-01-01"}]
            }"#,
        ))
        .unwrap();
        assert_eq!(setup.storage_key, "mock.v2");
        assert_eq!(
            setup.candidates,
            vec![Candidate::new("A", "Alpha", "/a.png"), Candidate::new("B", "Bravo", "")]
        );
        assert!(setup.directory.lookup("111", "2000-01-01").is_some());
        assert_eq!(setup.directory.len(), 1);
    }

    #[test]
    fn invalid_configs() {
        let bad = [
            r#"{"candidates": []}"#,
            r#"{"candidates": [{"id": "A", "name": "x"}, {"id": "A", "name": "y"}]}"#,
            r#"{"candidates": [{"id": "A", "name": "Smith, John"}]}"#,
            r#"{"candidates": [{"id": " ", "name": "x"}]}"#,
            r#"{"storageKey": "../elsewhere"}"#,
            r#"{"storageKey": ""}"#,
        ];
        for js in bad.iter() {
            assert!(validate_config(&parse(js)).is_err(), "accepted {}", js);
        }
    }

    #[test]
    fn missing_file() {
        let res = read_config("/nonexistent/kiosk.json");
        assert!(matches!(res, Err(KioskCliError::OpeningJson { .. })));
    }
}
