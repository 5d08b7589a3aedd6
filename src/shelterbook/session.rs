use crate::error::{Result, ShelterError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

const SESSION_FILENAME: &str = "session.json";

/// The signed-in user for a data directory, stored in `<data dir>/session.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Uuid,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            signed_in_at: Utc::now(),
        }
    }

    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Option<Self>> {
        let path = dir.as_ref().join(SESSION_FILENAME);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(ShelterError::Io)?;
        let session =
            serde_json::from_str(&content).map_err(|source| ShelterError::Corrupt { path, source })?;
        Ok(Some(session))
    }

    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(ShelterError::Io)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(ShelterError::Serialization)?;
        fs::write(dir.join(SESSION_FILENAME), content).map_err(ShelterError::Io)?;
        Ok(())
    }

    /// Remove the session file. Returns whether one existed.
    pub fn clear<P: AsRef<Path>>(dir: P) -> Result<bool> {
        let path = dir.as_ref().join(SESSION_FILENAME);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path).map_err(ShelterError::Io)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Session::load(dir.path()).unwrap().is_none());

        let session = Session::new(Uuid::new_v4());
        session.save(dir.path()).unwrap();
        assert_eq!(Session::load(dir.path()).unwrap(), Some(session));

        assert!(Session::clear(dir.path()).unwrap());
        assert!(!Session::clear(dir.path()).unwrap());
        assert!(Session::load(dir.path()).unwrap().is_none());
    }
}
