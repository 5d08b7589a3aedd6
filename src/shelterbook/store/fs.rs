use super::{parse_collection, DataStore};
use crate::error::{Result, ShelterError};
use crate::model::{Entity, EntityKind};
use std::fs;
use std::path::PathBuf;

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn collection_path(&self, kind: EntityKind) -> PathBuf {
        self.root.join(kind.file_name())
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(ShelterError::Io)?;
        }
        Ok(())
    }
}

impl DataStore for FileStore {
    fn load<E: Entity>(&self) -> Result<Vec<E>> {
        let path = self.collection_path(E::KIND);
        if !path.exists() {
            tracing::debug!(kind = %E::KIND, path = %path.display(), "collection file missing, treating as empty");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(ShelterError::Io)?;
        let entities = parse_collection(&content)
            .map_err(|source| ShelterError::Corrupt { path: path.clone(), source })?;
        tracing::debug!(kind = %E::KIND, count = entities.len(), "loaded collection");
        Ok(entities)
    }

    fn save<E: Entity>(&mut self, entities: &[E]) -> Result<()> {
        self.ensure_dir()?;
        let path = self.collection_path(E::KIND);
        let content = serde_json::to_string_pretty(entities).map_err(ShelterError::Serialization)?;
        fs::write(&path, content).map_err(ShelterError::Io)?;
        tracing::debug!(kind = %E::KIND, count = entities.len(), path = %path.display(), "saved collection");
        Ok(())
    }

    fn initialize(&mut self) -> Result<Vec<EntityKind>> {
        self.ensure_dir()?;
        let mut created = Vec::new();
        for kind in EntityKind::ALL {
            let path = self.collection_path(kind);
            if !path.exists() {
                fs::write(&path, "[]").map_err(ShelterError::Io)?;
                created.push(kind);
            }
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Animal, Request, Role, Shelter, User};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("Data"));
        let shelters: Vec<Shelter> = store.load().unwrap();
        assert!(shelters.is_empty());
    }

    #[test]
    fn blank_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        fs::write(store.collection_path(EntityKind::Animal), "  \n").unwrap();
        let animals: Vec<Animal> = store.load().unwrap();
        assert!(animals.is_empty());
    }

    #[test]
    fn save_then_load_preserves_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("Data"));

        let shelter = Shelter::new(
            "Happy Paws".into(),
            "12 Green St".into(),
            "5551234".into(),
            4,
        );
        let animal = Animal::new(
            "Rex".into(),
            2,
            "Dog".into(),
            "Beagle".into(),
            date(2024, 1, 5),
            shelter.id,
        );
        let user = User::new(
            "Ivan Franko".into(),
            "salt$hash".into(),
            "0931112233".into(),
            "Lviv".into(),
            "ivan@example.com".into(),
            date(1980, 8, 27),
            Role::Personal,
        );
        let request = Request::new("Adopt Rex".into(), animal.id, user.id, date(2024, 2, 1));

        store.save(std::slice::from_ref(&shelter)).unwrap();
        store.save(std::slice::from_ref(&animal)).unwrap();
        store.save(std::slice::from_ref(&user)).unwrap();
        store.save(std::slice::from_ref(&request)).unwrap();

        assert_eq!(store.load::<Shelter>().unwrap(), vec![shelter]);
        assert_eq!(store.load::<Animal>().unwrap(), vec![animal]);
        assert_eq!(store.load::<User>().unwrap(), vec![user]);
        assert_eq!(store.load::<Request>().unwrap(), vec![request]);
    }

    #[test]
    fn writes_a_pretty_json_array_per_collection() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());
        let shelter = Shelter::new("Tails".into(), "1 Oak Road".into(), "5550000".into(), 2);
        store.save(&[shelter]).unwrap();

        let raw = fs::read_to_string(dir.path().join("shelters.json")).unwrap();
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"animalCount\": 0"));
    }

    #[test]
    fn malformed_json_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf());
        fs::write(store.collection_path(EntityKind::User), "{not json").unwrap();

        let err = store.load::<User>().unwrap_err();
        match err {
            ShelterError::Corrupt { path, .. } => assert!(path.ends_with("users.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn initialize_creates_empty_arrays_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("Data"));

        let created = store.initialize().unwrap();
        assert_eq!(created.len(), 4);
        for kind in EntityKind::ALL {
            let raw = fs::read_to_string(store.collection_path(kind)).unwrap();
            assert_eq!(raw, "[]");
        }

        let created_again = store.initialize().unwrap();
        assert!(created_again.is_empty());
    }
}
