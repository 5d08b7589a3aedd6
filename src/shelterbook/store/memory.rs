use super::{parse_collection, DataStore};
use crate::error::{Result, ShelterError};
use crate::model::{Entity, EntityKind};
use std::collections::HashMap;

/// In-memory storage for testing.
///
/// Collections are kept as serialized JSON text so every load and save goes
/// through the same serde path as the file store.
#[derive(Default)]
pub struct InMemoryStore {
    collections: HashMap<EntityKind, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON for a collection, if it was ever written.
    pub fn raw(&self, kind: EntityKind) -> Option<&str> {
        self.collections.get(&kind).map(String::as_str)
    }
}

impl DataStore for InMemoryStore {
    fn load<E: Entity>(&self) -> Result<Vec<E>> {
        match self.collections.get(&E::KIND) {
            Some(text) => parse_collection(text).map_err(ShelterError::Serialization),
            None => Ok(Vec::new()),
        }
    }

    fn save<E: Entity>(&mut self, entities: &[E]) -> Result<()> {
        let text = serde_json::to_string_pretty(entities)?;
        self.collections.insert(E::KIND, text);
        Ok(())
    }

    fn initialize(&mut self) -> Result<Vec<EntityKind>> {
        let mut created = Vec::new();
        for kind in EntityKind::ALL {
            if !self.collections.contains_key(&kind) {
                self.collections.insert(kind, "[]".to_string());
                created.push(kind);
            }
        }
        Ok(created)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Animal, Request, Role, Shelter, User};
    use chrono::NaiveDate;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Builds a store with related records already in place.
    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn add_shelter(&mut self, name: &str, capacity: u32) -> Shelter {
            let shelter = Shelter::new(
                name.to_string(),
                format!("{} street 1", name),
                "5550101".to_string(),
                capacity,
            );
            let mut shelters: Vec<Shelter> = self.store.load().unwrap();
            shelters.push(shelter.clone());
            self.store.save(&shelters).unwrap();
            shelter
        }

        /// Adds an animal and bumps the shelter's count, like a real intake.
        pub fn add_animal(&mut self, name: &str, species: &str, shelter: &Shelter) -> Animal {
            let animal = Animal::new(
                name.to_string(),
                3,
                species.to_string(),
                "Mixed".to_string(),
                date(2024, 1, 15),
                shelter.id,
            );
            let mut animals: Vec<Animal> = self.store.load().unwrap();
            animals.push(animal.clone());
            self.store.save(&animals).unwrap();

            let mut shelters: Vec<Shelter> = self.store.load().unwrap();
            if let Some(s) = shelters.iter_mut().find(|s| s.id == shelter.id) {
                s.animal_count += 1;
            }
            self.store.save(&shelters).unwrap();
            animal
        }

        pub fn add_user(&mut self, full_name: &str, role: Role) -> User {
            let user = User::new(
                full_name.to_string(),
                crate::commands::auth::hash_password("secret1"),
                format!("050{:07}", self.store.load::<User>().unwrap().len()),
                "Kyiv, Khreshchatyk 1".to_string(),
                format!("{}@example.com", full_name.to_lowercase().replace(' ', ".")),
                date(1990, 1, 1),
                role,
            );
            let mut users: Vec<User> = self.store.load().unwrap();
            users.push(user.clone());
            self.store.save(&users).unwrap();
            user
        }

        pub fn add_request(&mut self, name: &str, animal: &Animal, user: &User) -> Request {
            let request = Request::new(name.to_string(), animal.id, user.id, date(2024, 2, 1));
            let mut requests: Vec<Request> = self.store.load().unwrap();
            requests.push(request.clone());
            self.store.save(&requests).unwrap();
            request
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Shelter;

    #[test]
    fn unsaved_collection_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.load::<Shelter>().unwrap().is_empty());
    }

    #[test]
    fn save_replaces_whole_collection() {
        let mut store = InMemoryStore::new();
        let a = Shelter::new("A shelter".into(), "Street 1".into(), "5551111".into(), 1);
        let b = Shelter::new("B shelter".into(), "Street 2".into(), "5552222".into(), 1);
        store.save(&[a.clone(), b]).unwrap();
        store.save(std::slice::from_ref(&a)).unwrap();

        assert_eq!(store.load::<Shelter>().unwrap(), vec![a]);
    }

    #[test]
    fn initialize_seeds_empty_arrays() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.initialize().unwrap().len(), 4);
        assert_eq!(store.raw(EntityKind::Request), Some("[]"));
    }
}
