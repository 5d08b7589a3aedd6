//! # Storage Layer
//!
//! Every entity collection is persisted as one flat JSON array. The [`DataStore`]
//! trait is the whole contract: load a full collection, save a full collection.
//! There is no indexing, no partial read and no caching; callers reload on every
//! operation and rewrite the complete array after a change.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, one file per collection
//! - [`memory::InMemoryStore`]: keeps the serialized JSON text in memory, for tests
//!
//! ## Storage Format
//!
//! ```text
//! Data/
//! ├── users.json       # [User, ...]
//! ├── animal.json      # [Animal, ...]
//! ├── shelters.json    # [Shelter, ...]
//! ├── request.json     # [Request, ...]
//! ├── config.json      # AppConfig
//! └── session.json     # signed-in user, if any
//! ```
//!
//! A missing or blank collection file reads as an empty collection. Writes to
//! different collections are independent: nothing spans two files atomically,
//! and two processes writing the same file race with last-write-wins.

use crate::error::Result;
use crate::model::{Entity, EntityKind};

pub mod fs;
pub mod memory;

/// Abstract interface for entity storage.
pub trait DataStore {
    /// Load the complete collection for `E`.
    fn load<E: Entity>(&self) -> Result<Vec<E>>;

    /// Replace the complete collection for `E`.
    fn save<E: Entity>(&mut self, entities: &[E]) -> Result<()>;

    /// Create any missing collection holding an empty array.
    /// Returns the kinds that were created.
    fn initialize(&mut self) -> Result<Vec<EntityKind>>;
}

/// Parse a collection's raw JSON text. Blank text is an empty collection.
pub(crate) fn parse_collection<E: Entity>(text: &str) -> serde_json::Result<Vec<E>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text)
}
