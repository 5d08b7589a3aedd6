//! # Display indexes and selectors
//!
//! Records are identified by UUID in storage, which is not something anyone
//! wants to type. Listings therefore number every record 1, 2, 3... in file
//! order, and commands accept a [`Selector`]: that number, the UUID itself, or
//! the record's name.
//!
//! Numbers are assigned over the *whole* collection before any filtering, so
//! the number shown next to a record in a filtered listing (`animal find
//! --species cat`) still selects the same record in a later command.
//!
//! Because every operation reloads the collection from disk, numbers are only
//! stable while nobody else adds or removes records.

use crate::model::Entity;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A record paired with its 1-based position in its collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indexed<T> {
    pub index: usize,
    pub item: T,
}

pub fn index_entities<T>(items: Vec<T>) -> Vec<Indexed<T>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| Indexed { index: i + 1, item })
        .collect()
}

/// User input selecting one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Index(usize),
    Id(Uuid),
    Name(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Index(i) => write!(f, "#{}", i),
            Selector::Id(id) => write!(f, "{}", id),
            Selector::Name(name) => write!(f, "\"{}\"", name),
        }
    }
}

impl FromStr for Selector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty selector".to_string());
        }
        if let Ok(n) = s.trim_start_matches('#').parse::<usize>() {
            if n == 0 {
                return Err("Indexes start at 1".to_string());
            }
            return Ok(Selector::Index(n));
        }
        if let Ok(id) = Uuid::parse_str(s) {
            return Ok(Selector::Id(id));
        }
        Ok(Selector::Name(s.to_string()))
    }
}

impl Selector {
    /// Returns the zero-based position of the first matching record.
    pub fn position<E: Entity>(&self, items: &[E]) -> Option<usize> {
        match self {
            Selector::Index(n) => (*n >= 1 && *n <= items.len()).then(|| n - 1),
            Selector::Id(id) => items.iter().position(|e| e.id() == *id),
            Selector::Name(name) => {
                let wanted = name.to_lowercase();
                items.iter().position(|e| e.label().to_lowercase() == wanted)
            }
        }
    }

    pub fn find<'a, E: Entity>(&self, items: &'a [E]) -> Option<&'a E> {
        self.position(items).map(|i| &items[i])
    }
}
