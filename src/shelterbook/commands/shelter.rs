use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShelterError};
use crate::index::{index_entities, Indexed, Selector};
use crate::model::{Animal, Entity, Shelter};
use crate::store::DataStore;
use crate::validation::Validator;
use uuid::Uuid;

use super::helpers::position_of;

const NAME: (&str, usize, usize) = ("shelter name", 3, 50);
const ADDRESS: (&str, usize, usize) = ("shelter address", 5, 100);
const PHONE: (&str, usize, usize) = ("shelter phone", 7, 15);
const CAPACITY: &str = "shelter capacity";

#[derive(Debug, Clone)]
pub struct NewShelter {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub capacity: u32,
}

/// Fields to change; `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct ShelterUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub capacity: Option<u32>,
}

impl ShelterUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.capacity.is_none()
    }
}

#[derive(Debug, Clone)]
pub enum ShelterQuery {
    Name(String),
    Capacity(u32),
    Phone(String),
    Address(String),
}

impl ShelterQuery {
    fn matches(&self, shelter: &Shelter) -> bool {
        match self {
            ShelterQuery::Name(name) => shelter.name == *name,
            ShelterQuery::Capacity(capacity) => shelter.capacity == *capacity,
            ShelterQuery::Phone(phone) => shelter.phone == *phone,
            ShelterQuery::Address(address) => shelter.address == *address,
        }
    }
}

fn name_taken(shelters: &[Shelter], name: &str, except: Option<Uuid>) -> bool {
    let wanted = name.to_lowercase();
    shelters
        .iter()
        .any(|s| Some(s.id) != except && s.name.to_lowercase() == wanted)
}

fn validate(shelter: &Shelter, others: &[Shelter]) -> Vec<String> {
    let mut v = Validator::new();
    v.text(NAME.0, &shelter.name, NAME.1, NAME.2)
        .check(
            name_taken(others, &shelter.name, Some(shelter.id)),
            "A shelter with this name already exists.",
        )
        .text(ADDRESS.0, &shelter.address, ADDRESS.1, ADDRESS.2)
        .text(PHONE.0, &shelter.phone, PHONE.1, PHONE.2)
        .positive(CAPACITY, shelter.capacity)
        .check(
            shelter.capacity > 0 && shelter.capacity < shelter.animal_count,
            format!(
                "Capacity cannot be lower than the current number of animals ({}).",
                shelter.animal_count
            ),
        );
    v.finish()
}

pub fn create<S: DataStore>(store: &mut S, input: NewShelter) -> Result<CmdResult> {
    let mut shelters: Vec<Shelter> = store.load()?;
    let shelter = Shelter::new(input.name, input.address, input.phone, input.capacity);

    let errors = validate(&shelter, &shelters);
    if !errors.is_empty() {
        tracing::warn!(errors = errors.len(), "shelter rejected");
        return Ok(CmdResult::rejected(errors));
    }

    shelters.push(shelter.clone());
    store.save(&shelters)?;
    tracing::info!(id = %shelter.id, name = %shelter.name, "shelter created");

    let mut result = CmdResult::default().with_shelters(vec![Indexed {
        index: shelters.len(),
        item: shelter.clone(),
    }]);
    result.add_message(CmdMessage::success(format!(
        "Shelter created: {}",
        shelter.name
    )));
    Ok(result)
}

pub fn list<S: DataStore>(store: &S) -> Result<CmdResult> {
    let shelters: Vec<Shelter> = store.load()?;
    Ok(CmdResult::default().with_shelters(index_entities(shelters)))
}

pub fn find<S: DataStore>(store: &S, query: &ShelterQuery) -> Result<CmdResult> {
    let shelters: Vec<Shelter> = store.load()?;
    let found: Vec<_> = index_entities(shelters)
        .into_iter()
        .filter(|s| query.matches(&s.item))
        .collect();
    Ok(CmdResult::default().with_shelters(found))
}

pub fn update<S: DataStore>(
    store: &mut S,
    selector: &Selector,
    changes: ShelterUpdate,
) -> Result<CmdResult> {
    let mut shelters: Vec<Shelter> = store.load()?;
    let pos = position_of(&shelters, selector)?;

    let mut edited = shelters[pos].clone();
    if let Some(name) = changes.name {
        edited.name = name;
    }
    if let Some(address) = changes.address {
        edited.address = address;
    }
    if let Some(phone) = changes.phone {
        edited.phone = phone;
    }
    if let Some(capacity) = changes.capacity {
        edited.capacity = capacity;
    }

    let errors = validate(&edited, &shelters);
    if !errors.is_empty() {
        tracing::warn!(id = %edited.id, errors = errors.len(), "shelter update rejected");
        return Ok(CmdResult::rejected(errors));
    }

    shelters[pos] = edited.clone();
    store.save(&shelters)?;
    tracing::info!(id = %edited.id, "shelter updated");

    let mut result = CmdResult::default().with_shelters(vec![Indexed {
        index: pos + 1,
        item: edited.clone(),
    }]);
    result.add_message(CmdMessage::success(format!(
        "Shelter updated: {}",
        edited.name
    )));
    Ok(result)
}

/// Remove a shelter. Returns `false` and writes nothing while any animal
/// still lives there.
pub fn delete_shelter<S: DataStore>(store: &mut S, id: Uuid) -> Result<bool> {
    let mut shelters: Vec<Shelter> = store.load()?;
    if !shelters.iter().any(|s| s.id == id) {
        return Err(ShelterError::NotFound {
            kind: Shelter::KIND,
            id,
        });
    }

    let animals: Vec<Animal> = store.load()?;
    if animals.iter().any(|a| a.shelter_id == id) {
        return Ok(false);
    }

    shelters.retain(|s| s.id != id);
    store.save(&shelters)?;
    Ok(true)
}

pub fn delete<S: DataStore>(store: &mut S, selector: &Selector) -> Result<CmdResult> {
    let shelters: Vec<Shelter> = store.load()?;
    let shelter = shelters[position_of(&shelters, selector)?].clone();

    let mut result = CmdResult::default();
    if delete_shelter(store, shelter.id)? {
        tracing::info!(id = %shelter.id, "shelter deleted");
        result.add_message(CmdMessage::success(format!(
            "Shelter deleted: {}",
            shelter.name
        )));
    } else {
        tracing::warn!(id = %shelter.id, "shelter still houses animals, not deleted");
        result.add_message(CmdMessage::warning(format!(
            "Shelter {} still houses animals and cannot be deleted.",
            shelter.name
        )));
    }
    Ok(result)
}
