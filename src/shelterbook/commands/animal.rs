use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::{index_entities, Indexed, Selector};
use crate::model::{Animal, Request, Shelter};
use crate::store::DataStore;
use crate::validation::{ErrorTemplate, Validator};
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use super::helpers::{animal_rows, position_of};

const NAME: (&str, usize, usize) = ("animal name", 2, 50);
const SPECIES: (&str, usize, usize) = ("animal species", 2, 50);
const BREED: (&str, usize, usize) = ("animal breed", 2, 50);
const AGE: &str = "animal age";
const SHELTER: &str = "animal shelter";

const NO_ROOM: &str = "The shelter has no available space for the animal.";

#[derive(Debug, Clone)]
pub struct NewAnimal {
    pub name: String,
    pub age: u32,
    pub species: String,
    pub breed: String,
    pub shelter: Option<Selector>,
}

/// Fields to change; `None` leaves the field as is. Setting `shelter` moves
/// the animal.
#[derive(Debug, Clone, Default)]
pub struct AnimalUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub shelter: Option<Selector>,
}

impl AnimalUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.species.is_none()
            && self.breed.is_none()
            && self.shelter.is_none()
    }
}

#[derive(Debug, Clone)]
pub enum AnimalQuery {
    /// First animal with this name, ignoring case.
    Name(String),
    Species(String),
    Breed(String),
    /// Intake year.
    Year(i32),
    Shelter(Selector),
}

fn validate_fields(v: &mut Validator, animal: &Animal) {
    v.text(NAME.0, &animal.name, NAME.1, NAME.2)
        .positive(AGE, animal.age)
        .text(SPECIES.0, &animal.species, SPECIES.1, SPECIES.2)
        .text(BREED.0, &animal.breed, BREED.1, BREED.2);
}

/// Resolve the shelter an animal should live in, recording why it can't.
fn target_shelter(
    v: &mut Validator,
    shelters: &[Shelter],
    selector: Option<&Selector>,
) -> Option<usize> {
    let Some(selector) = selector else {
        v.check(true, ErrorTemplate::InvalidField.render(SHELTER, None));
        return None;
    };
    let pos = selector.position(shelters);
    v.check(pos.is_none(), format!("No shelter matches {}", selector));
    pos
}

/// Take in a new animal. The intake date is `today`.
///
/// The shelter must exist and have room. On success the animal collection
/// and then the shelter collection are rewritten; on rejection neither is.
pub fn add<S: DataStore>(store: &mut S, input: NewAnimal, today: NaiveDate) -> Result<CmdResult> {
    let mut animals: Vec<Animal> = store.load()?;
    let mut shelters: Vec<Shelter> = store.load()?;

    let mut v = Validator::new();
    let target = target_shelter(&mut v, &shelters, input.shelter.as_ref());
    let animal = Animal::new(
        input.name,
        input.age,
        input.species,
        input.breed,
        today,
        target.map(|i| shelters[i].id).unwrap_or_else(Uuid::nil),
    );
    validate_fields(&mut v, &animal);
    if let Some(i) = target {
        v.check(!shelters[i].has_room(), NO_ROOM);
    }

    let errors = v.finish();
    let Some(target) = target.filter(|_| errors.is_empty()) else {
        tracing::warn!(errors = errors.len(), "animal rejected");
        return Ok(CmdResult::rejected(errors));
    };

    animals.push(animal.clone());
    shelters[target].animal_count += 1;
    store.save(&animals)?;
    store.save(&shelters)?;
    tracing::info!(id = %animal.id, shelter = %shelters[target].id, "animal added");

    let shelter = shelters[target].clone();
    let mut result = CmdResult::default().with_animals(vec![Indexed {
        index: animals.len(),
        item: super::AnimalRow {
            animal: animal.clone(),
            shelter: Some(shelter.clone()),
        },
    }]);
    result.add_message(CmdMessage::success(format!(
        "Animal added: {} ({}/{} places taken in {})",
        animal.name, shelter.animal_count, shelter.capacity, shelter.name
    )));
    Ok(result)
}

pub fn list<S: DataStore>(store: &S) -> Result<CmdResult> {
    let animals: Vec<Animal> = store.load()?;
    let rows = animal_rows(store, index_entities(animals))?;
    Ok(CmdResult::default().with_animals(rows))
}

pub fn find<S: DataStore>(store: &S, query: &AnimalQuery) -> Result<CmdResult> {
    let animals = index_entities(store.load::<Animal>()?);

    let found: Vec<Indexed<Animal>> = match query {
        AnimalQuery::Name(name) => {
            let wanted = name.to_lowercase();
            animals
                .into_iter()
                .find(|a| a.item.name.to_lowercase() == wanted)
                .into_iter()
                .collect()
        }
        AnimalQuery::Species(species) => {
            let wanted = species.to_lowercase();
            animals
                .into_iter()
                .filter(|a| a.item.species.to_lowercase() == wanted)
                .collect()
        }
        AnimalQuery::Breed(breed) => {
            let wanted = breed.to_lowercase();
            animals
                .into_iter()
                .filter(|a| a.item.breed.to_lowercase() == wanted)
                .collect()
        }
        AnimalQuery::Year(year) => animals
            .into_iter()
            .filter(|a| a.item.date_of_delivery.year() == *year)
            .collect(),
        AnimalQuery::Shelter(selector) => {
            let shelters: Vec<Shelter> = store.load()?;
            let shelter_id = shelters[position_of(&shelters, selector)?].id;
            animals
                .into_iter()
                .filter(|a| a.item.shelter_id == shelter_id)
                .collect()
        }
    };

    Ok(CmdResult::default().with_animals(animal_rows(store, found)?))
}

pub fn update<S: DataStore>(
    store: &mut S,
    selector: &Selector,
    changes: AnimalUpdate,
) -> Result<CmdResult> {
    let mut animals: Vec<Animal> = store.load()?;
    let mut shelters: Vec<Shelter> = store.load()?;
    let pos = position_of(&animals, selector)?;

    let mut edited = animals[pos].clone();
    if let Some(name) = changes.name {
        edited.name = name;
    }
    if let Some(age) = changes.age {
        edited.age = age;
    }
    if let Some(species) = changes.species {
        edited.species = species;
    }
    if let Some(breed) = changes.breed {
        edited.breed = breed;
    }

    let mut v = Validator::new();
    validate_fields(&mut v, &edited);

    let old_shelter = shelters.iter().position(|s| s.id == edited.shelter_id);
    let mut moved_to = None;
    if let Some(selector) = changes.shelter.as_ref() {
        if let Some(new) = target_shelter(&mut v, &shelters, Some(selector)) {
            if Some(new) != old_shelter {
                v.check(!shelters[new].has_room(), NO_ROOM);
                moved_to = Some(new);
            }
        }
    }

    let errors = v.finish();
    if !errors.is_empty() {
        tracing::warn!(id = %edited.id, errors = errors.len(), "animal update rejected");
        return Ok(CmdResult::rejected(errors));
    }

    if let Some(new) = moved_to {
        edited.shelter_id = shelters[new].id;
        shelters[new].animal_count += 1;
        if let Some(old) = old_shelter {
            shelters[old].animal_count = shelters[old].animal_count.saturating_sub(1);
        }
    }

    animals[pos] = edited.clone();
    store.save(&animals)?;
    if moved_to.is_some() {
        store.save(&shelters)?;
    }
    tracing::info!(id = %edited.id, moved = moved_to.is_some(), "animal updated");

    let shelter = shelters.iter().find(|s| s.id == edited.shelter_id).cloned();
    let mut result = CmdResult::default().with_animals(vec![Indexed {
        index: pos + 1,
        item: super::AnimalRow {
            animal: edited.clone(),
            shelter,
        },
    }]);
    result.add_message(CmdMessage::success(format!(
        "Animal updated: {}",
        edited.name
    )));
    Ok(result)
}

/// Remove an animal and free its place in the shelter. Refused while any
/// request still points at the animal.
pub fn delete<S: DataStore>(store: &mut S, selector: &Selector) -> Result<CmdResult> {
    let mut animals: Vec<Animal> = store.load()?;
    let animal = animals[position_of(&animals, selector)?].clone();

    let mut result = CmdResult::default();
    let requests: Vec<Request> = store.load()?;
    let open = requests.iter().filter(|r| r.animal_id == animal.id).count();
    if open > 0 {
        tracing::warn!(id = %animal.id, requests = open, "animal has requests, not deleted");
        result.add_message(CmdMessage::warning(format!(
            "Animal {} is referenced by {} request(s) and cannot be deleted.",
            animal.name, open
        )));
        return Ok(result);
    }

    animals.retain(|a| a.id != animal.id);
    store.save(&animals)?;

    let mut shelters: Vec<Shelter> = store.load()?;
    if let Some(shelter) = shelters.iter_mut().find(|s| s.id == animal.shelter_id) {
        shelter.animal_count = shelter.animal_count.saturating_sub(1);
        store.save(&shelters)?;
    }
    tracing::info!(id = %animal.id, "animal deleted");

    result.add_message(CmdMessage::success(format!(
        "Animal deleted: {}",
        animal.name
    )));
    Ok(result)
}
