use crate::commands::{AnimalRow, RequestRow};
use crate::error::{Result, ShelterError};
use crate::index::{Indexed, Selector};
use crate::model::{Animal, Entity, Request, Shelter, User};
use crate::store::DataStore;

/// Position of the record matching `selector`, or an error naming it.
pub fn position_of<E: Entity>(items: &[E], selector: &Selector) -> Result<usize> {
    selector
        .position(items)
        .ok_or_else(|| ShelterError::Api(format!("No {} matches {}", E::KIND, selector)))
}

/// Load a collection and resolve one record in it.
pub fn resolve<S: DataStore, E: Entity>(store: &S, selector: &Selector) -> Result<Indexed<E>> {
    let items: Vec<E> = store.load()?;
    let pos = position_of(&items, selector)?;
    Ok(Indexed {
        index: pos + 1,
        item: items[pos].clone(),
    })
}

pub fn animal_rows<S: DataStore>(
    store: &S,
    animals: Vec<Indexed<Animal>>,
) -> Result<Vec<Indexed<AnimalRow>>> {
    let shelters: Vec<Shelter> = store.load()?;
    Ok(animals
        .into_iter()
        .map(|Indexed { index, item }| {
            let shelter = shelters.iter().find(|s| s.id == item.shelter_id).cloned();
            Indexed {
                index,
                item: AnimalRow {
                    animal: item,
                    shelter,
                },
            }
        })
        .collect())
}

pub fn request_rows<S: DataStore>(
    store: &S,
    requests: Vec<Indexed<Request>>,
) -> Result<Vec<Indexed<RequestRow>>> {
    let animals: Vec<Animal> = store.load()?;
    let users: Vec<User> = store.load()?;
    Ok(requests
        .into_iter()
        .map(|Indexed { index, item }| {
            let animal = animals.iter().find(|a| a.id == item.animal_id).cloned();
            let user = users.iter().find(|u| u.id == item.user_id).cloned();
            Indexed {
                index,
                item: RequestRow {
                    request: item,
                    animal,
                    user,
                },
            }
        })
        .collect())
}
