use crate::commands::{CmdMessage, CmdResult, RequestRow};
use crate::error::Result;
use crate::index::{index_entities, Indexed, Selector};
use crate::model::{Animal, Entity, Request, RequestStatus, User};
use crate::store::DataStore;
use crate::validation::{ErrorTemplate, Validator};
use chrono::NaiveDate;
use uuid::Uuid;

use super::helpers::{position_of, request_rows};

const NAME: &str = "request name";
const ANIMAL: &str = "request animal";
const USER: &str = "request user";

#[derive(Debug, Clone)]
pub struct NewRequest {
    pub name: String,
    pub animal: Option<Selector>,
    pub user: Option<Selector>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestUpdate {
    pub name: Option<String>,
    pub animal: Option<Selector>,
    pub status: Option<RequestStatus>,
}

impl RequestUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.animal.is_none() && self.status.is_none()
    }
}

#[derive(Debug, Clone)]
pub enum RequestQuery {
    Status(RequestStatus),
    Animal(Selector),
    User(Selector),
}

/// Look up the id a reference field points at, recording a validation error
/// when it is missing or matches nothing.
fn reference<E: Entity>(
    v: &mut Validator,
    field: &str,
    items: &[E],
    selector: Option<&Selector>,
) -> Option<Uuid> {
    let Some(selector) = selector else {
        v.check(true, ErrorTemplate::InvalidField.render(field, None));
        return None;
    };
    let found = selector.find(items).map(|e| e.id());
    v.check(
        found.is_none(),
        format!("No {} matches {}", E::KIND, selector),
    );
    found
}

pub fn create<S: DataStore>(
    store: &mut S,
    input: NewRequest,
    today: NaiveDate,
) -> Result<CmdResult> {
    let mut requests: Vec<Request> = store.load()?;
    let animals: Vec<Animal> = store.load()?;
    let users: Vec<User> = store.load()?;

    let mut v = Validator::new();
    v.required(NAME, &input.name);
    let animal_id = reference(&mut v, ANIMAL, &animals, input.animal.as_ref());
    let user_id = reference(&mut v, USER, &users, input.user.as_ref());

    let errors = v.finish();
    let (Some(animal_id), Some(user_id), true) = (animal_id, user_id, errors.is_empty()) else {
        tracing::warn!(errors = errors.len(), "request rejected");
        return Ok(CmdResult::rejected(errors));
    };

    let request = Request::new(input.name, animal_id, user_id, today);
    requests.push(request.clone());
    store.save(&requests)?;
    tracing::info!(id = %request.id, animal = %animal_id, user = %user_id, "request created");

    let index = requests.len();
    let rows = request_rows(store, vec![Indexed { index, item: request.clone() }])?;
    let mut result = CmdResult::default().with_requests(rows);
    result.add_message(CmdMessage::success(format!(
        "Request created: {} ({})",
        request.name, request.status
    )));
    Ok(result)
}

pub fn list<S: DataStore>(store: &S) -> Result<CmdResult> {
    let requests: Vec<Request> = store.load()?;
    let rows = request_rows(store, index_entities(requests))?;
    Ok(CmdResult::default().with_requests(rows))
}

pub fn find<S: DataStore>(store: &S, query: &RequestQuery) -> Result<CmdResult> {
    let requests = index_entities(store.load::<Request>()?);

    let found: Vec<Indexed<Request>> = match query {
        RequestQuery::Status(status) => requests
            .into_iter()
            .filter(|r| r.item.status == *status)
            .collect(),
        RequestQuery::Animal(selector) => {
            let animals: Vec<Animal> = store.load()?;
            let animal_id = animals[position_of(&animals, selector)?].id;
            requests
                .into_iter()
                .filter(|r| r.item.animal_id == animal_id)
                .collect()
        }
        RequestQuery::User(selector) => {
            let users: Vec<User> = store.load()?;
            let user_id = users[position_of(&users, selector)?].id;
            requests
                .into_iter()
                .filter(|r| r.item.user_id == user_id)
                .collect()
        }
    };

    Ok(CmdResult::default().with_requests(request_rows(store, found)?))
}

/// Change a request's name, animal or status. Status moves freely between
/// the three values.
pub fn update<S: DataStore>(
    store: &mut S,
    selector: &Selector,
    changes: RequestUpdate,
) -> Result<CmdResult> {
    let mut requests: Vec<Request> = store.load()?;
    let pos = position_of(&requests, selector)?;

    let mut edited = requests[pos].clone();
    let mut v = Validator::new();
    if let Some(name) = changes.name {
        edited.name = name;
    }
    v.required(NAME, &edited.name);
    if let Some(selector) = changes.animal.as_ref() {
        let animals: Vec<Animal> = store.load()?;
        if let Some(id) = reference(&mut v, ANIMAL, &animals, Some(selector)) {
            edited.animal_id = id;
        }
    }
    if let Some(status) = changes.status {
        edited.status = status;
    }

    let errors = v.finish();
    if !errors.is_empty() {
        tracing::warn!(id = %edited.id, errors = errors.len(), "request update rejected");
        return Ok(CmdResult::rejected(errors));
    }

    let previous = requests[pos].status;
    requests[pos] = edited.clone();
    store.save(&requests)?;
    tracing::info!(id = %edited.id, from = ?previous, to = ?edited.status, "request updated");

    let rows = request_rows(
        store,
        vec![Indexed {
            index: pos + 1,
            item: edited.clone(),
        }],
    )?;
    let mut result = CmdResult::default().with_requests(rows);
    result.add_message(CmdMessage::success(format!(
        "Request updated: {} ({})",
        edited.name, edited.status
    )));
    Ok(result)
}

pub fn delete<S: DataStore>(store: &mut S, selector: &Selector) -> Result<CmdResult> {
    let mut requests: Vec<Request> = store.load()?;
    let request = requests.remove(position_of(&requests, selector)?);
    store.save(&requests)?;
    tracing::info!(id = %request.id, "request deleted");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Request deleted: {}",
        request.name
    )));
    Ok(result)
}

/// Requests that point at this animal or user.
pub fn referencing(requests: &[Request], id: Uuid) -> usize {
    requests
        .iter()
        .filter(|r| r.animal_id == id || r.user_id == id)
        .count()
}

impl RequestRow {
    pub fn animal_name(&self) -> &str {
        self.animal.as_ref().map_or("(removed)", |a| a.name.as_str())
    }

    pub fn user_name(&self) -> &str {
        self.user.as_ref().map_or("(removed)", |u| u.full_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityKind, Role};
    use crate::store::memory::fixtures::{date, StoreFixture};

    fn setup() -> (StoreFixture, Animal, User) {
        let mut fx = StoreFixture::new();
        let shelter = fx.add_shelter("Alpha", 5);
        let animal = fx.add_animal("Rex", "Dog", &shelter);
        let user = fx.add_user("Olena Petrenko", Role::User);
        (fx, animal, user)
    }

    #[test]
    fn create_starts_pending() {
        let (mut fx, animal, user) = setup();
        let res = create(
            &mut fx.store,
            NewRequest {
                name: "Adopt Rex".into(),
                animal: Some(Selector::Name("rex".into())),
                user: Some(Selector::Id(user.id)),
            },
            date(2025, 5, 20),
        )
        .unwrap();
        assert!(!res.is_rejected());
        assert_eq!(res.requests[0].item.animal_name(), "Rex");

        let requests: Vec<Request> = fx.store.load().unwrap();
        assert_eq!(requests[0].status, RequestStatus::Pending);
        assert_eq!(requests[0].animal_id, animal.id);
        assert_eq!(requests[0].request_create_date, date(2025, 5, 20));
    }

    #[test]
    fn create_needs_name_animal_and_user() {
        let (mut fx, _, _) = setup();
        let res = create(
            &mut fx.store,
            NewRequest {
                name: "  ".into(),
                animal: None,
                user: Some(Selector::Name("Nobody".into())),
            },
            date(2025, 5, 20),
        )
        .unwrap();
        assert_eq!(
            res.validation_errors,
            vec![
                "Field 'request name' is required to be filled in!".to_string(),
                "Invalid field: request animal".to_string(),
                "No user matches \"Nobody\"".to_string(),
            ]
        );
        assert!(fx.store.raw(EntityKind::Request).is_none());
    }

    #[test]
    fn status_can_move_back_and_forth() {
        let (mut fx, animal, user) = setup();
        fx.add_request("Adopt Rex", &animal, &user);

        for status in [
            RequestStatus::Approved,
            RequestStatus::Pending,
            RequestStatus::Rejected,
        ] {
            let changes = RequestUpdate {
                status: Some(status),
                ..Default::default()
            };
            update(&mut fx.store, &Selector::Index(1), changes).unwrap();
            assert_eq!(fx.store.load::<Request>().unwrap()[0].status, status);
        }
    }

    #[test]
    fn find_by_status_animal_and_user() {
        let (mut fx, rex, olena) = setup();
        let shelter = fx.add_shelter("Beta", 5);
        let tom = fx.add_animal("Tom", "Cat", &shelter);
        let ivan = fx.add_user("Ivan Franko", Role::User);
        fx.add_request("Adopt Rex", &rex, &olena);
        fx.add_request("Adopt Tom", &tom, &olena);
        fx.add_request("Visit Tom", &tom, &ivan);

        let mut requests: Vec<Request> = fx.store.load().unwrap();
        requests[1].status = RequestStatus::Approved;
        fx.store.save(&requests).unwrap();

        let res = find(&fx.store, &RequestQuery::Status(RequestStatus::Pending)).unwrap();
        assert_eq!(res.requests.len(), 2);

        let res = find(&fx.store, &RequestQuery::Animal(Selector::Name("Tom".into()))).unwrap();
        assert_eq!(res.requests.len(), 2);
        assert_eq!(res.requests[0].index, 2);

        let res = find(&fx.store, &RequestQuery::User(Selector::Id(ivan.id))).unwrap();
        assert_eq!(res.requests.len(), 1);
        assert_eq!(res.requests[0].item.user_name(), "Ivan Franko");
    }

    #[test]
    fn delete_removes_only_selected() {
        let (mut fx, animal, user) = setup();
        fx.add_request("First", &animal, &user);
        fx.add_request("Second", &animal, &user);

        delete(&mut fx.store, &Selector::Name("first".into())).unwrap();
        let left: Vec<Request> = fx.store.load().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].name, "Second");
        assert_eq!(referencing(&left, animal.id), 1);
    }

    #[test]
    fn rows_survive_missing_references() {
        let (mut fx, animal, user) = setup();
        fx.add_request("Adopt Rex", &animal, &user);
        fx.store.save::<Animal>(&[]).unwrap();

        let res = list(&fx.store).unwrap();
        assert_eq!(res.requests[0].item.animal_name(), "(removed)");
    }
}
