use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::index::{index_entities, Indexed, Selector};
use crate::model::{Request, Role, User};
use crate::store::DataStore;
use crate::validation::Validator;
use chrono::NaiveDate;
use uuid::Uuid;

use super::auth::{hash_password, validate_profile};
use super::helpers::{position_of, resolve};
use super::request::referencing;

#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub home_address: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone_number.is_none()
            && self.home_address.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.role.is_none()
    }
}

#[derive(Debug, Clone)]
pub enum UserQuery {
    /// Exact full name.
    Name(String),
    Id(Uuid),
}

pub fn list<S: DataStore>(store: &S) -> Result<CmdResult> {
    let users: Vec<User> = store.load()?;
    Ok(CmdResult::default().with_users(index_entities(users)))
}

pub fn find<S: DataStore>(store: &S, query: &UserQuery) -> Result<CmdResult> {
    let users = index_entities(store.load::<User>()?);
    let found = users
        .into_iter()
        .filter(|u| match query {
            UserQuery::Name(name) => u.item.full_name == *name,
            UserQuery::Id(id) => u.item.id == *id,
        })
        .collect();
    Ok(CmdResult::default().with_users(found))
}

pub fn show<S: DataStore>(store: &S, selector: &Selector) -> Result<CmdResult> {
    let user: Indexed<User> = resolve(store, selector)?;
    Ok(CmdResult::default().with_users(vec![user]))
}

pub fn update<S: DataStore>(
    store: &mut S,
    selector: &Selector,
    changes: UserUpdate,
    today: NaiveDate,
) -> Result<CmdResult> {
    let mut users: Vec<User> = store.load()?;
    let pos = position_of(&users, selector)?;

    let mut edited = users[pos].clone();
    if let Some(full_name) = changes.full_name {
        edited.full_name = full_name;
    }
    if let Some(phone_number) = changes.phone_number {
        edited.phone_number = phone_number;
    }
    if let Some(home_address) = changes.home_address {
        edited.home_address = home_address;
    }
    if let Some(email) = changes.email {
        edited.email = email;
    }
    if let Some(role) = changes.role {
        edited.role = role;
    }

    let mut v = Validator::new();
    validate_profile(&mut v, &edited, changes.password.as_deref(), &users, today);
    let errors = v.finish();
    if !errors.is_empty() {
        tracing::warn!(id = %edited.id, errors = errors.len(), "user update rejected");
        return Ok(CmdResult::rejected(errors));
    }

    if let Some(password) = changes.password.as_deref() {
        edited.password_hash = hash_password(password);
    }
    users[pos] = edited.clone();
    store.save(&users)?;
    tracing::info!(id = %edited.id, role = %edited.role, "user updated");

    let mut result = CmdResult::default().with_users(vec![Indexed {
        index: pos + 1,
        item: edited.clone(),
    }]);
    result.add_message(CmdMessage::success(format!(
        "User updated: {}",
        edited.full_name
    )));
    Ok(result)
}

/// Remove an account. Refused while the user has requests on file.
pub fn delete<S: DataStore>(store: &mut S, selector: &Selector) -> Result<CmdResult> {
    let mut users: Vec<User> = store.load()?;
    let user = users[position_of(&users, selector)?].clone();

    let mut result = CmdResult::default();
    let requests: Vec<Request> = store.load()?;
    let open = referencing(&requests, user.id);
    if open > 0 {
        tracing::warn!(id = %user.id, requests = open, "user has requests, not deleted");
        result.add_message(CmdMessage::warning(format!(
            "User {} is referenced by {} request(s) and cannot be deleted.",
            user.full_name, open
        )));
        return Ok(result);
    }

    users.retain(|u| u.id != user.id);
    store.save(&users)?;
    tracing::info!(id = %user.id, "user deleted");
    result.add_message(CmdMessage::success(format!(
        "User deleted: {}",
        user.full_name
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::auth::verify_password;
    use crate::commands::MessageLevel;
    use crate::store::memory::fixtures::{date, StoreFixture};

    #[test]
    fn find_by_exact_name_or_id() {
        let mut fx = StoreFixture::new();
        fx.add_user("Olena Petrenko", Role::User);
        let ivan = fx.add_user("Ivan Franko", Role::Personal);

        let res = find(&fx.store, &UserQuery::Name("Ivan Franko".into())).unwrap();
        assert_eq!(res.users.len(), 1);
        assert_eq!(res.users[0].index, 2);

        let res = find(&fx.store, &UserQuery::Name("ivan franko".into())).unwrap();
        assert!(res.users.is_empty());

        let res = find(&fx.store, &UserQuery::Id(ivan.id)).unwrap();
        assert_eq!(res.users[0].item.full_name, "Ivan Franko");
    }

    #[test]
    fn show_resolves_selector() {
        let mut fx = StoreFixture::new();
        fx.add_user("Olena Petrenko", Role::User);
        let res = show(&fx.store, &Selector::Name("olena petrenko".into())).unwrap();
        assert_eq!(res.users[0].index, 1);
        assert!(show(&fx.store, &Selector::Index(2)).is_err());
    }

    #[test]
    fn update_rehashes_password_and_sets_role() {
        let mut fx = StoreFixture::new();
        fx.add_user("Olena Petrenko", Role::User);

        let res = update(
            &mut fx.store,
            &Selector::Index(1),
            UserUpdate {
                password: Some("newpass9".into()),
                role: Some(Role::Personal),
                ..Default::default()
            },
            date(2025, 6, 1),
        )
        .unwrap();
        assert!(!res.is_rejected());

        let user = &fx.store.load::<User>().unwrap()[0];
        assert_eq!(user.role, Role::Personal);
        assert!(verify_password("newpass9", &user.password_hash));
    }

    #[test]
    fn update_rejects_weak_password_and_taken_phone() {
        let mut fx = StoreFixture::new();
        let olena = fx.add_user("Olena Petrenko", Role::User);
        let ivan = fx.add_user("Ivan Franko", Role::User);

        let res = update(
            &mut fx.store,
            &Selector::Id(ivan.id),
            UserUpdate {
                phone_number: Some(olena.phone_number.clone()),
                password: Some("пароль".into()),
                ..Default::default()
            },
            date(2025, 6, 1),
        )
        .unwrap();
        assert_eq!(res.validation_errors.len(), 2);
        assert_eq!(fx.store.load::<User>().unwrap()[1], ivan);
    }

    #[test]
    fn delete_refused_while_user_has_requests() {
        let mut fx = StoreFixture::new();
        let shelter = fx.add_shelter("Alpha", 3);
        let rex = fx.add_animal("Rex", "Dog", &shelter);
        let olena = fx.add_user("Olena Petrenko", Role::User);
        fx.add_user("Ivan Franko", Role::User);
        fx.add_request("Adopt Rex", &rex, &olena);

        let res = delete(&mut fx.store, &Selector::Index(1)).unwrap();
        assert!(matches!(res.messages[0].level, MessageLevel::Warning));

        let res = delete(&mut fx.store, &Selector::Index(2)).unwrap();
        assert!(matches!(res.messages[0].level, MessageLevel::Success));
        assert_eq!(fx.store.load::<User>().unwrap().len(), 1);
    }
}
