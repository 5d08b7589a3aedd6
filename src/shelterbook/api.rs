//! # API Facade
//!
//! [`ShelterApi`] is the single entry point for every shelterbook operation,
//! whatever the front end. It is a thin layer over `commands/*.rs`:
//!
//! - **Authorizes**: every entity operation needs a signed-in user whose
//!   [`Role`] permits the action on that entity kind.
//! - **Normalizes inputs**: text selectors become [`Selector`]s, the current
//!   date is supplied to commands that stamp or check dates.
//! - **Dispatches** to the command function and returns its `CmdResult`.
//!
//! Business rules live in the command modules, printing lives in the CLI.
//!
//! ## Who may do what
//!
//! Permissions come from [`Role::permissions`]. On top of the table:
//!
//! - `register`, `login`, `logout` and `init` need no session.
//! - Anyone signed in may view and edit their own profile, but changing a
//!   role still needs edit permission on users.
//! - A request is filed for the signed-in user unless the caller names
//!   another user, which needs read permission on users.
//! - Config may be changed by anyone while no user exists (first setup),
//!   afterwards only by an admin.
//!
//! ## Generic Over DataStore
//!
//! `ShelterApi<FileStore>` in production, `ShelterApi<InMemoryStore>` in
//! tests. The session and config files always live in `paths.data_dir`.

use crate::commands::{self, CmdResult, DataPaths};
use crate::commands::animal::{AnimalQuery, AnimalUpdate, NewAnimal};
use crate::commands::auth::Registration;
use crate::commands::config::ConfigAction;
use crate::commands::request::{NewRequest, RequestQuery, RequestUpdate};
use crate::commands::shelter::{NewShelter, ShelterQuery, ShelterUpdate};
use crate::commands::user::{UserQuery, UserUpdate};
use crate::config::AppConfig;
use crate::error::{Result, ShelterError};
use crate::index::{Indexed, Selector};
use crate::model::{Action, EntityKind, Role, User};
use crate::store::DataStore;
use chrono::{Local, NaiveDate};

/// Parse user input into a selector.
pub fn parse_selector(input: &str) -> Result<Selector> {
    input.parse().map_err(ShelterError::Api)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct ShelterApi<S: DataStore> {
    store: S,
    paths: DataPaths,
}

impl<S: DataStore> ShelterApi<S> {
    pub fn new(store: S, paths: DataPaths) -> Self {
        Self { store, paths }
    }

    pub fn paths(&self) -> &DataPaths {
        &self.paths
    }

    /// The signed-in user.
    fn actor(&self) -> Result<User> {
        commands::auth::current_user(&self.store, &self.paths)?
            .map(|account| account.user)
            .ok_or(ShelterError::NotSignedIn)
    }

    /// The signed-in user, if their role allows `action` on `kind`.
    fn authorize(&self, kind: EntityKind, action: Action) -> Result<User> {
        let user = self.actor()?;
        if !user.role.permits(kind, action) {
            tracing::warn!(user = %user.id, role = %user.role, %action, %kind, "permission denied");
            return Err(ShelterError::PermissionDenied {
                role: user.role,
                action,
                kind,
            });
        }
        Ok(user)
    }

    // --- Setup and accounts ---

    pub fn init(&mut self) -> Result<CmdResult> {
        commands::init::run(&mut self.store, &self.paths)
    }

    pub fn register(&mut self, registration: Registration) -> Result<CmdResult> {
        let config = AppConfig::load(&self.paths.data_dir)?;
        commands::auth::register(&mut self.store, &config, registration, today())
    }

    pub fn login(&self, full_name: &str, email: &str, password: &str) -> Result<CmdResult> {
        commands::auth::login(&self.store, &self.paths, full_name, email, password)
    }

    pub fn logout(&self) -> Result<CmdResult> {
        commands::auth::logout(&self.paths)
    }

    pub fn whoami(&self) -> Result<CmdResult> {
        commands::auth::whoami(&self.store, &self.paths)
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        if let ConfigAction::Set(..) = action {
            let users: Vec<User> = self.store.load()?;
            if !users.is_empty() {
                let actor = self.actor()?;
                if actor.role != Role::Admin {
                    return Err(ShelterError::Api(
                        "Only an admin can change configuration".to_string(),
                    ));
                }
            }
        }
        commands::config::run(&self.paths, action)
    }

    // --- Shelters ---

    pub fn list_shelters(&self) -> Result<CmdResult> {
        self.authorize(EntityKind::Shelter, Action::Read)?;
        commands::shelter::list(&self.store)
    }

    pub fn find_shelters(&self, query: &ShelterQuery) -> Result<CmdResult> {
        self.authorize(EntityKind::Shelter, Action::Read)?;
        commands::shelter::find(&self.store, query)
    }

    pub fn add_shelter(&mut self, input: NewShelter) -> Result<CmdResult> {
        self.authorize(EntityKind::Shelter, Action::Add)?;
        commands::shelter::create(&mut self.store, input)
    }

    pub fn edit_shelter(&mut self, selector: &str, changes: ShelterUpdate) -> Result<CmdResult> {
        self.authorize(EntityKind::Shelter, Action::Edit)?;
        commands::shelter::update(&mut self.store, &parse_selector(selector)?, changes)
    }

    pub fn delete_shelter(&mut self, selector: &str) -> Result<CmdResult> {
        self.authorize(EntityKind::Shelter, Action::Delete)?;
        commands::shelter::delete(&mut self.store, &parse_selector(selector)?)
    }

    // --- Animals ---

    pub fn list_animals(&self) -> Result<CmdResult> {
        self.authorize(EntityKind::Animal, Action::Read)?;
        commands::animal::list(&self.store)
    }

    pub fn find_animals(&self, query: &AnimalQuery) -> Result<CmdResult> {
        self.authorize(EntityKind::Animal, Action::Read)?;
        commands::animal::find(&self.store, query)
    }

    pub fn add_animal(&mut self, input: NewAnimal) -> Result<CmdResult> {
        self.authorize(EntityKind::Animal, Action::Add)?;
        commands::animal::add(&mut self.store, input, today())
    }

    pub fn edit_animal(&mut self, selector: &str, changes: AnimalUpdate) -> Result<CmdResult> {
        self.authorize(EntityKind::Animal, Action::Edit)?;
        commands::animal::update(&mut self.store, &parse_selector(selector)?, changes)
    }

    pub fn delete_animal(&mut self, selector: &str) -> Result<CmdResult> {
        self.authorize(EntityKind::Animal, Action::Delete)?;
        commands::animal::delete(&mut self.store, &parse_selector(selector)?)
    }

    // --- Requests ---

    pub fn list_requests(&self) -> Result<CmdResult> {
        self.authorize(EntityKind::Request, Action::Read)?;
        commands::request::list(&self.store)
    }

    pub fn find_requests(&self, query: &RequestQuery) -> Result<CmdResult> {
        self.authorize(EntityKind::Request, Action::Read)?;
        commands::request::find(&self.store, query)
    }

    /// File a request. Without `user` the request is filed for the caller.
    pub fn add_request(
        &mut self,
        name: String,
        animal: Option<&str>,
        user: Option<&str>,
    ) -> Result<CmdResult> {
        let actor = self.authorize(EntityKind::Request, Action::Add)?;
        let user = match user {
            Some(input) => {
                if !actor.role.permits(EntityKind::User, Action::Read) {
                    return Err(ShelterError::PermissionDenied {
                        role: actor.role,
                        action: Action::Read,
                        kind: EntityKind::User,
                    });
                }
                parse_selector(input)?
            }
            None => Selector::Id(actor.id),
        };
        let input = NewRequest {
            name,
            animal: animal.map(parse_selector).transpose()?,
            user: Some(user),
        };
        commands::request::create(&mut self.store, input, today())
    }

    pub fn edit_request(&mut self, selector: &str, changes: RequestUpdate) -> Result<CmdResult> {
        self.authorize(EntityKind::Request, Action::Edit)?;
        commands::request::update(&mut self.store, &parse_selector(selector)?, changes)
    }

    pub fn delete_request(&mut self, selector: &str) -> Result<CmdResult> {
        self.authorize(EntityKind::Request, Action::Delete)?;
        commands::request::delete(&mut self.store, &parse_selector(selector)?)
    }

    // --- Users ---

    pub fn list_users(&self) -> Result<CmdResult> {
        self.authorize(EntityKind::User, Action::Read)?;
        commands::user::list(&self.store)
    }

    pub fn find_users(&self, query: &UserQuery) -> Result<CmdResult> {
        self.authorize(EntityKind::User, Action::Read)?;
        commands::user::find(&self.store, query)
    }

    /// Show one profile. Without a selector, shows the caller's own.
    pub fn show_user(&self, selector: Option<&str>) -> Result<CmdResult> {
        let actor = self.actor()?;
        let selector = match selector {
            Some(input) => parse_selector(input)?,
            None => Selector::Id(actor.id),
        };
        let target: Indexed<User> = commands::helpers::resolve(&self.store, &selector)?;
        if target.item.id != actor.id {
            self.authorize(EntityKind::User, Action::Read)?;
        }
        commands::user::show(&self.store, &Selector::Id(target.item.id))
    }

    /// Edit a profile. Without a selector, edits the caller's own.
    pub fn edit_user(&mut self, selector: Option<&str>, changes: UserUpdate) -> Result<CmdResult> {
        let actor = self.actor()?;
        let selector = match selector {
            Some(input) => parse_selector(input)?,
            None => Selector::Id(actor.id),
        };
        let target: Indexed<User> = commands::helpers::resolve(&self.store, &selector)?;
        if target.item.id != actor.id || changes.role.is_some() {
            self.authorize(EntityKind::User, Action::Edit)?;
        }
        commands::user::update(
            &mut self.store,
            &Selector::Id(target.item.id),
            changes,
            today(),
        )
    }

    pub fn delete_user(&mut self, selector: &str) -> Result<CmdResult> {
        let actor = self.authorize(EntityKind::User, Action::Delete)?;
        let selector = parse_selector(selector)?;
        let target: Indexed<User> = commands::helpers::resolve(&self.store, &selector)?;
        if target.item.id == actor.id {
            return Err(ShelterError::Api(
                "You cannot delete your own account while signed in".to_string(),
            ));
        }
        commands::user::delete(&mut self.store, &Selector::Id(target.item.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Request, Shelter};
    use crate::store::memory::InMemoryStore;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn api() -> (ShelterApi<InMemoryStore>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path().to_path_buf());
        (ShelterApi::new(InMemoryStore::new(), paths), dir)
    }

    fn registration(full_name: &str, phone: &str) -> Registration {
        Registration {
            full_name: full_name.into(),
            password: "secret1".into(),
            email: format!("{}@example.com", phone),
            phone_number: phone.into(),
            home_address: "Kyiv, Khreshchatyk 1".into(),
            birthdate: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
        }
    }

    fn sign_in(api: &ShelterApi<InMemoryStore>, full_name: &str, phone: &str) {
        api.login(full_name, &format!("{}@example.com", phone), "secret1")
            .unwrap();
    }

    fn shelter(name: &str) -> NewShelter {
        NewShelter {
            name: name.into(),
            address: "10 Linden Avenue".into(),
            phone: "5551234567".into(),
            capacity: 3,
        }
    }

    /// Admin Olena with one shelter and one animal, plus a plain user Ivan.
    fn populated() -> (ShelterApi<InMemoryStore>, TempDir) {
        let (mut api, dir) = api();
        api.register(registration("Olena Petrenko", "0501111111"))
            .unwrap();
        api.register(registration("Ivan Franko", "0502222222"))
            .unwrap();
        sign_in(&api, "Olena Petrenko", "0501111111");
        api.add_shelter(shelter("Warm Nest")).unwrap();
        api.add_animal(NewAnimal {
            name: "Rex".into(),
            age: 2,
            species: "Dog".into(),
            breed: "Beagle".into(),
            shelter: Some(Selector::Index(1)),
        })
        .unwrap();
        (api, dir)
    }

    #[test]
    fn operations_need_a_session() {
        let (mut api, _dir) = api();
        assert!(matches!(api.list_shelters(), Err(ShelterError::NotSignedIn)));
        assert!(matches!(
            api.add_shelter(shelter("Warm Nest")),
            Err(ShelterError::NotSignedIn)
        ));
    }

    #[test]
    fn admin_manages_everything() {
        let (mut api, _dir) = populated();
        assert_eq!(api.list_users().unwrap().users.len(), 2);

        let res = api
            .edit_user(
                Some("Ivan Franko"),
                UserUpdate {
                    role: Some(Role::Personal),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(res.users[0].item.role, Role::Personal);
    }

    #[test]
    fn plain_user_permissions() {
        let (mut api, _dir) = populated();
        sign_in(&api, "Ivan Franko", "0502222222");

        assert_eq!(api.list_shelters().unwrap().shelters.len(), 1);
        assert_eq!(api.list_animals().unwrap().animals.len(), 1);
        assert!(matches!(
            api.add_shelter(shelter("Second Home")),
            Err(ShelterError::PermissionDenied {
                role: Role::User,
                action: Action::Add,
                kind: EntityKind::Shelter,
            })
        ));
        assert!(matches!(
            api.delete_animal("1"),
            Err(ShelterError::PermissionDenied { .. })
        ));
        assert!(matches!(
            api.list_requests(),
            Err(ShelterError::PermissionDenied { .. })
        ));
        assert!(matches!(
            api.list_users(),
            Err(ShelterError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn plain_user_files_requests_for_themselves() {
        let (mut api, _dir) = populated();
        sign_in(&api, "Ivan Franko", "0502222222");

        let res = api
            .add_request("Adopt Rex".into(), Some("rex"), None)
            .unwrap();
        assert!(!res.is_rejected());
        assert_eq!(res.requests[0].item.user_name(), "Ivan Franko");

        assert!(matches!(
            api.add_request("For Olena".into(), Some("rex"), Some("Olena Petrenko")),
            Err(ShelterError::PermissionDenied { .. })
        ));
        assert_eq!(api.store.load::<Request>().unwrap().len(), 1);
    }

    #[test]
    fn users_see_and_edit_own_profile_but_not_role() {
        let (mut api, _dir) = populated();
        sign_in(&api, "Ivan Franko", "0502222222");

        let res = api.show_user(None).unwrap();
        assert_eq!(res.users[0].item.full_name, "Ivan Franko");
        assert!(api.show_user(Some("Olena Petrenko")).is_err());

        let res = api
            .edit_user(
                None,
                UserUpdate {
                    home_address: Some("Lviv, Rynok 5".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(res.users[0].item.home_address, "Lviv, Rynok 5");

        assert!(matches!(
            api.edit_user(
                None,
                UserUpdate {
                    role: Some(Role::Admin),
                    ..Default::default()
                },
            ),
            Err(ShelterError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn config_is_admin_only_once_users_exist() {
        let (api, _dir) = api();
        api.config(ConfigAction::Set("default-role".into(), "personal".into()))
            .unwrap();

        let (api, _dir) = populated();
        sign_in(&api, "Ivan Franko", "0502222222");
        assert!(api
            .config(ConfigAction::Set("bootstrap-admin".into(), "false".into()))
            .is_err());
        assert!(api.config(ConfigAction::ShowAll).unwrap().config.is_some());
    }

    #[test]
    fn selectors_reach_commands() {
        let (mut api, _dir) = populated();
        let res = api
            .edit_shelter(
                "warm nest",
                ShelterUpdate {
                    capacity: Some(8),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!res.is_rejected());
        assert_eq!(api.store.load::<Shelter>().unwrap()[0].capacity, 8);

        assert!(matches!(api.delete_shelter("0"), Err(ShelterError::Api(_))));
        assert!(matches!(api.delete_shelter("#9"), Err(ShelterError::Api(_))));
    }

    #[test]
    fn admin_cannot_delete_self() {
        let (mut api, _dir) = populated();
        assert!(api.delete_user("Olena Petrenko").is_err());
        let res = api.delete_user("Ivan Franko").unwrap();
        assert!(res.messages[0].content.starts_with("User deleted"));
    }
}
