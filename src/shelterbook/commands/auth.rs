//! Registration, sign-in and the session file.
//!
//! Passwords are never stored in plain text. Each user record carries
//! `<salt>$<sha256 hex of salt + password>` where the salt is a fresh random
//! UUID in simple form.

use crate::commands::{Account, CmdMessage, CmdResult, DataPaths};
use crate::config::AppConfig;
use crate::error::{Result, ShelterError};
use crate::index::Indexed;
use crate::model::{Role, User};
use crate::session::Session;
use crate::store::DataStore;
use crate::validation::Validator;
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use uuid::Uuid;

const FULL_NAME: (&str, usize, usize) = ("user full name", 4, 48);
const PASSWORD: (&str, usize, usize) = ("user password", 2, 30);
const PHONE: &str = "user phone number";
const ADDRESS: &str = "user home address";
const EMAIL: &str = "user email";

fn digest(salt: &str, plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(plain.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn hash_password(plain: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{}${}", salt, digest(&salt, plain))
}

pub fn verify_password(plain: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, hex)) => digest(salt, plain) == hex,
        None => false,
    }
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub full_name: String,
    pub password: String,
    pub email: String,
    pub phone_number: String,
    pub home_address: String,
    pub birthdate: NaiveDate,
}

/// Profile checks shared by registration and profile edits. `password` is
/// the plain text when one is being set.
pub(crate) fn validate_profile(
    v: &mut Validator,
    user: &User,
    password: Option<&str>,
    others: &[User],
    today: NaiveDate,
) {
    v.text(FULL_NAME.0, &user.full_name, FULL_NAME.1, FULL_NAME.2);
    if let Some(password) = password {
        v.text(PASSWORD.0, password, PASSWORD.1, PASSWORD.2)
            .password(PASSWORD.0, password);
    }
    v.required(PHONE, &user.phone_number)
        .check(
            others
                .iter()
                .any(|u| u.id != user.id && u.phone_number == user.phone_number),
            "A user with this phone number already exists.",
        )
        .required(ADDRESS, &user.home_address)
        .required(EMAIL, &user.email)
        .in_past(user.birthdate, today);
}

/// Create an account. The first account in an empty store becomes an admin
/// when `bootstrap-admin` is on; everyone else gets the configured default
/// role.
pub fn register<S: DataStore>(
    store: &mut S,
    config: &AppConfig,
    input: Registration,
    today: NaiveDate,
) -> Result<CmdResult> {
    let mut users: Vec<User> = store.load()?;
    let role = if users.is_empty() && config.bootstrap_admin {
        Role::Admin
    } else {
        config.default_role
    };

    let user = User::new(
        input.full_name,
        hash_password(&input.password),
        input.phone_number,
        input.home_address,
        input.email,
        input.birthdate,
        role,
    );

    let mut v = Validator::new();
    validate_profile(&mut v, &user, Some(&input.password), &users, today);
    let errors = v.finish();
    if !errors.is_empty() {
        tracing::warn!(errors = errors.len(), "registration rejected");
        return Ok(CmdResult::rejected(errors));
    }

    users.push(user.clone());
    store.save(&users)?;
    tracing::info!(id = %user.id, role = %user.role, "user registered");

    let mut result = CmdResult::default().with_users(vec![Indexed {
        index: users.len(),
        item: user.clone(),
    }]);
    result.add_message(CmdMessage::success(format!(
        "Registered {} as {}",
        user.full_name, user.role
    )));
    Ok(result)
}

/// Find the user with this full name and email and check the password.
pub fn authenticate<S: DataStore>(
    store: &S,
    full_name: &str,
    email: &str,
    password: &str,
) -> Result<User> {
    let users: Vec<User> = store.load()?;
    users
        .into_iter()
        .find(|u| {
            u.full_name == full_name
                && u.email.eq_ignore_ascii_case(email)
                && verify_password(password, &u.password_hash)
        })
        .ok_or(ShelterError::AuthenticationFailed)
}

pub fn login<S: DataStore>(
    store: &S,
    paths: &DataPaths,
    full_name: &str,
    email: &str,
    password: &str,
) -> Result<CmdResult> {
    let user = match authenticate(store, full_name, email, password) {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(full_name, "sign-in failed");
            return Err(e);
        }
    };

    let session = Session::new(user.id);
    session.save(&paths.data_dir)?;
    tracing::info!(id = %user.id, "signed in");

    let mut result = CmdResult::default().with_account(Account {
        user: user.clone(),
        signed_in_at: Some(session.signed_in_at),
    });
    result.add_message(CmdMessage::success(format!(
        "Signed in as {} ({})",
        user.full_name, user.role
    )));
    Ok(result)
}

pub fn logout(paths: &DataPaths) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if Session::clear(&paths.data_dir)? {
        tracing::info!("signed out");
        result.add_message(CmdMessage::success("Signed out"));
    } else {
        result.add_message(CmdMessage::info("Not signed in"));
    }
    Ok(result)
}

/// The signed-in user, if the session points at an existing account.
pub fn current_user<S: DataStore>(store: &S, paths: &DataPaths) -> Result<Option<Account>> {
    let Some(session) = Session::load(&paths.data_dir)? else {
        return Ok(None);
    };
    let users: Vec<User> = store.load()?;
    match users.into_iter().find(|u| u.id == session.user_id) {
        Some(user) => Ok(Some(Account {
            user,
            signed_in_at: Some(session.signed_in_at),
        })),
        None => {
            tracing::warn!(id = %session.user_id, "session points at a removed user");
            Ok(None)
        }
    }
}

pub fn whoami<S: DataStore>(store: &S, paths: &DataPaths) -> Result<CmdResult> {
    let account = current_user(store, paths)?.ok_or(ShelterError::NotSignedIn)?;
    Ok(CmdResult::default().with_account(account))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::{date, StoreFixture};
    use crate::store::memory::InMemoryStore;

    fn olena() -> Registration {
        Registration {
            full_name: "Olena Petrenko".into(),
            password: "secret1".into(),
            email: "olena@example.com".into(),
            phone_number: "0501234567".into(),
            home_address: "Kyiv, Khreshchatyk 1".into(),
            birthdate: date(1990, 5, 1),
        }
    }

    fn today() -> NaiveDate {
        date(2025, 6, 1)
    }

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let a = hash_password("secret1");
        let b = hash_password("secret1");
        assert_ne!(a, b);
        assert!(verify_password("secret1", &a));
        assert!(!verify_password("secret2", &a));
        assert!(!verify_password("secret1", "no-separator"));
    }

    #[test]
    fn first_user_becomes_admin_then_default_role() {
        let mut store = InMemoryStore::new();
        let config = AppConfig::default();

        register(&mut store, &config, olena(), today()).unwrap();
        let mut second = olena();
        second.full_name = "Ivan Franko".into();
        second.phone_number = "0507654321".into();
        register(&mut store, &config, second, today()).unwrap();

        let users: Vec<User> = store.load().unwrap();
        assert_eq!(users[0].role, Role::Admin);
        assert_eq!(users[1].role, Role::User);
        assert_ne!(users[0].password_hash, "secret1");
    }

    #[test]
    fn bootstrap_can_be_disabled() {
        let mut store = InMemoryStore::new();
        let config = AppConfig {
            default_role: Role::Personal,
            bootstrap_admin: false,
        };
        register(&mut store, &config, olena(), today()).unwrap();
        assert_eq!(store.load::<User>().unwrap()[0].role, Role::Personal);
    }

    #[test]
    fn registration_collects_all_errors() {
        let mut store = InMemoryStore::new();
        let res = register(
            &mut store,
            &AppConfig::default(),
            Registration {
                full_name: "Ola".into(),
                password: "p@ss word".into(),
                email: "".into(),
                phone_number: "0501234567".into(),
                home_address: "Kyiv".into(),
                birthdate: today(),
            },
            today(),
        )
        .unwrap();

        assert_eq!(
            res.validation_errors,
            vec![
                "Field 'user full name' must be longer than '4' and shorter than '48'!".to_string(),
                "Field 'user password' cannot contain special characters or non-Latin characters!"
                    .to_string(),
                "Field 'user email' is required to be filled in!".to_string(),
                "Date cannot be in the future.".to_string(),
            ]
        );
        assert!(store.load::<User>().unwrap().is_empty());
    }

    #[test]
    fn phone_numbers_are_unique() {
        let mut store = InMemoryStore::new();
        register(&mut store, &AppConfig::default(), olena(), today()).unwrap();
        let mut twin = olena();
        twin.full_name = "Olena Shevchenko".into();
        let res = register(&mut store, &AppConfig::default(), twin, today()).unwrap();
        assert_eq!(
            res.validation_errors,
            vec!["A user with this phone number already exists.".to_string()]
        );
    }

    #[test]
    fn authenticate_needs_name_email_and_password() {
        let mut fx = StoreFixture::new();
        let user = fx.add_user("Olena Petrenko", Role::User);

        let found =
            authenticate(&fx.store, "Olena Petrenko", "OLENA.PETRENKO@example.com", "secret1")
                .unwrap();
        assert_eq!(found.id, user.id);

        for (name, email, password) in [
            ("Olena Petrenko", "olena.petrenko@example.com", "wrong"),
            ("Olena", "olena.petrenko@example.com", "secret1"),
            ("Olena Petrenko", "someone@example.com", "secret1"),
        ] {
            assert!(matches!(
                authenticate(&fx.store, name, email, password),
                Err(ShelterError::AuthenticationFailed)
            ));
        }
    }

    #[test]
    fn login_whoami_logout() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path().to_path_buf());
        let mut fx = StoreFixture::new();
        let user = fx.add_user("Olena Petrenko", Role::Personal);

        assert!(matches!(
            whoami(&fx.store, &paths),
            Err(ShelterError::NotSignedIn)
        ));

        login(
            &fx.store,
            &paths,
            "Olena Petrenko",
            "olena.petrenko@example.com",
            "secret1",
        )
        .unwrap();
        let res = whoami(&fx.store, &paths).unwrap();
        assert_eq!(res.account.unwrap().user.id, user.id);

        logout(&paths).unwrap();
        assert!(current_user(&fx.store, &paths).unwrap().is_none());
    }

    #[test]
    fn stale_session_counts_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path().to_path_buf());
        Session::new(Uuid::new_v4()).save(dir.path()).unwrap();

        let store = InMemoryStore::new();
        assert!(current_user(&store, &paths).unwrap().is_none());
    }
}
