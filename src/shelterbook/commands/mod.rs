use crate::config::AppConfig;
use crate::index::Indexed;
use crate::model::{Animal, Request, Shelter, User};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

pub mod animal;
pub mod auth;
pub mod config;
pub mod helpers;
pub mod init;
pub mod request;
pub mod shelter;
pub mod user;

/// Filesystem locations for one data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub data_dir: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }
}

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// An animal joined with the shelter it references.
#[derive(Debug, Clone)]
pub struct AnimalRow {
    pub animal: Animal,
    /// `None` when the referenced shelter no longer exists.
    pub shelter: Option<Shelter>,
}

/// A request joined with the animal and user it references.
#[derive(Debug, Clone)]
pub struct RequestRow {
    pub request: Request,
    pub animal: Option<Animal>,
    pub user: Option<User>,
}

/// A user together with their session, when signed in.
#[derive(Debug, Clone)]
pub struct Account {
    pub user: User,
    pub signed_in_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub shelters: Vec<Indexed<Shelter>>,
    pub animals: Vec<Indexed<AnimalRow>>,
    pub requests: Vec<Indexed<RequestRow>>,
    pub users: Vec<Indexed<User>>,
    pub account: Option<Account>,
    pub config: Option<AppConfig>,
    /// Rule violations that stopped a write. Empty when the write happened.
    pub validation_errors: Vec<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    /// A result for a write that was skipped because validation failed.
    pub fn rejected(errors: Vec<String>) -> Self {
        Self {
            validation_errors: errors,
            ..Self::default()
        }
    }

    pub fn is_rejected(&self) -> bool {
        !self.validation_errors.is_empty()
    }

    pub fn with_shelters(mut self, shelters: Vec<Indexed<Shelter>>) -> Self {
        self.shelters = shelters;
        self
    }

    pub fn with_animals(mut self, animals: Vec<Indexed<AnimalRow>>) -> Self {
        self.animals = animals;
        self
    }

    pub fn with_requests(mut self, requests: Vec<Indexed<RequestRow>>) -> Self {
        self.requests = requests;
        self
    }

    pub fn with_users(mut self, users: Vec<Indexed<User>>) -> Self {
        self.users = users;
        self
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }
}
