use crate::model::{Action, EntityKind, Role};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ShelterError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: Uuid },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt data file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),

    #[error("Not signed in (run `shelterbook login` first)")]
    NotSignedIn,

    #[error("Role {role} may not {action} {kind} records")]
    PermissionDenied {
        role: Role,
        action: Action,
        kind: EntityKind,
    },

    #[error("Wrong full name, email or password")]
    AuthenticationFailed,
}

pub type Result<T> = std::result::Result<T, ShelterError>;
