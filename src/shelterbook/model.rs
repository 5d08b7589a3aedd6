use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The four persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Animal,
    Request,
    Shelter,
    User,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::User,
        EntityKind::Animal,
        EntityKind::Shelter,
        EntityKind::Request,
    ];

    /// Name of the JSON array file holding this collection.
    pub fn file_name(self) -> &'static str {
        match self {
            EntityKind::User => "users.json",
            EntityKind::Animal => "animal.json",
            EntityKind::Shelter => "shelters.json",
            EntityKind::Request => "request.json",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Animal => "animal",
            EntityKind::Request => "request",
            EntityKind::Shelter => "shelter",
            EntityKind::User => "user",
        };
        f.write_str(name)
    }
}

/// A persisted record with a UUID identity.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    const KIND: EntityKind;

    fn id(&self) -> Uuid;

    /// The human name used when selecting the record by name.
    fn label(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Add,
    Edit,
    Delete,
    Read,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Add => "add",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Read => "read",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permission {
    pub can_add: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_read: bool,
}

impl Permission {
    const fn new(can_add: bool, can_edit: bool, can_delete: bool, can_read: bool) -> Self {
        Self {
            can_add,
            can_edit,
            can_delete,
            can_read,
        }
    }

    const FULL: Permission = Permission::new(true, true, true, true);
    const NONE: Permission = Permission::new(false, false, false, false);

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Add => self.can_add,
            Action::Edit => self.can_edit,
            Action::Delete => self.can_delete,
            Action::Read => self.can_read,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Personal,
    #[default]
    User,
}

impl Role {
    /// Static permission table, one row per entity kind.
    pub fn permissions(self, kind: EntityKind) -> Permission {
        match (self, kind) {
            (Role::Admin, _) => Permission::FULL,
            (Role::Personal, EntityKind::User) => Permission::NONE,
            (Role::Personal, _) => Permission::FULL,
            (Role::User, EntityKind::Animal) => Permission::new(true, false, false, true),
            (Role::User, EntityKind::Request) => Permission::new(true, false, false, false),
            (Role::User, EntityKind::Shelter) => Permission::new(false, false, false, true),
            (Role::User, EntityKind::User) => Permission::NONE,
        }
    }

    pub fn permits(self, kind: EntityKind, action: Action) -> bool {
        self.permissions(kind).allows(action)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Personal => "personal",
            Role::User => "user",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "personal" => Ok(Role::Personal),
            "user" => Ok(Role::User),
            other => Err(format!(
                "Unknown role: {} (expected admin, personal or user)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub password_hash: String,
    pub phone_number: String,
    pub home_address: String,
    pub email: String,
    pub birthdate: NaiveDate,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn new(
        full_name: String,
        password_hash: String,
        phone_number: String,
        home_address: String,
        email: String,
        birthdate: NaiveDate,
        role: Role,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name,
            password_hash,
            phone_number,
            home_address,
            email,
            birthdate,
            role,
        }
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> Uuid {
        self.id
    }

    fn label(&self) -> &str {
        &self.full_name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shelter {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub animal_count: u32,
    pub capacity: u32,
}

impl Shelter {
    pub fn new(name: String, address: String, phone: String, capacity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            address,
            phone,
            animal_count: 0,
            capacity,
        }
    }

    pub fn has_room(&self) -> bool {
        self.animal_count < self.capacity
    }
}

impl Entity for Shelter {
    const KIND: EntityKind = EntityKind::Shelter;

    fn id(&self) -> Uuid {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub species: String,
    pub breed: String,
    // Intake date, never changed after creation
    pub date_of_delivery: NaiveDate,
    pub shelter_id: Uuid,
}

impl Animal {
    pub fn new(
        name: String,
        age: u32,
        species: String,
        breed: String,
        date_of_delivery: NaiveDate,
        shelter_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            age,
            species,
            breed,
            date_of_delivery,
            shelter_id,
        }
    }
}

impl Entity for Animal {
    const KIND: EntityKind = EntityKind::Animal;

    fn id(&self) -> Uuid {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Approved,
    Rejected,
    #[default]
    Pending,
}

impl RequestStatus {
    pub fn description(self) -> &'static str {
        match self {
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Pending => "Pending Approval",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "pending" => Ok(RequestStatus::Pending),
            other => Err(format!(
                "Unknown status: {} (expected pending, approved or rejected)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: Uuid,
    pub name: String,
    pub animal_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub status: RequestStatus,
    pub request_create_date: NaiveDate,
}

impl Request {
    pub fn new(name: String, animal_id: Uuid, user_id: Uuid, created_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            animal_id,
            user_id,
            status: RequestStatus::Pending,
            request_create_date: created_on,
        }
    }
}

impl Entity for Request {
    const KIND: EntityKind = EntityKind::Request;

    fn id(&self) -> Uuid {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}
