use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use shelterbook::model::{RequestStatus, Role};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "shelterbook")]
#[command(about = "Record keeping for animal shelters: animals, adoption requests and accounts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (defaults to ./Data)
    #[arg(long, global = true, env = "SHELTERBOOK_HOME")]
    pub data_dir: Option<PathBuf>,

    /// Use the per-user data directory instead of ./Data
    #[arg(short, long, global = true)]
    pub global: bool,

    /// Verbose logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and empty collections
    Init,

    /// Create an account
    Register {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        address: String,
        /// Birthdate as YYYY-MM-DD
        #[arg(long)]
        birthdate: NaiveDate,
    },

    /// Sign in
    Login {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Manage shelters
    #[command(subcommand)]
    Shelter(ShelterCommand),

    /// Manage animals
    #[command(subcommand)]
    Animal(AnimalCommand),

    /// Manage adoption requests
    #[command(subcommand)]
    Request(RequestCommand),

    /// Manage user accounts
    #[command(subcommand)]
    User(UserCommand),

    /// Get or set configuration
    Config {
        /// Configuration key (default-role, bootstrap-admin)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShelterCommand {
    /// List all shelters
    #[command(alias = "ls")]
    List,

    /// Register a new shelter
    Add {
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        capacity: u32,
    },

    /// Change shelter details
    Edit {
        /// List number, id or name
        shelter: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        capacity: Option<u32>,
    },

    /// Delete a shelter that houses no animals
    #[command(alias = "rm")]
    Delete {
        /// List number, id or name
        shelter: String,
    },

    /// Search shelters by one field
    Find(ShelterFind),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ShelterFind {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub capacity: Option<u32>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum AnimalCommand {
    /// List all animals with their shelter
    #[command(alias = "ls")]
    List,

    /// Take in an animal
    Add {
        name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        species: String,
        #[arg(long)]
        breed: String,
        /// Shelter list number, id or name
        #[arg(long)]
        shelter: Option<String>,
    },

    /// Change animal details or move it to another shelter
    Edit {
        /// List number, id or name
        animal: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        species: Option<String>,
        #[arg(long)]
        breed: Option<String>,
        /// Move to this shelter
        #[arg(long)]
        shelter: Option<String>,
    },

    /// Delete an animal with no requests
    #[command(alias = "rm")]
    Delete {
        /// List number, id or name
        animal: String,
    },

    /// Search animals by one field
    Find(AnimalFind),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct AnimalFind {
    /// First animal with this name
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub species: Option<String>,
    #[arg(long)]
    pub breed: Option<String>,
    /// Intake year
    #[arg(long)]
    pub year: Option<i32>,
    /// Shelter list number, id or name
    #[arg(long)]
    pub shelter: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum RequestCommand {
    /// List all requests
    #[command(alias = "ls")]
    List,

    /// File an adoption request
    Add {
        name: String,
        /// Animal list number, id or name
        #[arg(long)]
        animal: Option<String>,
        /// File on behalf of another user
        #[arg(long)]
        user: Option<String>,
    },

    /// Rename a request, change its animal or set its status
    Edit {
        /// List number, id or name
        request: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        animal: Option<String>,
        /// pending, approved or rejected
        #[arg(long)]
        status: Option<RequestStatus>,
    },

    /// Delete a request
    #[command(alias = "rm")]
    Delete {
        /// List number, id or name
        request: String,
    },

    /// Search requests by one field
    Find(RequestFind),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct RequestFind {
    #[arg(long)]
    pub status: Option<RequestStatus>,
    #[arg(long)]
    pub animal: Option<String>,
    #[arg(long)]
    pub user: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// List all accounts
    #[command(alias = "ls")]
    List,

    /// Show an account (your own by default)
    Show { user: Option<String> },

    /// Change account details (your own by default)
    Edit {
        user: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// admin, personal or user
        #[arg(long)]
        role: Option<Role>,
    },

    /// Delete an account with no requests
    #[command(alias = "rm")]
    Delete { user: String },

    /// Search accounts by exact full name or id
    Find(UserFind),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct UserFind {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub id: Option<Uuid>,
}
