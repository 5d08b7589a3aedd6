//! # Shelterbook Architecture
//!
//! Shelterbook keeps the records of an animal-shelter network: user accounts,
//! shelters, the animals they house and adoption requests. It is a library
//! with a CLI client, not the other way around.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, render.rs)                          │
//! │  - Parses arguments, prints results, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Session and role checks, selector parsing                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - Validation, cross-entity rules, queries                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (store/)                                           │
//! │  - DataStore trait: one JSON array per entity kind          │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! From `api.rs` inward nothing prints or exits. Commands return a
//! [`commands::CmdResult`]: the records to show, any validation errors that
//! stopped a write, and status messages.
//!
//! ## Validation vs. errors
//!
//! A rule violation (blank name, full shelter, weak password) is not an
//! `Err`. The command collects every violated rule into
//! `CmdResult::validation_errors` and writes nothing. `Err(ShelterError)` is
//! reserved for things the user cannot fix by retyping input: unreadable
//! files, corrupt JSON, unknown selectors, missing permissions.
//!
//! ## References between records
//!
//! Animals store the id of their shelter and requests store the ids of their
//! animal and user. Listings join them by lookup, so renaming a shelter never
//! leaves stale copies behind.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade every front end calls
//! - [`commands`]: business logic per entity
//! - [`store`]: storage trait and implementations
//! - [`model`]: records, roles and the permission table
//! - [`validation`]: accumulating field checks
//! - [`index`]: list numbers and selectors
//! - [`session`]: the signed-in user
//! - [`config`]: per data directory settings
//! - [`init`]: data directory resolution
//! - [`error`]: error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod index;
pub mod init;
pub mod model;
pub mod session;
pub mod store;
pub mod validation;
