//! Drink, ingredient and recipe catalog backed by a local SQLite file.
//!
//! # Intention
//!
//! - Provide a small, generic table layer over SQLite (create, insert,
//!   existence check, full read) driven by code-defined table descriptors.
//! - Build catalog records interactively and keep duplicate identifiers out
//!   of the store.
//!
//! # Architectural Boundaries
//!
//! - `sqlite` knows nothing about drinks or ingredients.
//! - `catalog` declares the concrete tables, `entry` the records written to them.
//! - Console prompting lives in `input` and is generic over any reader/writer.

pub mod catalog;
pub mod entry;
pub mod error;
pub mod input;
pub mod sqlite;

pub use error::{Result, TrackerError};
