//! `rota-core`: data model, roster and configuration shared by every rota crate.

pub mod config;
pub mod error;
pub mod roster;
pub mod types;

pub use config::RotaConfig;
pub use error::{Result, RotaError};
pub use roster::Roster;
pub use types::{Assignment, Record, RecordFields, Role, ServiceDay, WorkerId, NONE_HELD};
