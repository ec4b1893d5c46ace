//! Core data models for keyvault
//!
//! The secret bundle that gets encrypted, plus the project, environment and
//! secret records exchanged with the Keyvaultify API.

pub mod bundle;
pub mod project;
pub mod secret;

pub use bundle::SecretBundle;
pub use project::{parse_timestamp, Environment, Project};
pub use secret::{is_valid_secret_key, PushResults, Secret, SecretInput, UserInfo};
