//! Keyvaultify API access
//!
//! An async `reqwest` client covering the project, environment, secret and
//! vault endpoints, plus classification of failed requests.

pub mod client;
pub mod error;

pub use client::{ApiClient, USER_AGENT};
pub use error::ApiError;
