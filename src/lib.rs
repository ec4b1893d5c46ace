//! keyvault - command-line client for Keyvaultify
//!
//! Manages secrets for projects and environments on a Keyvaultify server
//! and moves whole `.env` files through the vault as passphrase-encrypted
//! envelopes, so plaintext never leaves the machine.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Secret bundles and API data models
//! - `crypto`: Envelope encryption (PBKDF2-HMAC-SHA256 + AES-256-GCM)
//! - `storage`: Atomic file writes and `.env` parsing
//! - `api`: HTTP client for the Keyvaultify API
//! - `display`: Table and detail formatting
//! - `logging`: Tracing subscriber setup
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use keyvault::crypto::{decrypt, encrypt};
//! use keyvault::models::SecretBundle;
//!
//! let bundle = SecretBundle::from_pairs([("API_KEY", "abc123")])?;
//! let envelope = encrypt(&bundle, b"passphrase")?;
//! assert_eq!(decrypt(&envelope, b"passphrase")?, bundle);
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;

pub use error::{KeyvaultError, KeyvaultResult};
