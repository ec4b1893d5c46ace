//! Cryptographic functions for keyvault
//!
//! Provides passphrase-based envelope encryption of secret bundles:
//! PBKDF2-HMAC-SHA256 key derivation and AES-256-GCM authenticated
//! encryption. Everything here is pure computation; nothing logs or touches
//! the filesystem.

pub mod envelope;
pub mod error;
pub mod key_derivation;
pub mod secure_memory;

pub use envelope::{decrypt, encrypt, Envelope};
pub use error::{CipherError, CipherResult};
pub use key_derivation::{derive_key, DerivedKey};
pub use secure_memory::SecureString;
