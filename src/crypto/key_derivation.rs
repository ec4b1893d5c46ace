//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Stretches a passphrase into a 256-bit AES key. The iteration count and
//! hash are fixed: they are an implicit part of the envelope format, so
//! changing either makes every existing envelope undecryptable.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

/// Number of PBKDF2 rounds
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Length of the derived key in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// Length of the key derivation salt in bytes
pub const SALT_LEN: usize = 16;

/// A derived encryption key, wiped from memory on drop
pub struct DerivedKey {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive an encryption key from a passphrase and salt
///
/// Deterministic: identical inputs always produce the identical key.
pub fn derive_key(passphrase: &[u8], salt: &[u8; SALT_LEN]) -> DerivedKey {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(passphrase, salt, PBKDF2_ITERATIONS, &mut key[..]);
    DerivedKey { key }
}
