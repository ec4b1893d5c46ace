//! Envelope encryption of secret bundles
//!
//! A bundle is serialized to compact JSON, then sealed with AES-256-GCM
//! under a key derived from the caller's passphrase (see
//! [`key_derivation`](super::key_derivation)). Every call draws a fresh salt
//! and nonce. The resulting envelope is self-contained apart from the
//! passphrase:
//!
//! ```json
//! { "iv": "<24 hex>", "salt": "<32 hex>", "tag": "<32 hex>", "data": "<hex>" }
//! ```

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{AeadInPlace, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce, Tag};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::error::{CipherError, CipherResult};
use super::key_derivation::{derive_key, DerivedKey, SALT_LEN};
use crate::models::SecretBundle;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const IV_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes
pub const TAG_LEN: usize = 16;

/// An encrypted, transportable secret bundle
///
/// All fields are lowercase hex. The passphrase is never part of the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// AES-GCM nonce (12 bytes)
    pub iv: String,
    /// PBKDF2 salt (16 bytes)
    pub salt: String,
    /// GCM authentication tag (16 bytes)
    pub tag: String,
    /// Encrypted bundle
    #[serde(rename = "data")]
    pub ciphertext: String,
}

/// Hex-decoded envelope fields
struct RawEnvelope {
    salt: [u8; SALT_LEN],
    iv: [u8; IV_LEN],
    tag: [u8; TAG_LEN],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Parse an envelope from its JSON representation
    pub fn from_json(json: &str) -> CipherResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CipherError::MalformedEnvelope(format!("invalid envelope JSON: {}", e)))
    }

    /// Parse an envelope from an already-decoded JSON value
    pub fn from_value(value: serde_json::Value) -> CipherResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| CipherError::MalformedEnvelope(format!("invalid envelope JSON: {}", e)))
    }

    /// Serialize the envelope to pretty-printed JSON
    pub fn to_json_pretty(&self) -> CipherResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CipherError::Encoding(format!("failed to serialize envelope: {}", e)))
    }

    fn from_raw(salt: &[u8], iv: &[u8], tag: &[u8], ciphertext: &[u8]) -> Self {
        Self {
            iv: hex::encode(iv),
            salt: hex::encode(salt),
            tag: hex::encode(tag),
            ciphertext: hex::encode(ciphertext),
        }
    }

    fn decode(&self) -> CipherResult<RawEnvelope> {
        Ok(RawEnvelope {
            salt: decode_fixed("salt", &self.salt)?,
            iv: decode_fixed("iv", &self.iv)?,
            tag: decode_fixed("tag", &self.tag)?,
            ciphertext: decode_field("data", &self.ciphertext)?,
        })
    }
}

fn decode_field(name: &str, value: &str) -> CipherResult<Vec<u8>> {
    hex::decode(value)
        .map_err(|e| CipherError::MalformedEnvelope(format!("{}: invalid hex: {}", name, e)))
}

fn decode_fixed<const N: usize>(name: &str, value: &str) -> CipherResult<[u8; N]> {
    let bytes = decode_field(name, value)?;
    bytes.as_slice().try_into().map_err(|_| {
        CipherError::MalformedEnvelope(format!(
            "{}: expected {} bytes, got {}",
            name,
            N,
            bytes.len()
        ))
    })
}

fn random_bytes<const N: usize>() -> CipherResult<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CipherError::Crypto(format!("random source unavailable: {}", e)))?;
    Ok(bytes)
}

fn cipher_for(key: &DerivedKey) -> CipherResult<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CipherError::Crypto(format!("failed to create cipher: {}", e)))
}

/// Encrypt a bundle under a passphrase
///
/// Two calls with the same inputs produce different envelopes, both of which
/// decrypt to the same bundle.
pub fn encrypt(bundle: &SecretBundle, passphrase: &[u8]) -> CipherResult<Envelope> {
    if passphrase.is_empty() {
        return Err(CipherError::EmptyPassphrase);
    }

    let salt = random_bytes::<SALT_LEN>()?;
    let iv = random_bytes::<IV_LEN>()?;

    encrypt_deterministic(bundle, passphrase, &salt, &iv)
}

/// Encrypt with a caller-provided salt and nonce
///
/// Only for reproducible test vectors. Reusing a salt/nonce pair under the
/// same passphrase destroys GCM's guarantees; production code must go
/// through [`encrypt`].
pub(crate) fn encrypt_deterministic(
    bundle: &SecretBundle,
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    iv: &[u8; IV_LEN],
) -> CipherResult<Envelope> {
    let mut buffer = Zeroizing::new(
        serde_json::to_vec(bundle)
            .map_err(|e| CipherError::Encoding(format!("failed to serialize bundle: {}", e)))?,
    );

    let key = derive_key(passphrase, salt);
    let cipher = cipher_for(&key)?;

    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(iv), b"", buffer.as_mut_slice())
        .map_err(|e| CipherError::Crypto(format!("encryption failed: {}", e)))?;

    Ok(Envelope::from_raw(salt, iv, tag.as_slice(), &buffer))
}

/// Decrypt an envelope under a passphrase
///
/// The tag is verified before any plaintext is released; on failure nothing
/// but the error is returned.
pub fn decrypt(envelope: &Envelope, passphrase: &[u8]) -> CipherResult<SecretBundle> {
    if passphrase.is_empty() {
        return Err(CipherError::EmptyPassphrase);
    }

    let raw = envelope.decode()?;
    let key = derive_key(passphrase, &raw.salt);
    let cipher = cipher_for(&key)?;

    let mut buffer = Zeroizing::new(raw.ciphertext);
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(&raw.iv),
            b"",
            buffer.as_mut_slice(),
            Tag::from_slice(&raw.tag),
        )
        .map_err(|_| CipherError::Authentication)?;

    serde_json::from_slice(&buffer)
        .map_err(|e| CipherError::Encoding(format!("decrypted data is not a secret bundle: {}", e)))
}
