//! Errors produced by the envelope cipher

use thiserror::Error;

/// Failure kinds of envelope encryption and decryption
///
/// `Authentication` means the envelope was well-formed but did not verify
/// under the given passphrase.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    /// The bundle could not be converted to or from its serialized form
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// An envelope field is missing, not valid hex, or the wrong length
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Tag verification failed
    #[error("Decryption failed: wrong passphrase or corrupted envelope")]
    Authentication,

    /// The underlying primitive could not be set up or the random source failed
    #[error("Cryptographic failure: {0}")]
    Crypto(String),

    /// No passphrase was supplied
    #[error("Passphrase must not be empty")]
    EmptyPassphrase,
}

impl CipherError {
    /// Check if this is an authentication failure (wrong passphrase or tampering)
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication)
    }

    /// Check if the envelope itself was malformed
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedEnvelope(_))
    }
}

/// Result type alias for cipher operations
pub type CipherResult<T> = Result<T, CipherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CipherError::MalformedEnvelope("salt: expected 16 bytes, got 15".into());
        assert_eq!(
            err.to_string(),
            "Malformed envelope: salt: expected 16 bytes, got 15"
        );
        assert!(err.is_malformed());
        assert!(!err.is_authentication());
    }

    #[test]
    fn test_authentication_display() {
        let err = CipherError::Authentication;
        assert!(err.to_string().contains("wrong passphrase"));
        assert!(err.is_authentication());
    }
}
