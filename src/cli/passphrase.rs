//! Passphrase sources for envelope encryption
//!
//! The passphrase is separate from the API token. Sources, in order of
//! precedence: `--passphrase-stdin`, `KEYVAULTIFY_PASSPHRASE`, then a hidden
//! terminal prompt.

use std::io::{self, IsTerminal, Read};

use zeroize::Zeroizing;

use crate::error::{KeyvaultError, KeyvaultResult};

/// Environment variable holding the passphrase for non-interactive use
pub const PASSPHRASE_ENV: &str = "KEYVAULTIFY_PASSPHRASE";

/// Trait for reading passphrases from various sources
pub trait PassphraseReader {
    /// Read a passphrase; `confirm` asks interactive sources to read it twice
    fn read_passphrase(&mut self, confirm: bool) -> KeyvaultResult<Zeroizing<Vec<u8>>>;

    /// Whether this source consumes stdin
    fn uses_stdin(&self) -> bool {
        false
    }
}

/// Returns a fixed passphrase (environment variable, tests)
pub struct ConstantPassphraseReader {
    passphrase: Zeroizing<Vec<u8>>,
}

impl ConstantPassphraseReader {
    pub fn new(passphrase: impl Into<Vec<u8>>) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase.into()),
        }
    }
}

impl PassphraseReader for ConstantPassphraseReader {
    fn read_passphrase(&mut self, _confirm: bool) -> KeyvaultResult<Zeroizing<Vec<u8>>> {
        Ok(self.passphrase.clone())
    }
}

/// Reads the passphrase from any `io::Read` source, dropping one trailing
/// line ending
pub struct ReaderPassphraseReader {
    reader: Box<dyn Read>,
}

impl ReaderPassphraseReader {
    pub fn new(reader: Box<dyn Read>) -> Self {
        Self { reader }
    }
}

impl PassphraseReader for ReaderPassphraseReader {
    fn read_passphrase(&mut self, _confirm: bool) -> KeyvaultResult<Zeroizing<Vec<u8>>> {
        let mut data = Zeroizing::new(Vec::new());
        self.reader
            .read_to_end(&mut data)
            .map_err(|e| KeyvaultError::Io(format!("Failed to read passphrase: {}", e)))?;

        if data.ends_with(b"\n") {
            data.pop();
            if data.ends_with(b"\r") {
                data.pop();
            }
        }
        Ok(data)
    }

    fn uses_stdin(&self) -> bool {
        true
    }
}

/// Reads the passphrase from the terminal with no echo
#[derive(Default)]
pub struct TerminalPassphraseReader;

impl PassphraseReader for TerminalPassphraseReader {
    fn read_passphrase(&mut self, confirm: bool) -> KeyvaultResult<Zeroizing<Vec<u8>>> {
        if !io::stdin().is_terminal() {
            return Err(KeyvaultError::Validation(format!(
                "Cannot prompt for a passphrase: stdin is not a terminal. \
                 Use --passphrase-stdin or set {}",
                PASSPHRASE_ENV
            )));
        }

        let first = prompt("Encryption passphrase: ")?;
        if confirm {
            let second = prompt("Confirm passphrase: ")?;
            if *first != *second {
                return Err(KeyvaultError::Validation("Passphrases do not match".into()));
            }
        }
        Ok(first)
    }
}

fn prompt(message: &str) -> KeyvaultResult<Zeroizing<Vec<u8>>> {
    rpassword::prompt_password(message)
        .map(|p| Zeroizing::new(p.into_bytes()))
        .map_err(|e| KeyvaultError::Io(format!("Failed to read passphrase: {}", e)))
}

/// Pick the passphrase source for this invocation
pub fn passphrase_reader(from_stdin: bool) -> Box<dyn PassphraseReader> {
    if from_stdin {
        return Box::new(ReaderPassphraseReader::new(Box::new(io::stdin())));
    }
    match std::env::var_os(PASSPHRASE_ENV) {
        Some(value) if !value.is_empty() => {
            Box::new(ConstantPassphraseReader::new(value.to_string_lossy().into_owned()))
        }
        _ => Box::new(TerminalPassphraseReader),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_reader() {
        let mut reader = ConstantPassphraseReader::new("correct horse");
        assert_eq!(&*reader.read_passphrase(true).unwrap(), b"correct horse");
        assert_eq!(&*reader.read_passphrase(false).unwrap(), b"correct horse");
        assert!(!reader.uses_stdin());
    }

    #[test]
    fn test_reader_strips_single_line_ending() {
        let mut reader = ReaderPassphraseReader::new(Box::new(&b"secret\n"[..]));
        assert_eq!(&*reader.read_passphrase(false).unwrap(), b"secret");

        let mut reader = ReaderPassphraseReader::new(Box::new(&b"secret\r\n"[..]));
        assert_eq!(&*reader.read_passphrase(false).unwrap(), b"secret");

        let mut reader = ReaderPassphraseReader::new(Box::new(&b"two\n\n"[..]));
        assert_eq!(&*reader.read_passphrase(false).unwrap(), b"two\n");
        assert!(reader.uses_stdin());
    }

    #[test]
    fn test_reader_keeps_inner_whitespace() {
        let mut reader = ReaderPassphraseReader::new(Box::new(&b"  spaced out  "[..]));
        assert_eq!(&*reader.read_passphrase(false).unwrap(), b"  spaced out  ");
    }

    #[test]
    fn test_reader_empty() {
        let mut reader = ReaderPassphraseReader::new(Box::new(&b""[..]));
        assert!(reader.read_passphrase(false).unwrap().is_empty());
    }
}
