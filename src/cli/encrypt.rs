//! Offline encryption commands
//!
//! `encrypt` seals a `.env` file into an envelope JSON file and `decrypt`
//! opens one again. Neither needs a login or a linked project.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::crypto::{self, Envelope};
use crate::error::KeyvaultResult;
use crate::storage::{dotenv, read_text, write_json_atomic, write_secret_file};

use super::passphrase::{passphrase_reader, PassphraseReader};
use super::{confirm_overwrite, CliContext};

/// Default file name for sealed bundles
pub const DEFAULT_ENCRYPTED_FILE: &str = ".env.enc.json";

/// Arguments for `keyvault encrypt`
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Plaintext .env file to encrypt
    #[arg(short, long, default_value = ".env")]
    pub input: PathBuf,

    /// Where to write the encrypted envelope
    #[arg(short, long, default_value = DEFAULT_ENCRYPTED_FILE)]
    pub output: PathBuf,

    /// Overwrite the output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Read the passphrase from stdin instead of prompting
    #[arg(long)]
    pub passphrase_stdin: bool,
}

/// Arguments for `keyvault decrypt`
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Encrypted envelope file
    #[arg(short, long, default_value = DEFAULT_ENCRYPTED_FILE)]
    pub input: PathBuf,

    /// Where to write the decrypted .env file
    #[arg(short, long, default_value = ".env")]
    pub output: PathBuf,

    /// Overwrite the output file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Read the passphrase from stdin instead of prompting
    #[arg(long)]
    pub passphrase_stdin: bool,
}

/// Handle `keyvault encrypt`
pub fn handle_encrypt(ctx: &CliContext, args: EncryptArgs) -> KeyvaultResult<()> {
    let mut reader = passphrase_reader(args.passphrase_stdin);
    encrypt_file(
        &ctx.resolve(&args.input),
        &ctx.resolve(&args.output),
        args.force,
        reader.as_mut(),
    )
}

/// Handle `keyvault decrypt`
pub fn handle_decrypt(ctx: &CliContext, args: DecryptArgs) -> KeyvaultResult<()> {
    let mut reader = passphrase_reader(args.passphrase_stdin);
    decrypt_file(
        &ctx.resolve(&args.input),
        &ctx.resolve(&args.output),
        args.force,
        reader.as_mut(),
    )
}

/// Seal the `.env` file at `input` into an envelope at `output`
pub fn encrypt_file(
    input: &Path,
    output: &Path,
    force: bool,
    passphrase: &mut dyn PassphraseReader,
) -> KeyvaultResult<()> {
    let text = zeroize::Zeroizing::new(read_text(input)?);
    let bundle = dotenv::parse(&text)?;

    if !confirm_overwrite(output, force, passphrase.uses_stdin())? {
        println!("Encryption cancelled.");
        return Ok(());
    }

    let key = passphrase.read_passphrase(true)?;
    let envelope = crypto::encrypt(&bundle, &key)?;
    write_json_atomic(output, &envelope)?;

    tracing::debug!(input = %input.display(), output = %output.display(), "sealed bundle");
    println!(
        "Encrypted {} secret(s) from {} to {}",
        bundle.len(),
        input.display(),
        output.display()
    );
    Ok(())
}

/// Open the envelope at `input` and write its secrets as a `.env` file
pub fn decrypt_file(
    input: &Path,
    output: &Path,
    force: bool,
    passphrase: &mut dyn PassphraseReader,
) -> KeyvaultResult<()> {
    let envelope = Envelope::from_json(&read_text(input)?)?;

    if !confirm_overwrite(output, force, passphrase.uses_stdin())? {
        println!("Decryption cancelled.");
        return Ok(());
    }

    let key = passphrase.read_passphrase(false)?;
    let bundle = crypto::decrypt(&envelope, &key)?;
    write_secret_file(output, &dotenv::render(&bundle)?)?;

    tracing::debug!(input = %input.display(), output = %output.display(), "opened bundle");
    println!(
        "Decrypted {} secret(s) from {} to {}",
        bundle.len(),
        input.display(),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::passphrase::{ConstantPassphraseReader, ReaderPassphraseReader};
    use crate::crypto::CipherError;
    use crate::error::KeyvaultError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_encrypt_then_decrypt() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join(".env");
        let sealed = dir.path().join("secrets.json");
        let restored = dir.path().join("restored.env");
        fs::write(&plain, "API_KEY=abc123\nGREETING=\"hello world\"").unwrap();

        let mut reader = ConstantPassphraseReader::new("pw");
        encrypt_file(&plain, &sealed, false, &mut reader).unwrap();

        let json = fs::read_to_string(&sealed).unwrap();
        assert!(!json.contains("abc123"));
        let envelope = Envelope::from_json(&json).unwrap();
        assert_eq!(envelope.salt.len(), 32);

        decrypt_file(&sealed, &restored, false, &mut reader).unwrap();
        assert_eq!(
            fs::read_to_string(&restored).unwrap(),
            "API_KEY=abc123\nGREETING=\"hello world\""
        );
    }

    #[test]
    fn test_decrypt_wrong_passphrase_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join(".env");
        let sealed = dir.path().join("secrets.json");
        let restored = dir.path().join("restored.env");
        fs::write(&plain, "A=1").unwrap();

        encrypt_file(&plain, &sealed, false, &mut ConstantPassphraseReader::new("pw")).unwrap();
        let err = decrypt_file(
            &sealed,
            &restored,
            false,
            &mut ConstantPassphraseReader::new("nope"),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            KeyvaultError::Cipher(CipherError::Authentication)
        ));
        assert!(!restored.exists());
    }

    #[test]
    fn test_decrypt_malformed_file() {
        let dir = TempDir::new().unwrap();
        let sealed = dir.path().join("secrets.json");
        fs::write(&sealed, "{\"iv\": \"00\"}").unwrap();

        let err = decrypt_file(
            &sealed,
            &dir.path().join(".env"),
            false,
            &mut ConstantPassphraseReader::new("pw"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            KeyvaultError::Cipher(CipherError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn test_stdin_passphrase_requires_force_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join(".env");
        let sealed = dir.path().join("secrets.json");
        fs::write(&plain, "A=1").unwrap();
        fs::write(&sealed, "old").unwrap();

        let mut reader = ReaderPassphraseReader::new(Box::new(&b"pw\n"[..]));
        let err = encrypt_file(&plain, &sealed, false, &mut reader).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(fs::read_to_string(&sealed).unwrap(), "old");

        let mut reader = ReaderPassphraseReader::new(Box::new(&b"pw\n"[..]));
        encrypt_file(&plain, &sealed, true, &mut reader).unwrap();
        assert!(Envelope::from_json(&fs::read_to_string(&sealed).unwrap()).is_ok());
    }

    #[test]
    fn test_empty_passphrase_is_rejected() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join(".env");
        fs::write(&plain, "A=1").unwrap();

        let err = encrypt_file(
            &plain,
            &dir.path().join("out.json"),
            false,
            &mut ConstantPassphraseReader::new(""),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            KeyvaultError::Cipher(CipherError::EmptyPassphrase)
        ));
    }

    #[test]
    fn test_decrypt_refuses_keys_a_env_file_cannot_hold() {
        let dir = TempDir::new().unwrap();
        let sealed = dir.path().join("secrets.json");
        let restored = dir.path().join("restored.env");
        let bundle = crate::models::SecretBundle::from_pairs([("#X", "1"), ("K=V", "2")]).unwrap();
        let envelope = crypto::encrypt(&bundle, b"pw").unwrap();
        write_json_atomic(&sealed, &envelope).unwrap();

        let err = decrypt_file(
            &sealed,
            &restored,
            false,
            &mut ConstantPassphraseReader::new("pw"),
        )
        .unwrap_err();
        assert!(err.is_validation());
        assert!(!restored.exists());
    }
}
