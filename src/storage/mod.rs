//! Storage layer for keyvault
//!
//! Local file handling: atomic JSON writes for configuration, and `.env`
//! files holding plaintext secrets.

pub mod dotenv;
pub mod file_io;

pub use file_io::{read_json_required, read_text, write_json_atomic, write_secret_file};
