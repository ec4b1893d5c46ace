//! Display formatting for terminal output
//!
//! Formats API data for the terminal as tables and detail views. Every
//! formatter returns a `String`; printing is left to the commands.

pub mod environments;
pub mod projects;
pub mod secrets;
pub mod text;

pub use environments::{format_environment_details, format_environment_list};
pub use projects::{format_project_details, format_project_list};
pub use secrets::{format_secret_details, format_secret_list, format_set_result, format_user_info};
