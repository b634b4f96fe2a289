pub mod finance;
pub mod health;
pub mod math;
pub mod statistics;
pub mod units;

use serde::de::DeserializeOwned;

use crate::input;

pub type CommandResult = Result<serde_json::Value, Box<dyn std::error::Error>>;

/// Resolve a calculator input: `--input` file first, then piped stdin,
/// then whatever the command builds from its flags.
pub fn load_input<T, F>(path: Option<&str>, from_flags: F) -> Result<T, Box<dyn std::error::Error>>
where
    T: DeserializeOwned,
    F: FnOnce() -> Result<T, Box<dyn std::error::Error>>,
{
    if let Some(path) = path {
        return input::file::read_input(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        tracing::debug!("using piped stdin input");
        return Ok(data);
    }
    from_flags()
}

/// Error for a missing required flag.
pub fn required(flag: &str) -> String {
    format!("--{flag} is required (or provide --input)")
}
