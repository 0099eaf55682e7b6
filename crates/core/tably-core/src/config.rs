//! Configuration management and environment variable loading

use crate::{Result, TablyError};
use std::env;

/// Environment variable holding the Gemini API key
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable selecting the Gemini model
pub const MODEL_VAR: &str = "GEMINI_MODEL";

/// Default model when `GEMINI_MODEL` is unset
pub const DEFAULT_MODEL: &str = "gemini-pro";

/// Load environment variables from a .env file
///
/// Loads variables from a .env file in the current directory or a parent
/// directory. A missing file is not an error; system environment variables
/// are used as-is.
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("✓ Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(TablyError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::warn!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(TablyError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Get required environment variable
///
/// Returns an error if the variable is not set
pub fn get_required_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| {
        TablyError::config(format!(
            "Required environment variable '{}' is not set. \
             Check your .env file or system environment.",
            key
        ))
    })
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as boolean
pub fn get_env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| match v.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}
