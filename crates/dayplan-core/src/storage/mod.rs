mod config;

pub use config::{BreaksConfig, Config, RoutineConfig, RoutinesConfig, WorkdayConfig};

use std::path::PathBuf;

/// Returns the configuration directory.
///
/// `DAYPLAN_CONFIG_DIR` wins when set. Otherwise `~/.config/dayplan[-dev]/`,
/// with `DAYPLAN_ENV=dev` selecting the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("DAYPLAN_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("DAYPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("dayplan-dev")
            } else {
                base_dir.join("dayplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
