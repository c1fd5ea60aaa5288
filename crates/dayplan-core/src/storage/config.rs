//! TOML-based planner configuration.
//!
//! Stores the planning rules:
//! - Workday start and end, default task length
//! - Break threshold and break length
//! - Morning and evening routine anchors
//!
//! Configuration is stored at `~/.config/dayplan/config.toml`.
//! The defaults reproduce the built-in [`PlanRules`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::plan::{minutes_to_time, parse_clock, PlanRules, RoutineAnchor};

/// Workday boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkdayConfig {
    #[serde(default = "default_workday_start")]
    pub start: String,
    #[serde(default = "default_workday_end")]
    pub end: String,
    #[serde(default = "default_task_minutes")]
    pub default_task_minutes: u32,
}

/// Rest break insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreaksConfig {
    #[serde(default = "default_break_after")]
    pub after_minutes: u32,
    #[serde(default = "default_break_duration")]
    pub duration_minutes: u32,
}

/// One fixed routine block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineConfig {
    pub title: String,
    pub start: String,
    pub end: String,
}

impl From<&RoutineAnchor> for RoutineConfig {
    fn from(anchor: &RoutineAnchor) -> Self {
        Self {
            title: anchor.title.clone(),
            start: minutes_to_time(anchor.start),
            end: minutes_to_time(anchor.end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutinesConfig {
    #[serde(default = "default_morning")]
    pub morning: RoutineConfig,
    #[serde(default = "default_evening")]
    pub evening: RoutineConfig,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/dayplan/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub workday: WorkdayConfig,
    #[serde(default)]
    pub breaks: BreaksConfig,
    #[serde(default)]
    pub routines: RoutinesConfig,
}

// Default functions
fn default_workday_start() -> String {
    minutes_to_time(PlanRules::default().workday_start)
}
fn default_workday_end() -> String {
    minutes_to_time(PlanRules::default().workday_end)
}
fn default_task_minutes() -> u32 {
    PlanRules::default().default_task_minutes
}
fn default_break_after() -> u32 {
    PlanRules::default().break_after_minutes
}
fn default_break_duration() -> u32 {
    PlanRules::default().break_minutes
}
fn default_morning() -> RoutineConfig {
    RoutineConfig::from(&RoutineAnchor::morning_routine())
}
fn default_evening() -> RoutineConfig {
    RoutineConfig::from(&RoutineAnchor::evening_review())
}

impl Default for WorkdayConfig {
    fn default() -> Self {
        Self {
            start: default_workday_start(),
            end: default_workday_end(),
            default_task_minutes: default_task_minutes(),
        }
    }
}

impl Default for BreaksConfig {
    fn default() -> Self {
        Self {
            after_minutes: default_break_after(),
            duration_minutes: default_break_duration(),
        }
    }
}

impl Default for RoutinesConfig {
    fn default() -> Self {
        Self {
            morning: default_morning(),
            evening: default_evening(),
        }
    }
}

fn clock_value(key: &str, value: &str) -> Result<u32, ConfigError> {
    parse_clock(value).ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{value}' is not a HH:MM time"),
    })
}

fn routine_anchor(key: &str, routine: &RoutineConfig) -> Result<RoutineAnchor, ConfigError> {
    let start = clock_value(&format!("{key}.start"), &routine.start)?;
    let end = clock_value(&format!("{key}.end"), &routine.end)?;
    if end <= start {
        return Err(ConfigError::InvalidValue {
            key: format!("{key}.end"),
            message: format!("must be after {key}.start ({})", routine.start),
        });
    }
    Ok(RoutineAnchor::new(routine.title.clone(), start, end))
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        if key.is_empty() {
            return Err(unknown());
        }
        let mut parts = key.split('.').peekable();

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => value
                        .parse::<u32>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as minutes")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("is a section, set its fields instead".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            tracing::warn!(%err, "failed to load config, using defaults");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory. Returns error if the key is
    /// unknown, the value does not fit the field, or the resulting rules
    /// would be invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.plan_rules()?;
        *self = updated;
        Ok(())
    }

    /// Convert to the rules the engine runs with.
    pub fn plan_rules(&self) -> Result<PlanRules, ConfigError> {
        let workday_start = clock_value("workday.start", &self.workday.start)?;
        let workday_end = clock_value("workday.end", &self.workday.end)?;
        if workday_end <= workday_start {
            return Err(ConfigError::InvalidValue {
                key: "workday.end".into(),
                message: format!("must be after workday.start ({})", self.workday.start),
            });
        }
        if self.breaks.after_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "breaks.after_minutes".into(),
                message: "must be greater than zero".into(),
            });
        }

        let morning = routine_anchor("routines.morning", &self.routines.morning)?;
        let evening = routine_anchor("routines.evening", &self.routines.evening)?;
        // Anchors must sit outside the workday so blocks never overlap.
        if morning.end > workday_start {
            return Err(ConfigError::InvalidValue {
                key: "routines.morning.end".into(),
                message: format!("must not be after workday.start ({})", self.workday.start),
            });
        }
        if evening.start < workday_end {
            return Err(ConfigError::InvalidValue {
                key: "routines.evening.start".into(),
                message: format!("must not be before workday.end ({})", self.workday.end),
            });
        }

        Ok(PlanRules {
            workday_start,
            workday_end,
            break_after_minutes: self.breaks.after_minutes,
            break_minutes: self.breaks.duration_minutes,
            default_task_minutes: self.workday.default_task_minutes,
            morning,
            evening,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn defaults_reproduce_builtin_rules() {
        assert_eq!(Config::default().plan_rules().unwrap(), PlanRules::default());
    }

    #[test]
    fn partial_file_fills_missing_sections() {
        let cfg: Config = toml::from_str("[breaks]\nafter_minutes = 90\n").unwrap();
        assert_eq!(cfg.breaks.after_minutes, 90);
        assert_eq!(cfg.breaks.duration_minutes, 15);
        assert_eq!(cfg.workday.start, "09:00");
        assert_eq!(cfg.routines.evening.title, "Evening Review");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("workday.end").as_deref(), Some("18:00"));
        assert_eq!(cfg.get("breaks.after_minutes").as_deref(), Some("120"));
        assert_eq!(cfg.get("routines.morning.title").as_deref(), Some("Morning Routine"));
        assert!(cfg.get("workday.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_number_and_string_fields() {
        let mut cfg = Config::default();
        cfg.set("breaks.duration_minutes", "10").unwrap();
        cfg.set("workday.end", "17:30").unwrap();
        let rules = cfg.plan_rules().unwrap();
        assert_eq!(rules.break_minutes, 10);
        assert_eq!(rules.workday_end, 17 * 60 + 30);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("workday.lunch", "12:00").unwrap_err();
        assert!(err.to_string().contains("unknown config key"));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("breaks.after_minutes", "soon").is_err());
        assert!(cfg.set("routines", "x").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_values_that_break_the_rules() {
        let mut cfg = Config::default();
        assert!(cfg.set("workday.end", "08:00").is_err());
        assert!(cfg.set("workday.start", "nine").is_err());
        assert!(cfg.set("breaks.after_minutes", "0").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn plan_rules_reject_inverted_routine() {
        let mut cfg = Config::default();
        cfg.routines.evening.end = "19:00".into();
        let err = cfg.plan_rules().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "routines.evening.end"));
    }

    #[test]
    fn plan_rules_reject_anchor_inside_workday() {
        let mut cfg = Config::default();
        cfg.routines.morning.end = "10:00".into();
        let err = cfg.plan_rules().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "routines.morning.end"));

        let mut cfg = Config::default();
        cfg.workday.end = "20:15".into();
        let err = cfg.plan_rules().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "routines.evening.start"));
    }

    #[test]
    fn set_rejects_anchor_overlapping_workday() {
        let mut cfg = Config::default();
        assert!(cfg.set("routines.morning.end", "10:00").is_err());
        assert!(cfg.set("workday.start", "08:30").is_err());
        assert!(cfg.set("routines.evening.start", "17:00").is_err());
        assert_eq!(cfg, Config::default());

        // Touching the boundary is fine.
        cfg.set("workday.end", "20:00").unwrap();
        assert_eq!(cfg.plan_rules().unwrap().workday_end, 20 * 60);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("routines.morning.title", "Stretch").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.routines.morning.title, "Stretch");
    }

    #[test]
    fn load_from_reports_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[workday\nstart = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
