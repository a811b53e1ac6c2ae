use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use finans_domain::Frequency;
use serde::{de::Deserializer, Deserialize, Serialize};
use uuid::Uuid;

/// Environment variable overriding the application base directory.
pub const HOME_ENV: &str = "FINANS_HOME";

const APP_DIR: &str = "finans";
const DATA_DIR: &str = "data";

/// Stores user preferences and session metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Occurrences generated for a new recurring revenue or expense.
    #[serde(default = "Config::default_repetitions_value")]
    pub default_repetitions: u32,
    #[serde(default, deserialize_with = "deserialize_frequency")]
    pub default_recurrence_frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_member_id: Option<Uuid>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for the household file. Defaults to `<base>/data`.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "pt-BR".into(),
            currency: "BRL".into(),
            default_repetitions: Self::default_repetitions_value(),
            default_recurrence_frequency: Frequency::Monthly,
            last_member_id: None,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn default_repetitions_value() -> u32 {
        12
    }

    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }
        base.join(DATA_DIR)
    }
}

/// Base directory for configuration and data: `$FINANS_HOME` when set,
/// otherwise the platform data directory.
pub fn default_base_dir() -> PathBuf {
    base_dir_from(std::env::var_os(HOME_ENV))
}

fn base_dir_from(override_dir: Option<OsString>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }

    let base = dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    base.join(APP_DIR)
}

// Unknown or missing values fall back to monthly instead of failing the load.
fn deserialize_frequency<'de, D>(deserializer: D) -> Result<Frequency, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .as_deref()
        .and_then(Frequency::parse)
        .unwrap_or_default())
}
