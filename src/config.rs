use crate::{error::LingError, properties::DEFAULT_PALETTE};
use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{read_to_string, write},
    path::PathBuf,
};

pub const CONFIG_FILE_NAME: &str = ".ling.toml";

pub const DEFAULT_SEMANTIC_GROUPS: [&str; 10] = [
    "Предикат",
    "Объект",
    "Агент",
    "Инструмент",
    "Локатив",
    "Погодные условия",
    "Высота",
    "Режим",
    "Угол наклона",
    "Скорость",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LingConfig {
    /// SQLite file holding the annotations.
    pub database: PathBuf,
    /// Name of the distinguished predicate group.
    pub predicate_group: String,
    /// Groups created on open if missing.
    pub semantic_groups: Vec<String>,
    /// Colours for HTML rendering, indexed by `group_id mod len`.
    pub palette: Vec<String>,
    /// Optional TOML dictionary for [`crate::morph::DictionaryAnalyzer`].
    pub dictionary: Option<PathBuf>,
}

impl Default for LingConfig {
    fn default() -> Self {
        LingConfig {
            database: PathBuf::from("ling.sqlite"),
            predicate_group: DEFAULT_SEMANTIC_GROUPS[0].to_string(),
            semantic_groups: DEFAULT_SEMANTIC_GROUPS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            dictionary: None,
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn get_config(&self) -> Result<LingConfig, LingError>;
    fn set_config(&self, config: &LingConfig) -> Result<(), LingError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigProvider { path }
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn get_config(&self) -> Result<LingConfig, LingError> {
        tracing::debug!("Attempting to read config from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Config file not found, using defaults.");
            return Ok(LingConfig::default());
        }
        let content = read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }

    fn set_config(&self, config: &LingConfig) -> Result<(), LingError> {
        tracing::debug!("Attempting to write config to: {:?}", &self.path);
        let toml_string = toml::to_string(config)?;
        write(&self.path, toml_string)?;
        Ok(())
    }
}

/// `$HOME/.ling.toml`, or `.ling.toml` in the working directory when `HOME` is unset.
pub fn default_config_path() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(CONFIG_FILE_NAME),
        None => PathBuf::from(CONFIG_FILE_NAME),
    }
}
