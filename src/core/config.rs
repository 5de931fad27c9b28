use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default name of the symbol names resource inside the data directory
pub const NAMES_FILE_NAME: &str = "SFSymbolNames.txt";

/// Default name of the word-vector file inside the models directory
pub const VECTORS_FILE_NAME: &str = "words.vec";

const SETTINGS_FILE_NAME: &str = "config.yaml";

/// Configuration for symbolpick
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory for symbolpick data
    pub base_dir: PathBuf,
    /// Directory holding the symbol names resource
    pub data_dir: PathBuf,
    /// Directory for word-vector files
    pub models_dir: PathBuf,
    /// Path to the user settings file
    pub settings_path: PathBuf,
}

/// User-editable settings, stored as YAML in `config.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Symbol names resource (`<fullName>_<identifier>` per line)
    pub names_file: Option<PathBuf>,
    /// Word-vector file in GloVe / fastText text format
    pub vectors_file: Option<PathBuf>,
    /// Number of suggestion words requested from the embedding
    pub neighbor_count: usize,
    /// Quit the picker right after a symbol is picked
    pub quit_on_select: bool,
    /// How long a picked symbol stays highlighted before the follow-up action
    pub select_delay_ms: u64,
    /// Program (and arguments) that receives picked identifiers on stdin
    pub copy_command: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            names_file: None,
            vectors_file: None,
            neighbor_count: 10,
            quit_on_select: true,
            select_delay_ms: 125,
            copy_command: None,
        }
    }
}

impl Config {
    /// Get the default configuration directory
    pub fn default_base_dir() -> Result<PathBuf> {
        dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
            .map(|home| home.join(".symbolpick"))
    }

    /// Create a new configuration
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.unwrap_or_else(|| {
            Self::default_base_dir().unwrap_or_else(|_| PathBuf::from(".symbolpick"))
        });

        Ok(Self {
            data_dir: base_dir.join("data"),
            models_dir: base_dir.join("models"),
            settings_path: base_dir.join(SETTINGS_FILE_NAME),
            base_dir,
        })
    }

    /// Initialize the configuration directories and write default settings
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.models_dir)?;

        if !self.settings_path.exists() {
            let yaml = serde_yaml::to_string(&Settings::default())?;
            std::fs::write(&self.settings_path, yaml)?;
        }
        Ok(())
    }

    /// Check if the configuration is already initialized
    pub fn is_initialized(&self) -> bool {
        self.base_dir.exists() && self.data_dir.exists()
    }

    /// Load settings, falling back to defaults when no settings file exists
    pub fn load_settings(&self) -> Result<Settings> {
        if !self.settings_path.exists() {
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(&self.settings_path)?;
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Resolved location of the symbol names resource
    pub fn names_path(&self, settings: &Settings) -> PathBuf {
        settings
            .names_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(NAMES_FILE_NAME))
    }

    /// Resolved location of the word-vector file
    pub fn vectors_path(&self, settings: &Settings) -> PathBuf {
        settings
            .vectors_file
            .clone()
            .unwrap_or_else(|| self.models_dir.join(VECTORS_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings = serde_yaml::from_str("neighbor_count: 4\n").unwrap();
        assert_eq!(settings.neighbor_count, 4);
        assert!(settings.quit_on_select);
        assert_eq!(settings.select_delay_ms, 125);
        assert!(settings.copy_command.is_none());
    }

    #[test]
    fn test_default_paths_live_under_base_dir() {
        let config = Config::new(Some(PathBuf::from("/tmp/sp"))).unwrap();
        let settings = Settings::default();
        assert_eq!(
            config.names_path(&settings),
            PathBuf::from("/tmp/sp/data/SFSymbolNames.txt")
        );
        assert_eq!(
            config.vectors_path(&settings),
            PathBuf::from("/tmp/sp/models/words.vec")
        );
    }
}
