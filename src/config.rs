use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::interface::Preset;
use crate::selector::SelectionPolicy;
use crate::session::Mode;
use crate::store::default_save_dir;
use crate::wordbank::{MAX_WORD_LENGTH, MIN_WORD_LENGTH};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// File path or URL of a word list; the embedded list when unset.
    #[serde(default)]
    pub wordlist: Option<String>,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub policy: SelectionPolicy,
    #[serde(default)]
    pub mode: Option<Mode>,
    #[serde(default)]
    pub length: Option<usize>,
    #[serde(default)]
    pub plain: bool,
    #[serde(default = "default_save_enabled")]
    pub save_enabled: bool,
}

fn default_data_dir() -> String {
    default_save_dir().to_string_lossy().to_string()
}
fn default_save_enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wordlist: None,
            data_dir: default_data_dir(),
            policy: SelectionPolicy::default(),
            mode: None,
            length: None,
            plain: false,
            save_enabled: default_save_enabled(),
        }
    }
}

impl Config {
    /// Read the user config file, or defaults if there is none.
    ///
    /// # Errors
    /// The file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// # Errors
    /// The file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.normalize();
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("turkce-wordle")
            .join("config.toml")
    }

    /// Drop a preset length outside the playable range.
    pub fn normalize(&mut self) {
        if let Some(length) = self.length
            && !(MIN_WORD_LENGTH..=MAX_WORD_LENGTH).contains(&length)
        {
            warn!("Ignoring configured length {length}, must be {MIN_WORD_LENGTH}-{MAX_WORD_LENGTH}");
            self.length = None;
        }
    }

    /// Command-line flags win over the file.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(wordlist) = &cli.wordlist {
            self.wordlist = Some(wordlist.clone());
        }
        if let Some(dir) = &cli.data_dir {
            self.data_dir = dir.to_string_lossy().to_string();
        }
        if let Some(policy) = cli.policy {
            self.policy = policy;
        }
        if let Some(mode) = cli.mode {
            self.mode = Some(mode);
        }
        if let Some(length) = cli.length {
            self.length = Some(length);
            // A bare --length implies classic.
            if self.mode.is_none() {
                self.mode = Some(Mode::Classic);
            }
        }
        if cli.plain {
            self.plain = true;
        }
        if cli.no_save {
            self.save_enabled = false;
        }
        self.normalize();
    }

    #[must_use]
    pub fn preset(&self) -> Preset {
        Preset {
            mode: self.mode,
            length: self.length,
        }
    }

    #[must_use]
    pub fn save_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// The TUI writes its log next to the save directory.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        let saves = self.save_dir();
        saves
            .parent()
            .map_or_else(|| saves.clone(), Path::to_path_buf)
            .join("turkce-wordle.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.save_enabled);
        assert_eq!(config.policy, SelectionPolicy::Daily);
        assert!(config.data_dir.contains("turkce-wordle"));
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
policy = "intraday"
mode = "classic"
length = 6
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.policy, SelectionPolicy::Intraday);
        assert_eq!(config.mode, Some(Mode::Classic));
        assert_eq!(config.length, Some(6));
        assert!(!config.plain);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            wordlist: Some("kelimeler.txt".to_string()),
            mode: Some(Mode::Dynamic),
            ..Config::default()
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let config = Config::load_from(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file_normalizes_length() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "length = 12\nplain = true").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.length, None);
        assert!(config.plain);
    }

    #[test]
    fn test_load_from_invalid_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "policy = \"hourly\"").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = Config {
            policy: SelectionPolicy::Intraday,
            mode: Some(Mode::Dynamic),
            ..Config::default()
        };
        let cli = Cli::parse_from([
            "turkce-wordle",
            "--length",
            "5",
            "--mode",
            "classic",
            "--policy",
            "daily",
            "--no-save",
            "--data-dir",
            "/tmp/wordle-saves",
        ]);
        config.apply_cli(&cli);
        assert_eq!(config.mode, Some(Mode::Classic));
        assert_eq!(config.length, Some(5));
        assert_eq!(config.policy, SelectionPolicy::Daily);
        assert!(!config.save_enabled);
        assert_eq!(config.save_dir(), PathBuf::from("/tmp/wordle-saves"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/turkce-wordle.log"));
    }

    #[test]
    fn test_bare_length_implies_classic() {
        let mut config = Config::default();
        let cli = Cli::parse_from(["turkce-wordle", "--length", "7"]);
        config.apply_cli(&cli);
        assert_eq!(config.preset(), Preset { mode: Some(Mode::Classic), length: Some(7) });
    }
}
