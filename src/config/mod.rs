use crate::errors::{AppError, AppResult};
use crate::utils::path::resolve_under;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ledger JSON file; relative paths live under the config directory.
    #[serde(default = "default_data_file")]
    pub data_file: String,
    #[serde(default = "default_utc_offset")]
    pub utc_offset: String,
    #[serde(default = "default_checkin_limit")]
    pub checkin_limit: String,
    #[serde(default = "default_short_day")]
    pub short_day: String,
    #[serde(default = "default_short_day_checkin_limit")]
    pub short_day_checkin_limit: String,
    #[serde(default = "default_overtime_start")]
    pub overtime_start: String,
    #[serde(default = "default_short_day_overtime_start")]
    pub short_day_overtime_start: String,
    #[serde(default = "default_early_bird_winners")]
    pub early_bird_winners: usize,
    #[serde(default)]
    pub team_bonus: bool,
    #[serde(default = "default_checkin_limit")]
    pub team_bonus_deadline: String,
    #[serde(default)]
    pub strict_load: bool,
}

fn default_data_file() -> String {
    "ledger.json".to_string()
}
fn default_utc_offset() -> String {
    "+03:30".to_string()
}
fn default_checkin_limit() -> String {
    "08:31".to_string()
}
fn default_short_day() -> String {
    "thu".to_string()
}
fn default_short_day_checkin_limit() -> String {
    "09:30".to_string()
}
fn default_overtime_start() -> String {
    "18:00".to_string()
}
fn default_short_day_overtime_start() -> String {
    "14:30".to_string()
}
fn default_early_bird_winners() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            utc_offset: default_utc_offset(),
            checkin_limit: default_checkin_limit(),
            short_day: default_short_day(),
            short_day_checkin_limit: default_short_day_checkin_limit(),
            overtime_start: default_overtime_start(),
            short_day_overtime_start: default_short_day_overtime_start(),
            early_bird_winners: default_early_bird_winners(),
            team_bonus: false,
            team_bonus_deadline: default_checkin_limit(),
            strict_load: false,
        }
    }
}

impl Config {
    /// Return the standard configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rattendance")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rattendance.conf")
    }

    /// Resolved ledger path. A relative `data_file` lives next to the
    /// configuration file at `config_path`.
    pub fn data_path(&self, config_path: &Path) -> PathBuf {
        let base = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_dir);
        resolve_under(&base, &self.data_file)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&content)?;
        if cfg.early_bird_winners == 0 {
            return Err(AppError::Config(
                "early_bird_winners must be at least 1".to_string(),
            ));
        }
        Ok(cfg)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path)?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Initialize the configuration file. An existing file is kept; a custom
    /// data file overrides `data_file`. Returns the configuration in effect.
    pub fn init_all(
        config_path: &Path,
        custom_data: Option<String>,
        is_test: bool,
    ) -> AppResult<Self> {
        let mut config = Self::load_from(config_path)?;
        if let Some(data) = custom_data {
            config.data_file = data;
        }

        if !is_test {
            config.save_to(config_path)?;
            println!("✅ Config file: {:?}", config_path);
        }

        Ok(config)
    }
}
