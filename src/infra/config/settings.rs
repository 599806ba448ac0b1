use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const CURRENT_VERSION: u32 = 1;
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATA_DIR_ENV: &str = "AWS2OPENSTACK_DATA_DIR";

const APP_DIR_NAME: &str = "aws2openstack";
const DEFAULT_OUTPUT_DIR: &str = "./output";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Invalid config file format: {0}")]
    InvalidFormat(String),
    #[error("Config version mismatch: found v{found}, expected v{expected}")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("Could not determine {0} directory")]
    NoHomeDir(&'static str),
}

/// On-disk shape of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsFile {
    pub version: u32,
    #[serde(default)]
    pub aws: AwsSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsSection {
    pub region: Option<String>,
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSection {
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    pub output_dir: Option<PathBuf>,
}

/// Values given on the command line; they beat every other source.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// Effective settings after merging CLI, environment, file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoHomeDir("config"))?;
    Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    let base = dirs::data_dir().ok_or(ConfigError::NoHomeDir("data"))?;
    Ok(base.join(APP_DIR_NAME))
}

/// `Ok(None)` when the file does not exist.
pub fn load(path: &Path) -> Result<Option<SettingsFile>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;
    let file: SettingsFile =
        toml::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

    if file.version != CURRENT_VERSION {
        return Err(ConfigError::VersionMismatch {
            found: file.version,
            expected: CURRENT_VERSION,
        });
    }

    Ok(Some(file))
}

impl Settings {
    /// Precedence: CLI, then environment, then file, then defaults.
    ///
    /// `env` is injected so tests never touch the process environment.
    pub fn resolve(
        cli: CliOverrides,
        file: Option<SettingsFile>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let region = cli
            .region
            .or_else(|| lookup("AWS_REGION"))
            .or(file.aws.region);
        let profile = cli
            .profile
            .or_else(|| lookup("AWS_PROFILE"))
            .or(file.aws.profile);

        let data_dir = match cli
            .data_dir
            .or_else(|| lookup(DATA_DIR_ENV).map(PathBuf::from))
            .or(file.storage.data_dir)
        {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        let output_dir = cli
            .output_dir
            .or(file.report.output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Self {
            region,
            profile,
            data_dir,
            output_dir,
        })
    }
}
