pub mod settings;

pub use settings::{CliOverrides, ConfigError, Settings, SettingsFile, default_config_path, load};
