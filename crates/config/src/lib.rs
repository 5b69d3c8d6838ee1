// Configuration loading
// Loaded from --config, else ~/.config/ouimap/config.toml, else built-in defaults

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{BuildConfig, OutputConfig, RegistryConfig, TableValueSetting};
