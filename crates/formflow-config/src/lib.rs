//! Configuration system for the Formflow form session engine.
//!
//! Provides TOML-based configuration with:
//! - A `[session]` section for state TTLs and the backing store name
//! - A `[forms]` section for routing prefixes used when compiling models
//! - Config file layering (user config, project file, explicit override)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    CONFIG_DIR_ENV, CONFIG_FILE_ENV, ConfigLayer, ConfigLoader, ConfigSource, LoadedConfig,
    load_config, load_config_file, user_config_dir,
};
pub use error::{ConfigError, Result};
pub use types::*;
