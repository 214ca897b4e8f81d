//! Configuration file loading for chatbridge
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Environment: `CHATBRIDGE_<SECTION>__<KEY>`
//! 3. Project root: `./chatbridge.toml` or `./.chatbridge.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/chatbridge/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileClientConfig, FileConfig, FileConsoleConfig, FileGuardianConfig,
    FileLoggingConfig, FileServerConfig, FileTimeoutsConfig, MAX_TIMEOUT_SECS,
};
pub use loader::ConfigLoader;
