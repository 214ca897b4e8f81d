//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level file names, checked in order.
const PROJECT_FILES: [&str; 2] = ["chatbridge.toml", ".chatbridge.toml"];

/// Prefix for environment overrides; `__` separates section and key.
const ENV_PREFIX: &str = "CHATBRIDGE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. `CHATBRIDGE_*` environment variables
    /// 3. Project root: `./chatbridge.toml` or `./.chatbridge.toml`
    /// 4. XDG config: `$XDG_CONFIG_HOME/chatbridge/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::load_from(
            config_path.map(PathBuf::as_path),
            Self::project_config_path().as_deref(),
            Self::global_config_path().as_deref(),
        )
    }

    fn load_from(
        explicit: Option<&Path>,
        project: Option<&Path>,
        global: Option<&Path>,
    ) -> Result<FileConfig, Box<figment::Error>> {
        // An explicitly named file must exist; discovered ones are optional
        if let Some(path) = explicit
            && !path.exists()
        {
            return Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))));
        }
        Self::figment(explicit, project, global)
            .extract()
            .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(explicit: Option<&Path>, project: Option<&Path>, global: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = global
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = project {
            figment = figment.merge(Toml::file(project_path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/chatbridge/config.toml` if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("chatbridge").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_in(Path::new("."))
    }

    fn project_config_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|filename| dir.join(filename))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");

        if let Some(path) = config_path {
            let marker = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<7}] Explicit: {}", marker, path.display());
        }

        println!("  [       ] Environment: {}<SECTION>__<KEY>", ENV_PREFIX);

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND  ] Project: {}", path.display());
        } else {
            println!("  [       ] Project: ./chatbridge.toml or ./.chatbridge.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND  ] Global:  {}", path.display());
            } else {
                println!("  [       ] Global:  {}", path.display());
            }
        }

        println!("  [       ] Default: built-in defaults");
    }
}
