//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! chirpgraph has two configuration scopes:
//! - **Global**: User-level settings
//! - **Project**: `chirpgraph.toml` in the working directory
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Project config file
//! 4. Environment (`TWITTER_BEARER_TOKEN`, `CHIRPGRAPH_DB`)
//! 5. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `--config <path>` if given (must exist)
//! 2. `$CHIRPGRAPH_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/chirpgraph/config.toml`
//! 4. `~/.chirpgraph/config.toml`
//!
//! Components never read the environment themselves: the CLI loads a
//! [`Config`] once and hands explicit values to each component.
//!
//! # Example
//!
//! ```no_run
//! use chirpgraph::core::config::Config;
//! use std::path::Path;
//!
//! let result = Config::load(None, Some(Path::new("."))).unwrap();
//! let config = result.config;
//!
//! println!("Store: {}", config.store_path().display());
//! println!("Query: {}", config.query());
//! ```

pub mod schema;

pub use schema::ConfigFile;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::network::{BuildOptions, CollapsePolicy, SelfLoopPolicy};

/// Default post store location.
pub const DEFAULT_STORE_PATH: &str = "chirpgraph.db";

/// Default Twitter API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";

/// Default search query: the phrase, excluding retweets.
pub const DEFAULT_QUERY: &str = "\"generative ai\" -is:retweet";

/// Default number of posts collected per run.
pub const DEFAULT_MAX_POSTS: usize = 100;

/// Default artifact directory.
pub const DEFAULT_OUTPUT_DIR: &str = "artifacts";

/// Project config file name.
pub const PROJECT_CONFIG_FILE: &str = "chirpgraph.toml";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("config file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Values taken from the process environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    pub bearer_token: Option<String>,
    pub db_path: Option<String>,
}

impl EnvOverrides {
    /// Read overrides from the process environment. Empty values are ignored.
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            bearer_token: read("TWITTER_BEARER_TOKEN"),
            db_path: read("CHIRPGRAPH_DB"),
        }
    }
}

/// Where to look for configuration.
///
/// [`Config::load`] fills this from the real environment; tests build it
/// directly.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Explicit global config path (`--config`)
    pub explicit: Option<PathBuf>,
    /// `$CHIRPGRAPH_CONFIG`
    pub env_config: Option<PathBuf>,
    /// `$XDG_CONFIG_HOME`
    pub xdg_config_home: Option<PathBuf>,
    /// Home directory
    pub home: Option<PathBuf>,
    /// Directory searched for `chirpgraph.toml`
    pub project_dir: Option<PathBuf>,
    /// Environment overrides
    pub env: EnvOverrides,
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence automatically.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: ConfigFile,
    /// Project configuration (if present)
    pub project: Option<ConfigFile>,
    /// Environment overrides
    pub env: EnvOverrides,
    global_path: Option<PathBuf>,
    project_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read or
    /// parsed, or if `explicit` points to a missing file. Missing default
    /// files are not an error.
    pub fn load(
        explicit: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let sources = ConfigSources {
            explicit: explicit.map(Path::to_path_buf),
            env_config: std::env::var_os("CHIRPGRAPH_CONFIG").map(PathBuf::from),
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            home: dirs::home_dir(),
            project_dir: project_dir.map(Path::to_path_buf),
            env: EnvOverrides::from_env(),
        };
        Self::load_from(&sources)
    }

    /// Load configuration from explicit sources.
    pub fn load_from(sources: &ConfigSources) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, global_path) = Self::load_global(sources)?;

        let (project, project_path) = match &sources.project_dir {
            Some(dir) => {
                let path = dir.join(PROJECT_CONFIG_FILE);
                if path.exists() {
                    let file = Self::read_config(&path)?;
                    if file
                        .twitter
                        .as_ref()
                        .is_some_and(|t| t.bearer_token.is_some())
                    {
                        warnings.push(ConfigWarning {
                            message: "Project config contains a bearer token. Prefer \
                                      TWITTER_BEARER_TOKEN or the global config."
                                .to_string(),
                            path: path.clone(),
                        });
                    }
                    (Some(file), Some(path))
                } else {
                    (None, None)
                }
            }
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref p) = project {
            p.validate()?;
        }

        Ok(ConfigLoadResult {
            config: Config {
                global,
                project,
                env: sources.env.clone(),
                global_path,
                project_path,
            },
            warnings,
        })
    }

    /// Load global configuration from the first location that exists.
    fn load_global(sources: &ConfigSources) -> Result<(ConfigFile, Option<PathBuf>), ConfigError> {
        // 1. Explicit path must exist
        if let Some(path) = &sources.explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.clone()));
            }
            return Ok((Self::read_config(path)?, Some(path.clone())));
        }

        let candidates = [
            sources.env_config.clone(),
            sources
                .xdg_config_home
                .as_ref()
                .map(|xdg| xdg.join("chirpgraph/config.toml")),
            sources
                .home
                .as_ref()
                .map(|home| home.join(".chirpgraph/config.toml")),
        ];

        for path in candidates.into_iter().flatten() {
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((ConfigFile::default(), None))
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for the project config.
    pub fn project_config_path(project_dir: &Path) -> PathBuf {
        project_dir.join(PROJECT_CONFIG_FILE)
    }

    /// Write a project config atomically.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn write_project(
        project_dir: &Path,
        config: &ConfigFile,
        force: bool,
    ) -> Result<PathBuf, ConfigError> {
        let path = Self::project_config_path(project_dir);
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path));
        }
        Self::write_config_atomic(&path, config)?;
        Ok(path)
    }

    /// Write a config file atomically.
    fn write_config_atomic<T: serde::Serialize>(
        path: &Path,
        config: &T,
    ) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        // Write to temp file in same directory (for atomic rename)
        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Pick a value from the project file, falling back to the global file.
    fn pick<T>(&self, get: impl Fn(&ConfigFile) -> Option<T>) -> Option<T> {
        self.project.as_ref().and_then(&get).or_else(|| get(&self.global))
    }

    /// Path to the post store.
    ///
    /// `CHIRPGRAPH_DB` wins over the files; defaults to `chirpgraph.db`.
    pub fn store_path(&self) -> PathBuf {
        if let Some(path) = &self.env.db_path {
            return PathBuf::from(path);
        }
        self.pick(|c| c.store.as_ref().and_then(|s| s.path.clone()))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
    }

    /// Bearer token for the Twitter API.
    ///
    /// `TWITTER_BEARER_TOKEN` wins over the files.
    pub fn bearer_token(&self) -> Option<String> {
        self.env.bearer_token.clone().or_else(|| {
            self.pick(|c| c.twitter.as_ref().and_then(|t| t.bearer_token.clone()))
        })
    }

    /// Twitter API base URL.
    pub fn api_base(&self) -> String {
        self.pick(|c| c.twitter.as_ref().and_then(|t| t.api_base.clone()))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    /// Search query.
    pub fn query(&self) -> String {
        self.pick(|c| c.twitter.as_ref().and_then(|t| t.query.clone()))
            .unwrap_or_else(|| DEFAULT_QUERY.to_string())
    }

    /// Maximum posts per collect run.
    pub fn max_posts(&self) -> usize {
        self.pick(|c| c.twitter.as_ref().and_then(|t| t.max_posts))
            .unwrap_or(DEFAULT_MAX_POSTS)
    }

    /// Collapse policy for network builds.
    pub fn collapse(&self) -> CollapsePolicy {
        self.pick(|c| c.network.as_ref().and_then(|n| n.collapse))
            .unwrap_or_default()
    }

    /// Self-loop policy for network builds.
    pub fn self_loops(&self) -> SelfLoopPolicy {
        self.pick(|c| c.network.as_ref().and_then(|n| n.self_loops))
            .unwrap_or_default()
    }

    /// Network build options from the configured policies.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            collapse: self.collapse(),
            self_loops: self.self_loops(),
        }
    }

    /// Directory for generated artifacts.
    pub fn output_dir(&self) -> PathBuf {
        self.pick(|c| c.output.as_ref().and_then(|o| o.dir.clone()))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded project config file.
    pub fn project_config_loaded_from(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn isolated(temp: &TempDir) -> ConfigSources {
        ConfigSources {
            home: Some(temp.path().join("home")),
            ..Default::default()
        }
    }

    #[test]
    fn load_empty_defaults() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(&isolated(&temp)).unwrap();
        let config = result.config;

        assert_eq!(config.store_path(), PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(config.api_base(), DEFAULT_API_BASE);
        assert_eq!(config.query(), DEFAULT_QUERY);
        assert_eq!(config.max_posts(), 100);
        assert_eq!(config.collapse(), CollapsePolicy::Weighted);
        assert_eq!(config.self_loops(), SelfLoopPolicy::Keep);
        assert!(config.bearer_token().is_none());
        assert!(config.global_config_loaded_from().is_none());
    }

    #[test]
    fn load_global_from_env_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(&path, "[twitter]\nmax_posts = 25\n").unwrap();

        let sources = ConfigSources {
            env_config: Some(path.clone()),
            ..isolated(&temp)
        };
        let config = Config::load_from(&sources).unwrap().config;

        assert_eq!(config.max_posts(), 25);
        assert_eq!(config.global_config_loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn xdg_preferred_over_home() {
        let temp = TempDir::new().unwrap();
        let xdg = temp.path().join("xdg");
        fs::create_dir_all(xdg.join("chirpgraph")).unwrap();
        fs::write(xdg.join("chirpgraph/config.toml"), "[output]\ndir = \"xdg-out\"\n").unwrap();
        let home = temp.path().join("home");
        fs::create_dir_all(home.join(".chirpgraph")).unwrap();
        fs::write(home.join(".chirpgraph/config.toml"), "[output]\ndir = \"home-out\"\n").unwrap();

        let sources = ConfigSources {
            xdg_config_home: Some(xdg),
            home: Some(home),
            ..Default::default()
        };
        let config = Config::load_from(&sources).unwrap().config;
        assert_eq!(config.output_dir(), PathBuf::from("xdg-out"));
    }

    #[test]
    fn explicit_missing_is_error() {
        let temp = TempDir::new().unwrap();
        let sources = ConfigSources {
            explicit: Some(temp.path().join("nope.toml")),
            ..isolated(&temp)
        };
        assert!(matches!(
            Config::load_from(&sources),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn project_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        fs::write(&global, "[network]\ncollapse = \"multigraph\"\nself_loops = \"drop\"\n").unwrap();
        let project_dir = temp.path().join("project");
        fs::create_dir_all(&project_dir).unwrap();
        fs::write(
            project_dir.join(PROJECT_CONFIG_FILE),
            "[network]\ncollapse = \"weighted\"\n",
        )
        .unwrap();

        let sources = ConfigSources {
            explicit: Some(global),
            project_dir: Some(project_dir),
            ..isolated(&temp)
        };
        let config = Config::load_from(&sources).unwrap().config;

        // Project wins where it speaks, global fills the rest.
        assert_eq!(config.collapse(), CollapsePolicy::Weighted);
        assert_eq!(config.self_loops(), SelfLoopPolicy::Drop);
    }

    #[test]
    fn env_overrides_files() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            "[store]\npath = \"file.db\"\n[twitter]\nbearer_token = \"from-file\"\n",
        )
        .unwrap();

        let sources = ConfigSources {
            explicit: Some(global),
            env: EnvOverrides {
                bearer_token: Some("from-env".into()),
                db_path: Some("env.db".into()),
            },
            ..isolated(&temp)
        };
        let config = Config::load_from(&sources).unwrap().config;

        assert_eq!(config.bearer_token().as_deref(), Some("from-env"));
        assert_eq!(config.store_path(), PathBuf::from("env.db"));
    }

    #[test]
    fn token_in_project_config_warns() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(PROJECT_CONFIG_FILE),
            "[twitter]\nbearer_token = \"secret\"\n",
        )
        .unwrap();

        let sources = ConfigSources {
            project_dir: Some(temp.path().to_path_buf()),
            ..isolated(&temp)
        };
        let result = Config::load_from(&sources).unwrap();

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.config.bearer_token().as_deref(), Some("secret"));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PROJECT_CONFIG_FILE), "surprise = true\n").unwrap();

        let sources = ConfigSources {
            project_dir: Some(temp.path().to_path_buf()),
            ..isolated(&temp)
        };
        assert!(matches!(
            Config::load_from(&sources),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn invalid_value_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(PROJECT_CONFIG_FILE), "[twitter]\nquery = \"  \"\n").unwrap();

        let sources = ConfigSources {
            project_dir: Some(temp.path().to_path_buf()),
            ..isolated(&temp)
        };
        assert!(matches!(
            Config::load_from(&sources),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn write_project_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let template = ConfigFile::template();

        let path = Config::write_project(temp.path(), &template, false).unwrap();
        assert!(path.exists());
        assert!(matches!(
            Config::write_project(temp.path(), &template, false),
            Err(ConfigError::AlreadyExists(_))
        ));
        assert!(Config::write_project(temp.path(), &template, true).is_ok());

        let sources = ConfigSources {
            project_dir: Some(temp.path().to_path_buf()),
            ..isolated(&temp)
        };
        let config = Config::load_from(&sources).unwrap().config;
        assert_eq!(config.query(), DEFAULT_QUERY);
    }
}
