//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same schema is used for the global file and the project file; any
//! section or key may be omitted.
//!
//! # Validation
//!
//! Config values are validated after parsing so that a bad file fails at
//! load time rather than halfway through a command.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::network::{CollapsePolicy, SelfLoopPolicy};

/// A configuration file.
///
/// # Example
///
/// ```toml
/// [store]
/// path = "data/posts.db"
///
/// [twitter]
/// query = "\"generative ai\" -is:retweet"
/// max_posts = 100
///
/// [network]
/// collapse = "weighted"
/// self_loops = "keep"
///
/// [output]
/// dir = "artifacts"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Post store settings
    pub store: Option<StoreSection>,

    /// Twitter search settings
    pub twitter: Option<TwitterSection>,

    /// Network build settings
    pub network: Option<NetworkSection>,

    /// Artifact output settings
    pub output: Option<OutputSection>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(store) = &self.store {
            if let Some(path) = &store.path {
                if path.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(
                        "store.path cannot be empty".to_string(),
                    ));
                }
            }
        }

        if let Some(twitter) = &self.twitter {
            twitter.validate()?;
        }

        if let Some(output) = &self.output {
            if let Some(dir) = &output.dir {
                if dir.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(
                        "output.dir cannot be empty".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Starting point written by `chirp config init`.
    pub fn template() -> Self {
        Self {
            store: Some(StoreSection {
                path: Some(super::DEFAULT_STORE_PATH.to_string()),
            }),
            twitter: Some(TwitterSection {
                bearer_token: None,
                api_base: None,
                query: Some(super::DEFAULT_QUERY.to_string()),
                max_posts: Some(super::DEFAULT_MAX_POSTS),
            }),
            network: Some(NetworkSection {
                collapse: Some(CollapsePolicy::default()),
                self_loops: Some(SelfLoopPolicy::default()),
            }),
            output: Some(OutputSection {
                dir: Some(super::DEFAULT_OUTPUT_DIR.to_string()),
            }),
        }
    }
}

/// Post store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    /// Path to the SQLite database
    pub path: Option<String>,
}

/// Twitter search settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TwitterSection {
    /// Bearer token (prefer `TWITTER_BEARER_TOKEN`)
    pub bearer_token: Option<String>,

    /// API base URL
    pub api_base: Option<String>,

    /// Search query
    pub query: Option<String>,

    /// Maximum posts per `collect` run
    pub max_posts: Option<usize>,
}

impl TwitterSection {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base) = &self.api_base {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "twitter.api_base must be an http(s) URL, got '{}'",
                    base
                )));
            }
        }

        if let Some(query) = &self.query {
            if query.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "twitter.query cannot be empty".to_string(),
                ));
            }
        }

        if self.max_posts == Some(0) {
            return Err(ConfigError::InvalidValue(
                "twitter.max_posts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Network build settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkSection {
    pub collapse: Option<CollapsePolicy>,
    pub self_loops: Option<SelfLoopPolicy>,
}

/// Artifact output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// Directory for charts and summaries
    pub dir: Option<String>,
}
