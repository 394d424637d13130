use crate::error::{Error, Result};
use std::path::PathBuf;

/// Configuration for one cache-building run
#[derive(Debug, Clone)]
pub struct Config {
    /// Wikimedia project (database) name, e.g. "enwiki"
    pub project: String,
    /// Root directory of the cache tree; created as needed
    pub directory: PathBuf,
    /// Namespace identifiers to import; empty means all
    pub namespaces: Vec<String>,
    pub verbose: bool,
}

impl Config {
    /// Create a new default configuration
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            directory: PathBuf::from("cache"),
            namespaces: Vec::new(),
            verbose: false,
        }
    }

    /// True when the namespace should be processed under the current filter.
    /// An empty filter selects every namespace.
    pub fn wants_namespace(&self, namespace_id: i64) -> bool {
        self.namespaces.is_empty()
            || self.namespaces.iter().any(|n| n == &namespace_id.to_string())
    }

    /// Directory holding this project's cache entries
    pub fn project_dir(&self) -> PathBuf {
        self.directory.join(&self.project)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.project.is_empty() {
            return Err(Error::Config("project name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for creating configurations
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            config: Config::new(project),
        }
    }

    /// Set the cache root directory
    pub fn directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.directory = dir.into();
        self
    }

    /// Restrict processing to the given namespace identifiers
    pub fn namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.config.namespaces = namespaces;
        self
    }

    /// Set verbose output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Interpret an environment variable value as a boolean flag.
/// Anything other than the usual negative spellings counts as true.
pub fn env_flag(value: &str) -> bool {
    !matches!(
        value.to_lowercase().as_str(),
        "" | "0" | "false" | "no" | "f" | "n"
    )
}
