//! Loader configuration (acquire.toml)
//!
//! Holds the engine-wide defaults used by path resolution and the
//! per-namespace root/index overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Default directory holding namespaced modules
pub const DEFAULT_ROOT: &str = "/modules";

/// Default entry file appended when a specifier names only a namespace
pub const DEFAULT_INDEX: &str = "/index";

/// Extension appended to addresses without one; also selects the script transport
pub const DEFAULT_SCRIPT_EXTENSION: &str = "js";

/// Extension selecting the style transport
pub const DEFAULT_STYLE_EXTENSION: &str = "css";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),
}

/// Root/index override for one namespace
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamespaceConfig {
    /// Directory the namespace maps to; replaces `<root>/<namespace>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Entry file used when the specifier names only the namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

impl NamespaceConfig {
    pub fn new(root: impl Into<String>, index: impl Into<String>) -> Self {
        Self {
            root: Some(root.into()),
            index: Some(index.into()),
        }
    }

    pub fn with_root(root: impl Into<String>) -> Self {
        Self {
            root: Some(root.into()),
            index: None,
        }
    }
}

/// Loader configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Directory holding unconfigured namespaces
    #[serde(default = "default_root")]
    pub root: String,

    /// Entry file for bare namespace specifiers
    #[serde(default = "default_index")]
    pub index: String,

    /// Extension for scripts, appended to extensionless addresses
    #[serde(default = "default_script_extension")]
    pub script_extension: String,

    /// Extension for stylesheets
    #[serde(default = "default_style_extension")]
    pub style_extension: String,

    /// Per-namespace overrides
    #[serde(default)]
    pub namespaces: BTreeMap<String, NamespaceConfig>,
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

fn default_script_extension() -> String {
    DEFAULT_SCRIPT_EXTENSION.to_string()
}

fn default_style_extension() -> String {
    DEFAULT_STYLE_EXTENSION.to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            index: default_index(),
            script_extension: default_script_extension(),
            style_extension: default_style_extension(),
            namespaces: BTreeMap::new(),
        }
    }
}

impl LoaderConfig {
    /// Load config from a file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse config from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: LoaderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Render config as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, ext) in [
            ("script_extension", &self.script_extension),
            ("style_extension", &self.style_extension),
        ] {
            if ext.is_empty() || ext.contains('.') || ext.contains('/') {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be a bare extension like \"js\", got {:?}",
                    name, ext
                )));
            }
        }

        if self.script_extension == self.style_extension {
            return Err(ConfigError::ValidationError(
                "script_extension and style_extension must differ".to_string(),
            ));
        }

        if self.root.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "root cannot be empty".to_string(),
            ));
        }

        if self.index.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "index cannot be empty".to_string(),
            ));
        }

        for (namespace, ns) in &self.namespaces {
            if namespace.is_empty() || namespace.contains('/') {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid namespace name: {:?}",
                    namespace
                )));
            }
            if ns.root.as_deref().is_some_and(|r| r.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "Namespace {} has an empty root",
                    namespace
                )));
            }
            if ns.index.as_deref().is_some_and(|i| i.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "Namespace {} has an empty index",
                    namespace
                )));
            }
        }

        Ok(())
    }

    /// Soft-merge namespace overrides.
    ///
    /// Each incoming namespace replaces only its own entry; namespaces not
    /// mentioned keep their current configuration.
    pub fn configure<I, K>(&mut self, namespaces: I)
    where
        I: IntoIterator<Item = (K, NamespaceConfig)>,
        K: Into<String>,
    {
        for (namespace, ns) in namespaces {
            self.namespaces.insert(namespace.into(), ns);
        }
    }

    pub fn namespace(&self, namespace: &str) -> Option<&NamespaceConfig> {
        self.namespaces.get(namespace)
    }
}
