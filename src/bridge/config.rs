//! Bridge configuration file parsing.

use std::fs;
use std::path::Path;

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "bridge/config.pest"] // relative to src
struct ConfigParser;

const BRIDGE_SECTION: &str = "bridge";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config syntax error: {0}")]
    Syntax(String),
    #[error("unknown section [{0}]")]
    UnknownSection(String),
    #[error("`{0}` appears outside the [bridge] section")]
    OutsideSection(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    #[error("`{key}` expects a boolean, found `{found}`")]
    ExpectedBoolean { key: String, found: String },
}

/// Controls which paths an [`AttributeBridge`](super::AttributeBridge) takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Fall back to the dynamic engine when static lookup misses.
    pub dynamic_get: bool,
    /// Fall back to the dynamic engine when static assignment misses.
    pub dynamic_set: bool,
    /// Use the process-wide dispatch-site cache instead of a private one.
    pub shared_cache: bool,
}

impl BridgeConfig {
    pub fn new() -> Self {
        BridgeConfig {
            dynamic_get: true,
            dynamic_set: true,
            shared_cache: true,
        }
    }

    /// Static resolution only; the dynamic engine is never consulted.
    pub fn static_only() -> Self {
        BridgeConfig {
            dynamic_get: false,
            dynamic_set: false,
            ..Self::new()
        }
    }

    /// Load configuration from a file.
    ///
    /// Expected format:
    /// ```toml
    /// [bridge]
    /// dynamic_get = true
    /// dynamic_set = false
    /// shared_cache = true
    /// ```
    ///
    /// Keys that are not given keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let pairs = ConfigParser::parse(Rule::config, content)
            .map_err(|e| ConfigError::Syntax(e.to_string()))?;

        let mut config = BridgeConfig::new();
        let mut in_bridge = false;

        for pair in pairs.flat_map(|p| p.into_inner()) {
            match pair.as_rule() {
                Rule::section => {
                    let name = pair.into_inner().next().map_or("", |k| k.as_str());
                    if name != BRIDGE_SECTION {
                        return Err(ConfigError::UnknownSection(name.to_string()));
                    }
                    in_bridge = true;
                }
                Rule::entry => {
                    let mut inner = pair.into_inner();
                    let (key, value) = match (inner.next(), inner.next()) {
                        (Some(k), Some(v)) => (k.as_str(), v),
                        _ => continue,
                    };
                    if !in_bridge {
                        return Err(ConfigError::OutsideSection(key.to_string()));
                    }
                    config.apply(key, value)?;
                }
                _ => {}
            }
        }

        Ok(config)
    }

    fn apply(&mut self, key: &str, value: Pair<Rule>) -> Result<(), ConfigError> {
        let slot = match key {
            "dynamic_get" => &mut self.dynamic_get,
            "dynamic_set" => &mut self.dynamic_set,
            "shared_cache" => &mut self.shared_cache,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        if value.as_rule() != Rule::boolean {
            return Err(ConfigError::ExpectedBoolean {
                key: key.to_string(),
                found: value.as_str().to_string(),
            });
        }
        *slot = value.as_str() == "true";
        Ok(())
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}
