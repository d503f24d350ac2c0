//! Configuration management for cairn tools.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`CAIRN__` prefix)
//! 2. Every `*.toml` file in the config directory (lexicographic order,
//!    later files override earlier ones)
//! 3. Defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level cairn configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CairnConfig {
    /// Application identity.
    #[serde(default)]
    pub app: AppConfig,

    /// Graph service connection settings.
    #[serde(default)]
    pub graph: GraphSection,

    /// Security service settings.
    #[serde(default)]
    pub security: SecuritySection,

    /// Seed tool settings.
    #[serde(default)]
    pub seed: SeedSection,
}

impl CairnConfig {
    /// Load configuration from a directory of `*.toml` files plus
    /// `CAIRN__`-prefixed environment variables.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ConfigError::MissingDirectory {
                path: dir.display().to_string(),
            });
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        files.sort();

        let mut builder = config::Config::builder();
        for file in &files {
            builder = builder.add_source(config::File::from(file.as_path()));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("CAIRN")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?.try_deserialize::<Self>()?;
        tracing::debug!(dir = %dir.display(), files = files.len(), "Loaded configuration");
        Ok(cfg)
    }
}

/// Application identity settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Application name sent with every graph service call.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Security identifier registered with the security service.
    #[serde(default)]
    pub security_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            security_id: String::new(),
        }
    }
}

/// `[graph]` section: connection settings for the graph service.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphSection {
    #[serde(default = "default_graph_uri")]
    pub uri: String,

    #[serde(default = "default_graph_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Logical graph to operate on.
    #[serde(default = "default_graph_name")]
    pub graph_name: String,

    /// Handles dialed by the client pool.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

impl Default for GraphSection {
    fn default() -> Self {
        Self {
            uri: default_graph_uri(),
            user: default_graph_user(),
            password: String::new(),
            graph_name: default_graph_name(),
            pool_size: default_pool_size(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

/// `[security]` section: where app tokens are fetched from.
#[derive(Debug, Clone, Deserialize)]
pub struct SecuritySection {
    #[serde(default = "default_security_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_security_timeout")]
    pub timeout_secs: u64,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            endpoint: default_security_endpoint(),
            timeout_secs: default_security_timeout(),
        }
    }
}

/// `[seed]` section: seed tool behavior.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedSection {
    /// How schema-creation and graph-write failures are handled.
    #[serde(default)]
    pub write_mode: WritePolicy,
}

/// Failure handling for the write path.
///
/// The read path (vertex queries) is must-succeed under both policies.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Log write failures and continue; the send reports them but returns Ok.
    #[default]
    BestEffort,
    /// Propagate write failures to the caller.
    Strict,
}

fn default_app_name() -> String {
    "testGraph".to_string()
}

fn default_graph_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_graph_user() -> String {
    "neo4j".to_string()
}

fn default_graph_name() -> String {
    "default".to_string()
}

fn default_pool_size() -> usize {
    4
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

fn default_security_endpoint() -> String {
    "http://localhost:7171".to_string()
}

fn default_security_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::fs;

    #[test]
    fn defaults() {
        let cfg = CairnConfig::default();
        assert_eq!(cfg.app.name, "testGraph");
        assert_eq!(cfg.graph.uri, "bolt://localhost:7687");
        assert_eq!(cfg.graph.graph_name, "default");
        assert_eq!(cfg.graph.pool_size, 4);
        assert_eq!(cfg.seed.write_mode, WritePolicy::BestEffort);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let err = CairnConfig::load_from_dir("/nonexistent/cairn-config").unwrap_err();
        assert!(matches!(err, ConfigError::MissingDirectory { .. }));
    }

    #[test]
    fn loads_toml_files_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("cairn.toml"),
            r#"
[app]
name = "demo"

[graph]
uri = "bolt://graph-1:7687"
"#,
        )
        .unwrap();

        let cfg = CairnConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(cfg.app.name, "demo");
        assert_eq!(cfg.graph.uri, "bolt://graph-1:7687");
        // Untouched sections keep their defaults.
        assert_eq!(cfg.graph.user, "neo4j");
    }

    #[test]
    fn later_files_override_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("00-base.toml"), "[graph]\nuri = \"bolt://a:7687\"\n").unwrap();
        fs::write(dir.path().join("10-site.toml"), "[graph]\nuri = \"bolt://b:7687\"\n").unwrap();

        let cfg = CairnConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(cfg.graph.uri, "bolt://b:7687");
    }

    #[test]
    fn non_toml_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cairn.toml"), "[app]\nname = \"demo\"\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not config").unwrap();

        let cfg = CairnConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(cfg.app.name, "demo");
    }

    #[test]
    fn write_mode_parses_kebab_case() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("cairn.toml"), "[seed]\nwrite_mode = \"strict\"\n").unwrap();

        let cfg = CairnConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(cfg.seed.write_mode, WritePolicy::Strict);
    }
}
