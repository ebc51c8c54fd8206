//! Configuration management for lineage.
//!
//! Configuration is an optional YAML file:
//!
//! ```yaml
//! traversal:
//!   visit-policy: per-entity   # default; per-attribute re-expands per attribute
//! source:
//!   graph-file: lineage.json
//! ```
//!
//! A relative `graph-file` is resolved against the directory holding the
//! configuration file.

use crate::error::{Error, Result};
use crate::graph::VisitPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "lineage.yaml";

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LineageConfig {
    /// Traversal settings
    #[serde(default)]
    pub traversal: TraversalConfig,

    /// Graph source settings
    #[serde(default)]
    pub source: SourceConfig,
}

/// Traversal section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TraversalConfig {
    /// Visited-set policy for connected-path walks
    #[serde(default)]
    pub visit_policy: VisitPolicy,
}

/// Source section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SourceConfig {
    /// Graph export to load when `--graph` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_file: Option<PathBuf>,
}

impl LineageConfig {
    /// Load configuration from a file, resolving a relative `graph-file`
    /// against the file's directory.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let mut config: Self =
            serde_yaml::from_str(&content).map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;

        if let (Some(file), Some(dir)) = (config.source.graph_file.as_mut(), path.parent()) {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }
        Ok(config)
    }

    /// Load from an explicit path, or from `lineage.yaml` in `working_dir`
    /// if present, or fall back to defaults.
    ///
    /// # Errors
    ///
    /// An explicit path that cannot be read or parsed is an error; a missing
    /// implicit file is not.
    pub async fn resolve(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path).await;
        }
        let implicit = working_dir.join(CONFIG_FILE_NAME);
        if fs::try_exists(&implicit).await? {
            tracing::debug!(path = %implicit.display(), "Using configuration file");
            Self::load(&implicit).await
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("traversal:\n  visit-policy: per-entity\n", VisitPolicy::PerEntity)]
    #[case("traversal:\n  visit-policy: per-attribute\n", VisitPolicy::PerAttribute)]
    #[case("{}\n", VisitPolicy::PerEntity)]
    #[case("traversal: {}\n", VisitPolicy::PerEntity)]
    fn test_visit_policy_parsing(#[case] yaml: &str, #[case] expected: VisitPolicy) {
        let config: LineageConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.traversal.visit_policy, expected);
    }

    #[tokio::test]
    async fn test_load_resolves_relative_graph_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "source:\n  graph-file: data/graph.json\n")
            .await
            .unwrap();

        let config = LineageConfig::load(&path).await.unwrap();
        assert_eq!(
            config.source.graph_file,
            Some(temp.path().join("data/graph.json"))
        );
    }

    #[tokio::test]
    async fn test_resolve_defaults_without_file() {
        let temp = TempDir::new().unwrap();
        let config = LineageConfig::resolve(None, temp.path()).await.unwrap();
        assert_eq!(config, LineageConfig::default());
    }

    #[tokio::test]
    async fn test_resolve_explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");
        assert!(LineageConfig::resolve(Some(&missing), temp.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        let config = LineageConfig {
            traversal: TraversalConfig {
                visit_policy: VisitPolicy::PerAttribute,
            },
            source: SourceConfig {
                graph_file: Some(temp.path().join("graph.jsonl")),
            },
        };
        config.save(&path).await.unwrap();
        assert_eq!(LineageConfig::load(&path).await.unwrap(), config);
    }

    #[tokio::test]
    async fn test_invalid_yaml_is_config_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "traversal: [unclosed").await.unwrap();
        assert!(matches!(
            LineageConfig::load(&path).await,
            Err(Error::Config(_))
        ));
    }
}
