//! Pathfinder configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::EngineConfig;
use crate::model::QuizMetadata;

/// Top-level pathfinder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathfinderConfig {
    /// JSON file holding stored quiz state.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    /// Catalog file or directory. The built-in catalog is used when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default = "default_max_courses")]
    pub max_courses: usize,
    #[serde(default = "default_max_books")]
    pub max_books: usize,
    /// Extra quizzes registered at start-up.
    #[serde(default)]
    pub quizzes: Vec<QuizConfig>,
}

fn default_max_courses() -> usize {
    EngineConfig::default().max_courses
}
fn default_max_books() -> usize {
    EngineConfig::default().max_books
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            catalog_path: None,
            max_courses: default_max_courses(),
            max_books: default_max_books(),
            quizzes: Vec::new(),
        }
    }
}

impl PathfinderConfig {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            max_courses: self.max_courses,
            max_books: self.max_books,
        }
    }

    /// Metadata for every `[[quizzes]]` entry.
    pub fn quiz_metadata(&self) -> Vec<QuizMetadata> {
        self.quizzes.iter().map(QuizConfig::to_metadata).collect()
    }
}

/// A `[[quizzes]]` entry.
///
/// `storage_key` sets both store keys; `completion_key` and `result_key`
/// override it individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub storage_key: Option<String>,
    #[serde(default)]
    pub completion_key: Option<String>,
    #[serde(default)]
    pub result_key: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl QuizConfig {
    pub fn to_metadata(&self) -> QuizMetadata {
        let storage_key = self
            .storage_key
            .clone()
            .unwrap_or_else(|| format!("{}-quiz-state", self.id));
        let mut meta = QuizMetadata::new(&self.id, &self.name, &storage_key, self.priority)
            .with_description(&self.description);
        meta.tags = self.tags.iter().map(|t| t.to_lowercase()).collect();
        if let Some(key) = &self.completion_key {
            meta.completion_key = key.clone();
        }
        if let Some(key) = &self.result_key {
            meta.result_key = key.clone();
        }
        meta
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables resolve to the empty string.
pub fn resolve_env_vars(s: &str) -> String {
    substitute_vars(s, |name| std::env::var(name).ok())
}

/// One left-to-right pass; substituted values are not rescanned.
fn substitute_vars(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(&lookup(&rest[start + 2..start + 2 + len]).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }
    out.push_str(rest);
    out
}

fn resolve_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(resolve_env_vars(s)),
        None => path.to_path_buf(),
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `pathfinder.toml` in the current directory
/// 2. `~/.config/pathfinder/config.toml`
///
/// Environment variable overrides: `PATHFINDER_STORE`, `PATHFINDER_CATALOG`.
pub fn load_config_from(path: Option<&Path>) -> Result<PathfinderConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("pathfinder.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config(&path)?
        }
        None => PathfinderConfig::default(),
    };

    Ok(apply_overrides(config, |name| std::env::var(name).ok()))
}

/// Parse a single config file without applying overrides.
pub fn parse_config(path: &Path) -> Result<PathfinderConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<PathfinderConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Apply `PATHFINDER_*` overrides from `lookup`, then resolve `${VAR}`
/// references in the paths.
pub fn apply_overrides(
    mut config: PathfinderConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> PathfinderConfig {
    if let Some(store) = lookup("PATHFINDER_STORE").filter(|s| !s.is_empty()) {
        config.store_path = Some(PathBuf::from(store));
    }
    if let Some(catalog) = lookup("PATHFINDER_CATALOG").filter(|s| !s.is_empty()) {
        config.catalog_path = Some(PathBuf::from(catalog));
    }

    config.store_path = config.store_path.as_deref().map(resolve_path);
    config.catalog_path = config.catalog_path.as_deref().map(resolve_path);
    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("pathfinder"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_PATHFINDER_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_PATHFINDER_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_PATHFINDER_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no_vars"), "no_vars");
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_PATHFINDER_TEST_VAR");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let lookup = |name: &str| match name {
            "LOOP" => Some("${LOOP}!".to_string()),
            "HOME" => Some("/home/me".to_string()),
            _ => None,
        };
        assert_eq!(substitute_vars("a${LOOP}b", lookup), "a${LOOP}!b");
        assert_eq!(
            substitute_vars("${HOME}/${MISSING}x/${HOME}", lookup),
            "/home/me/x//home/me"
        );
        assert_eq!(substitute_vars("tail ${open", lookup), "tail ${open");
    }

    #[test]
    fn default_config() {
        let config = PathfinderConfig::default();
        assert_eq!(config.max_courses, 3);
        assert_eq!(config.max_books, 2);
        assert!(config.store_path.is_none());
        assert_eq!(config.engine_config(), EngineConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
store_path = "state/store.json"
catalog_path = "catalog"
max_courses = 5

[[quizzes]]
id = "dosha"
name = "Dosha Quiz"
priority = 0
tags = ["Ayurveda"]

[[quizzes]]
id = "chakra"
name = "Chakra Quiz"
completion_key = "chakra-done"
result_key = "chakra-result"
priority = 3
"#;
        let config: PathfinderConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_courses, 5);
        assert_eq!(config.max_books, 2);
        assert_eq!(config.store_path, Some(PathBuf::from("state/store.json")));

        let quizzes = config.quiz_metadata();
        assert_eq!(quizzes[0].completion_key, "dosha-quiz-state");
        assert_eq!(quizzes[0].result_key, "dosha-quiz-state");
        assert!(quizzes[0].tags.contains("ayurveda"));
        assert_eq!(quizzes[1].completion_key, "chakra-done");
        assert_eq!(quizzes[1].result_key, "chakra-result");
    }

    #[test]
    fn overrides_win_over_file_values() {
        let config = PathfinderConfig {
            store_path: Some(PathBuf::from("from-file.json")),
            ..Default::default()
        };
        let config = apply_overrides(config, |name| match name {
            "PATHFINDER_STORE" => Some("from-env.json".into()),
            "PATHFINDER_CATALOG" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.store_path, Some(PathBuf::from("from-env.json")));
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn paths_resolve_env_references() {
        std::env::set_var("_PATHFINDER_TEST_DIR", "/srv/pathfinder");
        let config = PathfinderConfig {
            catalog_path: Some(PathBuf::from("${_PATHFINDER_TEST_DIR}/catalog.toml")),
            ..Default::default()
        };
        let config = apply_overrides(config, |_| None);
        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/srv/pathfinder/catalog.toml"))
        );
        std::env::remove_var("_PATHFINDER_TEST_DIR");
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/no/such/pathfinder.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "max_books = 1\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.max_books, 1);
    }
}
