pub mod init;
pub mod quizzes;
pub mod recommend;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use pathfinder_core::catalog::{load_catalog, Catalog};
use pathfinder_core::config::{load_config_from, PathfinderConfig};
use pathfinder_core::store::{JsonFileStore, MemoryStore};
use pathfinder_core::traits::QuizStore;
use pathfinder_core::{QuizRegistry, RecommendationEngine};

/// Built-in quizzes plus any `[[quizzes]]` from the config.
pub fn build_registry(config: &PathfinderConfig) -> QuizRegistry {
    let mut registry = QuizRegistry::with_builtin_quizzes();
    for meta in config.quiz_metadata() {
        registry.register(meta);
    }
    registry
}

/// The catalog at `path`, or the built-in one.
pub fn open_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => load_catalog(path),
        None => Catalog::builtin(),
    }
}

/// The store snapshot at `path`, or an empty store.
pub fn open_store(path: Option<&Path>) -> Result<Arc<dyn QuizStore>> {
    match path {
        Some(path) => {
            let store = JsonFileStore::open(path)?;
            tracing::debug!("loaded {} stored keys from {}", store.len(), path.display());
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("no store configured; treating every quiz as not taken");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Load config and let command-line paths win over config paths.
pub fn resolve_config(
    config_path: Option<PathBuf>,
    store: Option<PathBuf>,
    catalog: Option<PathBuf>,
) -> Result<PathfinderConfig> {
    let mut config = load_config_from(config_path.as_deref())?;
    if store.is_some() {
        config.store_path = store;
    }
    if catalog.is_some() {
        config.catalog_path = catalog;
    }
    Ok(config)
}

pub fn build_engine(config: &PathfinderConfig) -> Result<RecommendationEngine> {
    let catalog = open_catalog(config.catalog_path.as_deref())?;
    let store = open_store(config.store_path.as_deref())?;
    Ok(RecommendationEngine::new(
        build_registry(config),
        store,
        Arc::new(catalog),
        config.engine_config(),
    ))
}
