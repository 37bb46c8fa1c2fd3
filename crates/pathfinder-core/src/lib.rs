//! pathfinder-core — Quiz-to-recommendation engine.
//!
//! This crate turns finished personality/energy quiz results into a ranked,
//! deduplicated bundle of course and book recommendations with a short
//! written analysis. Everything is synchronous and in-process; the host
//! supplies a [`traits::QuizStore`] and a [`traits::CatalogSource`].

pub mod books;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod narrator;
pub mod normalizer;
pub mod registry;
pub mod report;
pub mod scoring;
pub mod store;
pub mod strategies;
pub mod traits;

pub use engine::{EngineConfig, RecommendationEngine};
pub use registry::QuizRegistry;
pub use report::UnifiedRecommendations;
