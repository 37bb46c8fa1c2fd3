use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pathfinder_core::catalog::{parse_catalog_str, Catalog};
use pathfinder_core::matcher::match_courses;
use pathfinder_core::model::Course;
use pathfinder_core::normalizer::normalize_results;
use pathfinder_core::store::MemoryStore;
use pathfinder_core::{EngineConfig, QuizRegistry, RecommendationEngine};
use serde_json::json;

fn full_store() -> MemoryStore {
    MemoryStore::new()
        .with(
            "energy-quiz-state",
            json!({"scores": {"clarity": 3, "drive": 9, "grounding": 5}, "dominant": "drive"}),
        )
        .with("archetype-quiz-completed", json!(true))
        .with(
            "archetype-quiz-result",
            json!({"archetype": "warrior", "answers": {"q1": "warrior", "q2": "seeker", "q3": "warrior"}}),
        )
}

/// The built-in courses repeated with unique ids.
fn large_catalog(copies: usize) -> Vec<Course> {
    let Ok(base) = Catalog::builtin() else {
        return Vec::new();
    };
    (0..copies)
        .flat_map(|i| {
            base.courses.iter().map(move |c| Course {
                id: format!("{}-{i}", c.id),
                ..c.clone()
            })
        })
        .collect()
}

fn bench_match_courses(c: &mut Criterion) {
    let registry = QuizRegistry::with_builtin_quizzes();
    let results = normalize_results(&registry, &full_store());
    let mut group = c.benchmark_group("match_courses");

    for copies in [1, 25, 125] {
        let courses = large_catalog(copies);
        group.bench_function(format!("{} courses", courses.len()), |b| {
            b.iter(|| match_courses(black_box(&registry), black_box(&results), &courses))
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let registry = QuizRegistry::with_builtin_quizzes();
    let store = full_store();
    c.bench_function("normalize_results", |b| {
        b.iter(|| normalize_results(black_box(&registry), &store))
    });
}

fn bench_generate(c: &mut Criterion) {
    let engine = RecommendationEngine::new(
        QuizRegistry::with_builtin_quizzes(),
        Arc::new(full_store()),
        Arc::new(Catalog::builtin().unwrap()),
        EngineConfig::default(),
    );
    c.bench_function("generate", |b| b.iter(|| black_box(engine.generate())));
}

fn bench_parse_catalog(c: &mut Criterion) {
    let toml: String = (0..100)
        .map(|i| {
            format!(
                "[[courses]]\nid = \"course-{i}\"\ntitle = \"Course {i}\"\ndescription = \"Meditation and breath\"\nfeatures = [\"Audio\"]\n\n"
            )
        })
        .collect();
    c.bench_function("parse_catalog_100_courses", |b| {
        b.iter(|| parse_catalog_str(black_box(&toml), std::path::Path::new("bench.toml")))
    });
}

criterion_group!(
    benches,
    bench_match_courses,
    bench_normalize,
    bench_generate,
    bench_parse_catalog
);
criterion_main!(benches);
