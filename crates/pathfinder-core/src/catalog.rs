//! TOML catalog parser.
//!
//! Loads course and book catalogs from TOML files and directories, and
//! validates them against the registered quizzes.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::books::FOUNDATIONAL_TITLES;
use crate::model::{Book, BookCategory, Course, Difficulty};
use crate::registry::QuizRegistry;
use crate::traits::CatalogSource;

/// TOML source of the catalog compiled into the library.
pub const BUILTIN_CATALOG: &str = include_str!("../data/catalog.toml");

/// Courses and books the engine scores against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub courses: Vec<Course>,
    pub books: Vec<Book>,
}

impl Catalog {
    /// The catalog compiled into the library.
    pub fn builtin() -> Result<Self> {
        parse_catalog_str(BUILTIN_CATALOG, Path::new("<builtin>"))
    }

    /// Append another catalog's entries after this one's.
    pub fn extend(&mut self, other: Catalog) {
        self.courses.extend(other.courses);
        self.books.extend(other.books);
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty() && self.books.is_empty()
    }
}

impl CatalogSource for Catalog {
    fn courses(&self) -> &[Course] {
        &self.courses
    }

    fn books(&self) -> &[Book] {
        &self.books
    }
}

/// Intermediate TOML structure for parsing catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    #[serde(default)]
    courses: Vec<TomlCourse>,
    #[serde(default)]
    books: Vec<TomlBook>,
}

#[derive(Debug, Deserialize)]
struct TomlCourse {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    features: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TomlBook {
    title: String,
    author: String,
    category: String,
    #[serde(default = "default_difficulty")]
    difficulty: String,
}

fn default_difficulty() -> String {
    "beginner".to_string()
}

/// Parse a single TOML file into a `Catalog`.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `Catalog` (useful for testing).
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let courses = parsed
        .courses
        .into_iter()
        .map(|c| Course {
            id: c.id,
            title: c.title,
            description: c.description,
            features: c.features,
        })
        .collect();

    let books = parsed
        .books
        .into_iter()
        .map(|b| {
            let category: BookCategory = b
                .category
                .parse()
                .map_err(|e: String| anyhow::anyhow!("book '{}': {}", b.title, e))?;
            let difficulty: Difficulty = b
                .difficulty
                .parse()
                .map_err(|e: String| anyhow::anyhow!("book '{}': {}", b.title, e))?;
            Ok(Book {
                title: b.title,
                author: b.author,
                category,
                difficulty,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Catalog { courses, books })
}

/// Load all `.toml` catalog files under a directory, merged in path order.
pub fn load_catalog_directory(dir: &Path) -> Result<Catalog> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    let mut catalog = Catalog::default();
    for path in entries {
        if path.is_dir() {
            catalog.extend(load_catalog_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_catalog(&path) {
                Ok(part) => catalog.extend(part),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(catalog)
}

/// Load a catalog from a file or a directory.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if path.is_dir() {
        load_catalog_directory(path)
    } else {
        parse_catalog(path)
    }
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The course id or book title (if applicable).
    pub subject: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a catalog for common issues.
pub fn validate_catalog(catalog: &Catalog, registry: &QuizRegistry) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate course ids
    let mut seen_ids = HashSet::new();
    for course in &catalog.courses {
        if !seen_ids.insert(course.id.as_str()) {
            warnings.push(ValidationWarning {
                subject: Some(course.id.clone()),
                message: format!("duplicate course ID: {}", course.id),
            });
        }
    }

    // Empty titles
    for course in &catalog.courses {
        if course.title.trim().is_empty() {
            warnings.push(ValidationWarning {
                subject: Some(course.id.clone()),
                message: "course title is empty".into(),
            });
        }
    }

    // Courses with nothing to match against besides the title
    for course in &catalog.courses {
        if course.description.trim().is_empty() && course.features.is_empty() {
            warnings.push(ValidationWarning {
                subject: Some(course.id.clone()),
                message: "course has no description or features; only the title will be matched"
                    .into(),
            });
        }
    }

    // Duplicate book titles
    let mut seen_titles = HashSet::new();
    for book in &catalog.books {
        if !seen_titles.insert(book.title.to_lowercase()) {
            warnings.push(ValidationWarning {
                subject: Some(book.title.clone()),
                message: format!("duplicate book title: {}", book.title),
            });
        }
    }

    // Titles the recommender may ask for but the catalog lacks
    let mut referenced: Vec<&str> = FOUNDATIONAL_TITLES.to_vec();
    for quiz in registry.list() {
        referenced.extend(registry.strategy_for(&quiz.id).referenced_books());
    }
    let mut reported = HashSet::new();
    for title in referenced {
        if catalog.find_book(title).is_none() && reported.insert(title) {
            warnings.push(ValidationWarning {
                subject: Some(title.to_string()),
                message: format!("book '{title}' is recommended by a quiz but missing from the catalog"),
            });
        }
    }

    if catalog.courses.is_empty() {
        warnings.push(ValidationWarning {
            subject: None,
            message: "catalog has no courses; course recommendations will be empty".into(),
        });
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SMALL_CATALOG: &str = r#"
[[courses]]
id = "breath"
title = "Breath Basics"
description = "Calm breathing"
features = ["Audio"]

[[books]]
title = "The Bhagavad Gita"
author = "Easwaran"
category = "scripture"
difficulty = "beginner"
"#;

    #[test]
    fn parse_valid_toml() {
        let catalog = parse_catalog_str(SMALL_CATALOG, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(catalog.courses.len(), 1);
        assert_eq!(catalog.courses[0].features, vec!["Audio"]);
        assert_eq!(catalog.books[0].category, BookCategory::Scripture);
        assert_eq!(catalog.books[0].difficulty, Difficulty::Beginner);
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[[courses]]
id = "c1"
title = "Course"

[[books]]
title = "Book"
author = "Someone"
category = "practice"
"#;
        let catalog = parse_catalog_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert!(catalog.courses[0].description.is_empty());
        assert_eq!(catalog.books[0].difficulty, Difficulty::Beginner);
    }

    #[test]
    fn parse_unknown_category_fails() {
        let toml = r#"
[[books]]
title = "Book"
author = "Someone"
category = "poetry"
"#;
        let err = parse_catalog_str(toml, &PathBuf::from("test.toml")).unwrap_err();
        assert!(err.to_string().contains("poetry"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_catalog_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn builtin_catalog_is_complete() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.courses.len(), 8);
        assert_eq!(catalog.books.len(), 7);
        let registry = QuizRegistry::with_builtin_quizzes();
        let warnings = validate_catalog(&catalog, &registry);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn validate_duplicates_and_missing_books() {
        let toml = r#"
[[courses]]
id = "same"
title = "First"
description = "x"

[[courses]]
id = "same"
title = "Second"

[[books]]
title = "I Am That"
author = "Nisargadatta"
category = "philosophy"

[[books]]
title = "i am that"
author = "Nisargadatta"
category = "philosophy"
"#;
        let catalog = parse_catalog_str(toml, &PathBuf::from("test.toml")).unwrap();
        let registry = QuizRegistry::with_builtin_quizzes();
        let warnings = validate_catalog(&catalog, &registry);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate course ID")));
        assert!(warnings.iter().any(|w| w.message.contains("duplicate book title")));
        assert!(warnings.iter().any(|w| w.message.contains("no description")));
        assert!(warnings
            .iter()
            .any(|w| w.subject.as_deref() == Some("The Bhagavad Gita")));
        // Each missing title is reported once even if several quizzes use it.
        let light_on_yoga = warnings
            .iter()
            .filter(|w| w.subject.as_deref() == Some("Light on Yoga"))
            .count();
        assert_eq!(light_on_yoga, 1);
    }

    #[test]
    fn load_directory_merges_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.toml"),
            "[[courses]]\nid = \"second\"\ntitle = \"Second\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("a.toml"), SMALL_CATALOG).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not [valid").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = load_catalog(dir.path()).unwrap();
        let ids: Vec<&str> = catalog.courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["breath", "second"]);
        assert_eq!(catalog.books.len(), 1);
    }

    #[test]
    fn load_missing_path_fails() {
        assert!(load_catalog(Path::new("/definitely/not/here.toml")).is_err());
        assert!(load_catalog_directory(Path::new("/definitely/not/here")).is_err());
    }
}
