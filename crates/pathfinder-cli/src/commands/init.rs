//! The `pathfinder init` command.

use std::path::Path;

use anyhow::Result;

use pathfinder_core::catalog::BUILTIN_CATALOG;

pub fn execute() -> Result<()> {
    write_if_absent(Path::new("pathfinder.toml"), SAMPLE_CONFIG)?;
    write_if_absent(Path::new("catalog.toml"), BUILTIN_CATALOG)?;
    write_if_absent(Path::new("store.json"), SAMPLE_STORE)?;

    println!("\nNext steps:");
    println!("  1. Export your quiz state into store.json");
    println!("  2. Run: pathfinder validate");
    println!("  3. Run: pathfinder recommend");

    Ok(())
}

fn write_if_absent(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# pathfinder configuration

store_path = "store.json"
catalog_path = "catalog.toml"
max_courses = 3
max_books = 2

# Extra quizzes are parsed generically from their stored record:
# { "result": "<label>", "tags": [...], "completed_at": "..." }
#
# [[quizzes]]
# id = "dosha"
# name = "Dosha Quiz"
# storage_key = "dosha-quiz-state"
# priority = 3
# tags = ["ayurveda"]
"#;

const SAMPLE_STORE: &str = r#"{
  "energy-quiz-state": {
    "scores": { "clarity": 4, "drive": 3, "grounding": 8 },
    "dominant": "grounding",
    "completed_at": "2026-01-15T09:30:00Z"
  }
}
"#;
