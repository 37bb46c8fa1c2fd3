//! The `pathfinder quizzes` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub fn execute(store: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::resolve_config(config_path, store, None)?;
    let engine = super::build_engine(&config)?;
    let results = engine.results();

    let mut table = Table::new();
    table.set_header(vec!["Priority", "Quiz", "Name", "Status", "Result", "Completed"]);

    for quiz in engine.registry().list() {
        let result = results.iter().find(|r| r.quiz_id == quiz.id);
        let (status, label, completed) = match result {
            Some(r) => (
                "completed",
                r.label().to_string(),
                r.completed_at
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            None => ("not taken", "-".to_string(), "-".to_string()),
        };
        table.add_row(vec![
            Cell::new(quiz.priority),
            Cell::new(&quiz.id),
            Cell::new(&quiz.name),
            Cell::new(status),
            Cell::new(label),
            Cell::new(completed),
        ]);
    }

    println!("{table}");
    println!(
        "\n{} of {} quizzes completed.",
        results.len(),
        engine.registry().len()
    );

    Ok(())
}
