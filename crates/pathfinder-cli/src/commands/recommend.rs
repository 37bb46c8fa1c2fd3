//! The `pathfinder recommend` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use pathfinder_core::UnifiedRecommendations;

pub fn execute(
    store: Option<PathBuf>,
    catalog: Option<PathBuf>,
    config_path: Option<PathBuf>,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json" | "markdown" | "md"),
        "unknown format '{format}' (expected text, json or markdown)"
    );

    let config = super::resolve_config(config_path, store, catalog)?;
    let engine = super::build_engine(&config)?;
    let bundle = engine.generate();

    let rendered = match format.as_str() {
        "json" => {
            if let Some(path) = &output {
                bundle.save_json(path)?;
                eprintln!("Recommendations written to {}", path.display());
                return Ok(());
            }
            serde_json::to_string_pretty(&bundle)?
        }
        "markdown" | "md" => bundle.to_markdown(),
        _ => render_text(&bundle),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Recommendations written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn render_text(bundle: &UnifiedRecommendations) -> String {
    let mut out = String::new();

    out.push_str(&bundle.analysis);
    out.push('\n');
    if let Some(combined) = &bundle.combined_analysis {
        out.push('\n');
        out.push_str(combined);
        out.push('\n');
    }

    if !bundle.courses.is_empty() {
        out.push_str("\nCourses:\n");
        for (i, c) in bundle.courses.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {} [{}, {:.0}% {}]\n     {}\n",
                i + 1,
                c.course.title,
                c.category,
                c.score * 100.0,
                c.tier,
                c.reason
            ));
        }
    }

    if !bundle.books.is_empty() {
        out.push_str("\nBooks:\n");
        for b in &bundle.books {
            out.push_str(&format!(
                "  - {} by {} ({})\n    {}\n",
                b.title, b.author, b.difficulty, b.reason
            ));
        }
    }

    if let Some(next) = &bundle.next_quiz {
        out.push_str(&format!("\nNext: take the {} ({}).\n", next.name, next.id));
    }

    out
}
