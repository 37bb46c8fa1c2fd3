//! The `pathfinder validate` command.

use std::path::PathBuf;

use anyhow::Result;

use pathfinder_core::catalog::validate_catalog;

pub fn execute(catalog_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::resolve_config(config_path, None, catalog_path)?;
    let catalog = super::open_catalog(config.catalog_path.as_deref())?;
    let registry = super::build_registry(&config);

    let source = config
        .catalog_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in catalog".to_string());
    println!(
        "Catalog: {} ({} courses, {} books)",
        source,
        catalog.courses.len(),
        catalog.books.len()
    );

    let warnings = validate_catalog(&catalog, &registry);
    for w in &warnings {
        let prefix = w
            .subject
            .as_ref()
            .map(|s| format!("  [{s}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Catalog valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
