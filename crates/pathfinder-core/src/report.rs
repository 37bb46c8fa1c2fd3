//! The recommendation bundle with JSON and markdown output.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{BookRecommendation, CourseRecommendation, QuizMetadata};

/// Everything the presentation layer shows after a `generate()` call.
///
/// Recomputed on every request; the engine never stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedRecommendations {
    /// The highest-priority quiz not yet completed.
    pub next_quiz: Option<QuizMetadata>,
    /// Ranked courses, capped.
    pub courses: Vec<CourseRecommendation>,
    /// Books ordered by difficulty, capped.
    pub books: Vec<BookRecommendation>,
    pub analysis: String,
    /// Present only when two or more quizzes are completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combined_analysis: Option<String>,
    pub has_history: bool,
}

impl UnifiedRecommendations {
    /// Save the bundle as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("failed to serialize recommendations")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write recommendations to {}", path.display()))?;
        Ok(())
    }

    /// Load a bundle from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read recommendations from {}", path.display()))?;
        let bundle: UnifiedRecommendations =
            serde_json::from_str(&content).context("failed to parse recommendations JSON")?;
        Ok(bundle)
    }

    /// Format the bundle as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Your Recommendations\n\n");
        md.push_str(&self.analysis);
        md.push_str("\n\n");

        if let Some(combined) = &self.combined_analysis {
            md.push_str("## Combined Analysis\n\n");
            md.push_str(combined);
            md.push_str("\n\n");
        }

        if !self.courses.is_empty() {
            md.push_str("## Courses\n\n");
            md.push_str("| Course | Match | Category | Why |\n");
            md.push_str("|--------|-------|----------|-----|\n");
            for c in &self.courses {
                md.push_str(&format!(
                    "| {} | {:.0}% ({}) | {} | {} |\n",
                    c.course.title,
                    c.score * 100.0,
                    c.tier,
                    c.category,
                    c.reason
                ));
            }
            md.push('\n');
        }

        if !self.books.is_empty() {
            md.push_str("## Books\n\n");
            for b in &self.books {
                md.push_str(&format!(
                    "- **{}** by {} ({}, {}): {}\n",
                    b.title, b.author, b.category, b.difficulty, b.reason
                ));
            }
            md.push('\n');
        }

        match &self.next_quiz {
            Some(quiz) => {
                md.push_str(&format!("**Next step:** take the {}.\n", quiz.name));
            }
            None if self.has_history => {
                md.push_str("You have completed every available quiz.\n");
            }
            None => {}
        }

        md
    }
}
