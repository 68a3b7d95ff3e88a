use chrono::{DateTime, Utc};
use serde::Serialize;

/// Title shown when a listing row has no title element.
pub const TITLE_PLACEHOLDER: &str = "(untitled)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub rank: usize,
    pub title: String,
    pub price_display: String,
}

impl ReportEntry {
    pub fn render(&self) -> String {
        format!("{}. {}\n   price: {}", self.rank, self.title, self.price_display)
    }
}

/// Ranked top-sellers list. Rank is position in the storefront's markup.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// Entry count asked for, after clamping.
    pub requested: usize,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new(requested: usize, entries: Vec<ReportEntry>) -> Self {
        Self {
            generated_at: Utc::now(),
            requested,
            entries,
        }
    }

    pub fn render(&self) -> String {
        let mut text = format!("Steam Top Sellers - Top {}\n{}", self.requested, "-".repeat(20));
        for entry in &self.entries {
            text.push_str("\n\n");
            text.push_str(&entry.render());
        }
        text
    }
}
