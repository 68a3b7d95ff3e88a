use crate::domain::entities::report::{Report, ReportEntry, TITLE_PLACEHOLDER};
use crate::domain::error::ReportError;
use crate::domain::ports::listing_source::ListingSource;
use crate::domain::values::price::{self, PRICE_PLACEHOLDER};
use crate::domain::values::report_limit::clamp_limit;
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;
use tracing::{debug, error, info};

/// JSON field carrying the rendered result rows.
const MARKUP_FIELD: &str = "results_html";

const ROW_SELECTOR: &str = "a.search_result_row";
const TITLE_SELECTOR: &str = "span.title";
const DISCOUNT_PRICE_SELECTOR: &str = ".search_price_discount_combined";
const PRICE_SELECTOR: &str = ".search_price";

pub struct BuildReportUseCase {
    source: Arc<dyn ListingSource>,
}

impl BuildReportUseCase {
    pub fn new(source: Arc<dyn ListingSource>) -> Self {
        Self { source }
    }

    /// Fetch the listing and build a report of at most `limit` entries.
    /// `limit` is clamped to `[1, 25]`.
    pub async fn execute(&self, limit: i64) -> Result<Report, ReportError> {
        let limit = clamp_limit(limit);

        let body = self.source.fetch().await.map_err(|e| {
            error!(source = self.source.name(), error = %e, "Listing fetch failed");
            e
        })?;

        let report = parse_listing(&body, limit).map_err(|e| {
            match &e {
                ReportError::MalformedResponse { reason, excerpt } => {
                    error!(source = self.source.name(), %reason, "Listing response malformed");
                    error!(body_start = %excerpt, "Received body");
                }
                other => error!(source = self.source.name(), error = %other, "Listing unusable"),
            }
            e
        })?;

        info!(
            source = self.source.name(),
            requested = limit,
            entries = report.entries.len(),
            "Built top-sellers report"
        );
        Ok(report)
    }
}

/// Turn a search-results body into a report. `limit` must already be clamped.
pub fn parse_listing(body: &str, limit: usize) -> Result<Report, ReportError> {
    let envelope: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ReportError::malformed(format!("body is not JSON: {e}"), body))?;

    let markup = envelope
        .get(MARKUP_FIELD)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ReportError::malformed(format!("missing or empty {MARKUP_FIELD}"), body))?;

    let entries = extract_entries(markup, limit);
    if entries.is_empty() {
        return Err(ReportError::EmptyResult);
    }
    Ok(Report::new(limit, entries))
}

fn extract_entries(markup: &str, limit: usize) -> Vec<ReportEntry> {
    let fragment = Html::parse_fragment(markup);
    let row_sel = selector(ROW_SELECTOR);
    let title_sel = selector(TITLE_SELECTOR);
    let discounted_sel = selector(DISCOUNT_PRICE_SELECTOR);
    let plain_sel = selector(PRICE_SELECTOR);

    let entries: Vec<ReportEntry> = fragment
        .select(&row_sel)
        .take(limit)
        .enumerate()
        .map(|(i, row)| {
            let title = row
                .select(&title_sel)
                .next()
                .map(stripped_text)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| TITLE_PLACEHOLDER.to_string());

            let price_display = row
                .select(&discounted_sel)
                .next()
                .or_else(|| row.select(&plain_sel).next())
                .map(|el| price::normalize(&stripped_text(el)))
                .unwrap_or_else(|| PRICE_PLACEHOLDER.to_string());

            ReportEntry {
                rank: i + 1,
                title,
                price_display,
            }
        })
        .collect();

    debug!(rows = entries.len(), "Extracted listing rows");
    entries
}

/// Concatenate trimmed, non-empty text nodes with no separator.
fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).filter(|s| !s.is_empty()).collect()
}

fn selector(css: &str) -> Selector {
    // Selectors are compile-time constants above.
    Selector::parse(css).expect("valid listing selector")
}
