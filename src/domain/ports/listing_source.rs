use crate::domain::error::ReportError;
use async_trait::async_trait;

/// Fetches the raw search-results body from the storefront.
/// Implementations own the URL, headers, cookies and timeout.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Name of this source (e.g., "steam")
    fn name(&self) -> &str;

    /// Return the response body, expected to be a JSON envelope holding
    /// the listing markup.
    async fn fetch(&self) -> Result<String, ReportError>;
}
