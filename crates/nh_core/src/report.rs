use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::article::ArticleRecord;
use crate::summary::DailySummary;
use crate::Result;

/// Persistence side of the reporting collaborator.
///
/// The collection core hands finished article sets to an implementation of
/// this trait and never touches the filesystem itself.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist one collection run in every configured representation,
    /// returning the written file locations.
    async fn persist(&self, articles: &[ArticleRecord]) -> Result<Vec<PathBuf>>;

    async fn persist_summary(&self, summary: &DailySummary) -> Result<PathBuf>;

    /// The most recently modified prior collection output, if any.
    async fn find_latest_collection(&self) -> Result<Option<PathBuf>>;

    /// Reconstruct records from a persisted collection. Implementations
    /// must keep the stored fingerprints and collection timestamps so
    /// historical and fresh records stay interchangeable for dedup.
    async fn load_collection(&self, path: &Path) -> Result<Vec<ArticleRecord>>;

    /// Render a summary into the report body handed to the transport.
    fn render_report(&self, summary: &DailySummary) -> String;
}

/// Delivers a rendered report to its recipients. The core supplies the
/// payload and a subject line; retries and addressing live behind this
/// boundary.
#[async_trait]
pub trait ReportTransport: Send + Sync {
    async fn deliver(&self, subject: &str, body: &str) -> Result<()>;
}
