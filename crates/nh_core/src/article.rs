use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One harvested news item plus its identity fingerprint.
///
/// Records are built once at collection time and not mutated afterwards.
/// Reconstructing a record from persisted data goes through serde, which
/// keeps the stored `fingerprint` and `collected_at` verbatim instead of
/// recomputing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_date: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub collected_at: DateTime<Utc>,
    pub fingerprint: String,
}

impl ArticleRecord {
    pub fn new(
        title: &str,
        url: &str,
        source: &str,
        published_date: Option<String>,
        summary: Option<String>,
        content: Option<String>,
    ) -> Self {
        let title = title.trim().to_string();
        let fingerprint = fingerprint(&title, url, source);
        Self {
            title,
            url: url.to_string(),
            source: source.to_string(),
            published_date,
            summary,
            content,
            collected_at: Utc::now(),
            fingerprint,
        }
    }
}

impl std::fmt::Display for ArticleRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.title, self.source)
    }
}

/// Deterministic identity derived from title, url and source.
///
/// Not a content hash: summary and content edits after collection do not
/// change a record's identity.
pub fn fingerprint(title: &str, url: &str, source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(url.as_bytes());
    hasher.update(source.as_bytes());
    hex::encode(hasher.finalize())
}
