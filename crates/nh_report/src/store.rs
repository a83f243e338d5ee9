use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::Local;
use tokio::fs;
use tracing::info;

use nh_core::{ArticleRecord, DailySummary, ReportStore, Result};

use crate::outputs::{self, collection_file_stem, summary_file_name, COLLECTION_FILE_PREFIX};

/// File-backed reporting collaborator. Writes each collection run as CSV,
/// JSON and HTML under one timestamped stem; the JSON artifact is the one
/// records are reconstructed from.
pub struct FileReportStore {
    output_dir: PathBuf,
}

impl FileReportStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl ReportStore for FileReportStore {
    async fn persist(&self, articles: &[ArticleRecord]) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir).await?;
        let stem = collection_file_stem(Local::now());
        let mut written = Vec::new();

        let csv_path = self.output_dir.join(format!("{}.csv", stem));
        fs::write(&csv_path, outputs::csv::to_csv(articles)).await?;
        written.push(csv_path);

        let json_path = self.output_dir.join(format!("{}.json", stem));
        fs::write(&json_path, serde_json::to_string_pretty(articles)?).await?;
        written.push(json_path);

        let html_path = self.output_dir.join(format!("{}.html", stem));
        fs::write(&html_path, outputs::html::render_collection(articles)).await?;
        written.push(html_path);

        for path in &written {
            info!(path = %path.display(), "collection output written");
        }
        Ok(written)
    }

    async fn persist_summary(&self, summary: &DailySummary) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(summary_file_name(Local::now()));
        fs::write(&path, serde_json::to_string_pretty(summary)?).await?;
        info!(path = %path.display(), "daily summary written");
        Ok(path)
    }

    async fn find_latest_collection(&self) -> Result<Option<PathBuf>> {
        let mut entries = match fs::read_dir(&self.output_dir).await {
            Ok(entries) => entries,
            // no output directory yet means no prior collection
            Err(_) => return Ok(None),
        };

        let mut latest: Option<(PathBuf, SystemTime)> = None;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with(COLLECTION_FILE_PREFIX) || !name.ends_with(".json") {
                continue;
            }
            let modified = entry.metadata().await?.modified()?;
            if latest.as_ref().map_or(true, |(_, t)| modified > *t) {
                latest = Some((entry.path(), modified));
            }
        }
        Ok(latest.map(|(path, _)| path))
    }

    async fn load_collection(&self, path: &Path) -> Result<Vec<ArticleRecord>> {
        let raw = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn render_report(&self, summary: &DailySummary) -> String {
        outputs::html::render_summary(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn records() -> Vec<ArticleRecord> {
        vec![
            ArticleRecord::new("Primeira notícia", "http://u1", "A", None, None, None),
            ArticleRecord::new(
                "Segunda notícia",
                "http://u2",
                "B",
                Some("2024-05-01".to_string()),
                Some("um resumo".to_string()),
                None,
            ),
        ]
    }

    #[tokio::test]
    async fn persist_writes_csv_json_and_html() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileReportStore::new(dir.path());

        let written = store.persist(&records()).await.unwrap();
        assert_eq!(written.len(), 3);
        let extensions: Vec<_> = written
            .iter()
            .map(|p| p.extension().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(extensions, vec!["csv", "json", "html"]);
        for path in &written {
            assert!(path.exists());
        }
    }

    #[tokio::test]
    async fn load_preserves_fingerprint_and_collection_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileReportStore::new(dir.path());

        let original = records();
        store.persist(&original).await.unwrap();
        let latest = store.find_latest_collection().await.unwrap().unwrap();
        let restored = store.load_collection(&latest).await.unwrap();

        assert_eq!(restored.len(), original.len());
        for (restored, original) in restored.iter().zip(&original) {
            assert_eq!(restored.fingerprint, original.fingerprint);
            assert_eq!(restored.collected_at, original.collected_at);
        }
    }

    #[tokio::test]
    async fn latest_lookup_picks_the_most_recently_modified_output() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileReportStore::new(dir.path());

        let older = dir.path().join("news_collection_20240101_000000.json");
        fs::write(&older, "[]").await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let newer = dir.path().join("news_collection_20240102_000000.json");
        fs::write(&newer, "[]").await.unwrap();
        // files outside the naming convention are ignored
        tokio::time::sleep(Duration::from_millis(20)).await;
        fs::write(dir.path().join("unrelated.json"), "[]").await.unwrap();
        fs::write(dir.path().join("news_collection_20240103_000000.csv"), "")
            .await
            .unwrap();

        let latest = store.find_latest_collection().await.unwrap().unwrap();
        assert_eq!(latest, newer);
    }

    #[tokio::test]
    async fn missing_output_directory_is_not_an_error() {
        let store = FileReportStore::new("definitely/not/a/real/dir");
        assert!(store.find_latest_collection().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn persist_summary_names_the_file_by_date() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileReportStore::new(dir.path());

        let summary = DailySummary::from_records(&records());
        let path = store.persist_summary(&summary).await.unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("daily_summary_"));
        assert!(name.ends_with(".json"));

        let raw = fs::read_to_string(&path).await.unwrap();
        let restored: DailySummary = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored.total_articles, 2);
    }
}
