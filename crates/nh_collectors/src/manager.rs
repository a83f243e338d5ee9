use std::collections::HashSet;

use tokio::time::sleep;
use tracing::info;

use nh_core::{ArticleRecord, CollectionConfig, Result};

use crate::sources::{CollectorKind, NewsCollector};

/// Runs every registered collector in a fixed order, merges their output
/// and applies deduplication and the keyword relevance filter.
pub struct CollectionManager {
    collectors: Vec<Box<dyn NewsCollector>>,
    config: CollectionConfig,
}

impl CollectionManager {
    /// Build a manager with one collector per configured source, in
    /// configuration order.
    pub fn new(config: CollectionConfig) -> Result<Self> {
        let mut collectors: Vec<Box<dyn NewsCollector>> = Vec::new();
        for source in &config.sources {
            collectors.push(Box::new(CollectorKind::from_config(source, &config)?));
        }
        Ok(Self { collectors, config })
    }

    /// Build a manager over caller-supplied collectors.
    pub fn with_collectors(
        config: CollectionConfig,
        collectors: Vec<Box<dyn NewsCollector>>,
    ) -> Self {
        Self { collectors, config }
    }

    pub fn add_collector(&mut self, collector: Box<dyn NewsCollector>) {
        self.collectors.push(collector);
    }

    /// One full fetch-merge-dedup-filter pass across all sources.
    ///
    /// Sources are visited strictly in registration order with a courtesy
    /// pause between them; a failing source contributes nothing but never
    /// aborts the rest. An empty result is a valid outcome.
    pub async fn collect_all(&self) -> Vec<ArticleRecord> {
        let mut collected = Vec::new();

        for (i, collector) in self.collectors.iter().enumerate() {
            info!(source = collector.source_name(), "collecting source");
            let batch = collector.collect().await;
            collected.extend(batch);

            if i + 1 < self.collectors.len() {
                sleep(self.config.inter_source_delay()).await;
            }
        }

        let total = collected.len();
        let deduped = if self.config.remove_duplicates {
            dedup_records(collected)
        } else {
            collected
        };
        let duplicates_removed = total - deduped.len();

        let unique = deduped.len();
        let retained = filter_by_keywords(deduped, &self.config.keywords);

        info!(
            collected = total,
            duplicates_removed,
            filtered_out = unique - retained.len(),
            retained = retained.len(),
            "collection pass finished"
        );

        retained
    }
}

/// Keep the first occurrence of each fingerprint, preserving encounter
/// order; later duplicates are dropped.
pub fn dedup_records(articles: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| seen.insert(article.fingerprint.clone()))
        .collect()
}

/// Retain records where at least one keyword appears, case-insensitively,
/// in the title or the summary. Records without a summary are matched on
/// the title alone.
pub fn filter_by_keywords(articles: Vec<ArticleRecord>, keywords: &[String]) -> Vec<ArticleRecord> {
    let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    articles
        .into_iter()
        .filter(|article| {
            let title = article.title.to_lowercase();
            let summary = article
                .summary
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_default();
            lowered
                .iter()
                .any(|k| title.contains(k) || summary.contains(k))
        })
        .collect()
}
