use async_trait::async_trait;
use tracing::{error, info};
use url::Url;

use nh_core::{ArticleRecord, CollectionConfig, Error, Result, SourceConfig};

use crate::fetch::PageFetcher;
use crate::sources::extract::{extract_articles, ListingRules};
use crate::sources::NewsCollector;

/// Path fragments that mark a G1 Tecnologia news link.
const LINK_PATTERNS: &[&str] = &["/tecnologia/noticia/", "/tecnologia/", "/noticia/"];

pub struct G1TecnologiaCollector {
    rules: ListingRules,
    fetcher: PageFetcher,
    listing_url: String,
}

impl G1TecnologiaCollector {
    pub fn new(source: &SourceConfig, config: &CollectionConfig) -> Result<Self> {
        let base_url = Url::parse(&source.url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", source.url, e)))?;
        Ok(Self {
            rules: ListingRules {
                source_name: source.name.clone(),
                base_url,
                link_patterns: LINK_PATTERNS,
                min_title_length: config.min_title_length,
                max_articles: config.max_articles_per_source,
            },
            fetcher: PageFetcher::new()?,
            listing_url: source.url.clone(),
        })
    }

    fn extract(&self, html: &str) -> Vec<ArticleRecord> {
        extract_articles(&self.rules, html)
    }
}

#[async_trait]
impl NewsCollector for G1TecnologiaCollector {
    fn source_name(&self) -> &str {
        &self.rules.source_name
    }

    async fn collect(&self) -> Vec<ArticleRecord> {
        let html = match self.fetcher.fetch(&self.listing_url).await {
            Ok(html) => html,
            Err(e) => {
                error!(source = %self.rules.source_name, error = %e, "listing fetch failed");
                return Vec::new();
            }
        };
        let articles = self.extract(&html);
        info!(source = %self.rules.source_name, count = articles.len(), "collected articles");
        articles
    }
}
