use async_trait::async_trait;
use tracing::{error, info};
use url::Url;

use nh_core::{ArticleRecord, CollectionConfig, Error, Result, SourceConfig};

use crate::fetch::PageFetcher;
use crate::sources::extract::{extract_articles, ListingRules};
use crate::sources::NewsCollector;

/// Path fragments that mark a UOL Tilt news link.
const LINK_PATTERNS: &[&str] = &["/tilt/", "/noticias/", "/colunas/"];

pub struct UolTiltCollector {
    rules: ListingRules,
    fetcher: PageFetcher,
    listing_url: String,
}

impl UolTiltCollector {
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
impl NewsCollector for UolTiltCollector {
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

#[cfg(test)]
mod tests {
    use super::*;
    use nh_core::SourceKind;

    #[test]
    fn accepts_tilt_news_paths() {
        let source = SourceConfig {
            url: "https://www.uol.com.br/tilt/".to_string(),
            name: "UOL Tilt".to_string(),
            kind: SourceKind::UolTilt,
        };
        let collector = UolTiltCollector::new(&source, &CollectionConfig::default()).unwrap();

        let html = r#"
            <a href="/tilt/noticias/2024/05/01/novo-chip.htm">Novo chip promete dobrar a bateria</a>
            <a href="/carros/lancamento-suv.htm">Lançamento do SUV mais vendido do país</a>
        "#;
        let articles = collector.extract(html);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source, "UOL Tilt");
        assert_eq!(
            articles[0].url,
            "https://www.uol.com.br/tilt/noticias/2024/05/01/novo-chip.htm"
        );
    }
}
