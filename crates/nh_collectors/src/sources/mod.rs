use async_trait::async_trait;

use nh_core::{ArticleRecord, CollectionConfig, Result, SourceConfig, SourceKind};

pub mod brazil;
pub mod extract;

use brazil::{FolhaTecCollector, G1TecnologiaCollector, UolTiltCollector};

/// The capability every source collector provides.
#[async_trait]
pub trait NewsCollector: Send + Sync {
    /// Human-readable name of the source.
    fn source_name(&self) -> &str;

    /// Harvest the source's listing page into article records.
    ///
    /// Failures never cross this boundary: a fetch error yields an empty
    /// batch and a broken candidate link is skipped, both logged.
    async fn collect(&self) -> Vec<ArticleRecord>;
}

/// Closed set of collector variants, one per supported source, selected
/// from configuration at startup.
pub enum CollectorKind {
    G1Tecnologia(G1TecnologiaCollector),
    FolhaTec(FolhaTecCollector),
    UolTilt(UolTiltCollector),
}

impl CollectorKind {
    pub fn from_config(source: &SourceConfig, config: &CollectionConfig) -> Result<Self> {
        match source.kind {
            SourceKind::G1Tecnologia => Ok(Self::G1Tecnologia(G1TecnologiaCollector::new(
                source, config,
            )?)),
            SourceKind::FolhaTec => Ok(Self::FolhaTec(FolhaTecCollector::new(source, config)?)),
            SourceKind::UolTilt => Ok(Self::UolTilt(UolTiltCollector::new(source, config)?)),
        }
    }
}

#[async_trait]
impl NewsCollector for CollectorKind {
    fn source_name(&self) -> &str {
        match self {
            Self::G1Tecnologia(c) => c.source_name(),
            Self::FolhaTec(c) => c.source_name(),
            Self::UolTilt(c) => c.source_name(),
        }
    }

    async fn collect(&self) -> Vec<ArticleRecord> {
        match self {
            Self::G1Tecnologia(c) => c.collect().await,
            Self::FolhaTec(c) => c.collect().await,
            Self::UolTilt(c) => c.collect().await,
        }
    }
}
