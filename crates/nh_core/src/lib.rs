pub mod article;
pub mod config;
pub mod error;
pub mod report;
pub mod summary;

pub use article::{fingerprint, ArticleRecord};
pub use config::{
    AppConfig, CollectionConfig, OutputConfig, ScheduleConfig, SourceConfig, SourceKind,
};
pub use error::Error;
pub use report::{ReportStore, ReportTransport};
pub use summary::{DailySummary, KeywordCount, SourceCount};

pub type Result<T> = std::result::Result<T, Error>;
