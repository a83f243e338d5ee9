pub mod fetch;
pub mod manager;
pub mod sources;

pub use manager::{dedup_records, filter_by_keywords, CollectionManager};
pub use sources::{CollectorKind, NewsCollector};

pub mod prelude {
    pub use super::sources::NewsCollector;
    pub use nh_core::{ArticleRecord, Error, Result};
}
