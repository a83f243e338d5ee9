use chrono::{DateTime, Local};

pub mod csv;
pub mod html;

/// Collection outputs share this prefix; the latest-file lookup keys on it.
pub const COLLECTION_FILE_PREFIX: &str = "news_collection_";

pub const SUMMARY_FILE_PREFIX: &str = "daily_summary_";

pub(crate) fn collection_file_stem(now: DateTime<Local>) -> String {
    format!("{}{}", COLLECTION_FILE_PREFIX, now.format("%Y%m%d_%H%M%S"))
}

pub(crate) fn summary_file_name(now: DateTime<Local>) -> String {
    format!("{}{}.json", SUMMARY_FILE_PREFIX, now.format("%Y%m%d"))
}
