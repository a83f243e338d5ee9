pub mod outputs;
pub mod store;
pub mod transport;

pub use outputs::{COLLECTION_FILE_PREFIX, SUMMARY_FILE_PREFIX};
pub use store::FileReportStore;
pub use transport::LoggingTransport;
