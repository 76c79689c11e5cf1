//! Item catalog: aggregate tooltip files parsed back into searchable records.

pub mod error;
pub mod parser;
pub mod query;
pub mod record;
pub mod store;

pub use error::CatalogError;
pub use parser::{parse_document, split_blocks};
pub use query::Query;
pub use record::CatalogRecord;
pub use store::{CacheFile, CatalogStore, CACHE_VERSION};
