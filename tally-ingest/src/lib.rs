//! tally-ingest: sales-log loading, schema checks, and the dataset cache.

pub mod cache;
pub mod dataset;
pub mod error;
pub mod sales_csv;

pub use cache::DatasetCache;
pub use dataset::Dataset;
pub use error::LoadError;
pub use sales_csv::{load_sales_csv, read_sales_csv};
