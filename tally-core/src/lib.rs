//! tally-core: data model and the new/repeated shop attribution engine

pub mod engine;
pub mod month;
pub mod report;
pub mod summary;
pub mod transaction;

pub use engine::{build_report, classify, first_seen_dates, Activity};
pub use month::{MonthKey, ParseMonthKeyError};
pub use report::{MonthRow, MonthlyReport, SalesReport, ShopActivity, ShopBreakdown, ShopCategory};
pub use summary::{chart_series, ChartPoint, ReportSummary};
pub use transaction::Transaction;
