//! Parse sales-log CSV exports into typed transactions.
//!
//! Expected header (any column order, extra columns ignored):
//! Employee Name,Shop Name,Order Date,Order Value
//!
//! Order dates are day-month-year (`05-03-2024`).

use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tally_core::Transaction;

use crate::dataset::Dataset;
use crate::error::LoadError;

pub const EMPLOYEE_COLUMN: &str = "Employee Name";
pub const SHOP_COLUMN: &str = "Shop Name";
pub const ORDER_DATE_COLUMN: &str = "Order Date";
pub const ORDER_VALUE_COLUMN: &str = "Order Value";

pub const ORDER_DATE_FORMAT: &str = "%d-%m-%Y";

/// Header positions of the required columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    employee: usize,
    shop: usize,
    order_date: usize,
    order_value: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(LoadError::MissingColumn(name))
        };

        Ok(Self {
            employee: find(EMPLOYEE_COLUMN)?,
            shop: find(SHOP_COLUMN)?,
            order_date: find(ORDER_DATE_COLUMN)?,
            order_value: find(ORDER_VALUE_COLUMN)?,
        })
    }

    fn transaction(&self, record: &StringRecord) -> Option<Transaction> {
        let employee = record.get(self.employee)?.trim();
        let shop = record.get(self.shop)?.trim();
        if employee.is_empty() || shop.is_empty() {
            return None;
        }
        let order_date = parse_order_date(record.get(self.order_date)?)?;
        let order_value = parse_order_value(record.get(self.order_value)?)?;
        Some(Transaction::new(employee, shop, order_date, order_value))
    }
}

/// Parse a day-month-year date; `None` when it does not match.
pub fn parse_order_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ORDER_DATE_FORMAT).ok()
}

/// Parse an order value, tolerating thousands separators.
pub fn parse_order_value(s: &str) -> Option<Decimal> {
    let raw = s.trim().replace(',', "");
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(&raw).ok()
}

/// Read a sales log from any reader. Rows with a bad date, value, or blank
/// name are dropped.
pub fn read_sales_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let columns = Columns::locate(rdr.headers()?)?;

    let mut txns = Vec::new();
    let mut dropped = 0usize;

    for result in rdr.records() {
        let record = result?;
        // Skip blank trailing lines
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        match columns.transaction(&record) {
            Some(txn) => txns.push(txn),
            None => dropped += 1,
        }
    }

    tracing::debug!(kept = txns.len(), dropped, "parsed sales log");
    Ok(Dataset::new(txns))
}

/// Load a sales log CSV file.
pub fn load_sales_csv(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_sales_csv(file)?;
    tracing::info!(
        path = %path.display(),
        transactions = dataset.len(),
        "loaded sales log"
    );
    Ok(dataset)
}
