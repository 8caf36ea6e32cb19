//! Transaction records: one order placed by a shop through an employee.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::month::MonthKey;

/// A single normalized order, as supplied by the data source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    /// Salesperson credited with the order
    pub employee: String,
    /// Shop that placed the order
    pub shop: String,
    /// Calendar date of the order
    pub order_date: NaiveDate,
    /// Order value in the dataset's currency
    pub order_value: Decimal,
}

impl Transaction {
    /// Create a new Transaction
    pub fn new(
        employee: impl Into<String>,
        shop: impl Into<String>,
        order_date: NaiveDate,
        order_value: Decimal,
    ) -> Self {
        Self {
            employee: employee.into(),
            shop: shop.into(),
            order_date,
            order_value,
        }
    }

    /// Calendar month the order falls in
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.order_date)
    }

    /// Exact, case-sensitive employee match
    pub fn is_for(&self, employee: &str) -> bool {
        self.employee == employee
    }
}
