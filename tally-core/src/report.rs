//! Report output types. Plain data: the presentation layer renders them as-is.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::month::MonthKey;

/// Whether a shop's activity in a month counts as acquisition or retention
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShopCategory {
    /// The month containing the shop's first order
    #[serde(rename = "new")]
    New,
    /// Any month strictly after the shop's first month
    #[serde(rename = "repeated")]
    Repeated,
}

impl ShopCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ShopCategory::New => "new",
            ShopCategory::Repeated => "repeated",
        }
    }
}

/// One month of activity for the selected employee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthRow {
    pub month: MonthKey,
    /// Distinct shops with any order this month
    pub total_distinct_shops: usize,
    /// Sum of every order value this month
    pub total_sales_value: Decimal,
    /// Distinct shops whose first-ever order date falls in this month
    pub new_shop_count: usize,
    /// Value of orders placed on a shop's first-ever order date
    pub new_shop_sales_value: Decimal,
    /// Distinct shops active this month that were first seen in an earlier month
    pub repeated_shop_count: usize,
    /// Value of all orders from those shops this month
    pub repeated_shop_sales_value: Decimal,
}

impl MonthRow {
    /// Empty row for `month`; every count and value starts at zero.
    pub fn zeroed(month: MonthKey) -> Self {
        Self {
            month,
            total_distinct_shops: 0,
            total_sales_value: Decimal::ZERO,
            new_shop_count: 0,
            new_shop_sales_value: Decimal::ZERO,
            repeated_shop_count: 0,
            repeated_shop_sales_value: Decimal::ZERO,
        }
    }

    /// Value that fell into neither category (same month as first order, different day)
    pub fn unclassified_sales_value(&self) -> Decimal {
        self.total_sales_value - self.new_shop_sales_value - self.repeated_shop_sales_value
    }
}

/// Month rows in ascending month order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct MonthlyReport {
    pub rows: Vec<MonthRow>,
}

impl MonthlyReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MonthRow> {
        self.rows.iter()
    }

    pub fn get(&self, month: MonthKey) -> Option<&MonthRow> {
        self.rows
            .binary_search_by(|row| row.month.cmp(&month))
            .ok()
            .map(|i| &self.rows[i])
    }
}

/// A shop's collapsed activity within one month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShopActivity {
    pub month: MonthKey,
    pub shop: String,
    pub category: ShopCategory,
    /// Summed value of the orders counted toward `category`
    pub order_value: Decimal,
    /// Raw number of orders in this month
    pub order_count: usize,
    /// Distinct order dates in this month
    pub order_days: usize,
    /// Orders in the shop's first month that were not on its first order date
    pub excluded_value: Decimal,
}

/// Per-shop rows, grouped by month then shop name
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ShopBreakdown {
    pub rows: Vec<ShopActivity>,
}

impl ShopBreakdown {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ShopActivity> {
        self.rows.iter()
    }

    /// Rows of one category, order preserved
    pub fn by_category(&self, category: ShopCategory) -> impl Iterator<Item = &ShopActivity> {
        self.rows.iter().filter(move |row| row.category == category)
    }

    /// Rows for one month, order preserved
    pub fn for_month(&self, month: MonthKey) -> impl Iterator<Item = &ShopActivity> {
        self.rows.iter().filter(move |row| row.month == month)
    }
}

/// Full result for one employee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalesReport {
    pub employee: String,
    pub monthly: MonthlyReport,
    pub shops: ShopBreakdown,
}
