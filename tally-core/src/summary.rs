//! Derived metrics over a finished monthly report (totals, monthly averages).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::month::MonthKey;
use crate::report::{MonthRow, MonthlyReport};

/// Key performance indicators for a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportSummary {
    pub months: usize,
    pub total_sales: Decimal,
    pub average_monthly_sales: Decimal,
    pub total_new_shop_sales: Decimal,
    pub average_monthly_new_shop_sales: Decimal,
    pub total_repeated_shop_sales: Decimal,
    pub average_monthly_repeated_shop_sales: Decimal,
    /// Shops acquired over the whole period
    pub new_shops_acquired: usize,
}

impl ReportSummary {
    pub fn from_report(report: &MonthlyReport) -> Self {
        let total_sales = sum(report, |r| r.total_sales_value);
        let total_new = sum(report, |r| r.new_shop_sales_value);
        let total_repeated = sum(report, |r| r.repeated_shop_sales_value);

        Self {
            months: report.len(),
            total_sales,
            average_monthly_sales: mean(total_sales, report.len()),
            total_new_shop_sales: total_new,
            average_monthly_new_shop_sales: mean(total_new, report.len()),
            total_repeated_shop_sales: total_repeated,
            average_monthly_repeated_shop_sales: mean(total_repeated, report.len()),
            new_shops_acquired: report.iter().map(|r| r.new_shop_count).sum(),
        }
    }
}

fn sum(report: &MonthlyReport, f: impl Fn(&MonthRow) -> Decimal) -> Decimal {
    report.iter().map(f).sum()
}

fn mean(total: Decimal, n: usize) -> Decimal {
    if n == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(n)
    }
}

/// One bar group of the monthly value chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChartPoint {
    pub month: MonthKey,
    pub total: Decimal,
    pub new: Decimal,
    pub repeated: Decimal,
}

/// Per-month (total, new, repeated) value series
pub fn chart_series(report: &MonthlyReport) -> Vec<ChartPoint> {
    report
        .iter()
        .map(|r| ChartPoint {
            month: r.month,
            total: r.total_sales_value,
            new: r.new_shop_sales_value,
            repeated: r.repeated_shop_sales_value,
        })
        .collect()
}
