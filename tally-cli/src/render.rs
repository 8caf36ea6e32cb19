//! Text, JSON, and CSV rendering of finished reports.

use anyhow::{Context, Result};
use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::io::Write;
use tally_core::{
    chart_series, MonthlyReport, ReportSummary, SalesReport, ShopActivity, ShopBreakdown,
    ShopCategory,
};

const CHART_WIDTH: usize = 40;

/// Money with en thousands separators and a fixed number of decimals (1,234.50).
pub fn format_money(value: Decimal, decimals: usize) -> String {
    let rounded = value.round_dp_with_strategy(decimals as u32, RoundingStrategy::MidpointAwayFromZero);
    let abs = rounded.abs();
    let integer = abs.trunc().to_u64().unwrap_or(u64::MAX).to_formatted_string(&Locale::en);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    if decimals == 0 {
        return format!("{sign}{integer}");
    }
    let fraction = format!("{:.decimals$}", abs.fract())
        .split('.')
        .nth(1)
        .map(|f| f.to_string())
        .unwrap_or_default();
    format!("{sign}{integer}.{fraction:0<decimals$}")
}

/// Left-align the first `text_columns` columns, right-align the rest.
fn write_table(
    w: &mut impl Write,
    headers: &[&str],
    rows: &[Vec<String>],
    text_columns: usize,
) -> Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i < text_columns {
                    format!("{:<width$}", c, width = widths[i])
                } else {
                    format!("{:>width$}", c, width = widths[i])
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    writeln!(w, "{}", line(headers.to_vec()))?;
    let rule: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    writeln!(w, "{}", "-".repeat(rule))?;
    for row in rows {
        writeln!(w, "{}", line(row.iter().map(String::as_str).collect()))?;
    }
    Ok(())
}

pub fn write_summary(w: &mut impl Write, summary: &ReportSummary, decimals: usize) -> Result<()> {
    let m = |v| format_money(v, decimals);
    writeln!(w, "Key performance indicators")?;
    writeln!(w, "  Total sales:                    {}", m(summary.total_sales))?;
    writeln!(w, "  Average monthly sales:          {}", m(summary.average_monthly_sales))?;
    writeln!(w, "  Total new shop sales:           {}", m(summary.total_new_shop_sales))?;
    writeln!(w, "  Average monthly new shop sales: {}", m(summary.average_monthly_new_shop_sales))?;
    writeln!(w, "  Total repeated shop sales:      {}", m(summary.total_repeated_shop_sales))?;
    writeln!(
        w,
        "  Average monthly repeated sales: {}",
        m(summary.average_monthly_repeated_shop_sales)
    )?;
    writeln!(w, "  New shops acquired:             {}", summary.new_shops_acquired)?;
    Ok(())
}

pub fn write_monthly_table(w: &mut impl Write, monthly: &MonthlyReport, decimals: usize) -> Result<()> {
    let headers = [
        "Month",
        "Shops",
        "Sales",
        "New shops",
        "New sales",
        "Repeated shops",
        "Repeated sales",
    ];
    let rows: Vec<Vec<String>> = monthly
        .iter()
        .map(|r| {
            vec![
                r.month.to_string(),
                r.total_distinct_shops.to_string(),
                format_money(r.total_sales_value, decimals),
                r.new_shop_count.to_string(),
                format_money(r.new_shop_sales_value, decimals),
                r.repeated_shop_count.to_string(),
                format_money(r.repeated_shop_sales_value, decimals),
            ]
        })
        .collect();
    write_table(w, &headers, &rows, 1)
}

pub fn write_shop_table<'a>(
    w: &mut impl Write,
    rows: impl IntoIterator<Item = &'a ShopActivity>,
    decimals: usize,
) -> Result<()> {
    let headers = ["Month", "Shop", "Category", "Order value", "Orders", "Days", "Excluded"];
    let rows: Vec<Vec<String>> = rows
        .into_iter()
        .map(|r| {
            vec![
                r.month.to_string(),
                r.shop.clone(),
                r.category.label().to_string(),
                format_money(r.order_value, decimals),
                r.order_count.to_string(),
                r.order_days.to_string(),
                format_money(r.excluded_value, decimals),
            ]
        })
        .collect();
    write_table(w, &headers, &rows, 3)
}

/// Horizontal bars of monthly total sales, scaled to the busiest month.
pub fn write_chart(w: &mut impl Write, monthly: &MonthlyReport, decimals: usize) -> Result<()> {
    let series = chart_series(monthly);
    let max = series.iter().map(|p| p.total).max().unwrap_or(Decimal::ZERO);

    writeln!(w, "Monthly sales (new / repeated)")?;
    for p in &series {
        let len = if max > Decimal::ZERO && p.total > Decimal::ZERO {
            (p.total / max * Decimal::from(CHART_WIDTH))
                .round()
                .to_usize()
                .unwrap_or(0)
        } else {
            0
        };
        writeln!(
            w,
            "{} | {:<width$} {} ({} / {})",
            p.month,
            "#".repeat(len),
            format_money(p.total, decimals),
            format_money(p.new, decimals),
            format_money(p.repeated, decimals),
            width = CHART_WIDTH
        )?;
    }
    Ok(())
}

pub fn write_report_table(
    w: &mut impl Write,
    report: &SalesReport,
    decimals: usize,
    chart: bool,
) -> Result<()> {
    let summary = ReportSummary::from_report(&report.monthly);

    writeln!(w, "Sales report for employee: {}\n", report.employee)?;
    write_summary(w, &summary, decimals)?;
    writeln!(w)?;
    write_monthly_table(w, &report.monthly, decimals)?;

    if chart {
        writeln!(w)?;
        write_chart(w, &report.monthly, decimals)?;
    }

    writeln!(w, "\nNew shops and their order values")?;
    write_shop_table(w, report.shops.by_category(ShopCategory::New), decimals)?;
    writeln!(w, "\nRepeated shops and their order values")?;
    write_shop_table(w, report.shops.by_category(ShopCategory::Repeated), decimals)?;
    Ok(())
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    employee: &'a str,
    summary: ReportSummary,
    monthly: &'a MonthlyReport,
    shops: &'a ShopBreakdown,
}

pub fn write_report_json(w: &mut impl Write, report: &SalesReport) -> Result<()> {
    let doc = ReportDocument {
        employee: &report.employee,
        summary: ReportSummary::from_report(&report.monthly),
        monthly: &report.monthly,
        shops: &report.shops,
    };
    serde_json::to_writer_pretty(&mut *w, &doc).context("serialize report")?;
    writeln!(w)?;
    Ok(())
}

pub fn write_shops_json<'a>(
    w: &mut impl Write,
    rows: impl IntoIterator<Item = &'a ShopActivity>,
) -> Result<()> {
    let rows: Vec<&ShopActivity> = rows.into_iter().collect();
    serde_json::to_writer_pretty(&mut *w, &rows).context("serialize shops")?;
    writeln!(w)?;
    Ok(())
}

pub fn write_monthly_csv(w: &mut impl Write, monthly: &MonthlyReport) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    for row in monthly.iter() {
        wtr.serialize(row).context("write monthly row")?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_shops_csv<'a>(
    w: &mut impl Write,
    rows: impl IntoIterator<Item = &'a ShopActivity>,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    for row in rows {
        wtr.serialize(row).context("write shop row")?;
    }
    wtr.flush()?;
    Ok(())
}
