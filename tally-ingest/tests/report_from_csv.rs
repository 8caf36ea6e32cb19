use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;
use tally_core::{MonthKey, ReportSummary, ShopCategory};
use tally_ingest::{load_sales_csv, DatasetCache};

fn sales_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("sales.csv")
}

fn month(y: i32, m: u32) -> MonthKey {
    MonthKey::new(y, m).unwrap()
}

#[test]
fn test_fixture_loads_and_drops_malformed_rows() {
    let ds = load_sales_csv(sales_path()).unwrap();
    // 14 rows, one ISO date and one non-numeric value dropped
    assert_eq!(ds.len(), 12);
    assert_eq!(ds.employees(), ["Asha Rao", "Bilal Khan", "Chen Wei"]);
}

#[test]
fn test_monthly_report_from_fixture() {
    let ds = load_sales_csv(sales_path()).unwrap();
    let report = ds.report("Asha Rao").unwrap();
    assert_eq!(report.monthly.len(), 3);

    let jan = report.monthly.get(month(2024, 1)).unwrap();
    assert_eq!(jan.total_distinct_shops, 1);
    assert_eq!(jan.total_sales_value, dec!(100));
    assert_eq!(jan.new_shop_count, 1);
    assert_eq!(jan.repeated_shop_count, 0);

    // Fresh Basket opens with two same-day orders, then orders again mid-month
    let feb = report.monthly.get(month(2024, 2)).unwrap();
    assert_eq!(feb.total_distinct_shops, 2);
    assert_eq!(feb.total_sales_value, dec!(1380.50));
    assert_eq!(feb.new_shop_count, 1);
    assert_eq!(feb.new_shop_sales_value, dec!(1250.50));
    assert_eq!(feb.repeated_shop_count, 1);
    assert_eq!(feb.repeated_shop_sales_value, dec!(50));
    assert_eq!(feb.unclassified_sales_value(), dec!(80));

    let mar = report.monthly.get(month(2024, 3)).unwrap();
    assert_eq!(mar.total_distinct_shops, 2);
    assert_eq!(mar.new_shop_count, 1);
    assert_eq!(mar.new_shop_sales_value, dec!(50));
    assert_eq!(mar.repeated_shop_count, 1);
    assert_eq!(mar.repeated_shop_sales_value, dec!(75));
}

#[test]
fn test_shop_breakdown_from_fixture() {
    let ds = load_sales_csv(sales_path()).unwrap();
    let report = ds.report("Asha Rao").unwrap();

    let fresh_feb = report
        .shops
        .for_month(month(2024, 2))
        .find(|r| r.shop == "Fresh Basket")
        .unwrap();
    assert_eq!(fresh_feb.category, ShopCategory::New);
    assert_eq!(fresh_feb.order_value, dec!(1250.50));
    assert_eq!(fresh_feb.excluded_value, dec!(80));
    assert_eq!(fresh_feb.order_count, 3);
    assert_eq!(fresh_feb.order_days, 2);

    let repeated: Vec<_> = report
        .shops
        .by_category(ShopCategory::Repeated)
        .map(|r| (r.month.to_string(), r.shop.as_str()))
        .collect();
    assert_eq!(
        repeated,
        [
            ("2024-02".to_string(), "Corner Mart"),
            ("2024-03".to_string(), "Fresh Basket"),
        ]
    );
}

#[test]
fn test_summary_from_fixture() {
    let ds = load_sales_csv(sales_path()).unwrap();
    let report = ds.report("Asha Rao").unwrap();
    let summary = ReportSummary::from_report(&report.monthly);
    assert_eq!(summary.total_sales, dec!(1605.50));
    assert_eq!(summary.total_new_shop_sales, dec!(1400.50));
    assert_eq!(summary.total_repeated_shop_sales, dec!(125));
    assert_eq!(summary.new_shops_acquired, 3);
    assert_eq!(
        summary.average_monthly_sales.round_dp(2),
        dec!(535.17)
    );
}

#[test]
fn test_report_spanning_year_boundary() {
    let ds = load_sales_csv(sales_path()).unwrap();
    let report = ds.report("Bilal Khan").unwrap();
    let months: Vec<String> = report.monthly.iter().map(|r| r.month.to_string()).collect();
    assert_eq!(months, ["2023-12", "2024-01"]);

    let dec_row = &report.monthly.rows[0];
    assert_eq!(dec_row.new_shop_count, 2);
    assert_eq!(dec_row.new_shop_sales_value, dec!(460));

    let jan_row = &report.monthly.rows[1];
    assert_eq!(jan_row.new_shop_count, 0);
    assert_eq!(jan_row.new_shop_sales_value, Decimal::ZERO);
    assert_eq!(jan_row.repeated_shop_count, 1);
    assert_eq!(jan_row.repeated_shop_sales_value, dec!(45.25));
}

#[test]
fn test_unknown_employee_from_fixture() {
    let ds = load_sales_csv(sales_path()).unwrap();
    assert!(ds.report("Dana").is_none());
    assert!(ds.report("asha rao").is_none());
}

#[test]
fn test_cache_serves_reports_for_every_employee() {
    let cache = DatasetCache::new(sales_path());
    let ds = cache.get().unwrap();
    for name in ds.employees() {
        let again = cache.get().unwrap();
        assert_eq!(ds.report(name), again.report(name));
        assert!(ds.report(name).is_some());
    }
}
