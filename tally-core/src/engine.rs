//! Shop classification and monthly aggregation.
//!
//! For one employee, every shop has a first-seen date (its earliest order).
//! Orders on exactly that date are *new* activity. Orders in any later month
//! are *repeated* activity. Orders later in the first month but not on the
//! first date belong to neither category: they count toward the month's
//! totals only.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

use crate::month::MonthKey;
use crate::report::{MonthRow, MonthlyReport, SalesReport, ShopActivity, ShopBreakdown, ShopCategory};
use crate::transaction::Transaction;

/// How a single order is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    New,
    Repeated,
    /// Same month as the shop's first order, different day
    Excluded,
}

/// Classify an order against its shop's first-seen date.
pub fn classify(order_date: NaiveDate, first_seen: NaiveDate) -> Activity {
    if order_date == first_seen {
        Activity::New
    } else if MonthKey::from_date(order_date) > MonthKey::from_date(first_seen) {
        Activity::Repeated
    } else {
        Activity::Excluded
    }
}

/// Earliest order date per shop.
pub fn first_seen_dates<'a, I>(transactions: I) -> BTreeMap<&'a str, NaiveDate>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut first_seen: BTreeMap<&str, NaiveDate> = BTreeMap::new();
    for txn in transactions {
        first_seen
            .entry(txn.shop.as_str())
            .and_modify(|d| *d = (*d).min(txn.order_date))
            .or_insert(txn.order_date);
    }
    first_seen
}

#[derive(Default)]
struct MonthTally<'a> {
    shops: BTreeSet<&'a str>,
    total: Decimal,
    new_shops: BTreeSet<&'a str>,
    new_value: Decimal,
    repeated_shops: BTreeSet<&'a str>,
    repeated_value: Decimal,
}

struct ShopTally {
    category: ShopCategory,
    value: Decimal,
    excluded: Decimal,
    orders: usize,
    days: BTreeSet<NaiveDate>,
}

/// Build the monthly report and per-shop breakdown for `employee`.
///
/// Returns `None` when the employee has no transactions.
pub fn build_report(transactions: &[Transaction], employee: &str) -> Option<SalesReport> {
    let selected: Vec<&Transaction> = transactions.iter().filter(|t| t.is_for(employee)).collect();
    if selected.is_empty() {
        return None;
    }

    let first_seen = first_seen_dates(selected.iter().copied());

    let mut months: BTreeMap<MonthKey, MonthTally> = BTreeMap::new();
    let mut shops: BTreeMap<(MonthKey, &str), ShopTally> = BTreeMap::new();

    for txn in &selected {
        let shop = txn.shop.as_str();
        let month = txn.month();
        // every selected shop has an entry
        let first = first_seen[shop];
        let activity = classify(txn.order_date, first);

        let tally = months.entry(month).or_default();
        tally.shops.insert(shop);
        tally.total += txn.order_value;
        match activity {
            Activity::New => {
                tally.new_shops.insert(shop);
                tally.new_value += txn.order_value;
            }
            Activity::Repeated => {
                tally.repeated_shops.insert(shop);
                tally.repeated_value += txn.order_value;
            }
            Activity::Excluded => {}
        }

        let row = shops.entry((month, shop)).or_insert_with(|| ShopTally {
            category: if month == MonthKey::from_date(first) {
                ShopCategory::New
            } else {
                ShopCategory::Repeated
            },
            value: Decimal::ZERO,
            excluded: Decimal::ZERO,
            orders: 0,
            days: BTreeSet::new(),
        });
        row.orders += 1;
        row.days.insert(txn.order_date);
        match activity {
            Activity::Excluded => row.excluded += txn.order_value,
            Activity::New | Activity::Repeated => row.value += txn.order_value,
        }
    }

    let monthly = MonthlyReport {
        rows: months
            .into_iter()
            .map(|(month, t)| MonthRow {
                month,
                total_distinct_shops: t.shops.len(),
                total_sales_value: t.total,
                new_shop_count: t.new_shops.len(),
                new_shop_sales_value: t.new_value,
                repeated_shop_count: t.repeated_shops.len(),
                repeated_shop_sales_value: t.repeated_value,
            })
            .collect(),
    };

    let breakdown = ShopBreakdown {
        rows: shops
            .into_iter()
            .map(|((month, shop), t)| ShopActivity {
                month,
                shop: shop.to_string(),
                category: t.category,
                order_value: t.value,
                order_count: t.orders,
                order_days: t.days.len(),
                excluded_value: t.excluded,
            })
            .collect(),
    };

    tracing::debug!(
        employee,
        transactions = selected.len(),
        shops = first_seen.len(),
        months = monthly.len(),
        "built sales report"
    );

    Some(SalesReport {
        employee: employee.to_string(),
        monthly,
        shops: breakdown,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    fn txn(employee: &str, shop: &str, date: NaiveDate, value: Decimal) -> Transaction {
        Transaction::new(employee, shop, date, value)
    }

    #[test]
    fn test_classify() {
        let first = ymd(2024, 1, 5);
        assert_eq!(classify(ymd(2024, 1, 5), first), Activity::New);
        assert_eq!(classify(ymd(2024, 1, 20), first), Activity::Excluded);
        assert_eq!(classify(ymd(2024, 2, 1), first), Activity::Repeated);
        assert_eq!(classify(ymd(2025, 1, 5), first), Activity::Repeated);
    }

    #[test]
    fn test_first_seen_dates() {
        let txns = vec![
            txn("A", "X", ymd(2024, 2, 10), dec!(1)),
            txn("A", "X", ymd(2024, 1, 5), dec!(1)),
            txn("A", "Y", ymd(2024, 3, 1), dec!(1)),
        ];
        let first = first_seen_dates(&txns);
        assert_eq!(first.len(), 2);
        assert_eq!(first["X"], ymd(2024, 1, 5));
        assert_eq!(first["Y"], ymd(2024, 3, 1));
    }

    #[test]
    fn test_two_month_scenario() {
        let txns = vec![
            txn("A", "X", ymd(2024, 1, 5), dec!(100)),
            txn("A", "X", ymd(2024, 2, 10), dec!(50)),
            txn("A", "Y", ymd(2024, 2, 1), dec!(200)),
        ];
        let report = build_report(&txns, "A").unwrap();
        assert_eq!(report.monthly.len(), 2);

        let jan = &report.monthly.rows[0];
        assert_eq!(jan.month, month(2024, 1));
        assert_eq!(jan.total_distinct_shops, 1);
        assert_eq!(jan.total_sales_value, dec!(100));
        assert_eq!((jan.new_shop_count, jan.new_shop_sales_value), (1, dec!(100)));
        assert_eq!((jan.repeated_shop_count, jan.repeated_shop_sales_value), (0, dec!(0)));

        let feb = &report.monthly.rows[1];
        assert_eq!(feb.month, month(2024, 2));
        assert_eq!(feb.total_distinct_shops, 2);
        assert_eq!(feb.total_sales_value, dec!(250));
        assert_eq!((feb.new_shop_count, feb.new_shop_sales_value), (1, dec!(200)));
        assert_eq!((feb.repeated_shop_count, feb.repeated_shop_sales_value), (1, dec!(50)));

        let feb_shops: Vec<_> = report.shops.for_month(month(2024, 2)).collect();
        assert_eq!(feb_shops.len(), 2);
        assert_eq!(feb_shops[0].shop, "X");
        assert_eq!(feb_shops[0].category, ShopCategory::Repeated);
        assert_eq!(feb_shops[1].shop, "Y");
        assert_eq!(feb_shops[1].category, ShopCategory::New);
    }

    #[test]
    fn test_same_day_duplicates_count_once() {
        let txns = vec![
            txn("A", "X", ymd(2024, 3, 12), dec!(30)),
            txn("A", "X", ymd(2024, 3, 12), dec!(20)),
        ];
        let report = build_report(&txns, "A").unwrap();
        let mar = &report.monthly.rows[0];
        assert_eq!(mar.new_shop_count, 1);
        assert_eq!(mar.new_shop_sales_value, dec!(50));
        assert_eq!(mar.total_distinct_shops, 1);

        let row = &report.shops.rows[0];
        assert_eq!(row.order_count, 2);
        assert_eq!(row.order_days, 1);
        assert_eq!(row.order_value, dec!(50));
    }

    #[test]
    fn test_repeated_same_day_duplicates_sum_value() {
        let txns = vec![
            txn("A", "X", ymd(2024, 1, 2), dec!(10)),
            txn("A", "X", ymd(2024, 2, 7), dec!(40)),
            txn("A", "X", ymd(2024, 2, 7), dec!(60)),
        ];
        let report = build_report(&txns, "A").unwrap();
        let feb = report.monthly.get(month(2024, 2)).unwrap();
        assert_eq!(feb.repeated_shop_count, 1);
        assert_eq!(feb.repeated_shop_sales_value, dec!(100));
    }

    #[test]
    fn test_same_month_later_day_is_excluded() {
        let txns = vec![
            txn("A", "X", ymd(2024, 1, 5), dec!(100)),
            txn("A", "X", ymd(2024, 1, 20), dec!(70)),
        ];
        let report = build_report(&txns, "A").unwrap();
        let jan = &report.monthly.rows[0];
        assert_eq!(jan.total_sales_value, dec!(170));
        assert_eq!(jan.new_shop_sales_value, dec!(100));
        assert_eq!(jan.repeated_shop_count, 0);
        assert_eq!(jan.repeated_shop_sales_value, dec!(0));
        assert_eq!(jan.unclassified_sales_value(), dec!(70));

        assert_eq!(report.shops.len(), 1);
        let row = &report.shops.rows[0];
        assert_eq!(row.category, ShopCategory::New);
        assert_eq!(row.order_value, dec!(100));
        assert_eq!(row.excluded_value, dec!(70));
        assert_eq!(row.order_days, 2);
    }

    #[test]
    fn test_single_transaction() {
        let txns = vec![txn("A", "X", ymd(2024, 6, 30), dec!(12.34))];
        let report = build_report(&txns, "A").unwrap();
        assert_eq!(report.monthly.len(), 1);
        let row = &report.monthly.rows[0];
        assert_eq!(row.new_shop_count, 1);
        assert_eq!(row.repeated_shop_count, 0);
        assert_eq!(row.new_shop_sales_value, dec!(12.34));
    }

    #[test]
    fn test_other_employees_ignored() {
        let txns = vec![
            txn("B", "X", ymd(2023, 12, 1), dec!(999)),
            txn("A", "X", ymd(2024, 1, 5), dec!(100)),
            txn("B", "X", ymd(2024, 1, 5), dec!(999)),
        ];
        let report = build_report(&txns, "A").unwrap();
        assert_eq!(report.monthly.len(), 1);
        let jan = &report.monthly.rows[0];
        // B's December order does not make X a repeat shop for A
        assert_eq!(jan.new_shop_count, 1);
        assert_eq!(jan.total_sales_value, dec!(100));
    }

    #[test]
    fn test_unknown_employee_is_empty() {
        let txns = vec![txn("A", "X", ymd(2024, 1, 5), dec!(100))];
        assert!(build_report(&txns, "Z").is_none());
        assert!(build_report(&[], "A").is_none());
    }

    #[test]
    fn test_months_sorted_regardless_of_input_order() {
        let txns = vec![
            txn("A", "X", ymd(2024, 3, 1), dec!(1)),
            txn("A", "Y", ymd(2023, 11, 1), dec!(1)),
            txn("A", "X", ymd(2024, 1, 1), dec!(1)),
        ];
        let report = build_report(&txns, "A").unwrap();
        let months: Vec<String> = report.monthly.iter().map(|r| r.month.to_string()).collect();
        assert_eq!(months, ["2023-11", "2024-01", "2024-03"]);
    }

    #[test]
    fn test_month_with_only_repeated_shops() {
        let txns = vec![
            txn("A", "X", ymd(2024, 1, 5), dec!(10)),
            txn("A", "Y", ymd(2024, 1, 6), dec!(20)),
            txn("A", "X", ymd(2024, 4, 1), dec!(5)),
            txn("A", "Y", ymd(2024, 4, 2), dec!(6)),
        ];
        let report = build_report(&txns, "A").unwrap();
        let apr = report.monthly.get(month(2024, 4)).unwrap();
        assert_eq!(apr.new_shop_count, 0);
        assert_eq!(apr.new_shop_sales_value, Decimal::ZERO);
        assert_eq!(apr.repeated_shop_count, 2);
        assert_eq!(apr.repeated_shop_sales_value, dec!(11));
        assert_eq!(report.shops.by_category(ShopCategory::Repeated).count(), 2);
    }
}
