use crate::period::{percentage_change, ReportingPeriod};
use crate::roster::Roster;
use crate::schema::{DashboardSnapshot, TransactionRecord};
use crate::utils::days_in_range;
use crate::{Bucket, DailySeries, RankedEntry};
use log::debug;
use std::collections::HashMap;

/// Rankings are truncated to the five highest entries.
pub const TOP_N: usize = 5;

/// Folds a list of transaction records into a [`DashboardSnapshot`] in one
/// linear pass.
///
/// The day-bucket series covers [comparison start, current end] and is
/// pre-seeded with every calendar day in that window, so days without
/// transactions stay present as zero buckets and the output series has no
/// gaps. Grand totals and category buckets are restricted to the current
/// window; the comparison window only accumulates its grand total.
///
/// Per-record rules:
/// - an unparseable timestamp drops the record from the pass entirely;
/// - bucket counts increment for every matching record, independent of
///   amount (a zero-amount sale still counts as an order);
/// - salesperson buckets only accrue for names on the roster allowlist.
pub fn build_snapshot(
    records: &[TransactionRecord],
    period: &ReportingPeriod,
    roster: &Roster,
) -> DashboardSnapshot {
    let comparison = period.comparison();

    let mut daily = DailySeries::new();
    for day in days_in_range(comparison.start_day(), period.end_day()) {
        daily.insert(day, Bucket::default());
    }

    let mut total_sales = 0.0;
    let mut order_count = 0u64;
    let mut comparison_total = 0.0;

    let mut payment_methods: HashMap<String, Bucket> = HashMap::new();
    let mut items: HashMap<String, Bucket> = HashMap::new();
    let mut customers: HashMap<String, Bucket> = HashMap::new();
    let mut salespeople: HashMap<String, Bucket> = HashMap::new();

    for record in records {
        let Some(at) = record.occurred_at() else {
            debug!("skipping record {:?}: no parseable timestamp", record.id);
            continue;
        };
        if at < comparison.start() || at > period.end() {
            continue;
        }

        let amount = record.amount();

        if let Some(bucket) = daily.get_mut(&at.date()) {
            bucket.amount += amount;
            bucket.count += 1;
        }

        if comparison.contains(at) {
            comparison_total += amount;
        }

        if period.contains(at) {
            total_sales += amount;
            order_count += 1;

            for (label, sub_amount) in record.payment_contributions() {
                accumulate(&mut payment_methods, label, sub_amount);
            }

            for item in &record.items {
                let name = item.name.trim();
                let label = if name.is_empty() {
                    crate::schema::UNKNOWN_LABEL
                } else {
                    name
                };
                accumulate(&mut items, label.to_string(), item.contribution());
            }

            accumulate(&mut customers, record.customer_name(), amount);

            let salesperson = record.salesperson_name();
            if roster.is_salesman(&salesperson) {
                accumulate(&mut salespeople, salesperson, amount);
            }
        }
    }

    DashboardSnapshot {
        total_sales,
        order_count,
        comparison_total,
        change_percent: percentage_change(total_sales, comparison_total),
        daily,
        top_payment_methods: top_entries(payment_methods),
        top_items: top_entries(items),
        top_customers: top_entries(customers),
        top_salespeople: top_entries(salespeople),
    }
}

fn accumulate(buckets: &mut HashMap<String, Bucket>, label: String, amount: f64) {
    let bucket = buckets.entry(label).or_default();
    bucket.amount += amount;
    bucket.count += 1;
}

/// Converts a category map into its ranking: descending by amount with an
/// explicit ascending tie-break on label, truncated to [`TOP_N`]. The
/// tie-break makes ranking output deterministic regardless of hash order.
fn top_entries(buckets: HashMap<String, Bucket>) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = buckets
        .into_iter()
        .map(|(label, bucket)| RankedEntry {
            label,
            amount: bucket.amount,
            count: bucket.count,
        })
        .collect();

    entries.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });
    entries.truncate(TOP_N);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::UserRecord;
    use chrono::NaiveDate;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(json: serde_json::Value) -> TransactionRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_day_buckets_are_gap_free_and_zero_seeded() {
        let period = ReportingPeriod::days(day(2023, 6, 8), day(2023, 6, 14)).unwrap();
        let snapshot = build_snapshot(&[], &period, &Roster::empty());

        // 7 current days + 7 comparison days
        assert_eq!(snapshot.daily.len(), 14);
        assert!(snapshot.daily.values().all(|b| b.amount == 0.0 && b.count == 0));
        assert_eq!(*snapshot.daily.keys().next().unwrap(), day(2023, 6, 1));
        assert_eq!(*snapshot.daily.keys().last().unwrap(), day(2023, 6, 14));
    }

    #[test]
    fn test_mixed_amount_scenario() {
        let period = ReportingPeriod::days(day(2023, 6, 1), day(2023, 6, 2)).unwrap();
        let records = vec![
            record(json!({"id": "a", "createdAt": "2023-06-01T09:00:00Z", "totalAmount": "1,200.50"})),
            record(json!({"id": "b", "createdAt": "2023-06-01T12:00:00Z", "totalAmount": 0})),
            record(json!({"id": "c", "createdAt": "2023-06-02T15:00:00Z", "totalAmount": 500})),
        ];

        let snapshot = build_snapshot(&records, &period, &Roster::empty());

        assert_eq!(snapshot.total_sales, 1700.50);
        // zero-amount records still count as orders
        assert_eq!(snapshot.order_count, 3);
        assert_eq!(snapshot.daily[&day(2023, 6, 1)].amount, 1200.50);
        assert_eq!(snapshot.daily[&day(2023, 6, 1)].count, 2);
        assert_eq!(snapshot.daily[&day(2023, 6, 2)].amount, 500.0);
    }

    #[test]
    fn test_conservation_over_combined_window() {
        let period = ReportingPeriod::days(day(2023, 6, 3), day(2023, 6, 4)).unwrap();
        let records = vec![
            record(json!({"id": "cur", "createdAt": "2023-06-03T10:00:00Z", "totalAmount": 300})),
            record(json!({"id": "cmp", "createdAt": "2023-06-01T10:00:00Z", "totalAmount": 120})),
            record(json!({"id": "out", "createdAt": "2023-05-20T10:00:00Z", "totalAmount": 999})),
            record(json!({"id": "bad", "totalAmount": 50})),
        ];

        let snapshot = build_snapshot(&records, &period, &Roster::empty());

        let day_sum: f64 = snapshot.daily.values().map(|b| b.amount).sum();
        assert_eq!(day_sum, 420.0);
        assert_eq!(snapshot.total_sales, 300.0);
        assert_eq!(snapshot.comparison_total, 120.0);
        assert_eq!(snapshot.change_percent, 150.0);
    }

    #[test]
    fn test_comparison_records_do_not_reach_category_buckets() {
        let period = ReportingPeriod::single_day(day(2023, 6, 2));
        let records = vec![record(json!({
            "id": "cmp",
            "createdAt": "2023-06-01T10:00:00Z",
            "totalAmount": 80,
            "paymentMethod": "cash",
        }))];

        let snapshot = build_snapshot(&records, &period, &Roster::empty());
        assert!(snapshot.top_payment_methods.is_empty());
        assert_eq!(snapshot.comparison_total, 80.0);
        assert_eq!(snapshot.order_count, 0);
    }

    #[test]
    fn test_rankings_truncate_and_tie_break_deterministically() {
        let period = ReportingPeriod::single_day(day(2023, 6, 1));
        let mut records = Vec::new();
        for (idx, customer) in ["Fay", "Bea", "Cal", "Ada", "Eli", "Dot"].iter().enumerate() {
            records.push(record(json!({
                "id": format!("tx-{idx}"),
                "createdAt": "2023-06-01T10:00:00Z",
                "totalAmount": 10,
                "customer": customer,
            })));
        }

        let snapshot = build_snapshot(&records, &period, &Roster::empty());

        let labels: Vec<&str> = snapshot
            .top_customers
            .iter()
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Ada", "Bea", "Cal", "Dot", "Eli"]);
        assert_eq!(snapshot.top_customers.len(), TOP_N);
    }

    #[test]
    fn test_salesperson_allowlist_filter() {
        let roster = Roster::from_users(&[
            UserRecord {
                name: "Jane".to_string(),
                role: "salesman".to_string(),
            },
            UserRecord {
                name: "Bob".to_string(),
                role: "manager".to_string(),
            },
        ]);

        let period = ReportingPeriod::single_day(day(2023, 6, 1));
        let records = vec![
            record(json!({"id": "1", "createdAt": "2023-06-01T09:00:00Z", "totalAmount": 100, "salesperson": " JANE "})),
            record(json!({"id": "2", "createdAt": "2023-06-01T10:00:00Z", "totalAmount": 200, "salesperson": "Bob"})),
            record(json!({"id": "3", "createdAt": "2023-06-01T11:00:00Z", "totalAmount": 50})),
        ];

        let snapshot = build_snapshot(&records, &period, &roster);

        assert_eq!(snapshot.top_salespeople.len(), 1);
        assert_eq!(snapshot.top_salespeople[0].label, "JANE");
        assert_eq!(snapshot.top_salespeople[0].amount, 100.0);
        // the unfiltered customer ranking still sees all three orders
        assert_eq!(snapshot.order_count, 3);
    }

    #[test]
    fn test_item_contributions() {
        let period = ReportingPeriod::single_day(day(2023, 6, 1));
        let records = vec![record(json!({
            "id": "1",
            "createdAt": "2023-06-01T09:00:00Z",
            "totalAmount": 30,
            "items": [
                {"name": "Latte", "quantity": 2, "price": 5},
                {"name": "Muffin", "total": "12.00"},
                {"name": "Latte", "price": 5},
            ],
        }))];

        let snapshot = build_snapshot(&records, &period, &Roster::empty());

        let latte = snapshot
            .top_items
            .iter()
            .find(|e| e.label == "Latte")
            .unwrap();
        assert_eq!(latte.amount, 15.0);
        assert_eq!(latte.count, 2);

        let muffin = snapshot
            .top_items
            .iter()
            .find(|e| e.label == "Muffin")
            .unwrap();
        assert_eq!(muffin.amount, 12.0);
    }
}
