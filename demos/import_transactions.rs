use anyhow::{bail, Context};
use chrono::NaiveDate;
use sales_dashboard_builder::{build_snapshot, ReportingPeriod, Roster, TransactionRecord};
use serde_json::json;

/// Aggregates a CSV export of transactions into a dashboard snapshot.
///
/// Expected columns: id, created_at, amount, payment_method, customer,
/// salesperson. Run with:
///
/// cargo run --example import_transactions -- sales.csv 2023-06-01 2023-06-30
fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 3 {
        bail!("usage: import_transactions <csv-path> <start-day> <end-day>");
    }

    let start = NaiveDate::parse_from_str(&args[1], "%Y-%m-%d").context("invalid start day")?;
    let end = NaiveDate::parse_from_str(&args[2], "%Y-%m-%d").context("invalid end day")?;
    let period = ReportingPeriod::days(start, end)?;

    let mut reader = csv::Reader::from_path(&args[0])
        .with_context(|| format!("failed to open {}", args[0]))?;

    let mut records: Vec<TransactionRecord> = Vec::new();
    for row in reader.records() {
        let row = row?;
        let raw = json!({
            "id": row.get(0).unwrap_or_default(),
            "createdAt": row.get(1).unwrap_or_default(),
            "totalAmount": row.get(2).unwrap_or_default(),
            "paymentMethod": row.get(3).unwrap_or_default(),
            "customer": row.get(4).unwrap_or_default(),
            "salesperson": row.get(5).unwrap_or_default(),
        });
        records.push(serde_json::from_value(raw)?);
    }

    println!("Imported {} rows from {}", records.len(), args[0]);

    // no roster available offline, so the salesperson ranking stays empty
    let snapshot = build_snapshot(&records, &period, &Roster::empty());

    println!(
        "Total sales {:.2} across {} orders ({:+.1}% vs preceding period)",
        snapshot.total_sales, snapshot.order_count, snapshot.change_percent
    );

    println!("\nTop customers:");
    for entry in &snapshot.top_customers {
        println!("  {:<24} {:>10.2} ({} orders)", entry.label, entry.amount, entry.count);
    }

    println!("\nTop payment methods:");
    for entry in &snapshot.top_payment_methods {
        println!("  {:<24} {:>10.2}", entry.label, entry.amount);
    }

    Ok(())
}
