use sales_dashboard_builder::remote::RestStore;
use sales_dashboard_builder::{Dashboard, DirStore, ReportingPeriod, SnapshotCache};

/// Runs the dashboard against a live document-store endpoint.
///
/// Requires STORE_BASE_URL, STORE_API_KEY and TENANT_ID in the environment
/// (or a .env file). Run with:
///
/// cargo run --example remote_dashboard --features remote
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let base_url = std::env::var("STORE_BASE_URL").expect("STORE_BASE_URL must be set");
    let api_key = std::env::var("STORE_API_KEY").expect("STORE_API_KEY must be set");
    let tenant_id = std::env::var("TENANT_ID").expect("TENANT_ID must be set");

    let today = chrono::Utc::now().date_naive();
    let week_start = today - chrono::Days::new(6);
    let period = ReportingPeriod::days(week_start, today)?;

    let dashboard = Dashboard::new(
        RestStore::new(base_url, api_key),
        SnapshotCache::new(Box::new(DirStore::new(".dashboard_cache"))),
        tenant_id,
        period,
    );

    let snapshot = dashboard.refresh().await?;

    println!(
        "Total sales {:.2} across {} orders ({:+.1}% vs previous week)",
        snapshot.total_sales, snapshot.order_count, snapshot.change_percent
    );

    println!("\nDaily totals:");
    for (day, bucket) in &snapshot.daily {
        let marker = if *day >= week_start { "" } else { " (comparison)" };
        println!("  {}  {:>9.2}{}", day, bucket.amount, marker);
    }

    println!("\nTop items:");
    for entry in &snapshot.top_items {
        println!("  {:<24} {:>10.2}", entry.label, entry.amount);
    }

    Ok(())
}
