use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sales_dashboard_builder::{
    Dashboard, MemoryStore, ReportingPeriod, Result, SnapshotCache, TransactionRecord,
    TransactionStore, UserRecord,
};
use serde_json::json;

/// Local stand-in for the remote document store, so the demo runs offline.
struct FixtureStore {
    transactions: Vec<TransactionRecord>,
    users: Vec<UserRecord>,
}

#[async_trait]
impl TransactionStore for FixtureStore {
    async fn fetch_transactions(
        &self,
        _tenant_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<TransactionRecord>> {
        Ok(self
            .transactions
            .iter()
            .filter(|record| {
                record
                    .occurred_at()
                    .map(|at| start <= at && at <= end)
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn fetch_users(&self, _tenant_id: &str) -> Result<Vec<UserRecord>> {
        Ok(self.users.clone())
    }
}

fn fixture_records() -> Vec<TransactionRecord> {
    let raw = json!([
        {
            "id": "sale-1001",
            "createdAt": "2023-06-09T09:15:00Z",
            "totalAmount": "1,250.00",
            "paymentBreakdown": {"creditCard": 1000, "cash": 250},
            "customer": {"name": "Acme Ltd"},
            "salesperson": "Jane",
            "items": [
                {"name": "Espresso Machine", "quantity": 1, "price": "1,100.00"},
                {"name": "Filter Pack", "quantity": 3, "price": 50}
            ]
        },
        {
            "id": "sale-1002",
            "createdAt": "2023-06-12T16:40:00Z",
            "totalAmount": 340.50,
            "paymentMethod": "cash",
            "customer": "Walk-in",
            "salesperson": "Jane",
            "items": [{"name": "Grinder", "total": 340.50}]
        },
        {
            "id": "sale-1003",
            "createdAt": "2023-06-13T11:05:00Z",
            "totalAmount": 89,
            "paymentMethod": "bank_transfer",
            "customer": "Acme Ltd",
            "salesperson": "Marco"
        },
        // previous week, feeds the comparison metrics
        {
            "id": "sale-0940",
            "createdAt": "2023-06-02T10:00:00Z",
            "totalAmount": 610
        },
        {
            "id": "sale-0953",
            "createdAt": "2023-06-05T15:30:00Z",
            "totalAmount": 420
        }
    ]);

    serde_json::from_value(raw).expect("fixture records should deserialize")
}

#[tokio::main]
async fn main() {
    let store = FixtureStore {
        transactions: fixture_records(),
        users: vec![
            UserRecord {
                name: "Jane".to_string(),
                role: "salesman".to_string(),
            },
            UserRecord {
                name: "Marco".to_string(),
                role: "salesman".to_string(),
            },
            UserRecord {
                name: "Pat".to_string(),
                role: "manager".to_string(),
            },
        ],
    };

    let period = ReportingPeriod::days(
        NaiveDate::from_ymd_opt(2023, 6, 8).unwrap(),
        NaiveDate::from_ymd_opt(2023, 6, 14).unwrap(),
    )
    .expect("valid demo period");

    let dashboard = Dashboard::new(
        store,
        SnapshotCache::new(Box::new(MemoryStore::new())),
        "demo-tenant",
        period,
    );

    let snapshot = dashboard.refresh().await.expect("refresh should succeed");

    println!("Sales dashboard for demo-tenant, 2023-06-08 .. 2023-06-14\n");
    println!("Total sales:   {:>10.2}", snapshot.total_sales);
    println!("Orders:        {:>10}", snapshot.order_count);
    println!(
        "vs last week:  {:>+9.1}% (previous total {:.2})",
        snapshot.change_percent, snapshot.comparison_total
    );

    println!("\nDaily series:");
    for (day, bucket) in &snapshot.daily {
        println!("  {}  {:>9.2}  ({} orders)", day, bucket.amount, bucket.count);
    }

    println!("\nTop payment methods:");
    for entry in &snapshot.top_payment_methods {
        println!("  {:<16} {:>9.2}", entry.label, entry.amount);
    }

    println!("\nTop items:");
    for entry in &snapshot.top_items {
        println!("  {:<16} {:>9.2}", entry.label, entry.amount);
    }

    println!("\nTop salespeople:");
    for entry in &snapshot.top_salespeople {
        println!("  {:<16} {:>9.2}", entry.label, entry.amount);
    }

    // the second refresh inside the validity window is served from cache
    let cached = dashboard.refresh().await.expect("cached refresh");
    println!(
        "\nSecond refresh served from cache: {}",
        cached.total_sales == snapshot.total_sales
    );
}
