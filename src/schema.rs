use crate::normalize::{normalize_label, parse_amount, parse_date};
use crate::{DailySeries, RankedEntry};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Fallback label for unresolvable counterparties and payment methods.
pub const UNKNOWN_LABEL: &str = "N/A";

/// Fallback label for a sale with no resolvable salesperson.
pub const SALESPERSON_FALLBACK: &str = "Admin";

/// One sale or purchase event, as delivered by the remote store.
///
/// Upstream documents are loosely shaped: amounts arrive as numbers or
/// punctuated strings, timestamps in several encodings, counterparties as
/// either a plain string or an object with a `name` field. The raw shapes
/// are kept as [`Value`]s and coerced through the accessors, so a malformed
/// field degrades that one value instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionRecord {
    pub id: String,
    pub created_at: Value,
    pub total_amount: Value,
    pub payment_breakdown: Option<BTreeMap<String, Value>>,
    pub payment_method: Option<String>,
    pub items: Vec<LineItem>,
    pub customer: Value,
    pub salesperson: Value,
}

impl TransactionRecord {
    /// Canonical amount; missing or invalid input coerces to zero.
    pub fn amount(&self) -> f64 {
        parse_amount(&self.total_amount)
    }

    /// Canonical timestamp, or `None` when no timestamp shape matches.
    pub fn occurred_at(&self) -> Option<NaiveDateTime> {
        parse_date(&self.created_at)
    }

    pub fn customer_name(&self) -> String {
        party_name(&self.customer).unwrap_or_else(|| UNKNOWN_LABEL.to_string())
    }

    pub fn salesperson_name(&self) -> String {
        party_name(&self.salesperson).unwrap_or_else(|| SALESPERSON_FALLBACK.to_string())
    }

    /// Payment-method contributions for this record.
    ///
    /// A record carrying a method -> amount breakdown yields one contribution
    /// per positive entry, under normalized labels. Without a breakdown the
    /// whole amount falls back to the single `payment_method` field
    /// ("N/A" when that is absent too).
    pub fn payment_contributions(&self) -> Vec<(String, f64)> {
        match &self.payment_breakdown {
            Some(breakdown) => breakdown
                .iter()
                .map(|(method, sub)| (normalize_label(method), parse_amount(sub)))
                .filter(|(_, amount)| *amount > 0.0)
                .collect(),
            None => {
                let label = self
                    .payment_method
                    .as_deref()
                    .map(str::trim)
                    .filter(|method| !method.is_empty())
                    .map(normalize_label)
                    .unwrap_or_else(|| UNKNOWN_LABEL.to_string());
                vec![(label, self.amount())]
            }
        }
    }
}

fn party_name(value: &Value) -> Option<String> {
    match value {
        Value::String(name) => {
            let trimmed = name.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Object(map) => map
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from),
        _ => None,
    }
}

/// One line item of a sale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineItem {
    pub name: String,
    pub quantity: Value,
    pub price: Value,
    pub total: Value,
}

impl LineItem {
    /// Contribution amount: the explicit line total when present and
    /// non-zero, otherwise quantity * unit price. A missing or zero
    /// quantity counts as 1.
    pub fn contribution(&self) -> f64 {
        let explicit = parse_amount(&self.total);
        if explicit != 0.0 {
            return explicit;
        }

        let quantity = match parse_amount(&self.quantity) {
            q if q == 0.0 => 1.0,
            q => q,
        };
        quantity * parse_amount(&self.price)
    }
}

/// A user row from the tenant's roster, used for the salesperson
/// allowlist filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    pub name: String,
    pub role: String,
}

/// The fully computed dashboard result for one tenant and date range.
///
/// Produced by a single aggregation pass, cached as-is, and handed to
/// presentation code behind `Arc`; never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub total_sales: f64,
    pub order_count: u64,
    pub comparison_total: f64,
    pub change_percent: f64,
    /// Day buckets over [comparison start, current end]; pre-seeded, so
    /// the series has an entry for every calendar day in that window.
    pub daily: DailySeries,
    pub top_payment_methods: Vec<RankedEntry>,
    pub top_items: Vec<RankedEntry>,
    pub top_customers: Vec<RankedEntry>,
    pub top_salespeople: Vec<RankedEntry>,
}
