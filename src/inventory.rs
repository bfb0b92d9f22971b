use crate::normalize::parse_amount;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// One stock row, with the same loosely-shaped numeric fields as
/// transaction rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryItem {
    pub name: String,
    pub quantity: Value,
    pub restock_level: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestockAlert {
    pub name: String,
    pub quantity: f64,
    pub restock_level: f64,
    pub deficit: f64,
}

/// Items whose on-hand quantity has fallen to or below their restock
/// level, largest deficit first with an ascending name tie-break. Items
/// without a configured restock level never alert.
pub fn restock_alerts(items: &[InventoryItem]) -> Vec<RestockAlert> {
    let mut alerts: Vec<RestockAlert> = items
        .iter()
        .filter_map(|item| {
            let restock_level = parse_amount(&item.restock_level);
            if restock_level <= 0.0 {
                return None;
            }

            let quantity = parse_amount(&item.quantity);
            (quantity <= restock_level).then(|| RestockAlert {
                name: item.name.trim().to_string(),
                quantity,
                restock_level,
                deficit: restock_level - quantity,
            })
        })
        .collect();

    alerts.sort_by(|a, b| {
        b.deficit
            .partial_cmp(&a.deficit)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    alerts
}
