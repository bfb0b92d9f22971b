//! # Sales Dashboard Builder
//!
//! A library for computing point-of-sale back-office dashboard snapshots
//! from loosely-shaped transaction documents delivered by a remote store.
//!
//! ## Core Concepts
//!
//! - **Normalization**: heterogeneous upstream values (amounts as
//!   punctuated strings, several timestamp encodings, identifier-style
//!   grouping keys) coerce to canonical numbers, dates and labels
//!   silently, so one bad field never aborts a pass.
//! - **Single-pass aggregation**: one fold over the fetched rows produces
//!   a gap-free day-bucket series, grand totals, per-category buckets and
//!   top-5 rankings.
//! - **Comparison period**: an equal-length window ending 1 ms before the
//!   current one drives the percentage-change metrics.
//! - **Stale-while-revalidate cache**: the last snapshot per tenant is
//!   served again while tenant, date range and age still match.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sales_dashboard_builder::*;
//! use chrono::NaiveDate;
//!
//! let period = ReportingPeriod::days(
//!     NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2023, 6, 7).unwrap(),
//! )?;
//!
//! let dashboard = Dashboard::new(
//!     store, // any TransactionStore implementation
//!     SnapshotCache::new(Box::new(DirStore::new(".cache"))),
//!     "tenant-42",
//!     period,
//! );
//!
//! let snapshot = dashboard.refresh().await?;
//! println!("total sales: {:.2}", snapshot.total_sales);
//! ```

pub mod auth;
pub mod cache;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod inventory;
pub mod normalize;
pub mod period;
pub mod roster;
pub mod schema;
pub mod store;
pub mod utils;

#[cfg(feature = "remote")]
pub mod remote;

pub use auth::{friendly_auth_message, PhoneCredential, PhoneVerification};
pub use cache::{
    clear_draft, load_draft, save_draft, CacheEntry, DirStore, KeyValueStore, MemoryStore,
    SnapshotCache,
};
pub use dashboard::{Dashboard, DashboardState};
pub use engine::{build_snapshot, TOP_N};
pub use error::{DashboardError, Result};
pub use inventory::*;
pub use normalize::*;
pub use period::{percentage_change, ReportingPeriod};
pub use roster::Roster;
pub use schema::*;
pub use store::TransactionStore;
pub use utils::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accumulator for one grouping key (a calendar day or a category label).
/// Buckets are only mutated inside a single aggregation pass; every pass
/// starts from empty accumulators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub amount: f64,
    pub count: u64,
}

/// Day-bucketed totals over a window, pre-seeded so the series has no
/// gaps.
pub type DailySeries = BTreeMap<NaiveDate, Bucket>;

/// One row of a top-N ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub label: String,
    pub amount: f64,
    pub count: u64,
}
