use crate::error::Result;
use crate::schema::{TransactionRecord, UserRecord};
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// The remote document store, seen from the dashboard's side.
///
/// Implementations fetch raw rows for one tenant; all normalization and
/// aggregation stays on this side of the seam. The feature-gated
/// [`crate::remote::RestStore`] talks to the real platform; tests supply
/// in-memory implementations.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Raw transaction rows whose timestamp falls in [start, end].
    async fn fetch_transactions(
        &self,
        tenant_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<TransactionRecord>>;

    /// The tenant's user roster, for the salesperson allowlist.
    async fn fetch_users(&self, tenant_id: &str) -> Result<Vec<UserRecord>>;
}

#[async_trait]
impl<S: TransactionStore + ?Sized> TransactionStore for std::sync::Arc<S> {
    async fn fetch_transactions(
        &self,
        tenant_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<TransactionRecord>> {
        (**self).fetch_transactions(tenant_id, start, end).await
    }

    async fn fetch_users(&self, tenant_id: &str) -> Result<Vec<UserRecord>> {
        (**self).fetch_users(tenant_id).await
    }
}
