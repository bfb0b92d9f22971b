use crate::error::{DashboardError, Result};
use crate::remote::types::DocumentList;
use crate::schema::{TransactionRecord, UserRecord};
use crate::store::TransactionStore;
use crate::utils::epoch_millis;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::de::DeserializeOwned;

/// [`TransactionStore`] backed by the platform's REST document endpoints.
///
/// Transactions are range-filtered server-side on the timestamp field
/// (epoch milliseconds); normalization, aggregation and caching all
/// happen on the caller's side. Failed requests surface once as
/// a [`DashboardError::Store`] and are never retried automatically; the
/// user triggers the next attempt through a refresh.
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DashboardError::Store(format!(
                "request to {url} failed (status {status}): {body}"
            )));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TransactionStore for RestStore {
    async fn fetch_transactions(
        &self,
        tenant_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<TransactionRecord>> {
        let url = format!(
            "{}/tenants/{}/transactions?start={}&end={}",
            self.base_url,
            tenant_id,
            epoch_millis(start),
            epoch_millis(end)
        );

        let list: DocumentList<TransactionRecord> = self.get_json(&url).await?;
        Ok(list.documents)
    }

    async fn fetch_users(&self, tenant_id: &str) -> Result<Vec<UserRecord>> {
        let url = format!("{}/tenants/{}/users", self.base_url, tenant_id);

        let list: DocumentList<UserRecord> = self.get_json(&url).await?;
        Ok(list.documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let store = RestStore::new("https://store.example.com/v1/", "key");
        assert_eq!(store.base_url, "https://store.example.com/v1");
    }
}
