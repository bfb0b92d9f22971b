use crate::cache::SnapshotCache;
use crate::engine::build_snapshot;
use crate::error::{DashboardError, Result};
use crate::period::ReportingPeriod;
use crate::roster::Roster;
use crate::schema::DashboardSnapshot;
use crate::store::TransactionStore;
use log::{debug, info};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    Idle,
    Loading,
    Ready,
    Error,
}

struct Inner {
    state: DashboardState,
    period: ReportingPeriod,
    snapshot: Option<Arc<DashboardSnapshot>>,
    error: Option<String>,
}

/// Coordinates fetch → normalize → aggregate → cache for one tenant and
/// hands read-only snapshots to presentation code.
///
/// A refresh first consults the snapshot cache; on a miss it fetches the
/// combined [comparison start, current end] window plus the user roster,
/// runs the aggregation pass, caches the result and applies it. Every
/// fetch carries a monotonically increasing generation number and only the
/// response matching the latest generation is applied, so a rapid filter
/// change cannot be overwritten by a slower, older response.
///
/// A failed fetch records a user-visible error and leaves the previous
/// snapshot (if any) in place underneath it.
pub struct Dashboard<S> {
    store: S,
    cache: SnapshotCache,
    tenant_id: String,
    inner: Mutex<Inner>,
    generation: AtomicU64,
}

impl<S: TransactionStore> Dashboard<S> {
    pub fn new(
        store: S,
        cache: SnapshotCache,
        tenant_id: impl Into<String>,
        period: ReportingPeriod,
    ) -> Self {
        Self {
            store,
            cache,
            tenant_id: tenant_id.into(),
            inner: Mutex::new(Inner {
                state: DashboardState::Idle,
                period,
                snapshot: None,
                error: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn state(&self) -> DashboardState {
        self.lock().state
    }

    pub fn period(&self) -> ReportingPeriod {
        self.lock().period
    }

    /// The latest applied snapshot. Presentation components receive the
    /// shared handle and never mutate it.
    pub fn snapshot(&self) -> Option<Arc<DashboardSnapshot>> {
        self.lock().snapshot.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Changes the active date filter. Takes effect on the next refresh;
    /// an in-flight refresh for the old filter is superseded by the
    /// generation check once a newer refresh starts.
    pub fn set_period(&self, period: ReportingPeriod) {
        self.lock().period = period;
    }

    /// Serves the cached snapshot when tenant, range and age all match,
    /// otherwise fetches and recomputes.
    pub async fn refresh(&self) -> Result<Arc<DashboardSnapshot>> {
        self.load(false).await
    }

    /// Unconditionally refetches and recomputes, bypassing the cache.
    pub async fn force_refresh(&self) -> Result<Arc<DashboardSnapshot>> {
        self.load(true).await
    }

    async fn load(&self, force: bool) -> Result<Arc<DashboardSnapshot>> {
        let period = self.period();
        let range = period.range_key();

        if !force {
            if let Some(cached) = self.cache.lookup(&self.tenant_id, &range) {
                debug!(
                    "serving cached snapshot for {} ({}..{})",
                    self.tenant_id, range.0, range.1
                );
                let snapshot = Arc::new(cached);
                let mut inner = self.lock();
                inner.snapshot = Some(snapshot.clone());
                inner.state = DashboardState::Ready;
                inner.error = None;
                return Ok(snapshot);
            }
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock().state = DashboardState::Loading;

        let comparison = period.comparison();
        let fetched = async {
            let records = self
                .store
                .fetch_transactions(&self.tenant_id, comparison.start(), period.end())
                .await?;
            let users = self.store.fetch_users(&self.tenant_id).await?;
            Ok::<_, DashboardError>((records, users))
        }
        .await;

        let (records, users) = match fetched {
            Ok(data) => data,
            Err(err) => {
                if self.is_latest(generation) {
                    let mut inner = self.lock();
                    inner.state = DashboardState::Error;
                    inner.error = Some(err.to_string());
                    // previous snapshot stays visible underneath the error
                }
                return Err(err);
            }
        };

        let roster = Roster::from_users(&users);
        let snapshot = Arc::new(build_snapshot(&records, &period, &roster));
        self.cache.store(&self.tenant_id, &range, &snapshot);

        if self.is_latest(generation) {
            let mut inner = self.lock();
            inner.snapshot = Some(snapshot.clone());
            inner.state = DashboardState::Ready;
            inner.error = None;
            drop(inner);
            info!(
                "dashboard refreshed for {}: {} records in {}..{}",
                self.tenant_id,
                records.len(),
                range.0,
                range.1
            );
        } else {
            debug!(
                "discarding superseded refresh #{generation} for {}",
                self.tenant_id
            );
        }

        Ok(snapshot)
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
