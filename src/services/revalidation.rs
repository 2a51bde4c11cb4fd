//! Dashboard revalidation.
//!
//! Mutations mark the dashboard paths whose rendered data they changed. The
//! service remembers when each path last went stale and broadcasts the event
//! to any listening client; with no listeners the mark is simply recorded.

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use utoipa::ToSchema;

pub const DASHBOARD: &str = "/dashboard";
pub const DASHBOARD_EQUIPMENT: &str = "/dashboard/equipment";
pub const DASHBOARD_MAINTENANCE: &str = "/dashboard/maintenance";
pub const DASHBOARD_DEPARTMENTS: &str = "/dashboard/departments";
pub const DASHBOARD_USERS: &str = "/dashboard/users";

const CHANNEL_CAPACITY: usize = 256;

/// One path going stale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaleEvent {
    pub path: String,
    pub stale_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct RevalidationService {
    stale: Arc<RwLock<BTreeMap<String, DateTime<Utc>>>>,
    sender: broadcast::Sender<StaleEvent>,
}

impl Default for RevalidationService {
    fn default() -> Self {
        Self::new()
    }
}

impl RevalidationService {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            stale: Arc::new(RwLock::new(BTreeMap::new())),
            sender,
        }
    }

    /// Mark paths stale. Duplicates are collapsed; never fails.
    pub async fn mark_stale<I, S>(&self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = Utc::now();
        let mut stale = self.stale.write().await;
        for path in paths {
            let path = path.into();
            if stale.get(&path) == Some(&now) {
                continue;
            }
            stale.insert(path.clone(), now);
            tracing::debug!(path = %path, "Dashboard path marked stale");
            // an error only means nobody is listening
            let _ = self.sender.send(StaleEvent { path, stale_at: now });
        }
    }

    /// Last stale time of every path marked so far
    pub async fn snapshot(&self) -> Vec<StaleEvent> {
        self.stale
            .read()
            .await
            .iter()
            .map(|(path, stale_at)| StaleEvent {
                path: path.clone(),
                stale_at: *stale_at,
            })
            .collect()
    }

    pub async fn stale_since(&self, path: &str) -> Option<DateTime<Utc>> {
        self.stale.read().await.get(path).copied()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StaleEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mark_without_subscribers_is_recorded() {
        let service = RevalidationService::new();
        service.mark_stale([DASHBOARD, DASHBOARD_EQUIPMENT]).await;

        assert!(service.stale_since(DASHBOARD).await.is_some());
        assert!(service.stale_since(DASHBOARD_EQUIPMENT).await.is_some());
        assert!(service.stale_since(DASHBOARD_USERS).await.is_none());
    }

    #[tokio::test]
    async fn test_marking_twice_is_idempotent() {
        let service = RevalidationService::new();
        service.mark_stale([DASHBOARD]).await;
        service.mark_stale([DASHBOARD, DASHBOARD]).await;

        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].path, DASHBOARD);
    }

    #[tokio::test]
    async fn test_subscribers_receive_events() {
        let service = RevalidationService::new();
        let mut receiver = service.subscribe();

        service
            .mark_stale(vec!["/dashboard/cri/cri-assets".to_string()])
            .await;

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.path, "/dashboard/cri/cri-assets");
        assert_eq!(service.stale_since(&event.path).await, Some(event.stale_at));
    }
}
