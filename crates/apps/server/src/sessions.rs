//! In-memory session registry.
//!
//! Each session sits behind its own async mutex: requests against one
//! session run one at a time in arrival order, different sessions never
//! block each other. Sessions idle for longer than the configured window
//! are evicted by [`SessionStore::evict_idle`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use services::{FeatureService, Geocoder};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;
use viewer::{Session, ViewerConfig};

use crate::error::ApiError;

pub type SharedSession = Arc<Mutex<Session>>;

struct Entry {
    session: SharedSession,
    last_seen: Instant,
}

pub struct SessionStore {
    sessions: DashMap<Uuid, Entry>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn create(
        &self,
        config: &ViewerConfig,
        features: Arc<dyn FeatureService>,
        geocoder: Arc<dyn Geocoder>,
    ) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(Session::new(config, features, geocoder)));
        self.sessions.insert(
            id,
            Entry {
                session: Arc::clone(&session),
                last_seen: Instant::now(),
            },
        );
        info!(%id, "session created");
        (id, session)
    }

    /// Looks a session up and marks it as seen.
    pub fn get(&self, id: Uuid) -> Result<SharedSession, ApiError> {
        self.touch(id, Instant::now())
    }

    fn touch(&self, id: Uuid, now: Instant) -> Result<SharedSession, ApiError> {
        let mut entry = self
            .sessions
            .get_mut(&id)
            .ok_or(ApiError::SessionNotFound(id))?;
        entry.last_seen = now;
        Ok(Arc::clone(&entry.session))
    }

    /// Drops sessions not seen for `max_idle`. Returns how many were dropped.
    pub fn evict_idle(&self, max_idle: Duration, now: Instant) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|id, entry| {
            let keep = now.saturating_duration_since(entry.last_seen) < max_idle;
            if !keep {
                info!(%id, "session expired");
            }
            keep
        });
        before.saturating_sub(self.sessions.len())
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            info!(%id, "session closed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use super::SessionStore;
    use crate::error::ApiError;
    use services::{BoxFuture, FeatureService, GetFeature, Geocoder, Place, PlaceSearch, ServiceError};
    use uuid::Uuid;
    use viewer::ViewerConfig;

    struct Offline;

    impl FeatureService for Offline {
        fn get_feature(&self, _request: &GetFeature) -> BoxFuture<'_, Result<String, ServiceError>> {
            Box::pin(async { Err(ServiceError::new("offline")) })
        }

        fn request_url(&self, request: &GetFeature) -> String {
            request.url("http://offline/wfs")
        }
    }

    impl Geocoder for Offline {
        fn search(&self, _search: &PlaceSearch) -> BoxFuture<'_, Result<Vec<Place>, ServiceError>> {
            Box::pin(async { Err(ServiceError::new("offline")) })
        }
    }

    #[tokio::test]
    async fn create_get_remove() {
        let store = SessionStore::new();
        let (id, session) =
            store.create(&ViewerConfig::default(), Arc::new(Offline), Arc::new(Offline));
        assert_eq!(store.len(), 1);

        session.lock().await.go_to("-22.5", "17.0").unwrap();
        let again = store.get(id).unwrap();
        assert_eq!(again.lock().await.view().zoom, 12);

        assert!(store.remove(id));
        assert!(!store.remove(id));
        assert!(matches!(
            store.get(Uuid::nil()),
            Err(ApiError::SessionNotFound(_))
        ));
    }

    #[test]
    fn idle_sessions_are_evicted() {
        let store = SessionStore::new();
        let idle = Duration::from_secs(60);
        let (stale, _) =
            store.create(&ViewerConfig::default(), Arc::new(Offline), Arc::new(Offline));
        let (active, _) =
            store.create(&ViewerConfig::default(), Arc::new(Offline), Arc::new(Offline));

        let later = Instant::now() + Duration::from_secs(90);
        store.touch(active, later - Duration::from_secs(10)).unwrap();

        assert_eq!(store.evict_idle(idle, later), 1);
        assert_eq!(store.len(), 1);
        assert!(matches!(
            store.get(stale),
            Err(ApiError::SessionNotFound(_))
        ));
        assert!(store.get(active).is_ok());
    }
}
