//! Panel sessions, one per owner token

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    error::AppResult,
    repository::{HttpStore, ReservationStore},
    services::bookings::BookingService,
};

pub type SharedSession = Arc<Mutex<BookingService>>;

type StoreOpener = Box<dyn Fn(&str) -> Arc<dyn ReservationStore> + Send + Sync>;

/// Keeps a [`BookingService`] (courts and reservation cache) for every
/// bearer token the store has accepted. Sessions live as long as the process.
pub struct SessionRegistry {
    open_store: StoreOpener,
    default_duration: u32,
    sessions: Mutex<HashMap<String, SharedSession>>,
}

impl SessionRegistry {
    pub fn new(store: HttpStore, default_duration: u32) -> Self {
        Self::with_opener(
            move |token| Arc::new(store.with_token(token)) as Arc<dyn ReservationStore>,
            default_duration,
        )
    }

    /// Registry building each session's store with `open_store`
    pub fn with_opener<F>(open_store: F, default_duration: u32) -> Self
    where
        F: Fn(&str) -> Arc<dyn ReservationStore> + Send + Sync + 'static,
    {
        Self {
            open_store: Box::new(open_store),
            default_duration,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Session for `token`.
    ///
    /// A new token is registered only once the store has answered its
    /// courts request; a rejected token leaves nothing behind.
    pub async fn session(&self, token: &str) -> AppResult<SharedSession> {
        if let Some(existing) = self.sessions.lock().await.get(token) {
            return Ok(existing.clone());
        }

        let mut service = BookingService::new((self.open_store)(token), self.default_duration);
        service.load_courts().await?;

        let mut sessions = self.sessions.lock().await;
        let open = sessions.len();
        let session = sessions
            .entry(token.to_string())
            .or_insert_with(|| {
                tracing::debug!("Opening panel session ({} already open)", open);
                Arc::new(Mutex::new(service))
            })
            .clone();
        Ok(session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
