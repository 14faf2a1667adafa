//! Per-session request serialization.
//!
//! The cart is read from the session, modified, and written back by
//! `SessionManagerLayer` once the handler has returned. Two requests for the
//! same session running that cycle concurrently would lose one update, so
//! [`session_lock_middleware`] sits outside the session layer and holds the
//! session's mutex until the store write has finished. Different sessions
//! never contend.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::session::Id;

use super::session::SESSION_COOKIE_NAME;

/// Idle time after which a session's lock is dropped from the registry.
const LOCK_IDLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);

const MAX_TRACKED_SESSIONS: u64 = 100_000;

/// Registry of per-session mutexes.
#[derive(Clone)]
pub struct SessionLocks {
    locks: Cache<Id, Arc<Mutex<()>>>,
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLocks {
    #[must_use]
    pub fn new() -> Self {
        let locks = Cache::builder()
            .max_capacity(MAX_TRACKED_SESSIONS)
            .time_to_idle(LOCK_IDLE_TIMEOUT)
            .build();
        Self { locks }
    }

    /// Wait for exclusive access to session `id`.
    ///
    /// A request without a session id has never been saved, so no other
    /// request can refer to it and no lock is taken.
    pub async fn lock(&self, id: Option<Id>) -> Option<OwnedMutexGuard<()>> {
        let id = id?;
        Some(self.mutex_for(id).await.lock_owned().await)
    }

    async fn mutex_for(&self, id: Id) -> Arc<Mutex<()>> {
        self.locks
            .get_with(id, async { Arc::new(Mutex::new(())) })
            .await
    }
}

/// Run the request, including the session store write, under its session's lock.
///
/// Must be layered outside the `SessionManagerLayer`.
pub async fn session_lock_middleware(
    State(locks): State<SessionLocks>,
    request: Request,
    next: Next,
) -> Response {
    let _guard = locks.lock(session_id(request.headers())).await;
    next.run(request).await
}

/// Session id from the request's session cookie. Malformed ids are ignored;
/// the session layer treats them as a new session too.
fn session_id(headers: &HeaderMap) -> Option<Id> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            if name != SESSION_COOKIE_NAME {
                return None;
            }
            Id::from_str(value).ok()
        })
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn cookie_headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_same_session_is_exclusive() {
        let locks = SessionLocks::new();
        let _guard = locks.lock(Some(Id(1))).await;

        assert!(locks.mutex_for(Id(1)).await.try_lock().is_err());
    }

    #[tokio::test]
    async fn test_other_sessions_do_not_contend() {
        let locks = SessionLocks::new();
        let _guard = locks.lock(Some(Id(1))).await;

        assert!(locks.mutex_for(Id(2)).await.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_released_on_drop() {
        let locks = SessionLocks::new();
        drop(locks.lock(Some(Id(1))).await);

        assert!(locks.mutex_for(Id(1)).await.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_unsaved_session_takes_no_lock() {
        assert!(SessionLocks::new().lock(None).await.is_none());
    }

    #[test]
    fn test_session_id_read_from_cookie() {
        let id = Id(42);
        let headers = cookie_headers(&format!("theme=dark; {SESSION_COOKIE_NAME}={id}"));

        assert_eq!(session_id(&headers), Some(id));
    }

    #[test]
    fn test_session_id_ignores_other_and_malformed_cookies() {
        assert_eq!(session_id(&cookie_headers("theme=dark")), None);
        assert_eq!(
            session_id(&cookie_headers(&format!("{SESSION_COOKIE_NAME}=not-an-id!"))),
            None
        );
        assert_eq!(session_id(&HeaderMap::new()), None);
    }
}
