//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions) - added in `main`
//! 2. Session lock (one request per session at a time) - [`crate::routes::app`]
//! 3. Session layer (tower-sessions with `PostgreSQL` store) - [`crate::routes::app`]
//! 4. `TraceLayer` (request span) - [`crate::routes::app`]
//! 5. Request ID (recorded on the span) - [`crate::routes::app`]
//!
//! [`RequireAuth`] is an extractor rather than a layer.

pub mod auth;
pub mod request_id;
pub mod session;
pub mod session_lock;

pub use auth::{RequireAuth, clear_current_user, set_current_user};
pub use request_id::request_id_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
pub use session_lock::{SessionLocks, session_lock_middleware};
