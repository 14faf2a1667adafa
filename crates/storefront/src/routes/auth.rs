//! Authentication route handlers.
//!
//! Login stores a [`CurrentUser`] in the session; logout removes it but
//! leaves the cart in place.

use axum::{Form, Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Json<CurrentUser>> {
    let user = AuthService::new(state.pool())
        .login_with_password(&form.email, &form.password)
        .await
        .map_err(|e| {
            if matches!(e, AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) {
                warn!(error = %e, "login failed");
            }
            AppError::from(e)
        })?;

    let current = CurrentUser::from(user);
    set_current_user(&session, &current).await?;
    set_sentry_user(&current.id, Some(current.email.as_str()));

    info!(user_id = %current.id, "user logged in");
    Ok(Json(current))
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}
