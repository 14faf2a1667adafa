//! Shopper account management.

use tracing::info;

use estore_storefront::services::auth::AuthService;

use super::connect;

/// Create a shopper account with an Argon2id password hash.
///
/// # Errors
///
/// Returns an error if the email is invalid, the password is too short, the
/// email is already registered, or the database is unreachable.
pub async fn create(name: &str, email: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let name = name.trim();
    if name.is_empty() {
        return Err("name must not be empty".into());
    }

    let pool = connect().await?;
    let user = AuthService::new(&pool).register(name, email, password).await?;

    info!(user_id = %user.id, email = %user.email, "User created");
    Ok(())
}
