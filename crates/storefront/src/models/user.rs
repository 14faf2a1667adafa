//! User domain types.

use serde::Serialize;

use estore_core::{Email, UserId};

/// A registered shopper.
///
/// The password hash is deliberately not part of this type; it only ever
/// leaves the repository paired with a user for verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: Email,
}
