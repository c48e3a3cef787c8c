//! Credential verification port.

use chrono::{DateTime, Utc};

#[cfg(test)]
use mockall::automock;

use super::{error::CredentialError, value_object::UserId};

/// Result of a successful signature and expiry check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCredential {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Verifies an opaque bearer token.
///
/// Implementations check signature and expiry only; user lookup belongs to
/// the identity resolver.
#[cfg_attr(test, automock)]
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<VerifiedCredential, CredentialError>;
}
