//! HS256 JWT credential verifier.
//!
//! Tokens are issued by the REST authentication flow with a `{ id }` payload
//! and a standard `exp` claim. Only signature and expiry are checked here.

use chrono::DateTime;
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::domain::{CredentialError, CredentialVerifier, UserId, VerifiedCredential};

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User id
    pub id: String,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

pub struct JwtCredentialVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtCredentialVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }
}

impl CredentialVerifier for JwtCredentialVerifier {
    fn verify(&self, token: &str) -> Result<VerifiedCredential, CredentialError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => CredentialError::Expired,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => CredentialError::Malformed(e.to_string()),
                _ => CredentialError::Rejected(e.to_string()),
            }
        })?;

        let user_id = UserId::new(data.claims.id)
            .map_err(|e| CredentialError::Malformed(e.to_string()))?;
        let expires_at = DateTime::from_timestamp(data.claims.exp, 0)
            .ok_or_else(|| CredentialError::Malformed("exp out of range".to_string()))?;

        Ok(VerifiedCredential {
            user_id,
            expires_at,
        })
    }
}
