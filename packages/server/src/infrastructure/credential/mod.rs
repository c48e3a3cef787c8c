//! CredentialVerifier 実装

pub mod jwt;

pub use jwt::{JwtClaims, JwtCredentialVerifier};
