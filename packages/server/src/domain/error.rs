//! ドメイン層のエラー定義

use thiserror::Error;

/// 値オブジェクトの生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Reasons a real-time connection is rejected during the handshake.
///
/// All variants are terminal: the connection receives one `error` event and
/// is closed. Messages are client-facing and never include the user id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing credential")]
    MissingCredential,

    #[error("invalid credential")]
    InvalidCredential,

    #[error("unknown user")]
    UnknownUser,

    #[error("identity lookup failed")]
    IdentityLookupFailed(String),
}

/// Connection state machine violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("invalid connection transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

/// Credential verification failure (signature, expiry, or shape)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("credential expired")]
    Expired,

    #[error("malformed credential: {0}")]
    Malformed(String),

    #[error("credential rejected: {0}")]
    Rejected(String),
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("store query failed: {0}")]
    QueryFailed(String),

    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ClientNotFound(String),

    #[error("push failed: {0}")]
    PushFailed(String),

    #[error("failed to encode message: {0}")]
    Encode(String),
}
