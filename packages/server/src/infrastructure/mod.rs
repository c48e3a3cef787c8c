//! Infrastructure 層
//!
//! ドメイン層が定義するポート（trait）の具体的な実装と、ワイヤーフォーマット（DTO）を提供します。

pub mod credential;
pub mod dto;
pub mod repository;
pub mod room_registry;
