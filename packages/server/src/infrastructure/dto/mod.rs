//! Data Transfer Objects (DTOs) for the fan-out service.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event envelopes
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
