//! WebSocket fan-out server implementation.

pub mod dispatch;
mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, router};
