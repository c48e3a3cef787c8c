//! Terminal dashboard for the Reportcast reports channel.
//!
//! Authenticates with a session token, prints report and metrics pushes as
//! they arrive, and sends on-demand requests typed at the prompt.

pub mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
