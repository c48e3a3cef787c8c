//! Real-time report and metrics fan-out server.
//!
//! Connected dashboards authenticate with a bearer credential, are routed into
//! rooms by role and organizational unit, and receive report lifecycle events
//! and aggregate metrics pushed by the mutation layer.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
