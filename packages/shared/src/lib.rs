//! Utilities shared by the Reportcast server and client.

pub mod logger;
pub mod time;
