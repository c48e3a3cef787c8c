//! InMemory ストア実装

pub mod report;
pub mod user;

pub use report::InMemoryReportStore;
pub use user::InMemoryUserStore;

#[cfg(test)]
pub use report::test_report;
