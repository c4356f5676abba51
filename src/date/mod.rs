//! Relationship start date: persistence, elapsed days and milestones

pub mod milestone;
pub mod storage;
pub mod tracker;

pub use milestone::Milestone;
pub use storage::{KeyValueStore, LocalStorage, MemoryStore};
pub use tracker::{elapsed_days, format_date, parse_date, DateTracker, START_DATE_KEY};
