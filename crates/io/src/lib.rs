//! `oxetech-io` — data access for the reconciliation engine.
//!
//! Two sources: the flat historical export (hand-typed CSV, read once per
//! process and cached) and the live SQLite store (opened read-only, read
//! fresh every run). Nothing here writes to the live store.

pub mod cache;
pub mod legacy;
pub mod live;

pub use cache::{CachedLegacy, LegacyCache};
pub use legacy::{load_legacy_records, LoadReport};
pub use live::load_live_records;
