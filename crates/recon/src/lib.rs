//! `oxetech-recon` — Legacy/live class-record reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded records, returns the merged,
//! deduplicated collection. No CLI or IO dependencies.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod corrections;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod parse;

pub use config::ReconConfig;
pub use engine::reconcile;
pub use error::ReconError;
pub use model::{ClassKey, ClassRecord, Prevalence, SourceSet};
