//! Pairwise similarity: do two class records describe the same real-world
//! class? No global optimal matching — ties are resolved by the engine's
//! processing order.

use crate::model::ClassRecord;
use crate::normalize::fold;

/// Default date-window tolerance, in days. Legacy start/end dates were
/// hand-typed from memory and routinely drift a few weeks from the store.
pub const DEFAULT_TOLERANCE_DAYS: i64 = 30;

/// True iff institution and course match (folded, so accent/case variants
/// compare equal) and both start and end dates fall within the symmetric
/// tolerance window.
pub fn are_similar(a: &ClassRecord, b: &ClassRecord, tolerance_days: i64) -> bool {
    fold(&a.institution) == fold(&b.institution)
        && fold(&a.course) == fold(&b.course)
        && (a.start_date - b.start_date).num_days().abs() <= tolerance_days
        && (a.end_date - b.end_date).num_days().abs() <= tolerance_days
}
