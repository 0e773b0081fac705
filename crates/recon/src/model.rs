use chrono::NaiveDate;
use serde::Serialize;

use crate::normalize::fold;

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Which source's numeric fields won when a class exists in both sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Prevalence {
    Legacy,
    Live,
}

impl std::fmt::Display for Prevalence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Live => write!(f, "live"),
        }
    }
}

/// Set over {legacy, live}: which sources a merged record was found in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceSet {
    pub legacy: bool,
    pub live: bool,
}

impl SourceSet {
    pub fn legacy_only() -> Self {
        Self { legacy: true, live: false }
    }

    pub fn live_only() -> Self {
        Self { legacy: false, live: true }
    }

    pub fn both(&self) -> bool {
        self.legacy && self.live
    }
}

// ---------------------------------------------------------------------------
// Class record
// ---------------------------------------------------------------------------

/// One offering of a course at one institution over a date window.
///
/// Built transiently on each reconciliation run; nothing here is persisted
/// back to the live store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRecord {
    /// Canonical institution name.
    pub institution: String,
    /// Classified course display name.
    pub course: String,
    /// Best-available original label (longest variant seen).
    pub course_original: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub enrolled: u32,
    pub completed: u32,
    /// Recomputed as max(enrolled, completed) for legacy-built records,
    /// taken from the store for live records.
    pub capacity: u32,
    /// Percentage, as supplied by the prevailing source. 0 if unknown.
    pub dropout_rate: f64,
    pub sources: SourceSet,
    pub prevalence: Prevalence,
    /// Primary key in the live store, when the record exists there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Merge key
// ---------------------------------------------------------------------------

/// Composite key for the merged map. Folded so accent/case variants of the
/// same institution or course key identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassKey {
    pub institution: String,
    pub course: String,
    pub start_iso: String,
}

impl ClassKey {
    pub fn for_record(record: &ClassRecord) -> Self {
        Self {
            institution: fold(&record.institution),
            course: fold(&record.course),
            start_iso: record.start_date.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Run output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub total: usize,
    pub live_only: usize,
    pub legacy_only: usize,
    pub found_in_both: usize,
    pub legacy_prevalence: usize,
    pub enrolled_total: u64,
    pub completed_total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub tolerance_days: i64,
    pub corrections: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub classes: Vec<ClassRecord>,
    pub by_institution: Vec<crate::aggregate::InstitutionSummary>,
    pub by_course: Vec<crate::aggregate::CourseSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(institution: &str, course: &str) -> ClassRecord {
        ClassRecord {
            institution: institution.into(),
            course: course.into(),
            course_original: course.into(),
            category: "Outros".into(),
            subcategory: None,
            start_date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
            enrolled: 20,
            completed: 15,
            capacity: 20,
            dropout_rate: 25.0,
            sources: SourceSet::legacy_only(),
            prevalence: Prevalence::Legacy,
            record_id: None,
        }
    }

    #[test]
    fn key_folds_accents_and_case() {
        let a = ClassKey::for_record(&record("Maceió - Centro de Inovação", "Python Básico"));
        let b = ClassKey::for_record(&record("maceio - centro de inovacao", "python basico"));
        assert_eq!(a, b);
        assert_eq!(a.start_iso, "2023-03-01");
    }

    #[test]
    fn source_set_both() {
        let mut sources = SourceSet::live_only();
        assert!(!sources.both());
        sources.legacy = true;
        assert!(sources.both());
    }
}
