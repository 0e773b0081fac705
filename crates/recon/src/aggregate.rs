//! Per-institution and per-course rollups of the merged collection, plus
//! the run summary. Consumed by the presentation layer; ordering is
//! deterministic (BTreeMap over folded keys).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{ClassRecord, Prevalence, ReconSummary};
use crate::normalize::fold;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstitutionSummary {
    pub institution: String,
    pub classes: usize,
    pub enrolled: u64,
    pub completed: u64,
    pub mean_dropout_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseSummary {
    pub course: String,
    pub category: String,
    pub classes: usize,
    pub enrolled: u64,
    pub completed: u64,
}

/// Roll up merged records by institution.
pub fn by_institution(records: &[ClassRecord]) -> Vec<InstitutionSummary> {
    let mut groups: BTreeMap<String, (String, usize, u64, u64, f64)> = BTreeMap::new();

    for record in records {
        let entry = groups
            .entry(fold(&record.institution))
            .or_insert_with(|| (record.institution.clone(), 0, 0, 0, 0.0));
        entry.1 += 1;
        entry.2 += u64::from(record.enrolled);
        entry.3 += u64::from(record.completed);
        entry.4 += record.dropout_rate;
    }

    groups
        .into_values()
        .map(|(institution, classes, enrolled, completed, dropout_sum)| InstitutionSummary {
            institution,
            classes,
            enrolled,
            completed,
            mean_dropout_rate: dropout_sum / classes as f64,
        })
        .collect()
}

/// Roll up merged records by classified course name.
pub fn by_course(records: &[ClassRecord]) -> Vec<CourseSummary> {
    let mut groups: BTreeMap<String, (String, String, usize, u64, u64)> = BTreeMap::new();

    for record in records {
        let entry = groups
            .entry(fold(&record.course))
            .or_insert_with(|| (record.course.clone(), record.category.clone(), 0, 0, 0));
        entry.2 += 1;
        entry.3 += u64::from(record.enrolled);
        entry.4 += u64::from(record.completed);
    }

    groups
        .into_values()
        .map(|(course, category, classes, enrolled, completed)| CourseSummary {
            course,
            category,
            classes,
            enrolled,
            completed,
        })
        .collect()
}

/// Compute summary statistics for a merged collection.
pub fn compute_summary(records: &[ClassRecord]) -> ReconSummary {
    let mut live_only = 0;
    let mut legacy_only = 0;
    let mut found_in_both = 0;
    let mut legacy_prevalence = 0;
    let mut enrolled_total: u64 = 0;
    let mut completed_total: u64 = 0;

    for record in records {
        if record.sources.both() {
            found_in_both += 1;
        } else if record.sources.legacy {
            legacy_only += 1;
        } else {
            live_only += 1;
        }
        if record.prevalence == Prevalence::Legacy {
            legacy_prevalence += 1;
        }
        enrolled_total += u64::from(record.enrolled);
        completed_total += u64::from(record.completed);
    }

    ReconSummary {
        total: records.len(),
        live_only,
        legacy_only,
        found_in_both,
        legacy_prevalence,
        enrolled_total,
        completed_total,
    }
}
