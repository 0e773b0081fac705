//! Reconciliation: merge legacy and live class records into one
//! deduplicated collection.
//!
//! Live records seed a keyed map; each legacy record either merges into the
//! first similar entry (first match wins, in key order) or inserts as a new
//! entry. The linear scan is O(legacy × live) — dataset sizes here are a few
//! hundred classes, not millions. Read-side only: nothing is written back.

use std::collections::BTreeMap;

use crate::matcher::are_similar;
use crate::model::{ClassKey, ClassRecord, Prevalence, SourceSet};

/// Merge a legacy record into an existing entry. Pure decision function:
/// the prevalence rule lives here, independent of map mutation order.
///
/// Legacy numeric fields win only on a strictly greater completion count —
/// on a tie the live source is kept, so re-running on identical inputs can
/// never flip prevalence.
pub fn merge_records(entry: &ClassRecord, legacy: &ClassRecord) -> ClassRecord {
    let mut merged = entry.clone();
    merged.sources.legacy = true;

    if legacy.completed > entry.completed {
        merged.course = legacy.course.clone();
        merged.category = legacy.category.clone();
        merged.subcategory = legacy.subcategory.clone();
        merged.enrolled = legacy.enrolled;
        merged.completed = legacy.completed;
        merged.dropout_rate = legacy.dropout_rate;
        merged.capacity = merged
            .capacity
            .max(legacy.enrolled)
            .max(legacy.completed);
        merged.prevalence = Prevalence::Legacy;
    }

    // Keep the longest original label seen across both sources.
    if legacy.course_original.chars().count() > merged.course_original.chars().count() {
        merged.course_original = legacy.course_original.clone();
    }

    merged
}

/// Merge legacy and live records into the final deduplicated collection.
///
/// Deterministic: identical inputs yield identical output (same keys, same
/// prevalence decisions). The merged entry keeps the key it was first
/// stored under — a legacy win overwrites fields, never re-keys.
pub fn reconcile(
    legacy: &[ClassRecord],
    live: &[ClassRecord],
    tolerance_days: i64,
) -> Vec<ClassRecord> {
    let mut merged: BTreeMap<ClassKey, ClassRecord> = BTreeMap::new();

    for record in live {
        let mut seeded = record.clone();
        seeded.sources = SourceSet::live_only();
        seeded.prevalence = Prevalence::Live;
        merged.insert(ClassKey::for_record(&seeded), seeded);
    }

    for record in legacy {
        let hit = merged
            .iter()
            .find(|(_, entry)| are_similar(record, entry, tolerance_days))
            .map(|(key, _)| key.clone());

        match hit {
            Some(key) => {
                if let Some(entry) = merged.get_mut(&key) {
                    *entry = merge_records(entry, record);
                }
            }
            None => {
                let mut inserted = record.clone();
                inserted.sources = SourceSet::legacy_only();
                inserted.prevalence = Prevalence::Legacy;
                inserted.capacity = inserted.enrolled.max(inserted.completed);
                merged.insert(ClassKey::for_record(&inserted), inserted);
            }
        }
    }

    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn legacy(
        institution: &str,
        course: &str,
        start: &str,
        end: &str,
        enrolled: u32,
        completed: u32,
    ) -> ClassRecord {
        ClassRecord {
            institution: institution.into(),
            course: course.into(),
            course_original: course.into(),
            category: "Programação".into(),
            subcategory: None,
            start_date: date(start),
            end_date: date(end),
            enrolled,
            completed,
            capacity: enrolled.max(completed),
            dropout_rate: 25.0,
            sources: SourceSet::legacy_only(),
            prevalence: Prevalence::Legacy,
            record_id: None,
        }
    }

    fn live(
        institution: &str,
        course: &str,
        start: &str,
        end: &str,
        completed: u32,
        id: i64,
    ) -> ClassRecord {
        ClassRecord {
            institution: institution.into(),
            course: course.into(),
            course_original: course.into(),
            category: "Programação".into(),
            subcategory: None,
            start_date: date(start),
            end_date: date(end),
            enrolled: 25,
            completed,
            capacity: 25,
            dropout_rate: 0.0,
            sources: SourceSet::live_only(),
            prevalence: Prevalence::Live,
            record_id: Some(id),
        }
    }

    #[test]
    fn legacy_with_higher_completion_prevails() {
        let l = legacy("Maceió - Centro de Inovação", "Python Básico", "2023-03-01", "2023-06-30", 20, 15);
        let v = live("Maceió - Centro de Inovação", "Python Básico", "2023-03-05", "2023-06-28", 10, 7);

        let out = reconcile(&[l], &[v], 30);
        assert_eq!(out.len(), 1);
        let merged = &out[0];
        assert_eq!(merged.completed, 15);
        assert_eq!(merged.enrolled, 20);
        assert_eq!(merged.prevalence, Prevalence::Legacy);
        assert!(merged.sources.both());
        // Merged under the live entry's key: record_id survives.
        assert_eq!(merged.record_id, Some(7));
        assert!((merged.dropout_rate - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tie_keeps_live_fields() {
        let l = legacy("Penedo", "Excel", "2024-02-01", "2024-05-01", 30, 12);
        let v = live("Penedo", "Excel", "2024-02-01", "2024-05-01", 12, 3);

        let out = reconcile(&[l], &[v], 30);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].prevalence, Prevalence::Live);
        assert_eq!(out[0].enrolled, 25);
        assert_eq!(out[0].completed, 12);
        assert!(out[0].sources.both());
    }

    #[test]
    fn legacy_with_lower_completion_keeps_live() {
        let l = legacy("Penedo", "Excel", "2024-02-01", "2024-05-01", 30, 8);
        let v = live("Penedo", "Excel", "2024-02-01", "2024-05-01", 12, 3);

        let out = reconcile(&[l], &[v], 30);
        assert_eq!(out[0].completed, 12);
        assert_eq!(out[0].prevalence, Prevalence::Live);
    }

    #[test]
    fn unmatched_legacy_inserts_new_entry() {
        let l = legacy("Arapiraca", "Robótica Educacional", "2023-08-01", "2023-11-30", 18, 22);
        let v = live("Penedo", "Excel", "2024-02-01", "2024-05-01", 12, 3);

        let out = reconcile(&[l], &[v], 30);
        assert_eq!(out.len(), 2);
        let inserted = out.iter().find(|r| r.institution == "Arapiraca").unwrap();
        assert_eq!(inserted.sources, SourceSet::legacy_only());
        assert_eq!(inserted.prevalence, Prevalence::Legacy);
        assert_eq!(inserted.capacity, 22);
        assert_eq!(inserted.record_id, None);
    }

    #[test]
    fn conservation_bounds() {
        let legacy_set = vec![
            legacy("Maceió", "Python Básico", "2023-03-01", "2023-06-30", 20, 15),
            legacy("Arapiraca", "Excel", "2023-03-01", "2023-06-30", 10, 8),
            legacy("Penedo", "Inglês", "2023-03-01", "2023-06-30", 12, 9),
        ];
        let live_set = vec![
            live("Maceió", "Python Básico", "2023-03-05", "2023-06-28", 10, 1),
            live("Coruripe", "Excel", "2024-02-01", "2024-05-01", 12, 2),
        ];

        let out = reconcile(&legacy_set, &live_set, 30);
        assert!(out.len() >= live_set.len());
        assert!(out.len() <= live_set.len() + legacy_set.len());
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let legacy_set = vec![
            legacy("Maceió", "Python Básico", "2023-03-01", "2023-06-30", 20, 15),
            legacy("Arapiraca", "Excel", "2023-03-10", "2023-06-20", 10, 8),
        ];
        let live_set = vec![
            live("Maceió", "Python Básico", "2023-03-05", "2023-06-28", 10, 1),
            live("Arapiraca", "Excel", "2023-03-01", "2023-06-30", 8, 2),
        ];

        let first = reconcile(&legacy_set, &live_set, 30);
        let second = reconcile(&legacy_set, &live_set, 30);
        assert_eq!(first, second);
    }

    #[test]
    fn no_two_output_records_are_similar() {
        let legacy_set = vec![
            legacy("Maceió", "Python Básico", "2023-03-01", "2023-06-30", 20, 15),
            legacy("maceio", "python basico", "2023-03-10", "2023-06-25", 18, 14),
            legacy("Arapiraca", "Excel", "2023-03-01", "2023-06-30", 10, 8),
        ];
        let live_set = vec![
            live("Maceió", "Python Básico", "2023-03-05", "2023-06-28", 10, 1),
        ];

        let out = reconcile(&legacy_set, &live_set, 30);
        for (i, a) in out.iter().enumerate() {
            for b in out.iter().skip(i + 1) {
                assert!(!are_similar(a, b, 30), "duplicate merged entries: {a:?} / {b:?}");
            }
        }
    }

    #[test]
    fn merge_keeps_longest_original_label() {
        let mut l = legacy("Penedo", "Excel", "2024-02-01", "2024-05-01", 30, 8);
        l.course_original = "Excel Intermediário para o Mercado de Trabalho".into();
        let v = live("Penedo", "Excel", "2024-02-01", "2024-05-01", 12, 3);

        let out = reconcile(&[l], &[v], 30);
        assert_eq!(out[0].course_original, "Excel Intermediário para o Mercado de Trabalho");
    }
}
