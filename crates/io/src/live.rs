//! Read-only access to the live relational store.
//!
//! One query joins classes to their institution and counts certified
//! enrollments per class. The store is opened read-only: this subsystem is
//! a read-side projection and must never write back. Fetch failures
//! propagate — the caller must not present partial output as success.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, OpenFlags};

use oxetech_recon::classify::classify;
use oxetech_recon::error::ReconError;
use oxetech_recon::model::{ClassRecord, Prevalence, SourceSet};
use oxetech_recon::normalize::{normalize_course_text, normalize_institution_text};

const LIVE_QUERY: &str = "\
SELECT c.id, i.name, c.title, c.start_date, c.end_date, c.capacity, c.filled,
       (SELECT COUNT(*) FROM enrollments e WHERE e.class_id = c.id AND e.certified = 1)
FROM classes c
JOIN institutions i ON i.id = c.institution_id
ORDER BY c.id";

struct LiveRow {
    id: i64,
    institution: String,
    title: String,
    start_date: String,
    end_date: String,
    capacity: i64,
    filled: i64,
    certified: i64,
}

fn parse_iso_date(value: &str, record_id: i64) -> Result<NaiveDate, ReconError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ReconError::Db(format!("class {record_id}: cannot parse date '{value}'"))
    })
}

/// Load all live class records, normalized and classified the same way as
/// the legacy corpus (without the OCR pass — live titles are clean).
pub fn load_live_records(db_path: &Path) -> Result<Vec<ClassRecord>, ReconError> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| ReconError::Db(e.to_string()))?;

    let mut stmt = conn
        .prepare(LIVE_QUERY)
        .map_err(|e| ReconError::Db(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            Ok(LiveRow {
                id: row.get(0)?,
                institution: row.get(1)?,
                title: row.get(2)?,
                start_date: row.get(3)?,
                end_date: row.get(4)?,
                capacity: row.get(5)?,
                filled: row.get(6)?,
                certified: row.get(7)?,
            })
        })
        .map_err(|e| ReconError::Db(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ReconError::Db(e.to_string()))?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let normalized = normalize_course_text(&row.title);
        let classification = classify(&normalized);
        records.push(ClassRecord {
            institution: normalize_institution_text(&row.institution),
            course: classification.display_name,
            course_original: row.title,
            category: classification.category,
            subcategory: classification.subcategory,
            start_date: parse_iso_date(&row.start_date, row.id)?,
            end_date: parse_iso_date(&row.end_date, row.id)?,
            enrolled: row.filled.max(0) as u32,
            completed: row.certified.max(0) as u32,
            capacity: row.capacity.max(0) as u32,
            dropout_rate: 0.0,
            sources: SourceSet::live_only(),
            prevalence: Prevalence::Live,
            record_id: Some(row.id),
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_db(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE institutions (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
             CREATE TABLE classes (
                 id INTEGER PRIMARY KEY,
                 institution_id INTEGER NOT NULL REFERENCES institutions(id),
                 title TEXT NOT NULL,
                 start_date TEXT NOT NULL,
                 end_date TEXT NOT NULL,
                 capacity INTEGER NOT NULL,
                 filled INTEGER NOT NULL
             );
             CREATE TABLE enrollments (
                 id INTEGER PRIMARY KEY,
                 class_id INTEGER NOT NULL REFERENCES classes(id),
                 certified INTEGER NOT NULL DEFAULT 0
             );

             INSERT INTO institutions VALUES (1, 'Maceió - Centro de Inovação'), (2, 'Penedo');
             INSERT INTO classes VALUES
                 (1, 1, 'Python Básico', '2023-03-05', '2023-06-28', 25, 22),
                 (2, 2, 'Excel - Turma Noite', '2024-02-01', '2024-05-01', 20, 18);
             INSERT INTO enrollments (class_id, certified) VALUES
                 (1, 1), (1, 1), (1, 0), (2, 1);",
        )
        .unwrap();
    }

    #[test]
    fn loads_and_normalizes_live_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("oxetech.db");
        fixture_db(&db_path);

        let records = load_live_records(&db_path).unwrap();
        assert_eq!(records.len(), 2);

        let python = &records[0];
        assert_eq!(python.record_id, Some(1));
        assert_eq!(python.institution, "Maceió - Centro de Inovação");
        assert_eq!(python.course, "Python Básico");
        assert_eq!(python.enrolled, 22);
        assert_eq!(python.completed, 2);
        assert_eq!(python.capacity, 25);
        assert_eq!(python.sources, SourceSet::live_only());
        assert_eq!(python.prevalence, Prevalence::Live);

        // Schedule suffix stripped by normalization before classification.
        let excel = &records[1];
        assert_eq!(excel.course, "Excel");
        assert_eq!(excel.course_original, "Excel - Turma Noite");
        assert_eq!(excel.completed, 1);
    }

    #[test]
    fn missing_database_propagates() {
        let err = load_live_records(Path::new("/nonexistent/oxetech.db")).unwrap_err();
        assert!(matches!(err, ReconError::Db(_)));
    }
}
