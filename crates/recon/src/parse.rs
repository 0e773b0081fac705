//! Legacy row parsing: one header-keyed survey row → typed `ClassRecord`.
//!
//! The export is hand-entered: dates are `DD/MM/YYYY` (sometimes with a
//! corrupted year), counts may be blank or non-numeric, and the dropout
//! column mixes "25%" with "25,5". A single bad row never aborts the batch —
//! missing required fields yield a `SkipReason`, corrupted values get a
//! documented default.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::classify::{classify, classify_with_corrections};
use crate::corrections::correct_course_name;
use crate::model::{ClassRecord, Prevalence, SourceSet};
use crate::normalize::{fold, normalize_course_text, normalize_institution_text};

/// One raw row from the legacy export, keyed by folded header name.
pub type RawRow = HashMap<String, String>;

/// Why a legacy row was skipped. Skips are counted and reported, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingInstitution,
    MissingCourse,
    MissingStartDate,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInstitution => write!(f, "missing institution"),
            Self::MissingCourse => write!(f, "missing course"),
            Self::MissingStartDate => write!(f, "missing start date"),
        }
    }
}

// Recognized survey headers, folded. Each field accepts the spelling
// variants seen across export generations.
const INSTITUTION_COLUMNS: &[&str] = &["laboratorio", "laboratorio oxetech", "municipio", "instituicao", "polo"];
const COURSE_COLUMNS: &[&str] = &["curso", "nome do curso"];
const START_COLUMNS: &[&str] = &["data de inicio", "data inicio", "inicio"];
const END_COLUMNS: &[&str] = &["data de termino", "data termino", "termino", "data de fim", "fim"];
const ENROLLED_COLUMNS: &[&str] = &["matriculados", "alunos matriculados", "inscritos", "qtd matriculados"];
const COMPLETED_COLUMNS: &[&str] = &["concluintes", "qtd concluintes", "certificados", "aprovados"];
const DROPOUT_COLUMNS: &[&str] = &["taxa de evasao", "evasao (%)", "evasao"];

fn field<'a>(row: &'a RawRow, names: &[&str]) -> Option<&'a str> {
    for name in names {
        if let Some(value) = row.get(*name) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed);
            }
        }
    }
    None
}

/// Parse a `DD/MM/YYYY` date. A value that fails to parse, or whose year
/// falls outside [2000, 2100], is treated as OCR corruption and replaced
/// with the current date rather than failing the batch.
pub fn parse_date_br(value: &str) -> NaiveDate {
    let today = Utc::now().date_naive();
    match NaiveDate::parse_from_str(value.trim(), "%d/%m/%Y") {
        Ok(date) if (2000..=2100).contains(&date.year()) => date,
        _ => today,
    }
}

fn parse_count(value: Option<&str>) -> u32 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// Dropout percentage: trailing `%` stripped, Brazilian decimal comma
/// accepted, 0 on parse failure.
fn parse_dropout(value: Option<&str>) -> f64 {
    value
        .map(|v| v.trim().trim_end_matches('%').trim().replace(',', "."))
        .and_then(|v| v.parse().ok())
        .unwrap_or(0.0)
}

/// Convert one raw legacy row into a `ClassRecord`, or report why it was
/// skipped. Pure transform: no I/O, no shared state.
pub fn parse_legacy_row(row: &RawRow, use_corrections: bool) -> Result<ClassRecord, SkipReason> {
    let institution_raw = field(row, INSTITUTION_COLUMNS).ok_or(SkipReason::MissingInstitution)?;
    let course_raw = field(row, COURSE_COLUMNS).ok_or(SkipReason::MissingCourse)?;
    let start_raw = field(row, START_COLUMNS).ok_or(SkipReason::MissingStartDate)?;

    let start_date = parse_date_br(start_raw);
    let end_date = match field(row, END_COLUMNS) {
        Some(end_raw) => parse_date_br(end_raw),
        // A window with no recorded end collapses to its start.
        None => start_date,
    };

    let enrolled = parse_count(field(row, ENROLLED_COLUMNS));
    let completed = parse_count(field(row, COMPLETED_COLUMNS));
    let dropout_rate = parse_dropout(field(row, DROPOUT_COLUMNS));

    let normalized = if use_corrections {
        normalize_course_text(&correct_course_name(course_raw))
    } else {
        normalize_course_text(course_raw)
    };
    let classification = if use_corrections {
        classify_with_corrections(&normalized)
    } else {
        classify(&normalized)
    };

    Ok(ClassRecord {
        institution: normalize_institution_text(institution_raw),
        course: classification.display_name,
        course_original: course_raw.to_string(),
        category: classification.category,
        subcategory: classification.subcategory,
        start_date,
        end_date,
        enrolled,
        completed,
        capacity: enrolled.max(completed),
        dropout_rate,
        sources: SourceSet::legacy_only(),
        prevalence: Prevalence::Legacy,
        record_id: None,
    })
}

/// Fold a raw header into the lookup form used by [`RawRow`] keys.
pub fn fold_header(header: &str) -> String {
    fold(header.trim())
}
