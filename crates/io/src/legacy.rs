//! Legacy export ingestion.
//!
//! The historical Lab data is a survey-form CSV: BOM-prefixed, exported
//! from Brazilian Excel (semicolon-delimited, Windows-1252 more often than
//! not), with blank lines and uneven quoting. Reader-level failures are
//! errors; row-level problems are counted and skipped.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Serialize;

use oxetech_recon::error::ReconError;
use oxetech_recon::model::ClassRecord;
use oxetech_recon::parse::{fold_header, parse_legacy_row, RawRow, SkipReason};

/// Row-level outcome counts for one load of the legacy export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows: usize,
    pub parsed: usize,
    pub skipped_missing_institution: usize,
    pub skipped_missing_course: usize,
    pub skipped_missing_start_date: usize,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.skipped_missing_institution
            + self.skipped_missing_course
            + self.skipped_missing_start_date
    }

    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::MissingInstitution => self.skipped_missing_institution += 1,
            SkipReason::MissingCourse => self.skipped_missing_course += 1,
            SkipReason::MissingStartDate => self.skipped_missing_start_date += 1,
        }
    }
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, common
/// for Excel-exported CSVs).
pub fn read_file_as_utf8(path: &Path) -> Result<String, ReconError> {
    let mut file = std::fs::File::open(path).map_err(|e| ReconError::Io(e.to_string()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| ReconError::Io(e.to_string()))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Detect the most likely field delimiter by checking consistency across the
/// first few lines. Brazilian Excel exports usually use `;`.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b';', b',', b'\t', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b';';
    }

    let mut best = b';';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

// Header alternates that must exist for the export to be usable at all.
const REQUIRED_HEADERS: &[(&str, &[&str])] = &[
    ("laboratorio", &["laboratorio", "laboratorio oxetech", "municipio", "instituicao", "polo"]),
    ("curso", &["curso", "nome do curso"]),
    ("data de inicio", &["data de inicio", "data inicio", "inicio"]),
];

/// Parse the export content into header-keyed rows. Headers are folded
/// (lowercase, accentless) so `Laboratório` and `laboratorio` key equally.
pub fn read_rows(content: &str) -> Result<Vec<RawRow>, ReconError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let delimiter = sniff_delimiter(content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Csv(e.to_string()))?
        .iter()
        .map(fold_header)
        .collect();

    for (canonical, alternates) in REQUIRED_HEADERS {
        if !alternates.iter().any(|alt| headers.iter().any(|h| h == alt)) {
            return Err(ReconError::MissingColumn { column: (*canonical).to_string() });
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Csv(e.to_string()))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let mut row: RawRow = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(i) {
                row.insert(header.clone(), value.to_string());
            }
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Parse export content into class records. Bad rows never abort the batch;
/// the report says how many were skipped and why.
pub fn load_legacy_records_from_str(
    content: &str,
    use_corrections: bool,
) -> Result<(Vec<ClassRecord>, LoadReport), ReconError> {
    let rows = read_rows(content)?;
    let mut report = LoadReport { rows: rows.len(), ..LoadReport::default() };
    let mut records = Vec::with_capacity(rows.len());

    for row in &rows {
        match parse_legacy_row(row, use_corrections) {
            Ok(record) => {
                records.push(record);
                report.parsed += 1;
            }
            Err(reason) => report.record_skip(reason),
        }
    }

    Ok((records, report))
}

/// Load the legacy export from disk. Upstream read failures propagate;
/// row-level problems are reported, not raised.
pub fn load_legacy_records(
    path: &Path,
    use_corrections: bool,
) -> Result<(Vec<ClassRecord>, LoadReport), ReconError> {
    let content = read_file_as_utf8(path)?;
    load_legacy_records_from_str(&content, use_corrections)
}
