//! Free-text cleanup for course and institution names.
//!
//! The legacy export is hand-typed survey data: course names carry schedule
//! tokens ("19:00", "T30", "manhã"), filler words ("turma 2", "curso de"),
//! and inconsistent accents. Normalization produces the canonical comparison
//! form used by the matcher and the merge key.

use std::sync::OnceLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Folding
// ---------------------------------------------------------------------------

/// Lowercase + diacritic strip. Comparison form for keys and the matcher;
/// display names keep their accents.
pub fn fold(text: &str) -> String {
    text.to_lowercase().chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        _ => c,
    }
}

/// Capitalize the first letter of each whitespace-separated word.
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Course names
// ---------------------------------------------------------------------------

/// Schedule/shift/filler tokens stripped from course names, in order.
/// Patterns run against the folded (lowercase, accentless) text.
const COURSE_STRIP_PATTERNS: &[&str] = &[
    // Clock times: 19:00, 19h30, 19h
    r"\b\d{1,2}:\d{2}\b",
    r"\b\d{1,2}h\d{2}\b",
    r"\b\d{1,2}h\b",
    // Weekday/shift codes: D25, T30, N12
    r"\b[a-z]\d{1,3}\b",
    // Shift names
    r"\b(manha|tarde|noite|matutino|vespertino|noturno)\b",
    // Single-letter shift abbreviations
    r"\b[mtn]\b",
    // Filler words, with optional trailing class number
    r"\b(turma|curso|modulo)(\s+\d+)?\b",
];

static COURSE_STRIPPERS: OnceLock<Vec<Regex>> = OnceLock::new();

fn course_strippers() -> &'static [Regex] {
    COURSE_STRIPPERS.get_or_init(|| {
        COURSE_STRIP_PATTERNS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    })
}

static SEPARATOR_RUN: OnceLock<Option<Regex>> = OnceLock::new();

fn separator_run() -> Option<&'static Regex> {
    SEPARATOR_RUN
        .get_or_init(|| Regex::new(r"[_/|,;]+").ok())
        .as_ref()
}

/// Canonical comparison form of a course name. Idempotent; never empty —
/// falls back to the title-cased original when cleaning strips everything.
pub fn normalize_course_text(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut text = fold(trimmed);

    // Dash-separated suffixes ("curso - tarde") carry schedule noise, not
    // course identity: keep only the part before the first dash.
    if let Some(pos) = text.find('-') {
        text.truncate(pos);
    }

    if let Some(re) = separator_run() {
        text = re.replace_all(&text, " ").into_owned();
    }
    for re in course_strippers() {
        text = re.replace_all(&text, " ").into_owned();
    }

    let cleaned = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        title_case(trimmed)
    } else {
        cleaned
    }
}

// ---------------------------------------------------------------------------
// Institution names
// ---------------------------------------------------------------------------

/// Known spelling variants of lab/city names, keyed by folded form.
/// The legacy export hand-types these; the live store has the accented
/// canonical names.
const INSTITUTION_CANONICAL: &[(&str, &str)] = &[
    ("maceio", "Maceió"),
    ("maceio - centro de inovacao", "Maceió - Centro de Inovação"),
    ("arapiraca", "Arapiraca"),
    ("palmeira dos indios", "Palmeira dos Índios"),
    ("uniao dos palmares", "União dos Palmares"),
    ("sao miguel dos campos", "São Miguel dos Campos"),
    ("rio largo", "Rio Largo"),
    ("penedo", "Penedo"),
    ("delmiro gouveia", "Delmiro Gouveia"),
    ("coruripe", "Coruripe"),
    ("santana do ipanema", "Santana do Ipanema"),
    ("marechal deodoro", "Marechal Deodoro"),
    ("piranhas", "Piranhas"),
    ("batalha", "Batalha"),
    ("vicosa", "Viçosa"),
];

/// Canonical institution name: whitespace collapsed, known variants mapped
/// to their accented canonical spelling, otherwise the trimmed original.
pub fn normalize_institution_text(raw: &str) -> String {
    let collapsed = raw.trim().split_whitespace().collect::<Vec<_>>().join(" ");
    let key = fold(&collapsed);
    for (variant, canonical) in INSTITUTION_CANONICAL {
        if *variant == key {
            return (*canonical).to_string();
        }
    }
    collapsed
}
