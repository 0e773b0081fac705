//! Course classification: normalized course name → canonical display name
//! plus category/subcategory for grouping.
//!
//! The rule table is ordered and first-match-wins; more specific patterns
//! ("informatica basica") must precede generic ones ("informatica") or
//! downstream grouping misclassifies. Patterns run against the folded
//! normalized name; display names restore the accented canonical spelling.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::normalize::{fold, title_case};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub display_name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
}

struct Rule {
    pattern: Regex,
    display: &'static str,
    category: &'static str,
    subcategory: Option<&'static str>,
}

/// Ordered (pattern, display, category, subcategory) table. First match wins.
const RULE_TABLE: &[(&str, &str, &str, Option<&str>)] = &[
    (
        r"informatica basica|basico de informatica|introducao a informatica",
        "Informática Básica",
        "Informática",
        Some("Fundamentos"),
    ),
    (r"informatica avancad", "Informática Avançada", "Informática", Some("Fundamentos")),
    (r"informatica", "Informática", "Informática", None),
    (r"computacao basica", "Computação Básica", "Informática", Some("Fundamentos")),
    (r"computacao", "Computação", "Informática", None),
    (r"logica de programacao|\blogica\b", "Lógica de Programação", "Programação", Some("Fundamentos")),
    (r"python avancad", "Python Avançado", "Programação", Some("Python")),
    (r"python basico|introducao a python", "Python Básico", "Programação", Some("Python")),
    (r"python", "Python", "Programação", Some("Python")),
    (
        r"javascript avancad|java script avancad",
        "JavaScript Avançado",
        "Programação",
        Some("JavaScript"),
    ),
    (r"javascript|java script", "JavaScript", "Programação", Some("JavaScript")),
    (r"\bjava\b", "Java", "Programação", Some("Java")),
    (
        r"desenvolvimento web|programacao web|\bhtml\b|\bcss\b",
        "Desenvolvimento Web",
        "Programação",
        Some("Web"),
    ),
    (r"banco de dados|\bsql\b", "Banco de Dados", "Programação", Some("Dados")),
    (
        r"programacao de jogos|jogos digitais|scratch",
        "Programação de Jogos",
        "Programação",
        Some("Jogos"),
    ),
    (r"programacao", "Programação", "Programação", None),
    (r"excel avancad", "Excel Avançado", "Produtividade", Some("Office")),
    (r"\bexcel\b", "Excel", "Produtividade", Some("Office")),
    (r"power bi", "Power BI", "Dados", Some("Business Intelligence")),
    (
        r"pacote office|\bword\b|powerpoint|libreoffice",
        "Pacote Office",
        "Produtividade",
        Some("Office"),
    ),
    (r"digitacao", "Digitação", "Produtividade", None),
    (r"design grafico|photoshop|canva|\bcorel\b", "Design Gráfico", "Design", None),
    (r"marketing", "Marketing Digital", "Marketing", None),
    (r"robotica|arduino", "Robótica Educacional", "Robótica", None),
    (r"eletronica", "Eletrônica Básica", "Hardware", None),
    (
        r"montagem|manutencao|hardware",
        "Montagem e Manutenção de Computadores",
        "Hardware",
        None,
    ),
    (r"\bredes\b", "Redes de Computadores", "Infraestrutura", None),
    (r"\bingles\b", "Inglês", "Idiomas", None),
    (r"\blibras\b", "Libras", "Idiomas", None),
    (r"empreendedorismo|gestao", "Empreendedorismo", "Gestão", None),
];

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

fn rules() -> &'static [Rule] {
    RULES.get_or_init(|| {
        RULE_TABLE
            .iter()
            .filter_map(|(pattern, display, category, subcategory)| {
                Regex::new(pattern).ok().map(|re| Rule {
                    pattern: re,
                    display,
                    category,
                    subcategory: *subcategory,
                })
            })
            .collect()
    })
}

/// Classify a normalized course name. Pure and deterministic; unmatched
/// names fall back to the title-cased name under "Outros".
pub fn classify(normalized: &str) -> Classification {
    let folded = fold(normalized);
    for rule in rules() {
        if rule.pattern.is_match(&folded) {
            return Classification {
                display_name: rule.display.to_string(),
                category: rule.category.to_string(),
                subcategory: rule.subcategory.map(str::to_string),
            };
        }
    }
    Classification {
        display_name: title_case(normalized),
        category: "Outros".to_string(),
        subcategory: None,
    }
}

// ---------------------------------------------------------------------------
// Curated corpus variant
// ---------------------------------------------------------------------------

/// Manually curated classifications for legacy names the substitution pass
/// cannot repair, keyed by folded name.
const CURATED_TABLE: &[(&str, &str, &str, Option<&str>)] = &[
    ("ifo basica", "Informática Básica", "Informática", Some("Fundamentos")),
    ("pto basico", "Python Básico", "Programação", Some("Python")),
    ("js avancado", "JavaScript Avançado", "Programação", Some("JavaScript")),
    ("mont e manut", "Montagem e Manutenção de Computadores", "Hardware", None),
    ("rbt educacional", "Robótica Educacional", "Robótica", None),
];

static CURATED: OnceLock<HashMap<&'static str, Classification>> = OnceLock::new();

fn curated() -> &'static HashMap<&'static str, Classification> {
    CURATED.get_or_init(|| {
        CURATED_TABLE
            .iter()
            .map(|(name, display, category, subcategory)| {
                (
                    *name,
                    Classification {
                        display_name: (*display).to_string(),
                        category: (*category).to_string(),
                        subcategory: subcategory.map(str::to_string),
                    },
                )
            })
            .collect()
    })
}

/// Classifier variant for the OCR-corrected legacy corpus: checks the
/// curated table before falling back to the heuristic rule set.
pub fn classify_with_corrections(normalized: &str) -> Classification {
    if let Some(found) = curated().get(fold(normalized).as_str()) {
        return found.clone();
    }
    classify(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_rules_precede_generic() {
        assert_eq!(classify("informatica basica").display_name, "Informática Básica");
        assert_eq!(classify("informatica").display_name, "Informática");
        assert_eq!(classify("computacao basica").display_name, "Computação Básica");
    }

    #[test]
    fn classifies_accented_input() {
        let c = classify("informática avançada");
        assert_eq!(c.display_name, "Informática Avançada");
        assert_eq!(c.category, "Informática");
    }

    #[test]
    fn javascript_before_java() {
        assert_eq!(classify("javascript avançado").display_name, "JavaScript Avançado");
        assert_eq!(classify("java script").display_name, "JavaScript");
        assert_eq!(classify("java").display_name, "Java");
    }

    #[test]
    fn deterministic_across_calls() {
        let first = classify("javascript avançado");
        for _ in 0..10 {
            assert_eq!(classify("javascript avançado"), first);
        }
        assert_eq!(first.category, "Programação");
    }

    #[test]
    fn fallback_is_title_cased_other() {
        let c = classify("oficina de xadrez");
        assert_eq!(c.display_name, "Oficina De Xadrez");
        assert_eq!(c.category, "Outros");
        assert_eq!(c.subcategory, None);
    }

    #[test]
    fn curated_table_wins_over_rules() {
        let c = classify_with_corrections("pto basico");
        assert_eq!(c.display_name, "Python Básico");
        // Not in the curated table: falls through to the rules.
        let c = classify_with_corrections("python basico");
        assert_eq!(c.display_name, "Python Básico");
    }
}
