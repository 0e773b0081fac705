//! OCR correction pass for the legacy course-name corpus.
//!
//! The historical export went through OCR that systematically drops vowels
//! and nasal letters ("Iforáica" for "Informática", "Pyho" for "Python").
//! Corrections are best effort: an exact-match lookup over known garbled
//! strings runs first, then an ordered table of regex substitutions for the
//! common corruption shapes. A miss leaves the text uncorrected; the pass
//! never errors.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::normalize::fold;

/// Known garbled full strings from the legacy corpus, keyed by folded form.
const EXACT_CORRECTIONS: &[(&str, &str)] = &[
    ("iforaica", "informática"),
    ("iforaica basica", "informática básica"),
    ("iforatica", "informática"),
    ("pyho", "python"),
    ("pyho basico", "python básico"),
    ("pyhon basico", "python básico"),
    ("excl avancado", "excel avançado"),
    ("javascrit avancado", "javascript avançado"),
    ("lgica de programacao", "lógica de programação"),
    ("robtica educacional", "robótica educacional"),
    ("mnutencao de coputadores", "manutenção de computadores"),
];

/// Ordered substitution table for systematic corruption patterns. Patterns
/// run against folded text; replacements restore the canonical word.
const CORRECTION_PATTERNS: &[(&str, &str)] = &[
    // informática: vowel drops, transpositions, nasal loss
    (r"\biforaica\b", "informática"),
    (r"\biforatica\b", "informática"),
    (r"\biformatica\b", "informática"),
    (r"\binformtica\b", "informática"),
    (r"\binfromatica\b", "informática"),
    (r"\bnformatica\b", "informática"),
    (r"\binformatca\b", "informática"),
    (r"\binformatia\b", "informática"),
    (r"\binfotmatica\b", "informática"),
    (r"\binformatica\b", "informática"),
    // básico/básica
    (r"\bbasco\b", "básico"),
    (r"\bbsico\b", "básico"),
    (r"\bbasico\b", "básico"),
    (r"\bbasca\b", "básica"),
    (r"\bbsica\b", "básica"),
    (r"\bbasica\b", "básica"),
    // avançado/avançada
    (r"\bavancdo\b", "avançado"),
    (r"\bavacado\b", "avançado"),
    (r"\bavncado\b", "avançado"),
    (r"\bavancado\b", "avançado"),
    (r"\bavancda\b", "avançada"),
    (r"\bavancada\b", "avançada"),
    // python
    (r"\bpyho\b", "python"),
    (r"\bpyhon\b", "python"),
    (r"\bpythn\b", "python"),
    (r"\bpyton\b", "python"),
    (r"\bphyton\b", "python"),
    (r"\bpiton\b", "python"),
    // javascript
    (r"\bjavascrit\b", "javascript"),
    (r"\bjavascipt\b", "javascript"),
    (r"\bjavscript\b", "javascript"),
    (r"\bjava script\b", "javascript"),
    // excel
    (r"\bexcell\b", "excel"),
    (r"\bexel\b", "excel"),
    (r"\bxcel\b", "excel"),
    // lógica
    (r"\blogca\b", "lógica"),
    (r"\blgica\b", "lógica"),
    (r"\blogica\b", "lógica"),
    // programação
    (r"\bprogramaco\b", "programação"),
    (r"\bprogracao\b", "programação"),
    (r"\bprogramcao\b", "programação"),
    (r"\bprogramacao\b", "programação"),
    // computação / computadores
    (r"\bcoputacao\b", "computação"),
    (r"\bcomputaco\b", "computação"),
    (r"\bcomputacao\b", "computação"),
    (r"\bcoputadores\b", "computadores"),
    (r"\bcomputadres\b", "computadores"),
    (r"\bcomputadors\b", "computadores"),
    // desenvolvimento
    (r"\bdesenvolvimeto\b", "desenvolvimento"),
    (r"\bdesenvolviento\b", "desenvolvimento"),
    (r"\bdesevolvimento\b", "desenvolvimento"),
    // robótica / eletrônica
    (r"\brobtica\b", "robótica"),
    (r"\brobotca\b", "robótica"),
    (r"\brobotica\b", "robótica"),
    (r"\beletrnica\b", "eletrônica"),
    (r"\beletronica\b", "eletrônica"),
    // manutenção / montagem / hardware
    (r"\bmanutecao\b", "manutenção"),
    (r"\bmanutencao\b", "manutenção"),
    (r"\bmotagem\b", "montagem"),
    (r"\bmontagm\b", "montagem"),
    (r"\bhardwre\b", "hardware"),
    (r"\bharware\b", "hardware"),
    // misc vocabulary
    (r"\bingles\b", "inglês"),
    (r"\bigles\b", "inglês"),
    (r"\bdigtacao\b", "digitação"),
    (r"\bdigitacao\b", "digitação"),
    (r"\bgrfico\b", "gráfico"),
    (r"\bgrafico\b", "gráfico"),
    (r"\bdesgin\b", "design"),
    (r"\bdesing\b", "design"),
    (r"\bmarketig\b", "marketing"),
    (r"\bmarkting\b", "marketing"),
    (r"\bmaketing\b", "marketing"),
    (r"\bgestao\b", "gestão"),
];

struct NameCorrector {
    exact: HashMap<&'static str, &'static str>,
    rules: Vec<(Regex, &'static str)>,
}

static CORRECTOR: OnceLock<NameCorrector> = OnceLock::new();

fn corrector() -> &'static NameCorrector {
    CORRECTOR.get_or_init(|| NameCorrector {
        exact: EXACT_CORRECTIONS.iter().copied().collect(),
        rules: CORRECTION_PATTERNS
            .iter()
            .filter_map(|(pattern, replacement)| {
                Regex::new(pattern).ok().map(|re| (re, *replacement))
            })
            .collect(),
    })
}

/// Best-effort correction of a garbled legacy course name. Exact lookup
/// first, then the ordered substitution table. Unknown text passes through
/// folded but otherwise untouched.
pub fn correct_course_name(raw: &str) -> String {
    let c = corrector();
    let folded = fold(raw.trim());
    if let Some(fixed) = c.exact.get(folded.as_str()) {
        return (*fixed).to_string();
    }
    let mut text = folded;
    for (re, replacement) in &c.rules {
        text = re.replace_all(&text, *replacement).into_owned();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_corpus_hits() {
        assert_eq!(correct_course_name("Iforáica"), "informática");
        assert_eq!(correct_course_name("Pyho Básico"), "python básico");
    }

    #[test]
    fn pattern_corrections() {
        assert_eq!(correct_course_name("pythn avancdo"), "python avançado");
        assert_eq!(correct_course_name("javascrit bsico"), "javascript básico");
        assert_eq!(
            correct_course_name("manutecao de coputadores"),
            "manutenção de computadores"
        );
    }

    #[test]
    fn unknown_text_passes_through() {
        assert_eq!(correct_course_name("Curso Inédito de Xadrez"), "curso inedito de xadrez");
    }

    #[test]
    fn never_panics_on_odd_input() {
        assert_eq!(correct_course_name(""), "");
        assert_eq!(correct_course_name("   "), "");
        let _ = correct_course_name("🤖 pyho 🤖");
    }
}
