// ABOUTME: Regex slot filling for company, industry and role
// ABOUTME: Ordered slot rules with explicit phrases and a fallback strategy per field

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::types::{Field, InfoStatus, UserInfo};

/// Minimum number of characters for a bare reply to count as a company name
const MIN_COMPANY_CHARS: usize = 3;

const INDUSTRY_KEYWORDS: &[&str] = &[
    "tecnolog[ií]a",
    "salud",
    "educaci[óo]n",
    "finanzas",
    "retail",
    "manufactura",
    "servicios",
    "construcci[óo]n",
    "agricultura",
    "turismo",
    "entretenimiento",
    "log[ií]stica",
    "consultor[ií]a",
];

const ROLE_KEYWORDS: &[&str] = &[
    "desarrollador",
    "gerente",
    "analista",
    "director",
    "coordinador",
    "especialista",
    "consultor",
    "ingeniero",
    "dise[ñn]ador",
    "vendedor",
    "administrador",
];

/// What to try when no explicit phrase matched
enum Fallback {
    /// The whole trimmed utterance, if it looks like a name
    WholeUtterance(Regex),
    /// The first vocabulary keyword found anywhere in the text
    Keyword(Regex),
}

impl Fallback {
    fn capture(&self, text: &str) -> Option<String> {
        match self {
            Fallback::WholeUtterance(shape) => {
                (text.chars().count() >= MIN_COMPANY_CHARS && shape.is_match(text))
                    .then(|| text.to_string())
            }
            Fallback::Keyword(vocabulary) => {
                vocabulary.find(text).map(|m| m.as_str().to_string())
            }
        }
    }
}

/// Extraction rule for a single field
struct SlotRule {
    field: Field,
    explicit: Regex,
    fallback: Fallback,
}

impl SlotRule {
    fn capture(&self, text: &str) -> Option<String> {
        let explicit = self
            .explicit
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        explicit.or_else(|| self.fallback.capture(text))
    }
}

fn keyword_regex(words: &[&str]) -> Regex {
    Regex::new(&format!("(?i)(?:{})", words.join("|"))).expect("keyword vocabulary is valid")
}

static RULES: Lazy<[SlotRule; 3]> = Lazy::new(|| {
    [
        SlotRule {
            field: Field::Company,
            explicit: Regex::new(
                r"(?i)\b(?:trabajo en|empresa|compa[ñn][ií]a)(?:\s+(?:es|se llama)\b)?(?:\s*:\s*|\s+)(.+)",
            )
            .expect("company pattern is valid"),
            fallback: Fallback::WholeUtterance(
                Regex::new(r"^[\p{L}\p{N}\s.,;:&'!?()/-]+$").expect("company shape is valid"),
            ),
        },
        SlotRule {
            field: Field::Industry,
            explicit: Regex::new(r"(?i)\b(?:sector|industria|[áa]rea|rubro)\s+de\s+(.+)")
                .expect("industry pattern is valid"),
            fallback: Fallback::Keyword(keyword_regex(INDUSTRY_KEYWORDS)),
        },
        SlotRule {
            field: Field::Role,
            explicit: Regex::new(
                r"(?i)\b(?:soy|trabajo como|mi rol es|posici[óo]n de|cargo de)\s+(.+)",
            )
            .expect("role pattern is valid"),
            fallback: Fallback::Keyword(keyword_regex(ROLE_KEYWORDS)),
        },
    ]
});

/// Result of running the extractor over one utterance
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub info: UserInfo,
    pub status: InfoStatus,
    /// Field completed by this utterance, if any
    pub filled: Option<Field>,
}

/// Try to complete the first pending field from `utterance`.
///
/// Fields are filled strictly in order, so industry is only attempted once
/// company is done and role only once industry is done. At most one field is
/// filled per call, and a completed field is never evaluated again.
pub fn extract(info: &UserInfo, status: &InfoStatus, utterance: &str) -> Extraction {
    let mut info = info.clone();
    let mut status = *status;
    let text = utterance.trim();

    let pending = RULES.iter().find(|rule| !status.is_done(rule.field));

    let filled = match pending {
        Some(rule) if !text.is_empty() => rule.capture(text).map(|value| {
            debug!(field = %rule.field, value = %value, "Field captured from utterance");
            info.set(rule.field, value);
            status.mark_done(rule.field);
            rule.field
        }),
        _ => None,
    };

    Extraction {
        info,
        status,
        filled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn run(steps: &[&str]) -> Extraction {
        let mut current = Extraction {
            info: UserInfo::default(),
            status: InfoStatus::default(),
            filled: None,
        };
        for step in steps {
            current = extract(&current.info, &current.status, step);
        }
        current
    }

    #[test]
    fn test_explicit_company_mention() {
        let result = run(&["trabajo en Acme Corp"]);

        assert_eq!(result.filled, Some(Field::Company));
        assert_eq!(result.info.company(), "Acme Corp");
        assert!(result.status.is_done(Field::Company));
        assert!(!result.status.is_done(Field::Industry));
        assert!(!result.status.is_done(Field::Role));
    }

    #[rstest]
    #[case("Trabajo en   Globex  ", "Globex")]
    #[case("mi empresa es Initech", "Initech")]
    #[case("La compañía: Umbrella S.A.", "Umbrella S.A.")]
    #[case("compania Hooli", "Hooli")]
    #[case("empresa estelar", "estelar")]
    #[case("Empresas Polar", "Empresas Polar")]
    #[case("soy empresario independiente", "soy empresario independiente")]
    #[case("Compañías Unidas", "Compañías Unidas")]
    #[case("trabajo enfocado en ventas", "trabajo enfocado en ventas")]
    fn test_company_patterns(#[case] input: &str, #[case] expected: &str) {
        let result = run(&[input]);
        assert_eq!(result.info.company(), expected);
    }

    #[rstest]
    #[case("Acme", Some("Acme"))]
    #[case("  Wayne Enterprises, Inc.  ", Some("Wayne Enterprises, Inc."))]
    #[case("hola", Some("hola"))]
    #[case("ok", None)]
    #[case("¿?", None)]
    #[case("email@example.com", None)]
    fn test_company_whole_utterance_fallback(#[case] input: &str, #[case] expected: Option<&str>) {
        let result = run(&[input]);
        assert_eq!(result.status.is_done(Field::Company), expected.is_some());
        assert_eq!(result.info.company(), expected.unwrap_or(""));
    }

    #[test]
    fn test_industry_keyword_after_company() {
        let result = run(&["trabajo en Acme Corp", "el sector es tecnología"]);

        assert_eq!(result.filled, Some(Field::Industry));
        assert_eq!(result.info.industry(), "tecnología");
        assert_eq!(result.info.company(), "Acme Corp");
    }

    #[rstest]
    #[case("estamos en el sector de energía renovable", "energía renovable")]
    #[case("Rubro de alimentos", "alimentos")]
    #[case("nos dedicamos a la SALUD", "SALUD")]
    #[case("hacemos logistica y turismo", "logistica")]
    fn test_industry_patterns(#[case] input: &str, #[case] expected: &str) {
        let result = run(&["Acme", input]);
        assert_eq!(result.info.industry(), expected);
    }

    #[test]
    fn test_industry_not_found_leaves_state_untouched() {
        let before = run(&["Acme"]);
        let after = extract(&before.info, &before.status, "no estoy seguro");

        assert_eq!(after.filled, None);
        assert_eq!(after.info, before.info);
        assert_eq!(after.status, before.status);
    }

    #[test]
    fn test_role_after_industry() {
        let result = run(&["trabajo en Acme Corp", "el sector es tecnología", "soy ingeniero"]);

        assert_eq!(result.filled, Some(Field::Role));
        assert_eq!(result.info.role(), "ingeniero");
        for field in Field::ALL {
            assert!(result.status.is_done(field));
        }
    }

    #[rstest]
    #[case("mi rol es Product Owner", "Product Owner")]
    #[case("trabajo como analista de datos", "analista de datos")]
    #[case("tengo el cargo de jefe de planta", "jefe de planta")]
    #[case("me encargo de todo, básicamente gerente", "gerente")]
    fn test_role_patterns(#[case] input: &str, #[case] expected: &str) {
        let result = run(&["Acme", "tecnología", input]);
        assert_eq!(result.info.role(), expected);
    }

    #[test]
    fn test_industry_never_fires_before_company() {
        // No company pattern or fallback applies, so nothing may be filled.
        let result = run(&["el sector es tecnología @ 100%"]);

        assert_eq!(result.filled, None);
        assert!(!result.status.is_done(Field::Industry));
        assert_eq!(result.info.industry(), "");
    }

    #[test]
    fn test_role_never_fires_before_industry() {
        let result = run(&["Acme", "soy ingeniero"]);

        assert!(!result.status.is_done(Field::Role));
        assert!(!result.status.is_done(Field::Industry));
        assert_eq!(result.info.role(), "");
    }

    #[test]
    fn test_completed_fields_are_write_once() {
        let done = run(&["trabajo en Acme Corp", "el sector es tecnología", "soy ingeniero"]);
        let again = extract(
            &done.info,
            &done.status,
            "trabajo en Otra Empresa, sector de salud, soy gerente",
        );

        assert_eq!(again.filled, None);
        assert_eq!(again.info, done.info);
        assert_eq!(again.status, done.status);
    }

    #[test]
    fn test_one_field_per_utterance() {
        let result = run(&["trabajo en Acme, sector de finanzas, soy director"]);

        assert_eq!(result.filled, Some(Field::Company));
        assert!(!result.status.is_done(Field::Industry));
        assert!(!result.status.is_done(Field::Role));
    }

    #[test]
    fn test_blank_utterance_is_ignored() {
        let result = run(&["   "]);
        assert_eq!(result.filled, None);
        assert!(!result.status.is_done(Field::Company));
    }
}
