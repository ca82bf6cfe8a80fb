use once_cell::sync::Lazy;
use regex::Regex;

use crate::PersonalInfo;
use crate::config::ParsingConfig;
use crate::keywords::{ADDRESS_NOUNS, DOCUMENT_TITLE_WORDS};

/// Name patterns, most specific first:
/// 1. ALL-CAPS multi-word name at the very start
/// 2. `First Last` at the very start
/// 3. `First Last` anywhere
/// 4. `Name: First Last`
static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\A[ \t]*([A-Z][A-Z'\-]+(?:[ \t]+[A-Z][A-Z'\-]+){1,3})\b",
        r"\A[ \t]*([A-Z][a-z]+[ \t]+[A-Z][a-z]+)\b",
        r"\b([A-Z][a-z]+[ \t]+[A-Z][a-z]+)\b",
        r"Name:?[ \t]*([A-Z][a-z]+[ \t]+[A-Z][a-z]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static EMAIL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        r"(?i)\bemail:?[ \t]*([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})",
        r"(?i)\be-mail:?[ \t]*([A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Phone patterns: international/local, compact `DD(D)-DDDDDDD`, then labelled.
static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?:\+\d{1,3}[-. ]?)?(?:\(\d{3}\)|\b\d{3})[-. ]?\d{3}[-. ]?\d{4}\b",
        r"\b\d{2,3}[-. ]?\d{7,10}\b",
        r"(?i)\b(?:phone|telephone|tel|mobile|cell):?[ \t]*(\+?[\d \-().]{7,})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Words that disqualify a name candidate (address lines, document titles).
static NAME_REJECT_RE: Lazy<Regex> = Lazy::new(|| {
    let words: Vec<&str> = ADDRESS_NOUNS
        .iter()
        .chain(DOCUMENT_TITLE_WORDS)
        .copied()
        .collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|"))).unwrap()
});

const MIN_PHONE_LEN: usize = 7;

/// Extract name, email and phone from normalized text.
pub fn extract_personal_info(text: &str) -> PersonalInfo {
    extract_personal_info_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`extract_personal_info`].
pub(crate) fn extract_personal_info_with_config(text: &str, config: &ParsingConfig) -> PersonalInfo {
    PersonalInfo {
        name: extract_name(text, config),
        email: extract_email(text, config),
        phone: extract_phone(text, config),
    }
}

pub(crate) fn extract_name(text: &str, config: &ParsingConfig) -> Option<String> {
    let patterns = config.name_patterns.resolve(&NAME_PATTERNS);
    first_accepted(text, &patterns, |name| !NAME_REJECT_RE.is_match(name))
}

pub(crate) fn extract_email(text: &str, config: &ParsingConfig) -> Option<String> {
    let patterns = config.email_patterns.resolve(&EMAIL_PATTERNS);
    first_accepted(text, &patterns, |_| true)
}

pub(crate) fn extract_phone(text: &str, config: &ParsingConfig) -> Option<String> {
    let patterns = config.phone_patterns.resolve(&PHONE_PATTERNS);
    first_accepted(text, &patterns, |phone| phone.chars().count() >= MIN_PHONE_LEN)
}

/// Walk the patterns in order and return the first match `accept` allows.
///
/// Capture group 1 is the value when the pattern has one, otherwise the whole
/// match. A rejected candidate moves on to the same pattern's next match,
/// not straight to the next pattern.
fn first_accepted(text: &str, patterns: &[Regex], accept: impl Fn(&str) -> bool) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures_iter(text).find_map(|caps| {
            let m = caps.get(1).or_else(|| caps.get(0))?;
            let value = m.as_str().trim();
            (!value.is_empty() && accept(value)).then(|| value.to_string())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParsingConfigBuilder;

    #[test]
    fn test_basic_contact_block() {
        let info = extract_personal_info(
            "John Smith\njohn.smith@email.com\n(555) 123-4567\n\nEducation",
        );
        assert_eq!(info.name.as_deref(), Some("John Smith"));
        assert_eq!(info.email.as_deref(), Some("john.smith@email.com"));
        assert_eq!(info.phone.as_deref(), Some("(555) 123-4567"));
    }

    #[test]
    fn test_all_caps_name() {
        let info = extract_personal_info("MARY-JANE O'NEIL\nSoftware Engineer");
        assert_eq!(info.name.as_deref(), Some("MARY-JANE O'NEIL"));
    }

    #[test]
    fn test_name_rejects_address_line() {
        let config = ParsingConfig::default();
        assert_eq!(
            extract_name("42 Baker Street\nJane Doe", &config).as_deref(),
            Some("Jane Doe")
        );
        assert_eq!(
            extract_name("Curriculum Vitae\nJane Doe", &config).as_deref(),
            Some("Jane Doe")
        );
    }

    #[test]
    fn test_rejected_name_continues_within_pattern() {
        let config = ParsingConfigBuilder::new()
            .set_name_patterns(vec![r"\b([A-Z][a-z]+[ \t]+[A-Z][a-z]+)\b".to_string()])
            .build()
            .unwrap();
        assert_eq!(
            extract_name("Maple Street, Springfield\nJane Doe", &config).as_deref(),
            Some("Jane Doe")
        );
    }

    #[test]
    fn test_name_label() {
        let config = ParsingConfig::default();
        assert_eq!(
            extract_name("profile\nname: x\nName: Ada Lovelace", &config).as_deref(),
            Some("Ada Lovelace")
        );
    }

    #[test]
    fn test_labelled_email() {
        let config = ParsingConfig::default();
        assert_eq!(
            extract_email("E-mail: ada@analytical.engine.org", &config).as_deref(),
            Some("ada@analytical.engine.org")
        );
    }

    #[test]
    fn test_phone_variants() {
        let config = ParsingConfig::default();
        assert_eq!(
            extract_phone("call +1 555-123-4567 now", &config).as_deref(),
            Some("+1 555-123-4567")
        );
        assert_eq!(
            extract_phone("cell 555.123.4567", &config).as_deref(),
            Some("555.123.4567")
        );
        assert_eq!(
            extract_phone("contact 021-5551234", &config).as_deref(),
            Some("021-5551234")
        );
    }

    #[test]
    fn test_labelled_phone_too_short() {
        let config = ParsingConfig::default();
        assert_eq!(extract_phone("Tel: 12 34", &config), None);
    }

    #[test]
    fn test_missing_fields_stay_none() {
        let info = extract_personal_info("nothing useful here");
        assert!(info.is_empty());
        assert!(extract_personal_info("").is_empty());
    }

    #[test]
    fn test_custom_phone_pattern() {
        let config = ParsingConfigBuilder::new()
            .set_phone_patterns(vec![r"\b\d{4} \d{4}\b".to_string()])
            .build()
            .unwrap();
        assert_eq!(
            extract_phone("ring 9123 4567", &config).as_deref(),
            Some("9123 4567")
        );
    }
}
