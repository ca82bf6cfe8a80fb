use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;
use crate::keywords::SkillTerm;
use crate::section::{self, dedup, find_block, run_chain};
use crate::{CERTIFICATIONS_LABEL, LabeledList, ParsingError, SKILLS_LABEL};

/// Bullet item: `-`/`–` at the start of a line, or any of `•*▪◦●` anywhere.
static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(?:^[ \t]*[-–]|[•*▪◦●])[ \t]*([^•*▪◦●\n]+)").unwrap());

/// A `MM/YYYY – MM/YYYY`, `MM/YYYY – Present` or `MM/YYYY` line, capturing
/// the description line after it.
static DATED_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:\d{2}/\d{4}[ \t]*[–—-][ \t]*(?:\d{2}/\d{4}|present|current|now)|\d{2}/\d{4})[^\n]*\n([^\n]+)",
    )
    .unwrap()
});

static DATE_ONLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[\d/.\s–—-]*(?:present|current|now)?[\d/.\s–—-]*$").unwrap()
});

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\(?\b(?:\d{1,2}/)?(?:19|20)\d{2}\s*(?:[–—-]|to)\s*(?:(?:\d{1,2}/)?(?:19|20)\d{2}|present|current|now)\b\)?|\b\d{1,2}/(?:19|20)\d{2}\b",
    )
    .unwrap()
});

static LEADING_BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\s•*▪◦●–-]+").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Ways of reading entries out of a certifications block, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificationStrategy {
    /// The description line after each date or date-range line.
    DatedItems,
    /// Bullet-marked items.
    Bullets,
    /// Every non-empty line that isn't just a date.
    Lines,
}

impl CertificationStrategy {
    pub const CHAIN: [Self; 3] = [Self::DatedItems, Self::Bullets, Self::Lines];

    pub fn apply(self, body: &str, config: &ParsingConfig) -> Option<Vec<String>> {
        match self {
            Self::DatedItems => captures(&DATED_ITEM_RE, body),
            Self::Bullets => captures(&BULLET_RE, body),
            Self::Lines => {
                let lines: Vec<String> = body
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty() && !DATE_ONLY_RE.is_match(l))
                    .filter(|l| l.chars().count() >= config.min_certification_len)
                    .map(str::to_string)
                    .collect();
                non_empty(lines)
            }
        }
    }
}

/// Ways of reading entries out of a skills block, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillStrategy {
    Bullets,
    /// `Category: a, b` lines, re-emitted as `Category: a`, `Category: b`.
    Categorized,
    /// Split on commas and newlines.
    Delimited,
}

impl SkillStrategy {
    pub const CHAIN: [Self; 3] = [Self::Bullets, Self::Categorized, Self::Delimited];

    pub fn apply(self, body: &str) -> Option<Vec<String>> {
        static CATEGORY_RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"(?m)^[ \t]*([A-Za-z][A-Za-z &/]*?)[ \t]*(?::|—)[ \t]*([A-Za-z0-9 ,.&+#/()-]+?)[ \t]*$",
            )
            .unwrap()
        });

        match self {
            Self::Bullets => captures(&BULLET_RE, body),
            Self::Categorized => {
                let mut items = Vec::new();
                for caps in CATEGORY_RE.captures_iter(body) {
                    let category = caps[1].trim();
                    for item in caps[2].split(',').map(str::trim).filter(|i| !i.is_empty()) {
                        items.push(format!("{}: {}", category, item));
                    }
                }
                non_empty(items)
            }
            Self::Delimited => non_empty(
                body.split([',', '\n'])
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
        }
    }
}

/// Skills and certifications found in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qualifications {
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
}

impl Qualifications {
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.certifications.is_empty()
    }

    /// `Skills:` block then `Certifications:` block, empty halves omitted.
    pub fn into_lines(self) -> Vec<String> {
        LabeledList::from(self).into_lines()
    }
}

impl From<Qualifications> for LabeledList {
    fn from(q: Qualifications) -> Self {
        LabeledList::new()
            .group(SKILLS_LABEL, q.skills)
            .group(CERTIFICATIONS_LABEL, q.certifications)
    }
}

/// Extract skills and certifications from normalized text.
pub fn extract_qualifications(text: &str) -> Result<Qualifications, ParsingError> {
    extract_qualifications_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`extract_qualifications`].
pub(crate) fn extract_qualifications_with_config(
    text: &str,
    config: &ParsingConfig,
) -> Result<Qualifications, ParsingError> {
    let certifications = extract_certifications(text, config)?;

    let mut skills = extract_skills(text, config)?;
    if skills.is_empty() {
        skills = dictionary_scan(text, &config.common_skills());
        if !skills.is_empty() {
            tracing::debug!(count = skills.len(), "skills found by dictionary scan");
        }
    }

    let skills = dedup(
        skills
            .iter()
            .map(|s| LEADING_BULLET_RE.replace(s, "").trim().to_string())
            .filter(|s| s.chars().count() >= config.min_skill_len),
    );

    Ok(Qualifications {
        skills,
        certifications,
    })
}

fn extract_certifications(text: &str, config: &ParsingConfig) -> Result<Vec<String>, ParsingError> {
    for keyword in config.certification_headers() {
        let Some(span) = find_block(text, &keyword)? else {
            continue;
        };
        if span.is_empty() {
            continue;
        }

        let Some((strategy, items)) =
            run_chain(&CertificationStrategy::CHAIN, |s| s.apply(&span.text, config))
        else {
            continue;
        };

        let cleaned = dedup(
            items
                .iter()
                .map(|item| clean_certification(item))
                .filter(|c| c.chars().count() >= config.min_certification_len),
        );
        if !cleaned.is_empty() {
            tracing::debug!(
                header = %keyword,
                ?strategy,
                count = cleaned.len(),
                preview = section::preview(&span.text, 100),
                "certifications section located"
            );
            return Ok(cleaned);
        }
    }
    Ok(Vec::new())
}

fn extract_skills(text: &str, config: &ParsingConfig) -> Result<Vec<String>, ParsingError> {
    for keyword in config.skill_headers() {
        let Some(span) = find_block(text, &keyword)? else {
            continue;
        };
        if span.is_empty() {
            continue;
        }

        let Some((strategy, items)) = run_chain(&SkillStrategy::CHAIN, |s| s.apply(&span.text))
        else {
            continue;
        };

        let collected = dedup(
            items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| s.chars().count() >= config.min_collected_skill_len),
        );
        if !collected.is_empty() {
            tracing::debug!(
                header = %keyword,
                ?strategy,
                count = collected.len(),
                preview = section::preview(&span.text, 100),
                "skills section located"
            );
            return Ok(collected);
        }
    }
    Ok(Vec::new())
}

/// Dictionary terms that occur in `text` as whole words, in dictionary order.
pub(crate) fn dictionary_scan(text: &str, dictionary: &[SkillTerm]) -> Vec<String> {
    let lower = text.to_lowercase();
    dictionary
        .iter()
        .filter(|term| {
            if term.case_sensitive {
                contains_word(text, &term.name)
            } else {
                contains_word(&lower, &term.name.to_lowercase())
            }
        })
        .map(|term| term.name.clone())
        .collect()
}

/// `needle` occurs in `haystack` with no letter, digit or underscore directly
/// on either side.
fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    haystack.match_indices(needle).any(|(i, m)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + m.len()..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}

fn clean_certification(item: &str) -> String {
    let s = DATE_RANGE_RE.replace_all(item, " ");
    let s = LEADING_BULLET_RE.replace(&s, "");
    let s = WHITESPACE_RE.replace_all(&s, " ");
    s.trim().trim_matches(|c| c == ',' || c == '|').trim().to_string()
}

fn captures(re: &Regex, body: &str) -> Option<Vec<String>> {
    non_empty(
        re.captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    if items.is_empty() { None } else { Some(items) }
}
