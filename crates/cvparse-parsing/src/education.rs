use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;
use crate::keywords::{EDUCATION_REJECT_TERMS, REFERENCE_CONTEXT_TERMS};
use crate::normalize::{advance_chars, retreat_chars};
use crate::section::{self, dedup, locate_line_toggle};
use crate::EducationEntry;

static INSTITUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[^.,\n]{0,100}\b(?:University|College|Institute|School)\b[^.,\n]{0,100}")
        .unwrap()
});

/// Degree abbreviation or word, plus the rest of its clause on the same line
/// (`BSc in Computer Science`, `Master of Arts`).
static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:B\.?Sc|M\.?Sc|Ph\.?D|Bachelor(?:'?s)?|Master(?:'?s)?|Diploma)\b\.?|B\.A\.|M\.A\.|B\.S\.|M\.S\.)(?:[^\S\n]+[A-Za-z&(][\w&'().-]*)*",
    )
    .unwrap()
});

/// Extract education entries, each rendered as `"institution\ndegree"` or the
/// institution alone.
pub fn extract_education(text: &str) -> Vec<String> {
    extract_education_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`extract_education`].
pub(crate) fn extract_education_with_config(text: &str, config: &ParsingConfig) -> Vec<String> {
    let mut entries = Vec::new();

    if let Some(span) = locate_line_toggle(
        text,
        &config.education_headers(),
        &config.education_terminators(),
    ) {
        tracing::debug!(
            header = %span.header,
            strategy = %span.strategy,
            preview = section::preview(&span.text, 100),
            "education section located"
        );
        entries = find_entries(&span.text, config, Scan::Section);
    }

    if entries.is_empty() {
        entries = find_entries(text, config, Scan::WholeText);
        if !entries.is_empty() {
            tracing::debug!(count = entries.len(), "education found by whole-text scan");
        }
    }

    dedup(
        entries
            .iter()
            .map(EducationEntry::render)
            .filter(|line| {
                let lower = line.to_lowercase();
                !EDUCATION_REJECT_TERMS.iter().any(|t| lower.contains(t))
            }),
    )
}

/// Where [`find_entries`] is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    /// Inside a located education section; an institution alone is an entry.
    Section,
    /// Anywhere in the document. Mentions in reference context are skipped
    /// and an institution only counts when a degree follows it.
    WholeText,
}

/// Pair every institution mention in `text` with the first degree found
/// shortly after it.
fn find_entries(text: &str, config: &ParsingConfig, scan: Scan) -> Vec<EducationEntry> {
    let mut entries = Vec::new();

    for m in INSTITUTION_RE.find_iter(text) {
        if scan == Scan::WholeText
            && in_reference_context(text, m.start(), m.end(), config.reference_context)
        {
            tracing::debug!(mention = m.as_str().trim(), "skipping institution in reference context");
            continue;
        }

        let institution = clean(m.as_str());
        if institution.is_empty() {
            continue;
        }

        let window_end = advance_chars(text, m.end(), config.degree_window);
        let degree = DEGREE_RE
            .find(&text[m.end()..window_end])
            .map(|d| clean(d.as_str()))
            .filter(|d| !d.is_empty());

        if scan == Scan::WholeText && degree.is_none() {
            tracing::debug!(mention = %institution, "skipping institution without a degree");
            continue;
        }

        entries.push(EducationEntry::new(institution, degree));
    }

    dedup(entries)
}

fn in_reference_context(text: &str, start: usize, end: usize, radius: usize) -> bool {
    let from = retreat_chars(text, start, radius);
    let to = advance_chars(text, end, radius);
    let context = text[from..to].to_lowercase();
    REFERENCE_CONTEXT_TERMS.iter().any(|t| context.contains(t))
}

/// Strip bullets/numbering, trailing dates and year ranges, trailing
/// certificate mentions and trailing periods.
fn clean(s: &str) -> String {
    static LEADING_MARKER_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[\s•\-*▪◦●\d.]+").unwrap());
    static DATE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\d{1,2}[/-]\d{1,2}[/-]\d{2,4}.*$").unwrap());
    static YEAR_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(
            r"(?i)[\s,(|-]*\b(?:\d{1,2}/)?(?:19|20)\d{2}\s*(?:[-–—]|to)\s*(?:(?:\d{1,2}/)?(?:19|20)\d{2}|present|current|now)\b\)?\s*$",
        )
        .unwrap()
    });
    static YEAR_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[\s,(|-]*\b(?:\d{1,2}/)?(?:19|20)\d{2}\)?\s*$").unwrap());
    static CERTIFICATE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)\s*\bcertificates?\b.*$").unwrap());

    let s = LEADING_MARKER_RE.replace(s, "");
    let s = DATE_RE.replace(&s, "");
    let s = YEAR_RANGE_RE.replace(&s, "");
    let s = YEAR_RE.replace(&s, "");
    let s = CERTIFICATE_RE.replace(&s, "");
    s.trim().trim_end_matches('.').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_with_degree() {
        let text = "John Smith\n\nEducation\nStanford University\nBSc in Computer Science\n\nSkills\nPython";
        assert_eq!(
            extract_education(text),
            vec!["Stanford University\nBSc in Computer Science"]
        );
    }

    #[test]
    fn test_institution_without_degree() {
        let text = "Education\nMassachusetts Institute of Technology\nExperience\nEngineer";
        assert_eq!(
            extract_education(text),
            vec!["Massachusetts Institute of Technology"]
        );
    }

    #[test]
    fn test_multiple_entries_and_dates() {
        let text = "Education\n\
                    • University of Toronto, 2015 - 2019\n\
                    Master of Applied Science 2019 – Present\n\
                    • Seneca College\n\
                    Diploma in Computer Programming 05/12/2014\n\
                    Skills\nRust";
        assert_eq!(
            extract_education(text),
            vec![
                "University of Toronto\nMaster of Applied Science",
                "Seneca College\nDiploma in Computer Programming",
            ]
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let text = "Education\nStanford University\nBSc in Physics\nStanford University\nBSc in Physics\nSkills\nGo";
        assert_eq!(extract_education(text), vec!["Stanford University\nBSc in Physics"]);
    }

    #[test]
    fn test_whole_text_fallback() {
        let text = "Jane Doe\nOxford University, MSc in Statistics\nSkills: R";
        assert_eq!(
            extract_education(text),
            vec!["Oxford University\nMSc in Statistics"]
        );
    }

    #[test]
    fn test_fallback_needs_a_degree() {
        let text = "Jane Doe\nWork Experience\nMath teacher at Springfield Elementary School for six years\n";
        assert!(extract_education(text).is_empty());

        // Inside an education section an institution alone still counts.
        let text = "Education\nSpringfield Elementary School\nSkills\nRust";
        assert_eq!(extract_education(text), vec!["Springfield Elementary School"]);
    }

    #[test]
    fn test_fallback_pairs_following_degree() {
        let text = "Jane Doe\nUniversity of Cape Town\nBachelor of Commerce 2012 - 2015";
        assert_eq!(
            extract_education(text),
            vec!["University of Cape Town\nBachelor of Commerce"]
        );
    }

    #[test]
    fn test_fallback_skips_reference_context() {
        let text = "Referees\nDr. Alan Grant, Professor at Montana State University\nalan@msu.edu";
        assert!(extract_education(text).is_empty());
    }

    #[test]
    fn test_reference_without_institution() {
        assert!(extract_education("Reference: Dr. Jane Doe, Professor at MIT").is_empty());
    }

    #[test]
    fn test_certificate_lines_are_not_education() {
        let text = "Education\nCertificate from Google Career School\nExperience\nBarista";
        assert!(extract_education(text).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_education("").is_empty());
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean("• 1. Stanford University."), "Stanford University");
        assert_eq!(clean("BSc in CS 09/2015 - 06/2019"), "BSc in CS");
        assert_eq!(clean("Yale University (2012 - 2016)"), "Yale University");
        assert_eq!(clean("MIT 2019 – Present"), "MIT");
        assert_eq!(clean("Diploma in Nursing Certificate IV"), "Diploma in Nursing");
    }

    #[test]
    fn test_degree_pattern() {
        let find = |s: &str| DEGREE_RE.find(s).map(|m| m.as_str().to_string());
        assert_eq!(find("BSc in Computer Science").as_deref(), Some("BSc in Computer Science"));
        assert_eq!(find("Masters in Data Science, 2020").as_deref(), Some("Masters in Data Science"));
        assert_eq!(find("Ph.D. Physics").as_deref(), Some("Ph.D. Physics"));
        assert_eq!(find("B.A. English 2010").as_deref(), Some("B.A. English"));
        assert_eq!(find("Mastering Kubernetes"), None);
    }
}
