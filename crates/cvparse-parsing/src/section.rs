//! Section location.
//!
//! - [`locate_line_toggle`] walks the text line by line with an inside/outside
//!   flag. Every stretch between an open header and a close header is
//!   collected, so a section split across the document comes back merged.
//! - [`find_block`] and [`find_headed`] run one regex built from a single
//!   header keyword and keep only its first match. Callers loop over their
//!   own keyword lists.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::ops::Range;

use regex::Regex;

use crate::ParsingError;

/// Which locator produced a [`SectionSpan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStrategy {
    /// Line scan with an inside/outside toggle; accumulates every range.
    LineToggle,
    /// Single regex match from a header keyword to a terminator.
    RegexSpan,
}

impl fmt::Display for SectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionStrategy::LineToggle => write!(f, "line-toggle"),
            SectionStrategy::RegexSpan => write!(f, "regex-span"),
        }
    }
}

/// A located section of normalized text.
///
/// `ranges` are byte ranges of the body inside the text that was searched;
/// `text` is the header-exclusive body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub header: String,
    pub strategy: SectionStrategy,
    pub ranges: Vec<Range<usize>>,
    pub text: String,
}

impl SectionSpan {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Locate a section by toggling on `open` header lines and off on `close`
/// header lines. Case-insensitive. Returns `None` when no body line was seen.
pub fn locate_line_toggle(text: &str, open: &[String], close: &[String]) -> Option<SectionSpan> {
    let mut inside = false;
    let mut header: Option<String> = None;
    let mut ranges = Vec::new();
    let mut body: Vec<&str> = Vec::new();

    let mut offset = 0;
    for raw_line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += raw_line.len();
        let line = raw_line.trim_end_matches('\n');

        if let Some((kw, rest)) = match_header(line, open) {
            inside = true;
            header.get_or_insert_with(|| kw.to_string());
            if !rest.trim().is_empty() {
                push_body(text, line_start, line, rest, &mut ranges, &mut body);
            }
            continue;
        }

        if !inside {
            continue;
        }

        if match_header(line, close).is_some() {
            inside = false;
            continue;
        }

        if !line.trim().is_empty() {
            push_body(text, line_start, line, line, &mut ranges, &mut body);
        }
    }

    if body.is_empty() {
        return None;
    }

    Some(SectionSpan {
        header: header.unwrap_or_default(),
        strategy: SectionStrategy::LineToggle,
        ranges,
        text: body.join("\n"),
    })
}

/// Record `part` (a suffix of `line`) as a body line.
fn push_body<'a>(
    text: &'a str,
    line_start: usize,
    line: &'a str,
    part: &'a str,
    ranges: &mut Vec<Range<usize>>,
    body: &mut Vec<&'a str>,
) {
    let trimmed = part.trim();
    let start = line_start + (line.len() - part.len()) + (part.len() - part.trim_start().len());
    let range = start..start + trimmed.len();
    // Adjacent lines extend the previous range.
    match ranges.last_mut() {
        Some(last) if text[last.end..range.start].trim().is_empty() && !body.is_empty() => {
            last.end = range.end;
        }
        _ => ranges.push(range),
    }
    body.push(trimmed);
}

/// If `line` is a header for one of `keywords`, return the keyword and the
/// text after the header's colon (empty when the line is the bare keyword).
pub(crate) fn match_header<'a, 'k>(line: &'a str, keywords: &'k [String]) -> Option<(&'k str, &'a str)> {
    let trimmed = line.trim_start();
    keywords.iter().find_map(|kw| {
        let rest = strip_prefix_ignore_case(trimmed, kw)?;
        if rest.trim().is_empty() {
            Some((kw.as_str(), ""))
        } else {
            rest.trim_start()
                .strip_prefix(':')
                .map(|after| (kw.as_str(), after))
        }
    })
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let mut chars = s.chars();
    for p in prefix.chars().flat_map(char::to_lowercase) {
        let c = chars.next()?;
        let mut lower = c.to_lowercase();
        if lower.next() != Some(p) || lower.next().is_some() {
            return None;
        }
    }
    Some(chars.as_str())
}

/// Find the block following `keyword`: everything after the keyword (and any
/// colon/whitespace) up to a blank line, a line starting with an uppercase
/// letter, or the end of the text.
///
/// A line starting with an `MM/YYYY` date keeps the line after it, so dated
/// entries are not cut at their capitalized description.
pub fn find_block(text: &str, keyword: &str) -> Result<Option<SectionSpan>, ParsingError> {
    let pattern = format!(
        r"(?is)\b{}[:\s]*((?:\d{{2}}/\d{{4}}[^\n]*\n[^\n]*|.)*?)(?:\n[ \t]*\n|\n(?-i:[A-Z])|\z)",
        keyword_pattern(keyword)
    );
    let re = compile(keyword, &pattern)?;
    Ok(span_from_capture(&re, text, keyword))
}

/// Find the section headed by `keyword`: the keyword must start a line and
/// be followed by a colon or the end of the line. The body runs to the next
/// line that is one of `terminators` (optionally followed by a colon), or to
/// the end of the text.
pub fn find_headed(
    text: &str,
    keyword: &str,
    terminators: &[String],
) -> Result<Option<SectionSpan>, ParsingError> {
    let end = if terminators.is_empty() {
        r"\z".to_string()
    } else {
        let terms: Vec<String> = terminators.iter().map(|t| keyword_pattern(t)).collect();
        format!(r"\n[ \t]*(?:{})[ \t]*(?::|$)|\z", terms.join("|"))
    };
    let pattern = format!(
        r"(?ims)(?:\A|\n)[ \t]*{}[ \t]*(?::|$)(.*?)(?:{})",
        keyword_pattern(keyword),
        end
    );
    let re = compile(keyword, &pattern)?;
    Ok(span_from_capture(&re, text, keyword))
}

fn span_from_capture(re: &Regex, text: &str, keyword: &str) -> Option<SectionSpan> {
    let body = re.captures(text)?.get(1)?;
    let raw = body.as_str();
    let trimmed = raw.trim();
    let start = body.start() + (raw.len() - raw.trim_start().len());

    Some(SectionSpan {
        header: keyword.to_string(),
        strategy: SectionStrategy::RegexSpan,
        ranges: vec![start..start + trimmed.len()],
        text: trimmed.to_string(),
    })
}

/// Escape a keyword for use inside a pattern; spaces match any run of
/// horizontal whitespace.
fn keyword_pattern(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"[ \t]+")
}

pub(crate) fn compile(keyword: &str, pattern: &str) -> Result<Regex, ParsingError> {
    Regex::new(pattern).map_err(|source| ParsingError::Pattern {
        keyword: keyword.to_string(),
        source,
    })
}

/// Run an ordered strategy chain, returning the first strategy that yields a
/// non-empty result together with that result.
pub(crate) fn run_chain<S: Copy>(
    chain: &[S],
    mut apply: impl FnMut(S) -> Option<Vec<String>>,
) -> Option<(S, Vec<String>)> {
    chain
        .iter()
        .find_map(|&strategy| apply(strategy).filter(|v| !v.is_empty()).map(|v| (strategy, v)))
}

/// Drop repeated items, keeping the first occurrence of each in order.
pub(crate) fn dedup<T: Eq + Hash + Clone>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// At most `max_chars` characters of `text`, for log output.
pub(crate) fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((i, _)) => &text[..i],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kws(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_match_header() {
        let keywords = kws(&["education", "academic background"]);
        assert_eq!(match_header("Education", &keywords), Some(("education", "")));
        assert_eq!(match_header("  EDUCATION  ", &keywords), Some(("education", "")));
        assert_eq!(
            match_header("Academic Background: MIT", &keywords),
            Some(("academic background", " MIT"))
        );
        assert_eq!(match_header("Education and training", &keywords), None);
        assert_eq!(match_header("Continuing education", &keywords), None);
    }

    #[test]
    fn test_line_toggle_basic() {
        let text = "John Smith\n\nEducation\nStanford University\nBSc in CS\n\nSkills\nPython";
        let span = locate_line_toggle(text, &kws(&["education"]), &kws(&["skills"])).unwrap();
        assert_eq!(span.header, "education");
        assert_eq!(span.strategy, SectionStrategy::LineToggle);
        assert_eq!(span.text, "Stanford University\nBSc in CS");
        assert_eq!(span.ranges.len(), 1);
        assert_eq!(&text[span.ranges[0].clone()], "Stanford University\nBSc in CS");
    }

    #[test]
    fn test_line_toggle_accumulates_discontiguous_sections() {
        let text = "Education\nMIT\nSkills\nRust\nEducation\nHarvard College\nAwards\nNone";
        let span = locate_line_toggle(
            text,
            &kws(&["education"]),
            &kws(&["skills", "awards"]),
        )
        .unwrap();
        assert_eq!(span.text, "MIT\nHarvard College");
        assert_eq!(span.ranges.len(), 2);
    }

    #[test]
    fn test_line_toggle_keeps_text_after_colon() {
        let text = "Education: Yale University\nBA History\nExperience\nClerk";
        let span = locate_line_toggle(text, &kws(&["education"]), &kws(&["experience"])).unwrap();
        assert_eq!(span.text, "Yale University\nBA History");
    }

    #[test]
    fn test_line_toggle_missing() {
        assert!(locate_line_toggle("no headers", &kws(&["education"]), &kws(&["skills"])).is_none());
        assert!(locate_line_toggle("Education\n\nSkills", &kws(&["education"]), &kws(&["skills"])).is_none());
        assert!(locate_line_toggle("", &kws(&["education"]), &[]).is_none());
    }

    #[test]
    fn test_find_block_stops_at_capitalized_line() {
        let text = "Skills: rust, go\nsql\nProjects\nfoo";
        let span = find_block(text, "skills").unwrap().unwrap();
        assert_eq!(span.text, "rust, go\nsql");
        assert_eq!(span.strategy, SectionStrategy::RegexSpan);
        assert_eq!(&text[span.ranges[0].clone()], "rust, go\nsql");
    }

    #[test]
    fn test_find_block_stops_at_blank_line() {
        let span = find_block("Skills\nPython, Java\n\nreferences", "skills")
            .unwrap()
            .unwrap();
        assert_eq!(span.text, "Python, Java");
    }

    #[test]
    fn test_find_block_date_line_owns_next_line() {
        let text = "Certifications\n03/2020 - Present\nAWS Certified Solutions Architect\n\nSkills";
        let span = find_block(text, "certifications").unwrap().unwrap();
        assert_eq!(span.text, "03/2020 - Present\nAWS Certified Solutions Architect");
    }

    #[test]
    fn test_find_block_absent() {
        assert!(find_block("nothing to see", "skills").unwrap().is_none());
    }

    #[test]
    fn test_find_headed_runs_to_terminator() {
        let text = "Summary\nHi\nProjects\nChess engine written in Rust\nWeb crawler\nEducation\nMIT";
        let span = find_headed(text, "projects", &kws(&["Education", "Skills"]))
            .unwrap()
            .unwrap();
        assert_eq!(span.text, "Chess engine written in Rust\nWeb crawler");
    }

    #[test]
    fn test_find_headed_requires_line_start() {
        let text = "I love side projects\nmore";
        assert!(find_headed(text, "projects", &[]).unwrap().is_none());
    }

    #[test]
    fn test_find_headed_multiword_keyword() {
        let text = "Work  Experience:\nEngineer at Acme Corp for five years\nSkills\nRust";
        let span = find_headed(text, "work experience", &kws(&["skills"]))
            .unwrap()
            .unwrap();
        assert_eq!(span.text, "Engineer at Acme Corp for five years");
    }

    #[test]
    fn test_find_headed_empty_body() {
        let span = find_headed("Projects\nEducation\nMIT", "projects", &kws(&["education"]))
            .unwrap()
            .unwrap();
        assert!(span.is_empty());
    }

    #[test]
    fn test_keywords_are_escaped() {
        let span = find_block("C++ (advanced): templates", "C++ (advanced)").unwrap().unwrap();
        assert_eq!(span.text, "templates");
    }

    #[test]
    fn test_run_chain_picks_first_non_empty() {
        let result = run_chain(&[1, 2, 3], |n| match n {
            1 => None,
            2 => Some(vec![]),
            _ => Some(vec!["three".to_string()]),
        });
        assert_eq!(result, Some((3, vec!["three".to_string()])));
        assert_eq!(run_chain(&[1], |_| None), None);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let items = kws(&["Rust", "Go", "Rust", "SQL", "Go"]);
        assert_eq!(dedup(items), kws(&["Rust", "Go", "SQL"]));
        assert!(dedup(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_dedup_large_input() {
        let items: Vec<String> = (0..200_000).map(|i| format!("item{}", i % 100_000)).collect();
        let out = dedup(items);
        assert_eq!(out.len(), 100_000);
        assert_eq!(out[0], "item0");
        assert_eq!(out[99_999], "item99999");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("héllo", 2), "hé");
        assert_eq!(preview("hi", 10), "hi");
    }
}
