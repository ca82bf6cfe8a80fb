use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;
use crate::keywords::{
    BODY_LEADING_VERBS, ENTRY_TRUNCATION_MARKERS, PROJECT_ACTION_VERBS, PROJECT_SECTION_TERMINATORS,
    PROJECT_TITLE_NOUNS, WORK_SECTION_TERMINATORS,
};
use crate::section::{self, SectionSpan, dedup, find_headed, run_chain};
use crate::{LabeledList, PROJECTS_LABEL, ParsingError, WORK_EXPERIENCE_LABEL};

static TITLE_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9 \t&-]+(?:[ \t]|$)").unwrap());

static TRUNCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?im)^[ \t]*(?:{})[ \t]*(?::|$)",
        ENTRY_TRUNCATION_MARKERS.join("|")
    ))
    .unwrap()
});

static PROJECT_NOUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})s?\b", PROJECT_TITLE_NOUNS.join("|"))).unwrap()
});

static ACTION_VERB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", PROJECT_ACTION_VERBS.join("|"))).unwrap()
});

static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

const BULLET_MARKERS: &[char] = &['•', '*', '▪', '◦', '●', '-', '–'];

/// Lines shorter than this may be titles.
const MAX_TITLE_CHARS: usize = 60;
/// Salvaged titles shorter than this may be capitalized phrases.
const MAX_SALVAGE_TITLE_CHARS: usize = 50;

/// Ways of splitting a section body into entries, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStrategy {
    /// New entry at every title-like line. Needs more than one piece.
    TitleSplit,
    /// A heading line plus the bullet lines directly under it.
    BulletGroups,
    /// Blank-line separated paragraphs.
    Paragraphs,
}

impl EntryStrategy {
    pub const CHAIN: [Self; 3] = [Self::TitleSplit, Self::BulletGroups, Self::Paragraphs];

    pub fn apply(self, body: &str) -> Option<Vec<String>> {
        match self {
            Self::TitleSplit => {
                let mut pieces: Vec<Vec<&str>> = Vec::new();
                for (i, line) in body.lines().enumerate() {
                    if i == 0 || is_title_like(line) {
                        pieces.push(Vec::new());
                    }
                    if let Some(piece) = pieces.last_mut() {
                        piece.push(line);
                    }
                }
                let entries = join_pieces(pieces);
                if entries.len() > 1 { Some(entries) } else { None }
            }
            Self::BulletGroups => {
                let lines: Vec<&str> = body.lines().collect();
                let mut groups: Vec<Vec<&str>> = Vec::new();
                let mut open = false;
                for (i, line) in lines.iter().enumerate() {
                    if line.trim().is_empty() {
                        open = false;
                    } else if is_bullet(line) {
                        if !open {
                            groups.push(Vec::new());
                            open = true;
                        }
                        if let Some(group) = groups.last_mut() {
                            group.push(*line);
                        }
                    } else if lines.get(i + 1).is_some_and(|next| is_bullet(next)) {
                        groups.push(vec![*line]);
                        open = true;
                    } else {
                        open = false;
                    }
                }
                let entries = join_pieces(groups);
                if entries.is_empty() { None } else { Some(entries) }
            }
            Self::Paragraphs => {
                let entries: Vec<String> = PARAGRAPH_BREAK_RE
                    .split(body)
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect();
                if entries.is_empty() { None } else { Some(entries) }
            }
        }
    }
}

/// Work and project entries found in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Experience {
    pub work: Vec<String>,
    pub projects: Vec<String>,
}

impl Experience {
    pub fn is_empty(&self) -> bool {
        self.work.is_empty() && self.projects.is_empty()
    }

    /// `Work Experience:` block then `Projects:` block, empty halves omitted.
    pub fn into_lines(self) -> Vec<String> {
        LabeledList::from(self).into_lines()
    }
}

impl From<Experience> for LabeledList {
    fn from(e: Experience) -> Self {
        LabeledList::new()
            .group(WORK_EXPERIENCE_LABEL, e.work)
            .group(PROJECTS_LABEL, e.projects)
    }
}

/// Extract work-experience and project entries from normalized text.
pub fn extract_experience(text: &str) -> Result<Experience, ParsingError> {
    extract_experience_with_config(text, &ParsingConfig::default())
}

/// Config-aware version of [`extract_experience`].
pub(crate) fn extract_experience_with_config(
    text: &str,
    config: &ParsingConfig,
) -> Result<Experience, ParsingError> {
    let project_headers = config.project_headers();
    let work_headers = config.work_headers();

    let project_terminators = terminators(PROJECT_SECTION_TERMINATORS, &work_headers);
    let work_terminators = terminators(WORK_SECTION_TERMINATORS, &project_headers);

    let (projects_found, project_span) = find_section(text, &project_headers, &project_terminators)?;
    let (_, work_span) = find_section(text, &work_headers, &work_terminators)?;

    let mut projects = project_span
        .as_ref()
        .map(|span| split_entries(span, config))
        .unwrap_or_default();
    let work = work_span
        .as_ref()
        .map(|span| split_entries(span, config))
        .unwrap_or_default();

    if !projects_found {
        // Work entries often mention systems and tools; keep them out.
        let masked = match &work_span {
            Some(span) => mask_ranges(text, &span.ranges),
            None => text.to_string(),
        };
        projects = salvage_projects(&masked, config);
        if !projects.is_empty() {
            tracing::debug!(count = projects.len(), "projects salvaged from title keywords");
        }
    }

    Ok(Experience { work, projects })
}

fn terminators(fixed: &[&str], other_headers: &[String]) -> Vec<String> {
    fixed
        .iter()
        .map(|s| s.to_string())
        .chain(other_headers.iter().cloned())
        .collect()
}

/// Try each header keyword in turn. Returns whether any header line was seen
/// at all, and the first span with a non-empty body.
fn find_section(
    text: &str,
    headers: &[String],
    terminators: &[String],
) -> Result<(bool, Option<SectionSpan>), ParsingError> {
    let mut found = false;
    for keyword in headers {
        if let Some(span) = find_headed(text, keyword, terminators)? {
            found = true;
            if !span.is_empty() {
                return Ok((true, Some(span)));
            }
        }
    }
    Ok((found, None))
}

fn split_entries(span: &SectionSpan, config: &ParsingConfig) -> Vec<String> {
    let Some((strategy, raw)) = run_chain(&EntryStrategy::CHAIN, |s| s.apply(&span.text)) else {
        return Vec::new();
    };

    let entries = dedup(
        raw.iter()
            .map(|entry| truncate_at_marker(entry))
            .filter(|entry| entry.chars().count() >= config.min_entry_len),
    );

    tracing::debug!(
        header = %span.header,
        ?strategy,
        count = entries.len(),
        preview = section::preview(&span.text, 100),
        "experience section split"
    );
    entries
}

/// Cut an entry at the first line that is another section's header.
fn truncate_at_marker(entry: &str) -> String {
    let end = TRUNCATION_RE.find(entry).map(|m| m.start()).unwrap_or(entry.len());
    entry[..end].trim().to_string()
}

/// Scan line by line for project-looking titles and take each with the
/// description lines that follow it.
fn salvage_projects(text: &str, config: &ParsingConfig) -> Vec<String> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut projects: Vec<String> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        if lines[i].is_empty() || !is_salvage_title(&lines, i) {
            i += 1;
            continue;
        }

        let mut body = vec![lines[i]];
        let mut last = i;
        let limit = (i + 1 + config.salvage_lookahead).min(lines.len());
        for (k, next) in lines.iter().enumerate().take(limit).skip(i + 1) {
            if next.is_empty() {
                continue;
            }
            if k > i + 1 && is_short_capitalized(next) {
                break;
            }
            body.push(*next);
            last = k;
        }

        let entry = body.join("\n");
        if entry.chars().count() >= config.min_salvaged_project_len {
            projects.push(entry);
        }
        i = last + 1;
    }

    dedup(projects)
}

fn is_salvage_title(lines: &[&str], i: usize) -> bool {
    let line = lines[i];
    if PROJECT_NOUN_RE.is_match(line) {
        return true;
    }
    is_short_capitalized(line)
        && lines
            .get(i + 1)
            .is_some_and(|next| ACTION_VERB_RE.is_match(next))
}

fn is_short_capitalized(line: &str) -> bool {
    line.chars().next().is_some_and(char::is_uppercase)
        && line.chars().count() < MAX_SALVAGE_TITLE_CHARS
}

/// A short capitalized heading such as `Software Engineer at Acme Corp`.
///
/// Lines ending in a period, starting with a body verb (`Developed ...`) or
/// reading like a sentence (more than one long lowercase word) are body text.
pub(crate) fn is_title_like(line: &str) -> bool {
    let line = line.trim();
    if !TITLE_START_RE.is_match(line)
        || line.chars().count() >= MAX_TITLE_CHARS
        || line.ends_with('.')
    {
        return false;
    }

    let mut words = line.split_whitespace();
    let first = words.next().unwrap_or_default().to_lowercase();
    if BODY_LEADING_VERBS.contains(&first.as_str()) {
        return false;
    }

    let lowercase_words = words
        .filter(|w| w.chars().next().is_some_and(char::is_lowercase) && w.chars().count() > 3)
        .count();
    lowercase_words <= 1
}

fn is_bullet(line: &str) -> bool {
    line.trim_start().starts_with(BULLET_MARKERS)
}

fn join_pieces(pieces: Vec<Vec<&str>>) -> Vec<String> {
    pieces
        .into_iter()
        .map(|p| p.join("\n").trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Replace every range of `text` with a line break.
fn mask_ranges(text: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for range in ranges {
        out.push_str(&text[pos..range.start]);
        out.push('\n');
        pos = range.end;
    }
    out.push_str(&text[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_like() {
        assert!(is_title_like("Software Engineer at Acme Corp"));
        assert!(is_title_like("Data Analyst - Globex (2019 - 2021)"));
        assert!(is_title_like("Weather App"));
        assert!(!is_title_like("Developed billing services in Rust"));
        assert!(!is_title_like("A bitboard chess engine written in Rust"));
        assert!(!is_title_like("Shipped the product on time."));
        assert!(!is_title_like("• Supports UCI protocol"));
        assert!(!is_title_like("lowercase start"));
        assert!(!is_title_like(""));
    }

    #[test]
    fn test_title_split() {
        let body = "Software Engineer at Acme Corp\nDeveloped billing services in Rust\nData Analyst at Globex\nCreated dashboards for sales";
        assert_eq!(
            EntryStrategy::TitleSplit.apply(body).unwrap(),
            vec![
                "Software Engineer at Acme Corp\nDeveloped billing services in Rust",
                "Data Analyst at Globex\nCreated dashboards for sales",
            ]
        );
        assert!(EntryStrategy::TitleSplit.apply("Only One Title\nbody text").is_none());
    }

    #[test]
    fn test_bullet_groups() {
        let body = "intro text\nbackend work at initech\n• wrote services\n• on call\n\nfrontend work at hooli\n- built widgets";
        assert_eq!(
            EntryStrategy::BulletGroups.apply(body).unwrap(),
            vec![
                "backend work at initech\n• wrote services\n• on call",
                "frontend work at hooli\n- built widgets",
            ]
        );
        assert!(EntryStrategy::BulletGroups.apply("no bullets at all").is_none());
    }

    #[test]
    fn test_paragraphs() {
        let body = "first paragraph here\nstill first\n  \nsecond paragraph";
        assert_eq!(
            EntryStrategy::Paragraphs.apply(body).unwrap(),
            vec!["first paragraph here\nstill first", "second paragraph"]
        );
        assert!(EntryStrategy::Paragraphs.apply(" \n ").is_none());
    }

    #[test]
    fn test_truncate_at_marker() {
        assert_eq!(
            truncate_at_marker("Engineer at Initech\nwrote code\nEducation\nMIT"),
            "Engineer at Initech\nwrote code"
        );
        assert_eq!(
            truncate_at_marker("Engineer at Initech\nskills: rust"),
            "Engineer at Initech"
        );
        assert_eq!(truncate_at_marker("Built Skills matrix"), "Built Skills matrix");
    }

    #[test]
    fn test_work_section() {
        let text = "Jane Doe\n\nWork Experience\nSoftware Engineer at Acme Corp\nDeveloped billing services in Rust\nBuilt CI pipelines\nData Analyst at Globex\nCreated dashboards for sales\n\nEducation\nMIT";
        let exp = extract_experience(text).unwrap();
        assert_eq!(
            exp.work,
            vec![
                "Software Engineer at Acme Corp\nDeveloped billing services in Rust\nBuilt CI pipelines",
                "Data Analyst at Globex\nCreated dashboards for sales",
            ]
        );
        // Work lines are not salvaged as projects.
        assert!(exp.projects.is_empty());
        assert_eq!(exp.into_lines()[0], "Work Experience:");
    }

    #[test]
    fn test_projects_section() {
        let text = "Projects\nChess Engine\nA bitboard chess engine written in Rust\n• Supports UCI protocol\n\nWeather App\nForecast dashboard built with React\n\nSkills\nRust";
        let exp = extract_experience(text).unwrap();
        assert!(exp.work.is_empty());
        assert_eq!(
            exp.projects,
            vec![
                "Chess Engine\nA bitboard chess engine written in Rust\n• Supports UCI protocol",
                "Weather App\nForecast dashboard built with React",
            ]
        );
        assert_eq!(
            exp.into_lines(),
            vec![
                "Projects:",
                "Chess Engine\nA bitboard chess engine written in Rust\n• Supports UCI protocol",
                "Weather App\nForecast dashboard built with React",
            ]
        );
    }

    #[test]
    fn test_short_entries_dropped() {
        let text = "Experience\nIntern\n\nBarista\n";
        let exp = extract_experience(text).unwrap();
        assert!(exp.work.is_empty());
    }

    #[test]
    fn test_salvage_without_projects_header() {
        let text = "Jane Doe\nWeather Dashboard App\nA small tool that shows forecasts using public APIs\nUsed by 200 people\n\nSkills: Rust";
        let exp = extract_experience(text).unwrap();
        assert_eq!(
            exp.projects,
            vec!["Weather Dashboard App\nA small tool that shows forecasts using public APIs"]
        );
    }

    #[test]
    fn test_salvage_action_verb_title() {
        let text = "Inventory Tracker\nDesigned and implemented a barcode scanner flow\n";
        let exp = extract_experience(text).unwrap();
        assert_eq!(
            exp.projects,
            vec!["Inventory Tracker\nDesigned and implemented a barcode scanner flow"]
        );
    }

    #[test]
    fn test_empty_projects_header_disables_salvage() {
        let text = "Projects\nEducation\nSchool Management System built in PHP with MySQL";
        let exp = extract_experience(text).unwrap();
        assert!(exp.projects.is_empty());
    }

    #[test]
    fn test_nothing_found() {
        let exp = extract_experience("").unwrap();
        assert!(exp.is_empty());
        assert!(exp.into_lines().is_empty());
    }

    #[test]
    fn test_mask_ranges() {
        assert_eq!(mask_ranges("abcdef", &[1..3]), "a\ndef");
        assert_eq!(mask_ranges("abc", &[]), "abc");
    }
}
