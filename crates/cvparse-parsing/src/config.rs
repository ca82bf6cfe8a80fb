use regex::Regex;

use cvparse_core::config_file::ConfigFile;

use crate::keywords::{self, SkillTerm};
use crate::normalize::NormalizeMode;

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }

    fn push(&mut self, value: T) {
        match self {
            ListOverride::Extend(v) | ListOverride::Replace(v) => v.push(value),
            ListOverride::Default => *self = ListOverride::Extend(vec![value]),
        }
    }
}

impl ListOverride<String> {
    /// Resolve against a static keyword table.
    pub fn resolve_static(&self, defaults: &[&str]) -> Vec<String> {
        let defaults: Vec<String> = defaults.iter().map(|s| s.to_string()).collect();
        self.resolve(&defaults)
    }
}

/// Configuration for the résumé extraction pipeline.
///
/// Keyword lists are [`ListOverride`]s over the tables in [`crate::keywords`];
/// pattern lists are precompiled. Use [`ParsingConfigBuilder`] to construct
/// with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── normalize.rs / extractor.rs ──
    pub(crate) normalize_mode: NormalizeMode,
    /// Inputs longer than this many bytes are rejected before parsing.
    pub(crate) max_input_bytes: usize,

    // ── personal.rs ──
    pub(crate) name_patterns: ListOverride<Regex>,
    pub(crate) email_patterns: ListOverride<Regex>,
    pub(crate) phone_patterns: ListOverride<Regex>,

    // ── education.rs ──
    pub(crate) education_headers: ListOverride<String>,
    pub(crate) education_terminators: ListOverride<String>,
    /// Characters after an institution searched for its degree.
    pub(crate) degree_window: usize,
    /// Characters on each side of an institution checked for reference words.
    pub(crate) reference_context: usize,

    // ── qualifications.rs ──
    pub(crate) certification_headers: ListOverride<String>,
    pub(crate) skill_headers: ListOverride<String>,
    pub(crate) common_skills: ListOverride<SkillTerm>,
    pub(crate) min_certification_len: usize,
    pub(crate) min_skill_len: usize,
    pub(crate) min_collected_skill_len: usize,

    // ── experience.rs ──
    pub(crate) project_headers: ListOverride<String>,
    pub(crate) work_headers: ListOverride<String>,
    pub(crate) min_entry_len: usize,
    pub(crate) min_salvaged_project_len: usize,
    pub(crate) salvage_lookahead: usize,
}

const DEFAULT_MAX_INPUT_BYTES: usize = 2 * 1024 * 1024;

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            normalize_mode: NormalizeMode::default(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            name_patterns: ListOverride::Default,
            email_patterns: ListOverride::Default,
            phone_patterns: ListOverride::Default,
            education_headers: ListOverride::Default,
            education_terminators: ListOverride::Default,
            degree_window: 200,
            reference_context: 50,
            certification_headers: ListOverride::Default,
            skill_headers: ListOverride::Default,
            common_skills: ListOverride::Default,
            min_certification_len: 5,
            min_skill_len: 2,
            min_collected_skill_len: 3,
            project_headers: ListOverride::Default,
            work_headers: ListOverride::Default,
            min_entry_len: 20,
            min_salvaged_project_len: 30,
            salvage_lookahead: 5,
        }
    }
}

impl ParsingConfig {
    pub fn normalize_mode(&self) -> NormalizeMode {
        self.normalize_mode
    }

    pub fn max_input_bytes(&self) -> usize {
        self.max_input_bytes
    }

    pub(crate) fn education_headers(&self) -> Vec<String> {
        self.education_headers
            .resolve_static(keywords::EDUCATION_HEADERS)
    }

    pub(crate) fn education_terminators(&self) -> Vec<String> {
        self.education_terminators
            .resolve_static(keywords::EDUCATION_TERMINATORS)
    }

    pub(crate) fn certification_headers(&self) -> Vec<String> {
        self.certification_headers
            .resolve_static(keywords::CERTIFICATION_HEADERS)
    }

    pub(crate) fn skill_headers(&self) -> Vec<String> {
        self.skill_headers.resolve_static(keywords::SKILL_HEADERS)
    }

    pub(crate) fn common_skills(&self) -> Vec<SkillTerm> {
        self.common_skills.resolve(&keywords::COMMON_SKILLS)
    }

    pub(crate) fn project_headers(&self) -> Vec<String> {
        self.project_headers.resolve_static(keywords::PROJECT_HEADERS)
    }

    pub(crate) fn work_headers(&self) -> Vec<String> {
        self.work_headers.resolve_static(keywords::WORK_HEADERS)
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    normalize_mode: Option<NormalizeMode>,
    max_input_bytes: Option<usize>,
    name_patterns: ListOverride<String>,
    email_patterns: ListOverride<String>,
    phone_patterns: ListOverride<String>,
    education_headers: ListOverride<String>,
    education_terminators: ListOverride<String>,
    degree_window: Option<usize>,
    reference_context: Option<usize>,
    certification_headers: ListOverride<String>,
    skill_headers: ListOverride<String>,
    common_skills: ListOverride<SkillTerm>,
    min_certification_len: Option<usize>,
    min_skill_len: Option<usize>,
    min_collected_skill_len: Option<usize>,
    project_headers: ListOverride<String>,
    work_headers: ListOverride<String>,
    min_entry_len: Option<usize>,
    min_salvaged_project_len: Option<usize>,
    salvage_lookahead: Option<usize>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an on-disk [`ConfigFile`]. Keyword lists in the file extend
    /// the built-in tables.
    pub fn from_config_file(file: &ConfigFile) -> Self {
        let mut builder = Self::new();

        if let Some(flatten) = file.normalize.as_ref().and_then(|n| n.flatten) {
            builder = builder.normalize_mode(if flatten {
                NormalizeMode::Flatten
            } else {
                NormalizeMode::PreserveLines
            });
        }

        if let Some(max) = file.limits.as_ref().and_then(|l| l.max_input_bytes) {
            builder = builder.max_input_bytes(max);
        }

        if let Some(kw) = &file.keywords {
            for skill in kw.skills.iter().flatten() {
                builder = builder.add_common_skill(SkillTerm::new(skill.as_str()));
            }
            for header in kw.education_headers.iter().flatten() {
                builder = builder.add_education_header(header);
            }
            for header in kw.skill_headers.iter().flatten() {
                builder = builder.add_skill_header(header);
            }
            for header in kw.certification_headers.iter().flatten() {
                builder = builder.add_certification_header(header);
            }
            for header in kw.project_headers.iter().flatten() {
                builder = builder.add_project_header(header);
            }
            for header in kw.work_headers.iter().flatten() {
                builder = builder.add_work_header(header);
            }
        }

        builder
    }

    // ── Normalization / limits ──

    pub fn normalize_mode(mut self, mode: NormalizeMode) -> Self {
        self.normalize_mode = Some(mode);
        self
    }

    pub fn max_input_bytes(mut self, n: usize) -> Self {
        self.max_input_bytes = Some(n);
        self
    }

    // ── Personal info patterns ──

    pub fn set_name_patterns(mut self, patterns: Vec<String>) -> Self {
        self.name_patterns = ListOverride::Replace(patterns);
        self
    }

    pub fn add_name_pattern(mut self, pattern: &str) -> Self {
        self.name_patterns.push(pattern.to_string());
        self
    }

    pub fn set_email_patterns(mut self, patterns: Vec<String>) -> Self {
        self.email_patterns = ListOverride::Replace(patterns);
        self
    }

    pub fn add_email_pattern(mut self, pattern: &str) -> Self {
        self.email_patterns.push(pattern.to_string());
        self
    }

    pub fn set_phone_patterns(mut self, patterns: Vec<String>) -> Self {
        self.phone_patterns = ListOverride::Replace(patterns);
        self
    }

    pub fn add_phone_pattern(mut self, pattern: &str) -> Self {
        self.phone_patterns.push(pattern.to_string());
        self
    }

    // ── Education ──

    pub fn set_education_headers(mut self, headers: Vec<String>) -> Self {
        self.education_headers = ListOverride::Replace(headers);
        self
    }

    pub fn add_education_header(mut self, header: &str) -> Self {
        self.education_headers.push(header.to_lowercase());
        self
    }

    pub fn add_education_terminator(mut self, header: &str) -> Self {
        self.education_terminators.push(header.to_lowercase());
        self
    }

    pub fn degree_window(mut self, chars: usize) -> Self {
        self.degree_window = Some(chars);
        self
    }

    pub fn reference_context(mut self, chars: usize) -> Self {
        self.reference_context = Some(chars);
        self
    }

    // ── Skills / certifications ──

    pub fn set_skill_headers(mut self, headers: Vec<String>) -> Self {
        self.skill_headers = ListOverride::Replace(headers);
        self
    }

    pub fn add_skill_header(mut self, header: &str) -> Self {
        self.skill_headers.push(header.to_string());
        self
    }

    pub fn set_certification_headers(mut self, headers: Vec<String>) -> Self {
        self.certification_headers = ListOverride::Replace(headers);
        self
    }

    pub fn add_certification_header(mut self, header: &str) -> Self {
        self.certification_headers.push(header.to_string());
        self
    }

    pub fn set_common_skills(mut self, skills: Vec<SkillTerm>) -> Self {
        self.common_skills = ListOverride::Replace(skills);
        self
    }

    pub fn add_common_skill(mut self, skill: SkillTerm) -> Self {
        self.common_skills.push(skill);
        self
    }

    pub fn min_certification_len(mut self, n: usize) -> Self {
        self.min_certification_len = Some(n);
        self
    }

    pub fn min_skill_len(mut self, n: usize) -> Self {
        self.min_skill_len = Some(n);
        self
    }

    pub fn min_collected_skill_len(mut self, n: usize) -> Self {
        self.min_collected_skill_len = Some(n);
        self
    }

    // ── Experience / projects ──

    pub fn set_project_headers(mut self, headers: Vec<String>) -> Self {
        self.project_headers = ListOverride::Replace(headers);
        self
    }

    pub fn add_project_header(mut self, header: &str) -> Self {
        self.project_headers.push(header.to_string());
        self
    }

    pub fn set_work_headers(mut self, headers: Vec<String>) -> Self {
        self.work_headers = ListOverride::Replace(headers);
        self
    }

    pub fn add_work_header(mut self, header: &str) -> Self {
        self.work_headers.push(header.to_string());
        self
    }

    pub fn min_entry_len(mut self, n: usize) -> Self {
        self.min_entry_len = Some(n);
        self
    }

    pub fn min_salvaged_project_len(mut self, n: usize) -> Self {
        self.min_salvaged_project_len = Some(n);
        self
    }

    pub fn salvage_lookahead(mut self, lines: usize) -> Self {
        self.salvage_lookahead = Some(lines);
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile_list = |list: ListOverride<String>| -> Result<ListOverride<Regex>, regex::Error> {
            match list {
                ListOverride::Default => Ok(ListOverride::Default),
                ListOverride::Replace(patterns) => {
                    let regexes: Result<Vec<_>, _> = patterns.iter().map(|p| Regex::new(p)).collect();
                    Ok(ListOverride::Replace(regexes?))
                }
                ListOverride::Extend(patterns) => {
                    let regexes: Result<Vec<_>, _> = patterns.iter().map(|p| Regex::new(p)).collect();
                    Ok(ListOverride::Extend(regexes?))
                }
            }
        };

        let defaults = ParsingConfig::default();

        Ok(ParsingConfig {
            normalize_mode: self.normalize_mode.unwrap_or(defaults.normalize_mode),
            max_input_bytes: self.max_input_bytes.unwrap_or(defaults.max_input_bytes),
            name_patterns: compile_list(self.name_patterns)?,
            email_patterns: compile_list(self.email_patterns)?,
            phone_patterns: compile_list(self.phone_patterns)?,
            education_headers: self.education_headers,
            education_terminators: self.education_terminators,
            degree_window: self.degree_window.unwrap_or(defaults.degree_window),
            reference_context: self.reference_context.unwrap_or(defaults.reference_context),
            certification_headers: self.certification_headers,
            skill_headers: self.skill_headers,
            common_skills: self.common_skills,
            min_certification_len: self
                .min_certification_len
                .unwrap_or(defaults.min_certification_len),
            min_skill_len: self.min_skill_len.unwrap_or(defaults.min_skill_len),
            min_collected_skill_len: self
                .min_collected_skill_len
                .unwrap_or(defaults.min_collected_skill_len),
            project_headers: self.project_headers,
            work_headers: self.work_headers,
            min_entry_len: self.min_entry_len.unwrap_or(defaults.min_entry_len),
            min_salvaged_project_len: self
                .min_salvaged_project_len
                .unwrap_or(defaults.min_salvaged_project_len),
            salvage_lookahead: self.salvage_lookahead.unwrap_or(defaults.salvage_lookahead),
        })
    }
}
