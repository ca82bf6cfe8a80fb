use std::fmt;

use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;

pub use backend::{BackendError, DocumentKind, PlainTextBackend, TextBackend};

/// Contact details pulled from the top of a résumé.
///
/// Each field is independent: a missing match leaves the field unset and the
/// key is omitted from serialized output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl PersonalInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// An institution mention, optionally paired with the degree found near it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: Option<String>,
}

impl EducationEntry {
    pub fn new(institution: impl Into<String>, degree: Option<String>) -> Self {
        Self {
            institution: institution.into(),
            degree,
        }
    }

    /// `"institution\ndegree"`, or the institution alone when no degree was found.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EducationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.degree {
            Some(degree) if !degree.is_empty() => write!(f, "{}\n{}", self.institution, degree),
            _ => f.write_str(&self.institution),
        }
    }
}

/// Labels used when flattening grouped results.
pub const SKILLS_LABEL: &str = "Skills";
pub const CERTIFICATIONS_LABEL: &str = "Certifications";
pub const WORK_EXPERIENCE_LABEL: &str = "Work Experience";
pub const PROJECTS_LABEL: &str = "Projects";

/// Ordered groups of entries flattened into one list of lines.
///
/// Every non-empty group contributes a `"<label>:"` header followed by its
/// items; consecutive groups are separated by a single empty string. Groups
/// without items contribute nothing, not even their header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabeledList {
    groups: Vec<(String, Vec<String>)>,
}

impl LabeledList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(mut self, label: impl Into<String>, items: Vec<String>) -> Self {
        self.groups.push((label.into(), items));
        self
    }

    /// Items of the first group carrying `label`, if any.
    pub fn items(&self, label: &str) -> &[String] {
        self.groups
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, items)| items.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|(_, items)| items.is_empty())
    }

    pub fn into_lines(self) -> Vec<String> {
        let mut lines = Vec::new();
        for (label, items) in self.groups {
            if items.is_empty() {
                continue;
            }
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("{}:", label));
            lines.extend(items);
        }
        lines
    }
}

/// The structured result of parsing one résumé.
///
/// Created once per document. List fields are always present and default to
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvRecord {
    pub personal_info: PersonalInfo,
    pub education: Vec<String>,
    pub qualifications: Vec<String>,
    pub projects: Vec<String>,
}

impl CvRecord {
    pub fn is_empty(&self) -> bool {
        self.personal_info.is_empty()
            && self.education.is_empty()
            && self.qualifications.is_empty()
            && self.projects.is_empty()
    }
}
