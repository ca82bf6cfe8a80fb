//! Built-in keyword tables.
//!
//! Every list here is read-only process-wide configuration. Lists can be
//! replaced or extended per extractor through [`crate::ParsingConfigBuilder`];
//! none of the control flow hard-codes a keyword.

use once_cell::sync::Lazy;

/// Headers that open the education section.
pub const EDUCATION_HEADERS: &[&str] = &["education", "academic background", "academic qualifications"];

/// Headers that close the education section.
pub const EDUCATION_TERMINATORS: &[&str] = &[
    "experience",
    "work experience",
    "professional experience",
    "employment",
    "work history",
    "skills",
    "technical skills",
    "projects",
    "personal projects",
    "academic projects",
    "awards",
    "achievements",
    "references",
    "certifications",
    "certificates",
    "languages",
    "interests",
    "summary",
];

/// Certification headers, most specific first.
pub const CERTIFICATION_HEADERS: &[&str] =
    &["certificates", "certifications", "certified", "certification"];

/// Skills headers, most specific first.
pub const SKILL_HEADERS: &[&str] = &[
    "skills",
    "technical skills",
    "competencies",
    "proficiencies",
    "expertise",
    "technologies",
];

pub const PROJECT_HEADERS: &[&str] = &[
    "projects",
    "personal projects",
    "academic projects",
    "key projects",
];

pub const WORK_HEADERS: &[&str] = &[
    "experience",
    "work experience",
    "professional experience",
    "employment",
    "work history",
];

/// Headers that end a projects section. Work headers are appended at runtime.
pub const PROJECT_SECTION_TERMINATORS: &[&str] = &[
    "Education",
    "Skills",
    "Technical Skills",
    "Experience",
    "Work",
    "Certificates",
    "Certifications",
    "Awards",
    "References",
    "Languages",
    "Interests",
    "Personal",
    "Contact",
    "Summary",
    "About",
];

/// Headers that end a work-experience section. Project headers are appended at runtime.
pub const WORK_SECTION_TERMINATORS: &[&str] = &[
    "Education",
    "Skills",
    "Technical Skills",
    "Projects",
    "Certificates",
    "Certifications",
    "Awards",
    "References",
    "Languages",
    "Interests",
    "Personal",
    "Contact",
    "Summary",
    "About",
];

/// Section headers at which an experience entry is cut short.
pub const ENTRY_TRUNCATION_MARKERS: &[&str] =
    &["Education", "Skills", "Certificates", "Awards", "References"];

/// Context words marking an institution mention as part of a reference.
pub const REFERENCE_CONTEXT_TERMS: &[&str] =
    &["reference", "referee", "professor", "lecturer", "advisor"];

/// Words that disqualify an education entry outright.
pub const EDUCATION_REJECT_TERMS: &[&str] = &[
    "reference",
    "referee",
    "professor",
    "lecturer",
    "advisor",
    "certificate",
];

/// Nouns that make a line look like a project title.
pub const PROJECT_TITLE_NOUNS: &[&str] = &[
    "project",
    "app",
    "application",
    "system",
    "website",
    "platform",
    "tool",
];

/// Verbs that make a line look like a project description.
pub const PROJECT_ACTION_VERBS: &[&str] =
    &["developed", "built", "created", "designed", "implemented"];

/// Leading verbs that mark a capitalized line as body text rather than a title.
pub const BODY_LEADING_VERBS: &[&str] = &[
    "developed",
    "built",
    "created",
    "designed",
    "implemented",
    "led",
    "managed",
    "maintained",
    "worked",
    "wrote",
    "improved",
    "collaborated",
    "contributed",
    "responsible",
    "used",
];

/// Nouns that mark a name candidate as an address line.
pub const ADDRESS_NOUNS: &[&str] = &["road", "street", "avenue", "lane", "drive", "blvd"];

/// Words that mark a name candidate as a document title.
pub const DOCUMENT_TITLE_WORDS: &[&str] = &["curriculum", "vitae", "resume"];

/// An entry in the technology dictionary used when no skills section exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTerm {
    pub name: String,
    /// Match only with the exact capitalization. Used for terms that are
    /// also everyday English words.
    pub case_sensitive: bool,
}

impl SkillTerm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            case_sensitive: false,
        }
    }

    pub fn exact(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            case_sensitive: true,
        }
    }
}

/// Well-known technology names, in output order.
pub static COMMON_SKILLS: Lazy<Vec<SkillTerm>> = Lazy::new(|| {
    const EXACT: &[&str] = &[
        "Go", "AI", "Express", "Swift", "Rust", "Oracle", "Windows", "Bash",
    ];
    [
        "Python",
        "Java",
        "JavaScript",
        "HTML",
        "CSS",
        "SQL",
        "AWS",
        "Azure",
        "React",
        "Angular",
        "Node.js",
        "Express",
        "Django",
        "Flask",
        "Docker",
        "Kubernetes",
        "Git",
        "Agile",
        "Scrum",
        "Machine Learning",
        "AI",
        "Data Science",
        "DevOps",
        "CI/CD",
        "REST API",
        "GraphQL",
        "MongoDB",
        "PostgreSQL",
        "MySQL",
        "Oracle",
        "NoSQL",
        "Redis",
        "Elasticsearch",
        "Linux",
        "Windows",
        "macOS",
        "iOS",
        "Android",
        "Swift",
        "Kotlin",
        "C++",
        "C#",
        "PHP",
        "Ruby",
        "Go",
        "Rust",
        "TypeScript",
        "Bash",
        "PowerShell",
    ]
    .into_iter()
    .map(|name| {
        if EXACT.contains(&name) {
            SkillTerm::exact(name)
        } else {
            SkillTerm::new(name)
        }
    })
    .collect()
});
