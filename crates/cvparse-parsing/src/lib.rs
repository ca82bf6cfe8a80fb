use std::path::Path;

use thiserror::Error;

pub mod config;
pub mod education;
pub mod experience;
pub mod extractor;
pub mod keywords;
pub mod normalize;
pub mod personal;
pub mod qualifications;
pub mod section;

pub use config::{ListOverride, ParsingConfig, ParsingConfigBuilder};
pub use experience::{EntryStrategy, Experience};
pub use extractor::{Category, CvExtractor};
pub use keywords::SkillTerm;
pub use normalize::{NormalizeMode, NormalizedText};
pub use qualifications::{CertificationStrategy, Qualifications, SkillStrategy};
pub use section::{SectionSpan, SectionStrategy};
// Re-export domain types from core (canonical definitions live there)
pub use cvparse_core::{
    BackendError, CERTIFICATIONS_LABEL, CvRecord, DocumentKind, EducationEntry, LabeledList,
    PROJECTS_LABEL, PersonalInfo, PlainTextBackend, SKILLS_LABEL, TextBackend,
    WORK_EXPERIENCE_LABEL,
};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("invalid pattern for keyword {keyword:?}: {source}")]
    Pattern {
        keyword: String,
        #[source]
        source: regex::Error,
    },
    #[error("input is {len} bytes, limit is {max}")]
    InputTooLarge { len: usize, max: usize },
    #[error("{category} extraction panicked: {message}")]
    Panicked { category: String, message: String },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Extract a [`CvRecord`] from document text with the default configuration.
///
/// Pipeline:
/// 1. Normalize whitespace and sentence breaks
/// 2. Pull name, email and phone
/// 3. Locate and read the education section
/// 4. Locate skills and certifications, falling back to a dictionary scan
/// 5. Locate work experience and projects, salvaging project titles when
///    there is no projects section
///
/// Never fails; categories that cannot be read come back empty.
pub fn extract_cv(text: &str) -> CvRecord {
    CvExtractor::new().extract(text)
}

/// Convert a document with `backend`, then run [`extract_cv`].
pub fn extract_cv_from_path(
    path: &Path,
    backend: &dyn TextBackend,
) -> Result<CvRecord, ParsingError> {
    CvExtractor::new().extract_from_path(path, backend)
}
