use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::config::ParsingConfig;
use crate::experience::{self, Experience};
use crate::normalize::{self, NormalizedText};
use crate::qualifications::{self, Qualifications};
use crate::{CvRecord, ParsingError, PersonalInfo, TextBackend, education, personal};

/// The independently extracted parts of a [`CvRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    PersonalInfo,
    Education,
    Qualifications,
    Experience,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::PersonalInfo => write!(f, "personal_info"),
            Category::Education => write!(f, "education"),
            Category::Qualifications => write!(f, "qualifications"),
            Category::Experience => write!(f, "projects"),
        }
    }
}

/// A configurable résumé extraction pipeline.
///
/// Holds a [`ParsingConfig`] and exposes each pipeline step as a method.
/// The default constructor uses built-in defaults; use
/// [`CvExtractor::with_config`] to supply custom keywords and thresholds.
#[derive(Debug, Clone)]
pub struct CvExtractor {
    config: ParsingConfig,
}

impl Default for CvExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl CvExtractor {
    /// Create an extractor with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParsingConfig::default(),
        }
    }

    /// Create an extractor with a custom configuration.
    pub fn with_config(config: ParsingConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the current config.
    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    /// Normalize raw document text (step 1).
    pub fn normalize(&self, raw: &str) -> NormalizedText {
        normalize::normalize_with_mode(raw, self.config.normalize_mode)
    }

    /// Extract name, email and phone (step 2).
    pub fn personal_info(&self, text: &str) -> PersonalInfo {
        personal::extract_personal_info_with_config(text, &self.config)
    }

    /// Extract rendered education entries (step 3).
    pub fn education(&self, text: &str) -> Vec<String> {
        education::extract_education_with_config(text, &self.config)
    }

    /// Extract skills and certifications (step 4).
    pub fn qualifications(&self, text: &str) -> Result<Qualifications, ParsingError> {
        qualifications::extract_qualifications_with_config(text, &self.config)
    }

    /// Extract work experience and projects (step 5).
    pub fn experience(&self, text: &str) -> Result<Experience, ParsingError> {
        experience::extract_experience_with_config(text, &self.config)
    }

    /// Run the full pipeline on raw text.
    ///
    /// A failure inside one category leaves that category empty and is logged;
    /// only an oversized input is reported as an error.
    pub fn try_extract(&self, raw: &str) -> Result<CvRecord, ParsingError> {
        if raw.len() > self.config.max_input_bytes {
            return Err(ParsingError::InputTooLarge {
                len: raw.len(),
                max: self.config.max_input_bytes,
            });
        }

        let text = self.normalize(raw);

        let personal_info = isolate(Category::PersonalInfo, || Ok(self.personal_info(&text)));
        let education = isolate(Category::Education, || Ok(self.education(&text)));
        let qualifications = isolate(Category::Qualifications, || self.qualifications(&text));
        let experience = isolate(Category::Experience, || self.experience(&text));

        tracing::info!(
            has_name = personal_info.name.is_some(),
            has_email = personal_info.email.is_some(),
            has_phone = personal_info.phone.is_some(),
            education = education.len(),
            skills = qualifications.skills.len(),
            certifications = qualifications.certifications.len(),
            work = experience.work.len(),
            projects = experience.projects.len(),
            "extraction complete"
        );

        Ok(CvRecord {
            personal_info,
            education,
            qualifications: qualifications.into_lines(),
            projects: experience.into_lines(),
        })
    }

    /// Run the full pipeline, never failing.
    ///
    /// Any error or panic outside the per-category boundaries yields the
    /// all-empty record.
    pub fn extract(&self, raw: &str) -> CvRecord {
        match panic::catch_unwind(AssertUnwindSafe(|| self.try_extract(raw))) {
            Ok(Ok(record)) => record,
            Ok(Err(err)) => {
                tracing::error!(error = %err, "extraction failed, returning empty record");
                CvRecord::default()
            }
            Err(payload) => {
                tracing::error!(
                    panic = %panic_message(payload.as_ref()),
                    "extraction panicked, returning empty record"
                );
                CvRecord::default()
            }
        }
    }

    /// Convert a document to text with `backend`, then run [`extract`](Self::extract).
    pub fn extract_from_path(
        &self,
        path: &Path,
        backend: &dyn TextBackend,
    ) -> Result<CvRecord, ParsingError> {
        let text = backend.extract_text(path)?;
        Ok(self.extract(&text))
    }
}

/// Run one category, turning an error or panic into its empty default.
fn isolate<T: Default>(category: Category, f: impl FnOnce() -> Result<T, ParsingError>) -> T {
    let outcome = panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        Err(ParsingError::Panicked {
            category: category.to_string(),
            message: panic_message(payload.as_ref()),
        })
    });

    match outcome {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(%category, error = %err, "category extraction failed, using empty default");
            T::default()
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParsingConfigBuilder;

    #[test]
    fn test_isolate_passes_values_through() {
        let v = isolate(Category::Education, || Ok(vec!["MIT".to_string()]));
        assert_eq!(v, vec!["MIT"]);
    }

    #[test]
    fn test_isolate_error_becomes_default() {
        let v: Vec<String> = isolate(Category::Qualifications, || {
            Err(ParsingError::InputTooLarge { len: 2, max: 1 })
        });
        assert!(v.is_empty());
    }

    #[test]
    fn test_isolate_panic_becomes_default() {
        let v: Experience = isolate(Category::Experience, || panic!("boom"));
        assert!(v.is_empty());

        let info: PersonalInfo = isolate(Category::PersonalInfo, || {
            let fields: Vec<&str> = "no-colon".split(':').collect();
            Ok(PersonalInfo {
                name: Some(fields[1].to_string()),
                ..Default::default()
            })
        });
        assert!(info.is_empty());
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");
        let payload: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }

    #[test]
    fn test_category_display_matches_record_keys() {
        assert_eq!(Category::PersonalInfo.to_string(), "personal_info");
        assert_eq!(Category::Education.to_string(), "education");
        assert_eq!(Category::Qualifications.to_string(), "qualifications");
        assert_eq!(Category::Experience.to_string(), "projects");
    }

    #[test]
    fn test_input_too_large() {
        let config = ParsingConfigBuilder::new().max_input_bytes(8).build().unwrap();
        let extractor = CvExtractor::with_config(config);

        let err = extractor.try_extract("far more than eight bytes").unwrap_err();
        assert!(matches!(err, ParsingError::InputTooLarge { max: 8, .. }));

        assert_eq!(extractor.extract("far more than eight bytes"), CvRecord::default());
        assert!(extractor.try_extract("short").is_ok());
    }

    #[test]
    fn test_step_methods() {
        let extractor = CvExtractor::new();
        let text = extractor.normalize("Ada  Lovelace\n\nSkills\nRust, Python");
        assert_eq!(text.as_str(), "Ada Lovelace\n\nSkills\nRust, Python");
        assert_eq!(
            extractor.personal_info(&text).name.as_deref(),
            Some("Ada Lovelace")
        );
        assert_eq!(
            extractor.qualifications(&text).unwrap().skills,
            vec!["Rust", "Python"]
        );
        assert!(extractor.education(&text).is_empty());
    }

    #[test]
    fn test_flatten_mode() {
        let config = ParsingConfigBuilder::new()
            .normalize_mode(crate::NormalizeMode::Flatten)
            .build()
            .unwrap();
        let extractor = CvExtractor::with_config(config);
        assert_eq!(extractor.normalize("a\n\nb").as_str(), "a b");
    }
}
