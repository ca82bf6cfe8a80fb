use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub normalize: Option<NormalizeConfig>,
    pub keywords: Option<KeywordsConfig>,
    pub limits: Option<LimitsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Collapse the whole document onto sentence lines instead of keeping
    /// the original line breaks.
    pub flatten: Option<bool>,
}

/// Extra keywords appended to the built-in tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordsConfig {
    pub skills: Option<Vec<String>>,
    pub education_headers: Option<Vec<String>>,
    pub skill_headers: Option<Vec<String>>,
    pub certification_headers: Option<Vec<String>>,
    pub project_headers: Option<Vec<String>>,
    pub work_headers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitsConfig {
    pub max_input_bytes: Option<usize>,
}

/// Platform config directory path: `<config_dir>/cvparse/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cvparse").join("config.toml"))
}

/// Load config by cascading CWD `.cvparse.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".cvparse.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Read and parse one config file, reporting why it could not be used.
pub fn read_config(path: &Path) -> Result<ConfigFile, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    read_config(path).ok()
}

/// Merge two configs: `overlay` scalars take precedence over `base`;
/// keyword lists from both are concatenated (base first).
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_kw = base.keywords.unwrap_or_default();
    let overlay_kw = overlay.keywords.unwrap_or_default();

    ConfigFile {
        normalize: Some(NormalizeConfig {
            flatten: overlay
                .normalize
                .as_ref()
                .and_then(|n| n.flatten)
                .or_else(|| base.normalize.as_ref().and_then(|n| n.flatten)),
        }),
        keywords: Some(KeywordsConfig {
            skills: concat(base_kw.skills, overlay_kw.skills),
            education_headers: concat(base_kw.education_headers, overlay_kw.education_headers),
            skill_headers: concat(base_kw.skill_headers, overlay_kw.skill_headers),
            certification_headers: concat(
                base_kw.certification_headers,
                overlay_kw.certification_headers,
            ),
            project_headers: concat(base_kw.project_headers, overlay_kw.project_headers),
            work_headers: concat(base_kw.work_headers, overlay_kw.work_headers),
        }),
        limits: Some(LimitsConfig {
            max_input_bytes: overlay
                .limits
                .as_ref()
                .and_then(|l| l.max_input_bytes)
                .or_else(|| base.limits.as_ref().and_then(|l| l.max_input_bytes)),
        }),
    }
}

fn concat(base: Option<Vec<String>>, overlay: Option<Vec<String>>) -> Option<Vec<String>> {
    match (base, overlay) {
        (None, None) => None,
        (Some(b), None) => Some(b),
        (None, Some(o)) => Some(o),
        (Some(mut b), Some(o)) => {
            for item in o {
                if !b.contains(&item) {
                    b.push(item);
                }
            }
            Some(b)
        }
    }
}
