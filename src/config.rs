use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    ffi::OsString,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::{
    error::{PersistenceError, PersistenceResult},
    model::AdaptationData,
};

/// Backend construction parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistenceConfig {
    #[serde(default)]
    pub backend: BackendType,

    /// Legal role names.
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,

    #[serde(default)]
    pub adaptation: AdaptationSource,

    /// Optional JSON snapshot used to seed accounts, reports, and jobs.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::default(),
            roles: default_roles(),
            adaptation: AdaptationSource::default(),
            seed_path: None,
        }
    }
}

impl PersistenceConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            PersistenceError::config(format!(
                "Failed to open config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(reader)
            .map_err(|e| PersistenceError::config(format!("Failed to parse config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_str(s: &str) -> PersistenceResult<Self> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| PersistenceError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PersistenceResult<()> {
        validate_roles(&self.roles)?;
        if let AdaptationSource::Environment { prefix } = &self.adaptation {
            if prefix.is_empty() {
                return Err(PersistenceError::config(
                    "Environment adaptation source needs a prefix",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, strum::Display)]
pub enum BackendType {
    #[default]
    #[serde(rename = "simple_db")]
    #[strum(serialize = "SimpleDB")]
    SimpleDb,
}

/// Where adaptation data comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum AdaptationSource {
    /// The key/value set shipped with the crate.
    #[default]
    Bundled,
    Inline {
        pairs: BTreeMap<String, String>,
    },
    /// A JSON object whose values are all strings.
    JsonFile {
        path: PathBuf,
    },
    /// Process environment variables starting with `prefix`, prefix removed.
    Environment {
        prefix: String,
    },
}

impl AdaptationSource {
    pub async fn load(&self) -> PersistenceResult<AdaptationData> {
        match self {
            AdaptationSource::Bundled => Ok(bundled_adaptation_data()),
            AdaptationSource::Inline { pairs } => Ok(pairs.clone()),
            AdaptationSource::JsonFile { path } => {
                let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
                    PersistenceError::Io(format!(
                        "Failed to read adaptation data {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let data: AdaptationData = serde_json::from_str(&raw)?;
                Ok(data)
            }
            AdaptationSource::Environment { prefix } => {
                Ok(adaptation_from_vars(utf8_vars(std::env::vars_os()), prefix))
            }
        }
    }
}

/// Keep the variables whose name and value are both valid UTF-8.
pub fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (Ok(key), Err(_)) => {
                warn!("Skipping environment variable {} with non-UTF-8 value", key);
                None
            }
            (Err(key), _) => {
                warn!("Skipping environment variable with non-UTF-8 name {:?}", key);
                None
            }
        })
}

/// Collect `(key, value)` pairs whose key starts with `prefix`.
pub fn adaptation_from_vars<I>(vars: I, prefix: &str) -> AdaptationData
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(prefix)
                .filter(|stripped| !stripped.is_empty())
                .map(|stripped| (stripped.to_string(), value))
        })
        .collect()
}

pub fn bundled_adaptation_data() -> AdaptationData {
    [
        ("Component.Logger", "Simple Logger"),
        ("Component.Persistence", "Simple DB"),
        ("Component.UI", "Simple UI"),
        ("Application.Name", "Recruiter"),
        ("Report.DateFormat", "%Y-%m-%d"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Role sets must be non-empty, without blank names or duplicates.
pub fn validate_roles(roles: &[String]) -> PersistenceResult<()> {
    if roles.is_empty() {
        return Err(PersistenceError::config("Role set must not be empty"));
    }
    let mut seen = HashSet::new();
    for role in roles {
        if role.trim().is_empty() {
            return Err(PersistenceError::config("Role names must not be blank"));
        }
        if !seen.insert(role.as_str()) {
            return Err(PersistenceError::config(format!("Duplicate role: {}", role)));
        }
    }
    Ok(())
}

pub fn default_roles() -> Vec<String> {
    ["administrator", "employer", "job_seeker", "recruiter"]
        .into_iter()
        .map(String::from)
        .collect()
}
