//! Launch file YAML schema definitions

use crate::config::launch_config::LaunchSources;
use crate::config::substitution::{SubstitutionContext, SubstitutionError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Profiles that suppress launching when the file does not say otherwise
pub const DEFAULT_EXCLUDED_PROFILES: [&str; 3] = ["docker", "test", "zimaos"];

/// Root launch file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchFile {
    /// Launch file format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Argument definitions with defaults
    #[serde(default)]
    pub args: IndexMap<String, ArgDefinition>,

    /// Values for `$(env NAME)`, checked before the process environment
    #[serde(default)]
    pub env: HashMap<String, String>,

    /// Primary single URL
    #[serde(default)]
    pub value: String,

    /// Alternate single URL, used when `value` is empty
    #[serde(default)]
    pub url: String,

    /// URL list, used when both single values are empty
    #[serde(default)]
    pub urls: Vec<String>,

    /// Endpoint that must answer 200 before anything is opened
    #[serde(default)]
    pub health_check_endpoint: String,

    /// Profiles in which nothing is launched
    #[serde(default = "default_excluded_profiles")]
    pub exclude_profiles: Vec<String>,

    /// Probe and open on background tasks instead of the calling task
    #[serde(default, rename = "async")]
    pub async_launch: bool,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_excluded_profiles() -> Vec<String> {
    DEFAULT_EXCLUDED_PROFILES.iter().map(|p| p.to_string()).collect()
}

/// Argument definition with default value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgDefinition {
    pub default: ArgValue,
    #[serde(default)]
    pub description: Option<String>,
}

/// Argument defaults may be written as YAML scalars of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Bool(b) => write!(f, "{}", b),
            ArgValue::Int(i) => write!(f, "{}", i),
            ArgValue::Float(x) => write!(f, "{}", x),
            ArgValue::String(s) => f.write_str(s),
        }
    }
}

impl LaunchFile {
    /// Load launch file from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LaunchFileError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LaunchFileError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse launch file from YAML string
    pub fn from_yaml(content: &str) -> Result<Self, LaunchFileError> {
        let launch_file: LaunchFile = serde_yaml::from_str(content)?;
        launch_file.validate()?;
        Ok(launch_file)
    }

    /// Reject empty entries; emptiness is checked the same way resolution checks it
    pub fn validate(&self) -> Result<(), LaunchFileError> {
        if let Some(pos) = self.urls.iter().position(String::is_empty) {
            return Err(LaunchFileError::Validation(format!(
                "urls[{}] is empty",
                pos
            )));
        }
        if self.exclude_profiles.iter().any(String::is_empty) {
            return Err(LaunchFileError::Validation(
                "exclude_profiles contains an empty profile name".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the substitution context from declared args and `key:=value` overrides
    pub fn substitution_context(
        &self,
        overrides: &HashMap<String, String>,
    ) -> Result<SubstitutionContext, LaunchFileError> {
        let mut args: HashMap<String, String> = self
            .args
            .iter()
            .map(|(name, def)| (name.clone(), def.default.to_string()))
            .collect();

        for (name, value) in overrides {
            if !self.args.contains_key(name) {
                return Err(LaunchFileError::UnknownArgument(name.clone()));
            }
            args.insert(name.clone(), value.clone());
        }

        Ok(SubstitutionContext::new()
            .with_args(args)
            .with_envs(self.env.clone()))
    }

    /// Expand every placeholder and hand back the raw launch sources
    pub fn sources(
        &self,
        overrides: &HashMap<String, String>,
    ) -> Result<LaunchSources, LaunchFileError> {
        let ctx = self.substitution_context(overrides)?;
        let expand = |field: &str, template: &str| {
            ctx.substitute(template)
                .map_err(|source| LaunchFileError::Substitution {
                    field: field.to_string(),
                    source,
                })
        };

        let mut urls = Vec::with_capacity(self.urls.len());
        for (i, template) in self.urls.iter().enumerate() {
            urls.push(expand(&format!("urls[{}]", i), template)?);
        }

        Ok(LaunchSources {
            value: expand("value", &self.value)?,
            url: expand("url", &self.url)?,
            urls,
            health_check_endpoint: expand("health_check_endpoint", &self.health_check_endpoint)?,
            exclude_profiles: self.exclude_profiles.clone(),
            async_launch: self.async_launch,
        })
    }
}

/// Errors that can occur when loading a launch file
#[derive(Debug, thiserror::Error)]
pub enum LaunchFileError {
    #[error("Failed to read launch file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse launch file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown argument: {0}")]
    UnknownArgument(String),

    #[error("Substitution failed in {field}: {source}")]
    Substitution {
        field: String,
        #[source]
        source: SubstitutionError,
    },
}
