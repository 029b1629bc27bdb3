//! Locating the launch configuration attached to a host

use crate::config::launch_config::LaunchSources;
use crate::config::launch_file::{LaunchFile, LaunchFileError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default launch file name, looked up relative to the working directory
pub const DEFAULT_LAUNCH_FILE: &str = "browser-launch.yaml";

/// Source of a host's launch configuration.
///
/// `Ok(None)` means the host has no configuration: nothing is launched and
/// nothing is reported as an error.
pub trait HostConfigResolver {
    fn resolve(&self) -> Result<Option<LaunchSources>, LaunchFileError>;
}

/// Reads a YAML launch file, applying `key:=value` overrides to its args
#[derive(Debug, Clone)]
pub struct FileResolver {
    path: PathBuf,
    overrides: HashMap<String, String>,
}

impl FileResolver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            overrides: HashMap::new(),
        }
    }

    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the launch file itself, `None` when it does not exist
    pub fn load(&self) -> Result<Option<LaunchFile>, LaunchFileError> {
        if !self.path.exists() {
            log::debug!("No launch file at {}", self.path.display());
            return Ok(None);
        }
        LaunchFile::from_file(&self.path).map(Some)
    }
}

impl HostConfigResolver for FileResolver {
    fn resolve(&self) -> Result<Option<LaunchSources>, LaunchFileError> {
        match self.load()? {
            Some(file) => file.sources(&self.overrides).map(Some),
            None => Ok(None),
        }
    }
}

/// Configuration supplied in code rather than discovered
impl HostConfigResolver for LaunchSources {
    fn resolve(&self) -> Result<Option<LaunchSources>, LaunchFileError> {
        Ok(Some(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = FileResolver::new(dir.path().join(DEFAULT_LAUNCH_FILE));
        assert!(resolver.resolve().unwrap().is_none());
    }

    #[test]
    fn test_reads_and_substitutes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "args:\n  port:\n    default: 8080\nurl: \"http://localhost:$(arg port)\""
        )
        .unwrap();

        let resolver = FileResolver::new(file.path())
            .with_overrides(HashMap::from([("port".to_string(), "3000".to_string())]));
        let sources = resolver.resolve().unwrap().unwrap();
        assert_eq!(sources.url, "http://localhost:3000");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "urls: {{not: [a list").unwrap();
        assert!(matches!(
            FileResolver::new(file.path()).resolve(),
            Err(LaunchFileError::Parse(_))
        ));
    }

    #[test]
    fn test_inline_sources() {
        let sources = LaunchSources {
            value: "http://a".into(),
            ..Default::default()
        };
        assert_eq!(sources.resolve().unwrap(), Some(sources.clone()));
    }
}
