//! Resolved launch configuration

use std::collections::BTreeSet;

/// Raw, already-substituted values a host hands to the launcher.
///
/// Any of the three URL sources may be empty; [`LaunchConfig::resolve`]
/// decides which one is used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchSources {
    /// Primary single URL
    pub value: String,
    /// Alternate single URL
    pub url: String,
    /// URL list
    pub urls: Vec<String>,
    pub health_check_endpoint: String,
    pub exclude_profiles: Vec<String>,
    pub async_launch: bool,
}

/// How the probe-then-open work is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Probe once on the calling task, then open in order
    Sync,
    /// One independent probe-then-open task per URL
    Async,
}

/// Immutable configuration for one orchestration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    urls: Vec<String>,
    probe_endpoint: Option<String>,
    excluded_profiles: BTreeSet<String>,
    mode: ExecutionMode,
}

impl LaunchConfig {
    /// Resolve raw sources, taking URLs from the first non-empty source in
    /// the order `value`, `url`, `urls`.
    pub fn resolve(sources: &LaunchSources) -> Result<Self, LaunchError> {
        let urls = if !sources.value.is_empty() {
            vec![sources.value.clone()]
        } else if !sources.url.is_empty() {
            vec![sources.url.clone()]
        } else if !sources.urls.is_empty() {
            sources.urls.clone()
        } else {
            return Err(LaunchError::NoUrlsSpecified);
        };

        if urls.iter().any(String::is_empty) {
            return Err(LaunchError::EmptyUrl);
        }

        let mode = if sources.async_launch {
            ExecutionMode::Async
        } else {
            ExecutionMode::Sync
        };

        Ok(Self::new(
            urls,
            Some(sources.health_check_endpoint.clone()),
            sources.exclude_profiles.iter().cloned(),
            mode,
        ))
    }

    /// Build a configuration directly, skipping source precedence.
    ///
    /// An empty endpoint is treated as no endpoint.
    pub fn new(
        urls: Vec<String>,
        probe_endpoint: Option<String>,
        excluded_profiles: impl IntoIterator<Item = String>,
        mode: ExecutionMode,
    ) -> Self {
        Self {
            urls,
            probe_endpoint: probe_endpoint.filter(|e| !e.is_empty()),
            excluded_profiles: excluded_profiles.into_iter().collect(),
            mode,
        }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn probe_endpoint(&self) -> Option<&str> {
        self.probe_endpoint.as_deref()
    }

    pub fn excluded_profiles(&self) -> &BTreeSet<String> {
        &self.excluded_profiles
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }
}

/// Configuration problems that stop an orchestration run before it starts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LaunchError {
    #[error("No URLs specified: set one of 'value', 'url' or 'urls'")]
    NoUrlsSpecified,

    #[error("URL list contains an empty entry")]
    EmptyUrl,
}
