//! Active runtime profiles and launch suppression

use crate::config::launch_config::LaunchConfig;
use std::collections::BTreeSet;

/// Environment variable read when no profiles are given on the command line
pub const PROFILES_ENV: &str = "BROWSER_LAUNCH_PROFILES";

/// Profile names describing the current run, e.g. `dev` or `docker`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveProfiles(BTreeSet<String>);

impl ActiveProfiles {
    /// Parse a comma-separated list; blank entries are dropped
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Read [`PROFILES_ENV`]; unset means no active profiles
    pub fn from_env() -> Self {
        std::env::var(PROFILES_ENV)
            .map(|v| Self::parse(&v))
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First active profile that the configuration excludes.
    ///
    /// Matching is exact and case-sensitive: `production` does not match `prod`.
    pub fn excluded_by<'a>(&'a self, config: &LaunchConfig) -> Option<&'a str> {
        self.iter().find(|p| config.excluded_profiles().contains(*p))
    }
}

impl<S: Into<String>> FromIterator<S> for ActiveProfiles {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Display for ActiveProfiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(","))
    }
}

/// Whether launching is suppressed for these profiles
pub fn should_suppress(config: &LaunchConfig, active: &ActiveProfiles) -> bool {
    active.excluded_by(config).is_some()
}
