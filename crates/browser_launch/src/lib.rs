//! Browser Launch
//!
//! Opens the operator's browser once a locally started service is live.
//!
//! # Overview
//!
//! A run goes through these steps:
//! - Resolve the URLs to open from a launch file (`value`, then `url`, then `urls`)
//! - Skip everything when an active profile is excluded
//! - Optionally wait for a health check endpoint to answer 200
//! - Open each URL, either in order on the calling task or on one background
//!   task per URL
//!
//! # Example Launch File
//!
//! ```yaml
//! version: "1.0"
//!
//! args:
//!   port:
//!     default: 8080
//!
//! urls:
//!   - "http://localhost:$(arg port)"
//!   - "http://localhost:$(arg port)/swagger-ui"
//!
//! health_check_endpoint: "http://localhost:$(arg port)/actuator/health"
//! exclude_profiles: [docker, prod]
//! async: false
//! ```

pub mod cli;
pub mod config;
pub mod runtime;

pub use cli::LaunchArgs;
pub use config::{
    should_suppress, ActiveProfiles, ExecutionMode, FileResolver, HostConfigResolver,
    LaunchConfig, LaunchError, LaunchFile, LaunchFileError, LaunchSources, SubstitutionContext,
    SubstitutionError,
};
pub use runtime::{
    CommandOpener, DryRunOpener, HttpProber, LaunchHandle, LaunchOutcome, LaunchReport,
    OpenError, Orchestrator, ProbeFailure, ProbeOutcome, Prober, SystemOpener, UrlOpener,
    UrlReport, UrlStatus,
};
