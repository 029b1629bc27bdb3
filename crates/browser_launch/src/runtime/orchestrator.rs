//! Launch orchestrator - decides whether, when and how URLs get opened

use crate::config::{ActiveProfiles, ExecutionMode, LaunchConfig, LaunchError, LaunchSources};
use crate::runtime::opener::UrlOpener;
use crate::runtime::probe::{ProbeFailure, ProbeOutcome, Prober};
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// What happened to one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlStatus {
    Opened,
    OpenFailed(String),
    /// The probe guarding this URL did not pass
    NotLaunched(ProbeFailure),
    /// The task opening this URL panicked or was cancelled
    Aborted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlReport {
    pub url: String,
    pub status: UrlStatus,
}

/// Result of one probe-then-open unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    /// `None` when the unit's task died before probing completed
    pub probe: Option<ProbeOutcome>,
    pub urls: Vec<UrlReport>,
}

/// Aggregate result of a launch that was not suppressed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchReport {
    pub units: Vec<UnitReport>,
}

impl LaunchReport {
    pub fn urls(&self) -> impl Iterator<Item = &UrlReport> {
        self.units.iter().flat_map(|u| u.urls.iter())
    }

    pub fn opened_count(&self) -> usize {
        self.urls()
            .filter(|u| u.status == UrlStatus::Opened)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.urls()
            .filter(|u| u.status != UrlStatus::Opened)
            .count()
    }

    pub fn probe_failures(&self) -> Vec<&ProbeFailure> {
        self.units
            .iter()
            .filter_map(|u| match &u.probe {
                Some(ProbeOutcome::Failed(failure)) => Some(failure),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for LaunchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for report in self.urls() {
            match &report.status {
                UrlStatus::Opened => writeln!(f, "  opened       {}", report.url)?,
                UrlStatus::OpenFailed(e) => writeln!(f, "  open failed  {} ({})", report.url, e)?,
                UrlStatus::NotLaunched(why) => {
                    writeln!(f, "  not launched {} ({})", report.url, why)?
                }
                UrlStatus::Aborted(e) => writeln!(f, "  aborted      {} ({})", report.url, e)?,
            }
        }
        write!(
            f,
            "{} opened, {} not opened",
            self.opened_count(),
            self.failed_count()
        )
    }
}

/// Completion handle for background launch tasks.
///
/// Dropping it detaches the tasks; they still run to completion.
#[derive(Debug)]
pub struct LaunchHandle {
    tasks: Vec<(String, JoinHandle<UnitReport>)>,
}

impl LaunchHandle {
    /// Number of tasks dispatched
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Wait for every task; one task failing does not affect the others
    pub async fn wait(self) -> LaunchReport {
        let mut units = Vec::with_capacity(self.tasks.len());
        for (url, task) in self.tasks {
            match task.await {
                Ok(unit) => units.push(unit),
                Err(e) => {
                    log::error!("Launch task for {} did not finish: {}", url, e);
                    units.push(UnitReport {
                        probe: None,
                        urls: vec![UrlReport {
                            url,
                            status: UrlStatus::Aborted(e.to_string()),
                        }],
                    });
                }
            }
        }
        LaunchReport { units }
    }
}

/// Terminal state of an orchestration run
#[derive(Debug)]
pub enum LaunchOutcome {
    /// An active profile is excluded; nothing was probed or opened
    Suppressed { profile: String },
    /// Everything ran on the calling task
    Completed(LaunchReport),
    /// Probe-then-open tasks are running in the background
    Dispatched(LaunchHandle),
}

impl LaunchOutcome {
    /// Wait for background work if any; `None` when suppressed
    pub async fn finish(self) -> Option<LaunchReport> {
        match self {
            LaunchOutcome::Suppressed { .. } => None,
            LaunchOutcome::Completed(report) => Some(report),
            LaunchOutcome::Dispatched(handle) => Some(handle.wait().await),
        }
    }
}

/// URLs sharing one probe
struct LaunchUnit {
    endpoint: Option<String>,
    urls: Vec<String>,
}

/// Combines configuration, active profiles and probe results into browser launches
#[derive(Clone)]
pub struct Orchestrator {
    prober: Arc<dyn Prober>,
    opener: Arc<dyn UrlOpener>,
}

impl Orchestrator {
    pub fn new(prober: Arc<dyn Prober>, opener: Arc<dyn UrlOpener>) -> Self {
        Self { prober, opener }
    }

    /// Resolve `sources` and run. A configuration without URLs is the only error.
    pub async fn launch(
        &self,
        sources: &LaunchSources,
        profiles: &ActiveProfiles,
    ) -> Result<LaunchOutcome, LaunchError> {
        let config = LaunchConfig::resolve(sources).inspect_err(|e| {
            log::error!("Browser launch skipped: {}", e);
        })?;
        Ok(self.run(&config, profiles).await)
    }

    /// Run an already resolved configuration
    pub async fn run(&self, config: &LaunchConfig, profiles: &ActiveProfiles) -> LaunchOutcome {
        if let Some(profile) = profiles.excluded_by(config) {
            log::info!(
                "Skipping browser launch due to profile exclusion ({})",
                profile
            );
            return LaunchOutcome::Suppressed {
                profile: profile.to_string(),
            };
        }

        let endpoint = config.probe_endpoint().map(str::to_string);
        let urls = config.urls().to_vec();

        match (endpoint, config.mode()) {
            (Some(endpoint), ExecutionMode::Async) => {
                let tasks = urls
                    .into_iter()
                    .map(|url| {
                        let unit = LaunchUnit {
                            endpoint: Some(endpoint.clone()),
                            urls: vec![url.clone()],
                        };
                        let prober = self.prober.clone();
                        let opener = self.opener.clone();
                        let task = tokio::spawn(async move {
                            run_unit(prober.as_ref(), opener, unit).await
                        });
                        (url, task)
                    })
                    .collect::<Vec<_>>();
                let handle = LaunchHandle { tasks };
                log::debug!("Dispatched {} launch tasks", handle.task_count());
                LaunchOutcome::Dispatched(handle)
            }
            // Without an endpoint there is nothing to wait for, so async is moot
            (endpoint, _) => {
                let unit = LaunchUnit { endpoint, urls };
                let report = run_unit(self.prober.as_ref(), self.opener.clone(), unit).await;
                LaunchOutcome::Completed(LaunchReport {
                    units: vec![report],
                })
            }
        }
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator").finish_non_exhaustive()
    }
}

/// Probe (if there is an endpoint), then open each URL in order.
///
/// Openers block, so each call runs on the blocking pool; a panicking opener
/// is reported as [`UrlStatus::Aborted`] for its URL only.
async fn run_unit(
    prober: &dyn Prober,
    opener: Arc<dyn UrlOpener>,
    unit: LaunchUnit,
) -> UnitReport {
    let probe = match unit.endpoint.as_deref() {
        Some(endpoint) => prober.probe(endpoint).await,
        None => ProbeOutcome::Skipped,
    };

    let mut urls = Vec::with_capacity(unit.urls.len());
    match &probe {
        ProbeOutcome::Failed(failure) => {
            log::warn!("Health check failed: {}. Not opening browser.", failure);
            for url in unit.urls {
                let status = UrlStatus::NotLaunched(failure.clone());
                urls.push(UrlReport { url, status });
            }
        }
        outcome => {
            if *outcome == ProbeOutcome::Passed {
                log::info!("Health check passed. Opening browser...");
            }
            for url in unit.urls {
                let status = open_one(opener.clone(), &url).await;
                urls.push(UrlReport { url, status });
            }
        }
    }

    UnitReport {
        probe: Some(probe),
        urls,
    }
}

async fn open_one(opener: Arc<dyn UrlOpener>, url: &str) -> UrlStatus {
    let target = url.to_string();
    match tokio::task::spawn_blocking(move || opener.open(&target)).await {
        Ok(Ok(())) => {
            log::info!("Opened {}", url);
            UrlStatus::Opened
        }
        Ok(Err(e)) => {
            log::error!("{}", e);
            UrlStatus::OpenFailed(e.to_string())
        }
        Err(e) => {
            log::error!("Opening {} did not finish: {}", url, e);
            UrlStatus::Aborted(e.to_string())
        }
    }
}
