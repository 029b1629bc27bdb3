//! Browser Launch CLI
//!
//! Usage:
//!   browser_launch
//!   browser_launch app.launch.yaml -a port:=9090 --profiles dev
//!   browser_launch app.launch.yaml --dry-run

use anyhow::Context;
use browser_launch::{
    FileResolver, HostConfigResolver, HttpProber, LaunchArgs, LaunchConfig, LaunchOutcome,
    Orchestrator,
};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let args: LaunchArgs = argh::from_env();

    let env = env_logger::Env::default().default_filter_or(args.log_filter());
    env_logger::init_from_env(env);

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: LaunchArgs) -> anyhow::Result<ExitCode> {
    let resolver = FileResolver::new(&args.launch_file).with_overrides(args.arg_overrides());

    let Some(sources) = resolver
        .resolve()
        .with_context(|| format!("Failed to load launch file '{}'", args.launch_file))?
    else {
        log::info!(
            "No launch file at '{}', nothing to open",
            resolver.path().display()
        );
        return Ok(ExitCode::SUCCESS);
    };

    let profiles = args.active_profiles();

    if args.validate {
        let config = LaunchConfig::resolve(&sources)?;
        println!("Launch file '{}' is valid", args.launch_file);
        println!("  URLs:");
        for url in config.urls() {
            println!("    {}", url);
        }
        println!(
            "  Health check: {}",
            config.probe_endpoint().unwrap_or("(none)")
        );
        println!("  Mode: {:?}", config.mode());
        let excluded: Vec<&str> = config.excluded_profiles().iter().map(String::as_str).collect();
        println!("  Excluded profiles: {}", excluded.join(", "));
        println!("  Active profiles: {}", profiles);
        return Ok(ExitCode::SUCCESS);
    }

    let orchestrator = Orchestrator::new(Arc::new(HttpProber::new()), args.opener());

    let outcome = orchestrator
        .launch(&sources, &profiles)
        .await
        .with_context(|| format!("Invalid launch file '{}'", args.launch_file))?;

    if let LaunchOutcome::Suppressed { profile } = &outcome {
        println!("Browser launch suppressed for profile '{}'", profile);
        return Ok(ExitCode::SUCCESS);
    }

    // Keep the runtime alive until background launches have finished
    if let Some(report) = outcome.finish().await {
        println!("{}", report);
    }

    log::debug!("Browser launch finished");
    Ok(ExitCode::SUCCESS)
}
