//! Command-line interface for browser_launch

use crate::config::{ActiveProfiles, DEFAULT_LAUNCH_FILE};
use crate::runtime::{CommandOpener, DryRunOpener, SystemOpener, UrlOpener};
use argh::FromArgs;
use std::collections::HashMap;
use std::sync::Arc;

/// Open the browser once a local service is up
#[derive(FromArgs, Debug)]
pub struct LaunchArgs {
    /// path to the launch file (default: browser-launch.yaml)
    #[argh(positional, default = "String::from(DEFAULT_LAUNCH_FILE)")]
    pub launch_file: String,

    /// override launch arguments (format: key:=value)
    #[argh(option, short = 'a', from_str_fn(parse_arg_override))]
    pub arg: Vec<(String, String)>,

    /// active profiles, comma-separated (default: $BROWSER_LAUNCH_PROFILES)
    #[argh(option, short = 'p')]
    pub profiles: Option<String>,

    /// browser executable to use instead of the system default
    #[argh(option, short = 'b')]
    pub browser: Option<String>,

    /// print the URLs instead of opening them
    #[argh(switch)]
    pub dry_run: bool,

    /// resolve the launch file, print the result and exit
    #[argh(switch)]
    pub validate: bool,

    /// log level (error, warn, info, debug, trace)
    #[argh(option, short = 'l', default = "String::from(\"info\")")]
    pub log_level: String,
}

/// Parse argument override in format "key:=value"
fn parse_arg_override(s: &str) -> Result<(String, String), String> {
    match s.split_once(":=") {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!(
            "Invalid argument format '{}'. Expected 'key:=value'",
            s
        )),
    }
}

impl LaunchArgs {
    /// Convert argument overrides to a HashMap
    pub fn arg_overrides(&self) -> HashMap<String, String> {
        self.arg.iter().cloned().collect()
    }

    /// `--profiles` when given, otherwise the environment
    pub fn active_profiles(&self) -> ActiveProfiles {
        match &self.profiles {
            Some(list) => ActiveProfiles::parse(list),
            None => ActiveProfiles::from_env(),
        }
    }

    /// Opener selected by `--dry-run` and `--browser`
    pub fn opener(&self) -> Arc<dyn UrlOpener> {
        if self.dry_run {
            Arc::new(DryRunOpener)
        } else if let Some(program) = &self.browser {
            Arc::new(CommandOpener::new(program.clone()))
        } else {
            Arc::new(SystemOpener)
        }
    }

    /// Level name understood by env_logger, falling back to info
    pub fn log_filter(&self) -> &'static str {
        match self.log_level.to_lowercase().as_str() {
            "error" => "error",
            "warn" => "warn",
            "debug" => "debug",
            "trace" => "trace",
            _ => "info",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> LaunchArgs {
        LaunchArgs::from_args(&["browser_launch"], args).unwrap()
    }

    #[test]
    fn test_parse_arg_override() {
        let result = parse_arg_override("port:=9090");
        assert_eq!(result, Ok(("port".to_string(), "9090".to_string())));
    }

    #[test]
    fn test_parse_arg_override_keeps_value_separators() {
        let result = parse_arg_override("base:=http://localhost:8080");
        assert_eq!(
            result,
            Ok(("base".to_string(), "http://localhost:8080".to_string()))
        );
    }

    #[test]
    fn test_parse_arg_override_invalid() {
        assert!(parse_arg_override("invalid").is_err());
        assert!(parse_arg_override(":=value").is_err());
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.launch_file, "browser-launch.yaml");
        assert!(!args.dry_run);
        assert_eq!(args.log_filter(), "info");
    }

    #[test]
    fn test_profiles_flag() {
        let args = parse(&["--profiles", "dev, local", "-l", "DEBUG", "app.yaml"]);
        assert_eq!(args.launch_file, "app.yaml");
        assert_eq!(
            args.active_profiles().iter().collect::<Vec<_>>(),
            vec!["dev", "local"]
        );
        assert_eq!(args.log_filter(), "debug");
    }

    #[test]
    fn test_overrides_collected() {
        let args = parse(&["-a", "port:=1", "-a", "host:=example"]);
        let overrides = args.arg_overrides();
        assert_eq!(overrides.get("port").map(String::as_str), Some("1"));
        assert_eq!(overrides.get("host").map(String::as_str), Some("example"));
    }
}
