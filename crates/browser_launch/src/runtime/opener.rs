//! Ways of opening a URL in a browser

use std::process::{Command, Stdio};

/// Error opening a single URL
#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("could not open '{url}': {source}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not open '{url}': {reason}")]
    Rejected { url: String, reason: String },
}

/// Opens one URL. Failures are per call and never fatal to the caller.
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// The operating system's default browser
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        open::that_detached(url).map_err(|source| OpenError::Io {
            url: url.to_string(),
            source,
        })
    }
}

/// A specific browser executable, started with the URL as its only argument
#[derive(Debug, Clone)]
pub struct CommandOpener {
    program: String,
}

impl CommandOpener {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl UrlOpener for CommandOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        // The browser outlives us; don't wait on it
        Command::new(&self.program)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|source| OpenError::Io {
                url: url.to_string(),
                source,
            })
    }
}

/// Prints instead of opening
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunOpener;

impl UrlOpener for DryRunOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        println!("would open {}", url);
        Ok(())
    }
}
