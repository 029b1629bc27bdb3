//! Test helpers: a local health endpoint and a recording opener

#![allow(dead_code)]

use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use browser_launch::{OpenError, UrlOpener};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A health endpoint on an ephemeral port that counts the requests reaching it
pub struct HealthServer {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl HealthServer {
    /// Answer every `/health` request with `status`
    pub async fn start(status: StatusCode) -> Self {
        Self::start_with_delay(status, Duration::ZERO).await
    }

    /// Answer after `delay`
    pub async fn start_with_delay(status: StatusCode, delay: Duration) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/health",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    status
                }
            }),
        );
        Self::serve(app, hits).await
    }

    /// `/health` answers 307 to `/ok`, which answers 200
    pub async fn start_redirecting() -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new()
            .route("/health", get(|| async { Redirect::temporary("/ok") }))
            .route(
                "/ok",
                get(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        StatusCode::OK
                    }
                }),
            );
        Self::serve(app, hits).await
    }

    async fn serve(app: Router, hits: Arc<AtomicUsize>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, hits }
    }

    pub fn health_url(&self) -> String {
        format!("http://{}/health", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// An address nothing listens on
pub async fn closed_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}/health", addr)
}

/// Records every URL it is asked to open; fails for URLs in `fail_on`
#[derive(Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
    fail_on: Vec<String>,
}

impl RecordingOpener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_on(urls: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            opened: Mutex::new(Vec::new()),
            fail_on: urls.iter().map(|u| u.to_string()).collect(),
        })
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        self.opened.lock().unwrap().push(url.to_string());
        if self.fail_on.iter().any(|u| u == url) {
            return Err(OpenError::Rejected {
                url: url.to_string(),
                reason: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}
