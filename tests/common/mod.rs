//! Test doubles shared by the bannerscrape test suite

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::Instant;
use bannerscrape::{BannerBackend, BannerCandidate, DeviceProfile, FetchedImage, RenderedPage};

/// What [`FakeBackend::locate_banner`] answers
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum LocateOutcome {
    Found(String),
    NotFound,
    Fails(String),
}

/// Backend with canned answers that records every call
#[allow(dead_code)]
pub struct FakeBackend {
    pub locate: LocateOutcome,
    pub fetch: Result<FetchedImage, String>,
    pub locate_calls: AtomicUsize,
    pub fetched_urls: Mutex<Vec<String>>,
    pub accept_headers: Mutex<Vec<String>>,
    /// Time spent rendering before `locate_banner` answers
    pub latency: Duration,
    /// Canonical URL and start time of every locate call
    pub locate_started: Mutex<Vec<(String, Instant)>>,
    pub fetch_finished: Mutex<Vec<Instant>>,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn new(locate: LocateOutcome, fetch: Result<FetchedImage, String>) -> Self {
        Self {
            locate,
            fetch,
            locate_calls: AtomicUsize::new(0),
            fetched_urls: Mutex::new(Vec::new()),
            accept_headers: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
            locate_started: Mutex::new(Vec::new()),
            fetch_finished: Mutex::new(Vec::new()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Finds `banner_url` and serves `bytes` as `content_type`
    pub fn serving(banner_url: &str, content_type: &str, bytes: &[u8]) -> Self {
        Self::new(
            LocateOutcome::Found(banner_url.to_string()),
            Ok(image(200, Some(content_type), bytes)),
        )
    }

    pub fn locate_calls(&self) -> usize {
        self.locate_calls.load(Ordering::SeqCst)
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched_urls.lock().unwrap().clone()
    }
}

#[allow(dead_code)]
pub fn image(status: u16, content_type: Option<&str>, bytes: &[u8]) -> FetchedImage {
    FetchedImage {
        status,
        content_type: content_type.map(str::to_string),
        bytes: bytes.to_vec(),
    }
}

#[async_trait]
impl BannerBackend for FakeBackend {
    async fn locate_banner(
        &self,
        canonical_url: &str,
        _profile: DeviceProfile,
    ) -> Result<Option<BannerCandidate>> {
        self.locate_calls.fetch_add(1, Ordering::SeqCst);
        self.locate_started
            .lock()
            .unwrap()
            .push((canonical_url.to_string(), Instant::now()));
        tokio::time::sleep(self.latency).await;
        match &self.locate {
            LocateOutcome::Found(url) => Ok(Some(BannerCandidate::unscored(url.clone()))),
            LocateOutcome::NotFound => Ok(None),
            LocateOutcome::Fails(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }

    async fn fetch_image(
        &self,
        image_url: &str,
        accept: &str,
        _profile: DeviceProfile,
    ) -> Result<FetchedImage> {
        self.fetched_urls.lock().unwrap().push(image_url.to_string());
        self.accept_headers.lock().unwrap().push(accept.to_string());
        self.fetch_finished.lock().unwrap().push(Instant::now());
        self.fetch.clone().map_err(|message| anyhow::anyhow!(message))
    }
}

/// Page that answers every evaluation with a fixed snapshot
#[allow(dead_code)]
pub struct FakePage {
    pub snapshot: serde_json::Value,
    pub waits: Mutex<Vec<Duration>>,
}

#[allow(dead_code)]
impl FakePage {
    pub fn new(snapshot: serde_json::Value) -> Self {
        Self {
            snapshot,
            waits: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RenderedPage for FakePage {
    async fn wait_for_load(&self, settle_delay: Duration) -> Result<()> {
        self.waits.lock().unwrap().push(settle_delay);
        Ok(())
    }

    async fn evaluate(&self, _script: &str) -> Result<serde_json::Value> {
        Ok(self.snapshot.clone())
    }
}
