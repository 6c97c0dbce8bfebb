//! Caller-facing entry point: validate, then enqueue

use std::sync::Arc;

use tracing::warn;

use super::orchestrator::BannerExtractor;
use super::types::{DeviceProfile, ErrorKind, ExtractionRequest, ExtractionResult};
use crate::config::ExtractorConfig;
use crate::dispatch_queue::DispatchQueue;
use crate::utils::normalize;

/// Validates artist URLs up front and funnels valid requests through the
/// [`DispatchQueue`]
///
/// Invalid URLs fail immediately without occupying a queue slot or
/// triggering a cool-down.
pub struct BannerService {
    queue: DispatchQueue,
}

impl BannerService {
    #[must_use]
    pub fn new(queue: DispatchQueue) -> Self {
        Self { queue }
    }

    /// Browser-backed service with the configured cool-down.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn from_config(config: Arc<ExtractorConfig>) -> Self {
        let cooldown = config.cooldown();
        let extractor = Arc::new(BannerExtractor::with_chrome(config));
        Self::new(DispatchQueue::new(extractor, cooldown))
    }

    pub async fn extract(&self, raw_artist_url: &str, profile: DeviceProfile) -> ExtractionResult {
        if normalize(raw_artist_url).is_none() {
            warn!("Rejecting invalid artist URL: {raw_artist_url}");
            return ExtractionResult::failure(ErrorKind::InvalidUrl);
        }

        self.queue
            .submit(ExtractionRequest::new(raw_artist_url, profile))
            .await
    }

    #[must_use]
    pub fn queue(&self) -> &DispatchQueue {
        &self.queue
    }
}
