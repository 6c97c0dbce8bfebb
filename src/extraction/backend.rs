//! Browser-facing seam of the extraction pipeline

use anyhow::Result;
use async_trait::async_trait;

use super::types::DeviceProfile;
use crate::banner_locator::BannerCandidate;

/// Raw response of an image fetch
#[derive(Debug, Clone, Default)]
pub struct FetchedImage {
    /// HTTP status of the response
    pub status: u16,
    /// Declared `Content-Type`, if any
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FetchedImage {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Everything the pipeline needs from a browser
///
/// Every call owns its browser session end to end: nothing leaks between
/// calls, whether they succeed or fail.
#[async_trait]
pub trait BannerBackend: Send + Sync {
    /// Render `canonical_url` under `profile` and locate the banner.
    async fn locate_banner(
        &self,
        canonical_url: &str,
        profile: DeviceProfile,
    ) -> Result<Option<BannerCandidate>>;

    /// Fetch an image through the browser, sending `accept` as the Accept header.
    async fn fetch_image(
        &self,
        image_url: &str,
        accept: &str,
        profile: DeviceProfile,
    ) -> Result<FetchedImage>;
}
