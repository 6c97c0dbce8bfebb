//! One extraction job from raw URL to stored banner

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument};

use super::backend::BannerBackend;
use super::types::{BannerData, DeviceProfile, ErrorKind, ExtractionRequest, ExtractionResult};
use crate::banner_downloader;
use crate::browser_session::ChromeBackend;
use crate::config::ExtractorConfig;
use crate::dispatch_queue::JobRunner;
use crate::utils::constants::DOWNLOAD_TARGET_WIDTH;
use crate::utils::{extract_artist_id, normalize, normalize_cdn_url};

/// URL prefix persisted banners are served under
pub const IMAGES_ROUTE: &str = "/images";

/// Runs the normalize, locate, download pipeline for a single request
pub struct BannerExtractor {
    backend: Arc<dyn BannerBackend>,
    images_dir: PathBuf,
}

impl BannerExtractor {
    #[must_use]
    pub fn new(backend: Arc<dyn BannerBackend>, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            images_dir: images_dir.into(),
        }
    }

    /// Extractor backed by a real browser
    #[must_use]
    pub fn with_chrome(config: Arc<ExtractorConfig>) -> Self {
        let images_dir = config.images_dir().to_path_buf();
        Self::new(Arc::new(ChromeBackend::new(config)), images_dir)
    }

    #[must_use]
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Process one request. Never panics on bad input; every failure is a
    /// typed [`ErrorKind`].
    #[instrument(skip_all, fields(profile = %profile))]
    pub async fn process(&self, raw_artist_url: &str, profile: DeviceProfile) -> ExtractionResult {
        let result = self.try_process(raw_artist_url, profile).await;
        match &result {
            Ok(data) => info!("Banner for {} stored at {}", data.artist_id, data.image_path),
            Err(reason) => error!("Extraction failed: {reason}"),
        }
        result.into()
    }

    async fn try_process(
        &self,
        raw_artist_url: &str,
        profile: DeviceProfile,
    ) -> Result<BannerData, ErrorKind> {
        let canonical = normalize(raw_artist_url).ok_or(ErrorKind::InvalidUrl)?;
        info!("Processing {canonical} ({profile} version)");

        let candidate = self
            .backend
            .locate_banner(&canonical, profile)
            .await
            .map_err(|e| ErrorKind::ExtractionError(format!("{e:#}")))?
            .ok_or(ErrorKind::NoBannerFound)?;

        let artist_id = extract_artist_id(&canonical);
        let banner_url = normalize_cdn_url(&candidate.url, Some(DOWNLOAD_TARGET_WIDTH));

        let filename = banner_downloader::download(
            self.backend.as_ref(),
            &self.images_dir,
            &banner_url,
            &artist_id,
            profile,
        )
        .await
        .ok_or(ErrorKind::DownloadFailed)?;

        Ok(BannerData {
            artist_url: canonical,
            banner_url,
            image_path: format!("{IMAGES_ROUTE}/{filename}"),
            artist_id,
            device_profile: profile,
        })
    }
}

#[async_trait]
impl JobRunner for BannerExtractor {
    async fn run(&self, request: ExtractionRequest) -> ExtractionResult {
        self.process(&request.raw_artist_url, request.device_profile)
            .await
    }
}
