//! [`BannerBackend`] driving a real browser

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::BrowserSession;
use super::page::{ChromePage, fetch_image, navigate_until_idle};
use crate::banner_locator::{self, BannerCandidate};
use crate::config::ExtractorConfig;
use crate::extraction::{BannerBackend, DeviceProfile, FetchedImage};

/// Opens a fresh [`BrowserSession`] for every call and always closes it
#[derive(Debug, Clone)]
pub struct ChromeBackend {
    config: Arc<ExtractorConfig>,
}

impl ChromeBackend {
    #[must_use]
    pub fn new(config: Arc<ExtractorConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BannerBackend for ChromeBackend {
    async fn locate_banner(
        &self,
        canonical_url: &str,
        profile: DeviceProfile,
    ) -> Result<Option<BannerCandidate>> {
        info!("Navigating to {canonical_url} ({profile} version)");
        let session = BrowserSession::open(&self.config).await?;

        let outcome = async {
            let page = session.new_page(profile).await?;
            navigate_until_idle(&page, canonical_url, self.config.navigation_timeout()).await?;
            let rendered = ChromePage::new(&page, self.config.ready_timeout());
            banner_locator::locate(&rendered, profile, self.config.settle_delay()).await
        }
        .await;

        session.close().await;
        outcome
    }

    async fn fetch_image(
        &self,
        image_url: &str,
        accept: &str,
        profile: DeviceProfile,
    ) -> Result<FetchedImage> {
        let session = BrowserSession::open(&self.config).await?;

        let outcome = async {
            let page = session.new_page(profile).await?;
            fetch_image(&page, image_url, accept, self.config.navigation_timeout()).await
        }
        .await;

        session.close().await;
        outcome
    }
}
