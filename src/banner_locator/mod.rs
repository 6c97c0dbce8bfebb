//! Banner locating on a rendered artist page
//!
//! The page is abstracted behind [`RenderedPage`] so the heuristics do not
//! depend on the automation engine. A single [`PageSnapshot`] is captured and
//! the ordered [`strategies`] run over it until one finds a candidate.

pub mod js_scripts;
pub mod snapshot;
pub mod strategies;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::extraction::DeviceProfile;

pub use snapshot::{EntityImage, PageSnapshot, RenderedImage};
pub use strategies::{Strategy, strategies_for};

/// Capabilities the locator needs from a loaded page
#[async_trait]
pub trait RenderedPage: Send + Sync {
    /// Wait until the document is complete, then for `settle_delay`
    async fn wait_for_load(&self, settle_delay: Duration) -> Result<()>;

    /// Evaluate a JavaScript expression and return its JSON value
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;
}

/// A possible banner image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerCandidate {
    pub url: String,
    /// Rendered width × height, 0 when unknown
    pub area_score: f64,
}

impl BannerCandidate {
    #[must_use]
    pub fn new(url: impl Into<String>, area_score: f64) -> Self {
        Self {
            url: url.into(),
            area_score,
        }
    }

    /// Candidate found through a style, without a known rendered size
    #[must_use]
    pub fn unscored(url: impl Into<String>) -> Self {
        Self::new(url, 0.0)
    }
}

/// Locate the banner on a page for the given device profile.
///
/// `Ok(None)` means every strategy came up empty; `Err` means talking to the
/// page failed.
pub async fn locate<P: RenderedPage + ?Sized>(
    page: &P,
    profile: DeviceProfile,
    settle_delay: Duration,
) -> Result<Option<BannerCandidate>> {
    page.wait_for_load(settle_delay).await?;

    debug!("Extracting banner from DOM ({profile})");
    let snapshot = PageSnapshot::capture(page).await?;
    debug!(
        images = snapshot.images.len(),
        backgrounds = snapshot.backgrounds.len(),
        "Captured page snapshot"
    );

    Ok(select_candidate(&snapshot, profile))
}

/// Run the profile's strategy chain over a snapshot, first hit wins
#[must_use]
pub fn select_candidate(snapshot: &PageSnapshot, profile: DeviceProfile) -> Option<BannerCandidate> {
    for strategy in strategies_for(profile) {
        if let Some(candidate) = (strategy.find)(snapshot) {
            info!(
                strategy = strategy.name,
                "Banner found: {}", candidate.url
            );
            return Some(candidate);
        }
        debug!(strategy = strategy.name, "Strategy found nothing");
    }

    info!("No banner found in DOM for this artist");
    None
}
