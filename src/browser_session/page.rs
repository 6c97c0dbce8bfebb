//! Page-level operations on a live chromiumoxide tab
//!
//! Device emulation, navigation, load waiting for the locator and image
//! fetching for the downloader.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    EventResponseReceived, GetResponseBodyParams, Headers, SetExtraHttpHeadersParams,
    SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, EventLifecycleEvent,
};
use futures::StreamExt;
use tracing::{debug, warn};

use super::page_timeout::with_page_timeout;
use crate::banner_locator::RenderedPage;
use crate::banner_locator::js_scripts::{READY_STATE_SCRIPT, WEBDRIVER_STEALTH_SCRIPT};
use crate::extraction::{DeviceProfile, FetchedImage};
use crate::utils::constants::{
    DESKTOP_USER_AGENT, DESKTOP_VIEWPORT, MOBILE_USER_AGENT, MOBILE_VIEWPORT,
};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Extra wait once the document is complete but images are still decoding
const IMAGES_PENDING_GRACE: Duration = Duration::from_millis(500);

/// Lifecycle event emitted when a new document is committed in a frame
const LIFECYCLE_INIT: &str = "init";

/// At most two connections open for 500ms
const NETWORK_IDLE_EVENT: &str = "networkAlmostIdle";

/// Apply the user agent, viewport and stealth script of `profile` to a blank page.
pub async fn emulate_device(page: &Page, profile: DeviceProfile) -> Result<()> {
    let (user_agent, (width, height)) = match profile {
        DeviceProfile::Desktop => (DESKTOP_USER_AGENT, DESKTOP_VIEWPORT),
        DeviceProfile::Mobile => (MOBILE_USER_AGENT, MOBILE_VIEWPORT),
    };

    page.execute(SetUserAgentOverrideParams::new(user_agent))
        .await
        .context("Failed to override user agent")?;

    page.execute(
        SetDeviceMetricsOverrideParams::builder()
            .width(width)
            .height(height)
            .device_scale_factor(1.0)
            .mobile(profile.is_mobile())
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await
    .context("Failed to override device metrics")?;

    page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
        WEBDRIVER_STEALTH_SCRIPT,
    ))
    .await
    .context("Failed to install stealth script")?;

    debug!("Emulating {profile} device ({width}x{height})");
    Ok(())
}

/// Navigate to `url`, bounded by `limit`.
pub async fn navigate(page: &Page, url: &str, limit: Duration) -> Result<()> {
    with_page_timeout(
        async {
            page.goto(url)
                .await
                .with_context(|| format!("Failed to navigate to {url}"))?;
            Ok(())
        },
        limit,
        "Navigation",
    )
    .await
}

/// Navigate to `url` and wait until its network is almost idle.
///
/// Loading and idling share the single `limit`; exceeding it is an error.
pub async fn navigate_until_idle(page: &Page, url: &str, limit: Duration) -> Result<()> {
    let mut lifecycle = page
        .event_listener::<EventLifecycleEvent>()
        .await
        .context("Failed to listen for lifecycle events")?;
    let main_frame = page
        .mainframe()
        .await
        .context("Failed to resolve main frame")?
        .map(String::from);
    let mut watch = NetworkIdleWatch::new(main_frame);

    with_page_timeout(
        async {
            page.goto(url)
                .await
                .with_context(|| format!("Failed to navigate to {url}"))?;

            while let Some(event) = lifecycle.next().await {
                if watch.observe(event.frame_id.inner(), &event.name) {
                    debug!("Network almost idle on {url}");
                    return Ok(());
                }
            }
            Err(anyhow::anyhow!("Lifecycle events stopped before {url} went idle"))
        },
        limit,
        "Navigation",
    )
    .await
}

/// Follows the lifecycle events of one main-frame navigation.
#[derive(Debug)]
struct NetworkIdleWatch {
    main_frame: Option<String>,
    committed: bool,
}

impl NetworkIdleWatch {
    fn new(main_frame: Option<String>) -> Self {
        Self {
            main_frame,
            committed: false,
        }
    }

    /// True once the newly committed document reports network idle.
    fn observe(&mut self, frame_id: &str, name: &str) -> bool {
        if self
            .main_frame
            .as_deref()
            .is_some_and(|main| main != frame_id)
        {
            return false;
        }

        match name {
            LIFECYCLE_INIT => {
                self.committed = true;
                false
            }
            NETWORK_IDLE_EVENT => self.committed,
            _ => false,
        }
    }
}

/// Load state reported by the readiness script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Loading,
    ImagesPending,
    Ready,
}

impl Readiness {
    fn from_report(report: &serde_json::Value) -> Self {
        let flag = |key: &str| {
            report
                .get(key)
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false)
        };
        let complete = report.get("readyState").and_then(|v| v.as_str()) == Some("complete");

        match (complete && flag("bodyExists"), flag("imagesLoaded")) {
            (false, _) => Self::Loading,
            (true, false) => Self::ImagesPending,
            (true, true) => Self::Ready,
        }
    }
}

/// Load an image through the page and capture its response body.
///
/// The browser sends `accept` as the Accept header, so whatever encoding the
/// CDN negotiates is returned with its declared content type.
pub async fn fetch_image(
    page: &Page,
    image_url: &str,
    accept: &str,
    limit: Duration,
) -> Result<FetchedImage> {
    page.execute(SetExtraHttpHeadersParams::new(Headers::new(
        serde_json::json!({ "Accept": accept }),
    )))
    .await
    .context("Failed to set Accept header")?;

    let mut responses = page
        .event_listener::<EventResponseReceived>()
        .await
        .context("Failed to listen for network responses")?;

    navigate(page, image_url, limit).await?;

    let event = with_page_timeout(
        async {
            while let Some(event) = responses.next().await {
                let response = &event.response;
                if response.url == image_url || response.mime_type.starts_with("image/") {
                    return Ok(event);
                }
            }
            Err(anyhow::anyhow!("No response received for {image_url}"))
        },
        limit,
        "Image response",
    )
    .await?;

    let status = u16::try_from(event.response.status).unwrap_or(0);
    let content_type = Some(event.response.mime_type.clone()).filter(|mime| !mime.is_empty());

    let body = page
        .execute(GetResponseBodyParams::new(event.request_id.clone()))
        .await
        .context("Failed to read response body")?;

    let bytes = if body.result.base64_encoded {
        STANDARD
            .decode(body.result.body.as_bytes())
            .context("Response body is not valid base64")?
    } else {
        body.result.body.clone().into_bytes()
    };

    debug!(
        "Fetched {image_url}: status {status}, {} bytes, type {:?}",
        bytes.len(),
        content_type
    );

    Ok(FetchedImage {
        status,
        content_type,
        bytes,
    })
}

/// A navigated chromiumoxide page seen through [`RenderedPage`]
pub struct ChromePage<'a> {
    page: &'a Page,
    ready_timeout: Duration,
}

impl<'a> ChromePage<'a> {
    #[must_use]
    pub fn new(page: &'a Page, ready_timeout: Duration) -> Self {
        Self {
            page,
            ready_timeout,
        }
    }

    async fn poll_ready_state(&self) {
        let start = Instant::now();

        loop {
            if start.elapsed() >= self.ready_timeout {
                warn!(
                    "Timeout waiting for page load after {:.1}s, proceeding anyway",
                    self.ready_timeout.as_secs_f64()
                );
                return;
            }

            match self.evaluate(READY_STATE_SCRIPT).await {
                Ok(report) => match Readiness::from_report(&report) {
                    Readiness::Loading => {}
                    Readiness::ImagesPending => {
                        debug!("Document complete, images still loading");
                        tokio::time::sleep(IMAGES_PENDING_GRACE).await;
                        return;
                    }
                    Readiness::Ready => {
                        debug!("Page ready after {:.2}s", start.elapsed().as_secs_f64());
                        return;
                    }
                },
                Err(e) => debug!("Failed to check readyState: {e}, retrying"),
            }

            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl RenderedPage for ChromePage<'_> {
    async fn wait_for_load(&self, settle_delay: Duration) -> Result<()> {
        self.poll_ready_state().await;
        tokio::time::sleep(settle_delay).await;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .context("Script evaluation failed")?;
        result
            .into_value::<serde_json::Value>()
            .context("Script returned a non-JSON value")
    }
}
