//! Per-call browser sessions
//!
//! A [`BrowserSession`] owns one browser (local or remote), its CDP handler
//! task and, for local launches, its throwaway profile directory. Sessions are
//! closed explicitly with [`BrowserSession::close`]; `Drop` is only a fallback
//! that kills the handler and the profile.

pub mod backend;
pub mod page;
pub mod page_timeout;

use anyhow::{Context, Result};
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::browser_profile::BrowserProfile;
use crate::browser_setup::{connect_remote, launch_browser};
use crate::config::ExtractorConfig;
use crate::extraction::DeviceProfile;

pub use backend::ChromeBackend;
pub use page::{ChromePage, emulate_device, fetch_image, navigate, navigate_until_idle};
pub use page_timeout::with_page_timeout;

pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    // Declared last so the directory outlives the browser process
    profile: Option<BrowserProfile>,
    closed: bool,
}

impl BrowserSession {
    /// Connect to the remote endpoint when a token is configured, otherwise
    /// launch a local browser with a fresh profile.
    pub async fn open(config: &ExtractorConfig) -> Result<Self> {
        if let Some(token) = config.browserless_token() {
            let (browser, handler) = connect_remote(token).await?;
            return Ok(Self {
                browser,
                handler,
                profile: None,
                closed: false,
            });
        }

        let profile = BrowserProfile::create()?;
        let (browser, handler) = launch_browser(config.headless(), profile.path()).await?;
        Ok(Self {
            browser,
            handler,
            profile: Some(profile),
            closed: false,
        })
    }

    /// Open a blank tab emulating `profile`.
    pub async fn new_page(&self, profile: DeviceProfile) -> Result<Page> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("Failed to create blank page")?;
        emulate_device(&page, profile).await?;
        Ok(page)
    }

    /// Close the browser, wait for it to exit and release the profile.
    ///
    /// Failures are logged rather than returned; a session is never reused.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser cleanly: {e}");
        }
        match self.browser.wait().await {
            Ok(_) => debug!("Browser process exited"),
            Err(e) => warn!("Failed to wait for browser exit: {e}"),
        }
        self.handler.abort();
        self.closed = true;
        info!("Browser session closed");
        // profile drops with self, after the process has exited
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!("BrowserSession dropped without close - aborting handler");
            self.handler.abort();
            // Browser::drop kills a locally launched process
        }
    }
}
