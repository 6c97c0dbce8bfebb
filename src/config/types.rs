//! Core configuration type for banner extraction
//!
//! `ExtractorConfig` holds every tunable of the pipeline: where images are
//! written, how long to wait on pages, the queue cool-down and which browser
//! to drive.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use super::builder::ExtractorConfigBuilder;

/// Main configuration struct for the extraction pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Directory persisted banners are written to (created on demand)
    pub(crate) images_dir: PathBuf,

    /// Idle interval between two queued jobs
    ///
    /// Default: 3 seconds
    pub(crate) cooldown: Duration,

    /// Extra wait after the document reports `complete`
    ///
    /// Client-side rendering may still be running at that point. This is a
    /// heuristic; slow pages can still produce false negatives.
    ///
    /// Default: 2 seconds
    pub(crate) settle_delay: Duration,

    /// Timeout for `page.goto()` operations
    ///
    /// Default: 30 seconds
    pub(crate) navigation_timeout: Duration,

    /// Timeout for polling `document.readyState`
    ///
    /// When exceeded the locator proceeds with whatever has rendered.
    ///
    /// Default: 10 seconds
    pub(crate) ready_timeout: Duration,

    /// Launch the local browser headless
    pub(crate) headless: bool,

    /// Token for the remote browser endpoint
    ///
    /// When set, sessions connect to the remote endpoint instead of launching
    /// a local Chromium.
    #[serde(skip_serializing)]
    pub(crate) browserless_token: Option<String>,
}

impl ExtractorConfig {
    #[must_use]
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::default()
    }

    /// Defaults overridden by environment variables
    ///
    /// Reads `BROWSERLESS_TOKEN`, `BANNER_IMAGES_DIR`, `BANNER_SETTLE_DELAY_MS`
    /// and `BANNER_COOLDOWN_MS`. Unparseable numbers are ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the variables read
    /// by [`ExtractorConfig::from_env`]
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let millis = |key: &str| text(key).and_then(|raw| parse_millis(key, &raw));
        let mut builder = Self::builder();

        if let Some(token) = text("BROWSERLESS_TOKEN") {
            builder = builder.browserless_token(token);
        }
        if let Some(dir) = text("BANNER_IMAGES_DIR") {
            builder = builder.images_dir(dir);
        }
        if let Some(delay) = millis("BANNER_SETTLE_DELAY_MS") {
            builder = builder.settle_delay(delay);
        }
        if let Some(cooldown) = millis("BANNER_COOLDOWN_MS") {
            builder = builder.cooldown(cooldown);
        }

        builder.build()
    }

    /// Builder seeded with this configuration, for layering further overrides
    #[must_use]
    pub fn into_builder(self) -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::from(self)
    }

    #[must_use]
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        self.navigation_timeout
    }

    #[must_use]
    pub fn ready_timeout(&self) -> Duration {
        self.ready_timeout
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn browserless_token(&self) -> Option<&str> {
        self.browserless_token.as_deref()
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfigBuilder::default().build()
    }
}

fn parse_millis(key: &str, raw: &str) -> Option<Duration> {
    match raw.parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            warn!("Ignoring {key}={raw:?}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ExtractorConfig::from_lookup(lookup(&[
            ("BROWSERLESS_TOKEN", "  tok-123 "),
            ("BANNER_IMAGES_DIR", "/srv/banners"),
            ("BANNER_SETTLE_DELAY_MS", "750"),
            ("BANNER_COOLDOWN_MS", " 5000 "),
        ]));

        assert_eq!(config.browserless_token(), Some("tok-123"));
        assert_eq!(config.images_dir(), Path::new("/srv/banners"));
        assert_eq!(config.settle_delay(), Duration::from_millis(750));
        assert_eq!(config.cooldown(), Duration::from_secs(5));
    }

    #[test]
    fn blank_and_unparseable_values_keep_defaults() {
        let config = ExtractorConfig::from_lookup(lookup(&[
            ("BROWSERLESS_TOKEN", "   "),
            ("BANNER_IMAGES_DIR", ""),
            ("BANNER_SETTLE_DELAY_MS", "two seconds"),
            ("BANNER_COOLDOWN_MS", "-1"),
        ]));
        let defaults = ExtractorConfig::default();

        assert!(config.browserless_token().is_none());
        assert_eq!(config.images_dir(), defaults.images_dir());
        assert_eq!(config.settle_delay(), defaults.settle_delay());
        assert_eq!(config.cooldown(), defaults.cooldown());
        assert_eq!(parse_millis("BANNER_COOLDOWN_MS", "soon"), None);
    }

    #[test]
    fn into_builder_keeps_existing_values() {
        let config = ExtractorConfig::from_lookup(lookup(&[("BANNER_COOLDOWN_MS", "10")]))
            .into_builder()
            .headless(false)
            .build();

        assert_eq!(config.cooldown(), Duration::from_millis(10));
        assert!(!config.headless());
    }
}
