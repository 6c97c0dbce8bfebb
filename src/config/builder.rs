//! Fluent builder for `ExtractorConfig`
//!
//! Every field has a default from `utils::constants`, so `build()` cannot
//! fail; durations of zero are clamped where a zero would be meaningless.

use std::path::PathBuf;
use std::time::Duration;

use super::types::ExtractorConfig;
use crate::utils::{
    DEFAULT_COOLDOWN, DEFAULT_IMAGES_DIR, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_READY_TIMEOUT,
    DEFAULT_SETTLE_DELAY,
};

/// Smallest navigation timeout accepted by the builder
const MIN_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ExtractorConfigBuilder {
    images_dir: PathBuf,
    cooldown: Duration,
    settle_delay: Duration,
    navigation_timeout: Duration,
    ready_timeout: Duration,
    headless: bool,
    browserless_token: Option<String>,
}

impl Default for ExtractorConfigBuilder {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from(DEFAULT_IMAGES_DIR),
            cooldown: DEFAULT_COOLDOWN,
            settle_delay: DEFAULT_SETTLE_DELAY,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            ready_timeout: DEFAULT_READY_TIMEOUT,
            headless: true,
            browserless_token: None,
        }
    }
}

impl From<ExtractorConfig> for ExtractorConfigBuilder {
    fn from(config: ExtractorConfig) -> Self {
        Self {
            images_dir: config.images_dir,
            cooldown: config.cooldown,
            settle_delay: config.settle_delay,
            navigation_timeout: config.navigation_timeout,
            ready_timeout: config.ready_timeout,
            headless: config.headless,
            browserless_token: config.browserless_token,
        }
    }
}

impl ExtractorConfigBuilder {
    #[must_use]
    pub fn images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = dir.into();
        self
    }

    #[must_use]
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    #[must_use]
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout.max(MIN_NAVIGATION_TIMEOUT);
        self
    }

    #[must_use]
    pub fn ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn browserless_token(mut self, token: impl Into<String>) -> Self {
        self.browserless_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn build(self) -> ExtractorConfig {
        ExtractorConfig {
            images_dir: self.images_dir,
            cooldown: self.cooldown,
            settle_delay: self.settle_delay,
            navigation_timeout: self.navigation_timeout,
            ready_timeout: self.ready_timeout,
            headless: self.headless,
            browserless_token: self.browserless_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = ExtractorConfig::default();
        assert_eq!(config.images_dir(), std::path::Path::new("images"));
        assert_eq!(config.cooldown(), Duration::from_secs(3));
        assert_eq!(config.settle_delay(), Duration::from_secs(2));
        assert_eq!(config.navigation_timeout(), Duration::from_secs(30));
        assert!(config.headless());
        assert!(config.browserless_token().is_none());
    }

    #[test]
    fn navigation_timeout_is_clamped() {
        let config = ExtractorConfig::builder()
            .navigation_timeout(Duration::ZERO)
            .build();
        assert_eq!(config.navigation_timeout(), MIN_NAVIGATION_TIMEOUT);
    }

    #[test]
    fn token_is_not_serialized() {
        let config = ExtractorConfig::builder().browserless_token("secret").build();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
