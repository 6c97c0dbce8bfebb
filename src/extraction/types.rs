//! Core types for banner extraction.
//!
//! Requests, the device profile that drives rendering, the typed failure
//! taxonomy and the terminal result handed back through the dispatch queue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rendering context the page is emulated in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceProfile {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceProfile {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }

    #[must_use]
    pub const fn is_mobile(&self) -> bool {
        matches!(self, Self::Mobile)
    }
}

impl fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Self::Desktop),
            "mobile" => Ok(Self::Mobile),
            other => Err(format!("Unknown device profile: {other}")),
        }
    }
}

/// A single extraction job as submitted by a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub raw_artist_url: String,
    #[serde(default)]
    pub device_profile: DeviceProfile,
}

impl ExtractionRequest {
    #[must_use]
    pub fn new(raw_artist_url: impl Into<String>, device_profile: DeviceProfile) -> Self {
        Self {
            raw_artist_url: raw_artist_url.into(),
            device_profile,
        }
    }
}

/// Why an extraction failed
///
/// `Display` is the user-facing message sent back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ErrorKind {
    #[error("Invalid Spotify artist URL")]
    InvalidUrl,

    #[error("Could not find a banner image on this artist page")]
    NoBannerFound,

    #[error("Failed to download the banner image")]
    DownloadFailed,

    #[error("Error extracting banner: {0}")]
    ExtractionError(String),

    #[error("An unexpected error occurred: {0}")]
    ProcessingError(String),
}

/// Data returned for a successful extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerData {
    /// Canonical artist page URL
    pub artist_url: String,
    /// CDN-normalized URL the banner was fetched from
    pub banner_url: String,
    /// Path the image is served under, `/images/{filename}`
    pub image_path: String,
    pub artist_id: String,
    pub device_profile: DeviceProfile,
}

/// Terminal outcome of one extraction job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Success(BannerData),
    Failure { reason: ErrorKind },
}

impl ExtractionResult {
    #[must_use]
    pub fn failure(reason: ErrorKind) -> Self {
        Self::Failure { reason }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Failure reason, `None` on success
    #[must_use]
    pub fn error(&self) -> Option<&ErrorKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure { reason } => Some(reason),
        }
    }
}

impl From<Result<BannerData, ErrorKind>> for ExtractionResult {
    fn from(result: Result<BannerData, ErrorKind>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(reason) => Self::Failure { reason },
        }
    }
}
