//! Serializable view of the rendered artist page
//!
//! The page is evaluated once; every locating strategy then works on this
//! plain data instead of talking to the browser again.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use super::RenderedPage;
use super::js_scripts::SNAPSHOT_SCRIPT;

static STYLE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"url\(\s*["']?([^"')]*)["']?\s*\)"#).expect("Invalid style url regex")
});

/// An `<img>` element as laid out on the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedImage {
    pub src: String,
    #[serde(default)]
    pub srcset: Option<String>,
    /// Bounding box width in CSS pixels
    #[serde(default)]
    pub width: f64,
    /// Bounding box height in CSS pixels
    #[serde(default)]
    pub height: f64,
}

impl RenderedImage {
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Highest-resolution `srcset` entry, falling back to `src`
    #[must_use]
    pub fn best_source(&self) -> &str {
        self.srcset
            .as_deref()
            .and_then(highest_srcset_entry)
            .unwrap_or(&self.src)
    }
}

/// The entity-image container and what it renders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityImage {
    #[serde(default)]
    pub image: Option<RenderedImage>,
    /// Computed `background-image`, absent when `none`
    #[serde(default)]
    pub background: Option<String>,
}

/// Everything the locating strategies look at
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// All images with a source, in document order
    #[serde(default)]
    pub images: Vec<RenderedImage>,
    /// Computed background of the header background element
    #[serde(default)]
    pub background_container: Option<String>,
    #[serde(default)]
    pub entity_image: Option<EntityImage>,
    /// Every computed background carrying a `url(...)`, in document order
    #[serde(default)]
    pub backgrounds: Vec<String>,
    /// `document.baseURI`, which relative `srcset` entries resolve against
    #[serde(default)]
    pub base_uri: Option<String>,
}

impl PageSnapshot {
    /// Evaluate the snapshot script against a loaded page
    pub async fn capture<P: RenderedPage + ?Sized>(page: &P) -> Result<Self> {
        let value = page
            .evaluate(SNAPSHOT_SCRIPT)
            .await
            .context("Failed to execute banner snapshot script")?;

        let mut snapshot: Self = serde_json::from_value(value)
            .context("Failed to parse banner snapshot from JS result")?;
        snapshot.resolve_srcsets();
        Ok(snapshot)
    }

    /// Rewrite relative `srcset` entries as absolute URLs.
    ///
    /// `src` comes back resolved from the DOM property; the raw attribute does not.
    pub fn resolve_srcsets(&mut self) {
        let Some(base) = self.base_uri.as_deref().and_then(|b| Url::parse(b).ok()) else {
            return;
        };

        let entity = self.entity_image.as_mut().and_then(|e| e.image.as_mut());
        for image in self.images.iter_mut().chain(entity) {
            if let Some(srcset) = image.srcset.as_mut() {
                *srcset = resolve_srcset(&base, srcset);
            }
        }
    }
}

/// `srcset` with every entry's URL joined onto `base`, descriptors kept
#[must_use]
pub fn resolve_srcset(base: &Url, srcset: &str) -> String {
    srcset
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split_whitespace();
            let url = parts.next()?;
            let resolved = base
                .join(url)
                .map(String::from)
                .unwrap_or_else(|_| url.to_string());
            Some(
                std::iter::once(resolved)
                    .chain(parts.map(str::to_string))
                    .collect::<Vec<_>>()
                    .join(" "),
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// All `url(...)` tokens of a CSS background value, in order
#[must_use]
pub fn style_urls(style: &str) -> Vec<&str> {
    STYLE_URL
        .captures_iter(style)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|url| !url.is_empty())
        .collect()
}

/// Last `url(...)` token of a CSS background value
///
/// Chained backgrounds list fallbacks first, so the last one is the richest.
#[must_use]
pub fn last_style_url(style: &str) -> Option<&str> {
    style_urls(style).pop()
}

/// URL of the `srcset` entry with the largest descriptor.
///
/// Both density (`2x`) and width (`640w`) descriptors are compared by their
/// number; an entry without descriptor counts as `1x`. Ties keep the first.
#[must_use]
pub fn highest_srcset_entry(srcset: &str) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;

    for entry in srcset.split(',') {
        let mut parts = entry.split_whitespace();
        let Some(url) = parts.next() else {
            continue;
        };
        let weight = parts
            .next()
            .and_then(|d| d.get(..d.len().saturating_sub(1)))
            .and_then(|n| n.parse::<f64>().ok())
            .unwrap_or(1.0);

        if best.is_none_or(|(_, w)| weight > w) {
            best = Some((url, weight));
        }
    }

    best.map(|(url, _)| url)
}
