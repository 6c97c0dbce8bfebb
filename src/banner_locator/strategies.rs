//! Ordered banner-finding heuristics
//!
//! Each strategy is a pure function over a [`PageSnapshot`]. They are tried in
//! order and the first one that yields a candidate wins.

use super::BannerCandidate;
use super::snapshot::{PageSnapshot, RenderedImage, last_style_url, style_urls};
use crate::extraction::DeviceProfile;
use crate::utils::constants::{
    ARTIST_BANNER_SIGNATURE, MIN_FALLBACK_DIMENSION, MOBILE_BANNER_SIGNATURES,
};

/// A named candidate finder
#[derive(Clone, Copy)]
pub struct Strategy {
    pub name: &'static str,
    pub find: fn(&PageSnapshot) -> Option<BannerCandidate>,
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

const MOBILE_FAST_PATH: Strategy = Strategy {
    name: "mobile_fast_path",
    find: mobile_fast_path,
};
const BACKGROUND_CONTAINER: Strategy = Strategy {
    name: "background_container",
    find: background_container,
};
const ENTITY_IMAGE: Strategy = Strategy {
    name: "entity_image",
    find: entity_image,
};
const SIGNATURE_SWEEP: Strategy = Strategy {
    name: "signature_sweep",
    find: signature_sweep,
};
const LARGEST_IMAGE: Strategy = Strategy {
    name: "largest_image",
    find: largest_image,
};

const DESKTOP_STRATEGIES: &[Strategy] =
    &[BACKGROUND_CONTAINER, ENTITY_IMAGE, SIGNATURE_SWEEP, LARGEST_IMAGE];

// Mobile banners are not guaranteed to exist, so the desktop chain follows.
const MOBILE_STRATEGIES: &[Strategy] = &[
    MOBILE_FAST_PATH,
    BACKGROUND_CONTAINER,
    ENTITY_IMAGE,
    SIGNATURE_SWEEP,
    LARGEST_IMAGE,
];

/// Strategy chain for a device profile
#[must_use]
pub fn strategies_for(profile: DeviceProfile) -> &'static [Strategy] {
    match profile {
        DeviceProfile::Desktop => DESKTOP_STRATEGIES,
        DeviceProfile::Mobile => MOBILE_STRATEGIES,
    }
}

/// Largest image by rendered area; ties keep the earliest element.
fn largest<'a>(images: impl Iterator<Item = &'a RenderedImage>) -> Option<&'a RenderedImage> {
    images.fold(None, |best, img| match best {
        Some(current) if current.area() >= img.area() => Some(current),
        _ => Some(img),
    })
}

fn mobile_fast_path(snapshot: &PageSnapshot) -> Option<BannerCandidate> {
    let mobile_images = snapshot.images.iter().filter(|img| {
        MOBILE_BANNER_SIGNATURES
            .iter()
            .any(|signature| img.src.contains(signature))
    });

    largest(mobile_images).map(|img| BannerCandidate::new(img.best_source(), img.area()))
}

fn background_container(snapshot: &PageSnapshot) -> Option<BannerCandidate> {
    snapshot
        .background_container
        .as_deref()
        .and_then(last_style_url)
        .map(BannerCandidate::unscored)
}

fn entity_image(snapshot: &PageSnapshot) -> Option<BannerCandidate> {
    let entity = snapshot.entity_image.as_ref()?;

    if let Some(img) = entity.image.as_ref().filter(|img| !img.src.is_empty()) {
        return Some(BannerCandidate::new(img.best_source(), img.area()));
    }

    entity
        .background
        .as_deref()
        .and_then(last_style_url)
        .map(BannerCandidate::unscored)
}

fn signature_sweep(snapshot: &PageSnapshot) -> Option<BannerCandidate> {
    snapshot
        .backgrounds
        .iter()
        .find(|style| style.contains(ARTIST_BANNER_SIGNATURE))
        .and_then(|style| {
            let urls = style_urls(style);
            urls.iter()
                .rev()
                .find(|url| url.contains(ARTIST_BANNER_SIGNATURE))
                .or(urls.last())
                .copied()
        })
        .map(BannerCandidate::unscored)
}

fn largest_image(snapshot: &PageSnapshot) -> Option<BannerCandidate> {
    let big_enough = snapshot.images.iter().filter(|img| {
        !img.src.is_empty() && img.width > MIN_FALLBACK_DIMENSION && img.height > MIN_FALLBACK_DIMENSION
    });

    largest(big_enough).map(|img| BannerCandidate::new(&img.src, img.area()))
}
