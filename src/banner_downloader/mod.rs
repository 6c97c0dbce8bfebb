//! Banner image persistence
//!
//! Fetches the CDN-normalized banner through a [`BannerBackend`], picks the
//! file extension from the negotiated content type and writes the bytes to
//! `{artist_id}_{profile}_banner.{ext}` in the images directory. Writes to an
//! existing name replace the file (last write wins).

use std::path::Path;

use crate::extraction::{BannerBackend, DeviceProfile};
use crate::utils::constants::{DOWNLOAD_TARGET_WIDTH, IMAGE_ACCEPT_HEADER};
use crate::utils::normalize_cdn_url;

/// File extension for a declared content type.
///
/// Unknown or missing types fall back to `jpg`.
#[must_use]
pub fn extension_for_content_type(content_type: Option<&str>) -> &'static str {
    let Some(content_type) = content_type else {
        return "jpg";
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/webp" => "webp",
        "image/png" => "png",
        "image/avif" => "avif",
        _ => "jpg",
    }
}

/// Deterministic name of a persisted banner
#[must_use]
pub fn banner_filename(artist_id: &str, profile: DeviceProfile, extension: &str) -> String {
    format!("{artist_id}_{profile}_banner.{extension}")
}

/// Download a banner and persist it, returning the stored filename.
///
/// Every failure (fetch error, non-2xx status, empty body, write error) is
/// logged and yields `None`.
pub async fn download<B: BannerBackend + ?Sized>(
    backend: &B,
    images_dir: &Path,
    image_url: &str,
    artist_id: &str,
    profile: DeviceProfile,
) -> Option<String> {
    let download_url = normalize_cdn_url(image_url, Some(DOWNLOAD_TARGET_WIDTH));
    log::info!(target: "bannerscrape::download", "Downloading banner from {download_url}");

    let fetched = match backend
        .fetch_image(&download_url, IMAGE_ACCEPT_HEADER, profile)
        .await
    {
        Ok(fetched) => fetched,
        Err(e) => {
            log::error!(target: "bannerscrape::download", "Error downloading image {download_url}: {e:#}");
            return None;
        }
    };

    if !fetched.is_success() {
        log::error!(
            target: "bannerscrape::download",
            "Image request for {download_url} returned status {}",
            fetched.status
        );
        return None;
    }
    if fetched.bytes.is_empty() {
        log::error!(target: "bannerscrape::download", "Image response for {download_url} was empty");
        return None;
    }

    let extension = extension_for_content_type(fetched.content_type.as_deref());
    let filename = banner_filename(artist_id, profile, extension);
    let path = images_dir.join(&filename);

    if let Err(e) = tokio::fs::create_dir_all(images_dir).await {
        log::error!(
            target: "bannerscrape::download",
            "Failed to create images directory {}: {e}",
            images_dir.display()
        );
        return None;
    }
    if let Err(e) = tokio::fs::write(&path, &fetched.bytes).await {
        log::error!(target: "bannerscrape::download", "Failed to write {}: {e}", path.display());
        return None;
    }

    log::info!(
        target: "bannerscrape::download",
        "Image saved to {} ({} bytes, {:?})",
        path.display(),
        fetched.bytes.len(),
        fetched.content_type
    );
    Some(filename)
}
