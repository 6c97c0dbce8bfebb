//! Shared configuration constants for bannerscrape
//!
//! Default values, page selectors and URL signatures used throughout the
//! extraction pipeline, kept here to avoid magic numbers.

use std::time::Duration;

/// Host every canonical artist URL is rewritten to
pub const ARTIST_HOST: &str = "open.spotify.com";

/// URI scheme prefix for `spotify:artist:{id}` references
pub const ARTIST_URI_PREFIX: &str = "spotify:artist:";

/// Cool-down between two queued extraction jobs: 3 seconds
///
/// Only applied while more jobs are waiting, never before the first
/// job or after the last one.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(3);

/// Settle delay after `document.readyState === 'complete'`
///
/// Client-side rendering keeps mutating the DOM after the load event.
/// This is a heuristic with no correctness guarantee, so it is configurable.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(2000);

/// Upper bound for `page.goto()`
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for polling `document.readyState`
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);

/// Directory banners are written to, relative to the working directory
pub const DEFAULT_IMAGES_DIR: &str = "images";

/// Width requested from the image CDN before downloading
pub const DOWNLOAD_TARGET_WIDTH: u32 = 2560;

/// Accept header sent with image downloads (WebP preferred, not assumed)
pub const IMAGE_ACCEPT_HEADER: &str = "image/webp,image/avif,image/*;q=0.8,*/*;q=0.5";

/// Canonical direct-image CDN host
pub const CANONICAL_IMAGE_HOST: &str = "i.scdn.co";

/// Alternate CDN hosts rewritten to [`CANONICAL_IMAGE_HOST`]
pub const ALTERNATE_IMAGE_HOSTS: [&str; 2] =
    ["image-cdn-ak.spotifycdn.com", "image-cdn-fa.spotifycdn.com"];

/// Query parameter carrying the requested rendition width
pub const CDN_WIDTH_PARAM: &str = "w";

/// Image `src` fragments identifying mobile banner renditions
pub const MOBILE_BANNER_SIGNATURES: [&str; 2] = ["ab67616100005174", "i.scdn.co"];

/// Filename fragment of the desktop artist header image
pub const ARTIST_BANNER_SIGNATURE: &str = "ab67618600000194";

/// Images must be strictly larger than this on both axes for the fallback
pub const MIN_FALLBACK_DIMENSION: f64 = 200.0;

/// Remote browser endpoint, the token is appended as a query parameter
pub const BROWSERLESS_ENDPOINT: &str = "wss://chrome.browserless.io";

/// Desktop Chrome user agent
pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Mobile Safari user agent
pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

/// Desktop viewport (width, height)
pub const DESKTOP_VIEWPORT: (i64, i64) = (1920, 1080);

/// Mobile viewport (width, height)
pub const MOBILE_VIEWPORT: (i64, i64) = (375, 812);
