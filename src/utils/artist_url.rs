//! Artist page URL normalization.
//!
//! Turns the many ways an artist page can be referenced (URI scheme,
//! locale-prefixed web URL, scheme-less address) into a single canonical
//! `https://open.spotify.com/artist/{id}` form plus the bare artist id.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use super::constants::{ARTIST_HOST, ARTIST_URI_PREFIX};

/// Locale segment that may precede `artist/` (`intl-es`, `de`, `pt-BR`)
static LOCALE_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:intl-)?[A-Za-z]{2}(?:-[A-Za-z]{2})?$").expect("Invalid locale segment regex")
});

/// Canonical artist page URL together with the artist id it names
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedArtistRef {
    pub canonical_url: String,
    pub artist_id: String,
}

impl NormalizedArtistRef {
    fn from_id(artist_id: &str) -> Self {
        Self {
            canonical_url: format!("https://{ARTIST_HOST}/artist/{artist_id}"),
            artist_id: artist_id.to_string(),
        }
    }
}

/// Normalize any supported artist reference into its canonical page URL.
///
/// Returns `None` for off-domain hosts, non-artist paths and malformed input.
///
/// ```
/// use bannerscrape::utils::artist_url::normalize;
///
/// assert_eq!(
///     normalize("open.spotify.com/intl-es/artist/1McMsnEElThX1knmY4oliG?si=x").as_deref(),
///     Some("https://open.spotify.com/artist/1McMsnEElThX1knmY4oliG"),
/// );
/// assert_eq!(normalize("https://example.com/artist/abc"), None);
/// ```
#[must_use]
pub fn normalize(raw_url: &str) -> Option<String> {
    normalize_artist(raw_url).map(|artist| artist.canonical_url)
}

/// Normalize an artist reference, keeping both the canonical URL and the id.
#[must_use]
pub fn normalize_artist(raw_url: &str) -> Option<NormalizedArtistRef> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return None;
    }

    // spotify:artist:{id}
    if let Some(rest) = strip_prefix_ignore_case(trimmed, ARTIST_URI_PREFIX) {
        let id = rest.split(['?', '#', ':', '/']).next().unwrap_or_default();
        return is_valid_artist_id(id).then(|| NormalizedArtistRef::from_id(id));
    }

    let with_scheme = if has_scheme(trimmed) {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("https://{trimmed}"))
    };

    let parsed = Url::parse(&with_scheme).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    if !parsed.host_str()?.eq_ignore_ascii_case(ARTIST_HOST) {
        return None;
    }

    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty()).peekable();
    if segments
        .peek()
        .is_some_and(|first| LOCALE_SEGMENT.is_match(first))
    {
        segments.next();
    }

    match (segments.next(), segments.next()) {
        (Some("artist"), Some(id)) if is_valid_artist_id(id) => {
            Some(NormalizedArtistRef::from_id(id))
        }
        _ => None,
    }
}

/// Artist id for a raw or canonical URL.
///
/// Re-normalizes internally, so un-normalized input yields the same id as its
/// canonical form. Falls back to a timestamp-based synthetic id only when the
/// input cannot be normalized at all.
#[must_use]
pub fn extract_artist_id(raw_url: &str) -> String {
    match normalize_artist(raw_url) {
        Some(artist) => artist.artist_id,
        None => {
            let fallback = format!("unknown-artist-{}", chrono::Utc::now().timestamp_millis());
            warn!("Could not derive artist id from '{raw_url}', using {fallback}");
            fallback
        }
    }
}

fn is_valid_artist_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// A scheme only counts when `://` precedes any path, query or fragment.
fn has_scheme(input: &str) -> bool {
    input
        .find("://")
        .is_some_and(|idx| !input[..idx].contains(['/', '?', '#']))
}

fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &input[prefix.len()..])
}
