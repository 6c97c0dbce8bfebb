//! Image CDN URL canonicalization.

use url::Url;

use super::constants::{ALTERNATE_IMAGE_HOSTS, CANONICAL_IMAGE_HOST, CDN_WIDTH_PARAM};

/// Rewrite an image URL to the canonical CDN host and request a wider rendition.
///
/// Alternate CDN hosts are replaced with [`CANONICAL_IMAGE_HOST`]. When
/// `desired_width` is given and the URL has no width parameter yet, one is
/// appended. Input that does not parse as an http(s) URL is returned unchanged,
/// so this never fails. Applying it twice gives the same result as once.
#[must_use]
pub fn normalize_cdn_url(url: &str, desired_width: Option<u32>) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return url.to_string();
    }

    let is_alternate_host = parsed.host_str().is_some_and(|host| {
        ALTERNATE_IMAGE_HOSTS
            .iter()
            .any(|alt| host.eq_ignore_ascii_case(alt))
    });
    if is_alternate_host && parsed.set_host(Some(CANONICAL_IMAGE_HOST)).is_err() {
        return url.to_string();
    }

    if let Some(width) = desired_width {
        let has_width = parsed.query_pairs().any(|(key, _)| key == CDN_WIDTH_PARAM);
        if !has_width {
            parsed
                .query_pairs_mut()
                .append_pair(CDN_WIDTH_PARAM, &width.to_string());
        }
    }

    parsed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_alternate_hosts() {
        for host in ALTERNATE_IMAGE_HOSTS {
            let input = format!("https://{host}/image/ab67618600000194abc");
            assert_eq!(
                normalize_cdn_url(&input, None),
                "https://i.scdn.co/image/ab67618600000194abc"
            );
        }
    }

    #[test]
    fn appends_width_only_once() {
        let once = normalize_cdn_url("https://i.scdn.co/image/abc", Some(2560));
        assert_eq!(once, "https://i.scdn.co/image/abc?w=2560");
        assert_eq!(normalize_cdn_url(&once, Some(640)), once);
    }

    #[test]
    fn keeps_existing_width_and_query() {
        let input = "https://image-cdn-fa.spotifycdn.com/image/abc?w=1280&format=webp";
        assert_eq!(
            normalize_cdn_url(input, Some(2560)),
            "https://i.scdn.co/image/abc?w=1280&format=webp"
        );
    }

    #[test]
    fn leaves_unparseable_input_alone() {
        assert_eq!(normalize_cdn_url("not a url", Some(100)), "not a url");
        assert_eq!(
            normalize_cdn_url("data:image/png;base64,AAAA", Some(100)),
            "data:image/png;base64,AAAA"
        );
    }
}
