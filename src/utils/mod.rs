pub mod artist_url;
pub mod cdn_url;
pub mod constants;

pub use artist_url::{NormalizedArtistRef, extract_artist_id, normalize, normalize_artist};
pub use cdn_url::normalize_cdn_url;
pub use constants::*;
