pub mod banner_downloader;
pub mod banner_locator;
pub mod browser_profile;
pub mod browser_session;
pub mod browser_setup;
pub mod config;
pub mod dispatch_queue;
pub mod extraction;
pub mod server;
pub mod utils;

pub use banner_locator::{BannerCandidate, PageSnapshot, RenderedPage, locate};
pub use browser_session::{BrowserSession, ChromeBackend};
pub use browser_setup::{connect_remote, download_managed_browser, find_browser_executable, launch_browser};
pub use config::{ExtractorConfig, ExtractorConfigBuilder};
pub use dispatch_queue::{DispatchQueue, JobRunner};
pub use extraction::{
    BannerBackend, BannerData, BannerExtractor, BannerService, DeviceProfile, ErrorKind,
    ExtractionRequest, ExtractionResult, FetchedImage,
};
pub use utils::{extract_artist_id, normalize, normalize_cdn_url};
