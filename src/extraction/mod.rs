//! Banner extraction pipeline
//!
//! - [`types`]: requests, device profiles, failures and results
//! - [`backend`]: the browser seam ([`BannerBackend`])
//! - [`orchestrator`]: one job end to end ([`BannerExtractor`])
//! - [`service`]: validation plus serialized dispatch ([`BannerService`])

pub mod backend;
pub mod orchestrator;
pub mod service;
pub mod types;

pub use backend::{BannerBackend, FetchedImage};
pub use orchestrator::{BannerExtractor, IMAGES_ROUTE};
pub use service::BannerService;
pub use types::{BannerData, DeviceProfile, ErrorKind, ExtractionRequest, ExtractionResult};
