//! Configuration for the banner extraction pipeline

pub mod builder;
pub mod types;

pub use builder::ExtractorConfigBuilder;
pub use types::ExtractorConfig;
