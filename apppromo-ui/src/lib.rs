pub mod banner;
pub mod config;
pub mod cookie;
pub mod dom;
pub mod error;
pub mod events;
pub mod platform;
pub mod scheduler;

// Re-export key types
pub use banner::{AppPromotionBanner, BannerState, Callback, Host, COLLAPSE_DELAY};
pub use config::{BannerConfig, BannerOptions};
pub use error::{BannerError, Result};
pub use platform::{Platform, PlatformDetector};
