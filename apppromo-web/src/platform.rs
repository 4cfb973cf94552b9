use apppromo_ui::{Platform, PlatformDetector};

/// Platform read once from `navigator.userAgent`
pub struct NavigatorPlatform {
    platform: Platform,
}

impl NavigatorPlatform {
    pub fn new() -> Self {
        let user_agent = web_sys::window()
            .and_then(|w| w.navigator().user_agent().ok())
            .unwrap_or_default();
        let platform = Platform::from_user_agent(&user_agent);
        tracing::debug!("Detected platform {} from user agent", platform.as_str());
        Self { platform }
    }
}

impl Default for NavigatorPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformDetector for NavigatorPlatform {
    fn platform(&self) -> Platform {
        self.platform
    }
}
