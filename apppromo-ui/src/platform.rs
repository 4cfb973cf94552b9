/// Operating-system family of the device viewing the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Desktop,
    Unknown,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Desktop => "desktop",
            Platform::Unknown => "unknown",
        }
    }

    /// Classify a browser user-agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.trim();
        if ua.is_empty() {
            return Platform::Unknown;
        }

        let lower = ua.to_ascii_lowercase();
        if lower.contains("android") {
            Platform::Android
        } else if ["iphone", "ipad", "ipod"].iter().any(|t| lower.contains(t)) {
            Platform::Ios
        } else {
            Platform::Desktop
        }
    }

    /// Whether the banner is shown on this platform at all.
    pub fn is_promotion_target(self) -> bool {
        self == Platform::Android
    }
}

/// Read-only source of the current platform.
pub trait PlatformDetector {
    fn platform(&self) -> Platform;
}

/// Detector that always reports the same platform.
#[derive(Debug, Clone, Copy)]
pub struct FixedPlatform(pub Platform);

impl PlatformDetector for FixedPlatform {
    fn platform(&self) -> Platform {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_classification() {
        let android = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 \
                       (KHTML, like Gecko) Chrome/120.0 Mobile Safari/537.36";
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
        let desktop = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Gecko/20100101 Firefox/121.0";

        assert_eq!(Platform::from_user_agent(android), Platform::Android);
        assert_eq!(Platform::from_user_agent(iphone), Platform::Ios);
        assert_eq!(Platform::from_user_agent(desktop), Platform::Desktop);
        assert_eq!(Platform::from_user_agent("   "), Platform::Unknown);
    }

    #[test]
    fn test_only_android_is_promotion_target() {
        assert!(Platform::Android.is_promotion_target());
        assert!(!Platform::Ios.is_promotion_target());
        assert!(!Platform::Desktop.is_promotion_target());
        assert!(!Platform::Unknown.is_promotion_target());
    }

    #[test]
    fn test_detectors() {
        assert_eq!(FixedPlatform(Platform::Ios).platform(), Platform::Ios);
        assert_eq!(
            Platform::from_user_agent("Dalvik/2.1.0 (Linux; U; Android 9)"),
            Platform::Android
        );
        assert_eq!(Platform::Android.as_str(), "android");
    }
}
