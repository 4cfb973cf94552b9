//! Banner options and their resolution into an immutable configuration.
//!
//! Callers hand over a sparse [`BannerOptions`] record; [`BannerConfig::resolve`]
//! fills every missing field from the defaults below. The merge is shallow: a
//! field supplied by the caller replaces the default wholesale and never
//! touches any other field.

use crate::error::Result;
use chrono::{DateTime, Months, Utc};
use serde::Deserialize;

/// Prefix of the cookie key that remembers a dismissed banner.
pub const DISMISSAL_KEY_PREFIX: &str = "andAppPromotion";

/// Value written under the dismissal key.
pub const NO_SHOW: &str = "noShow";

pub const DEFAULT_NAME: &str = "Název aplikace";
pub const DEFAULT_DEVELOPER: &str = "Seznam.cz a.s";
pub const DEFAULT_WIDGETS_IMG_PATH: &str = "/static/js/lib/jak/widgets/androidAppPromotion/img";
pub const DEFAULT_LANG_INSTALL: &str = "Nainstalovat";
pub const DEFAULT_LANG_CLOSE: &str = "zavřít";
pub const DEFAULT_LANG_DESC: &str = "Zadarmo v Google play";

/// Caller-supplied options. Every field is optional.
///
/// Wire keys are camelCase (`appLink`, `widgetsImgPath`, `cookieExpire`, ...)
/// so option objects written for the JavaScript widget deserialize as-is.
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerOptions {
    pub id: Option<String>,
    pub name: Option<String>,
    pub developer: Option<String>,
    /// Percentage in 0..=100. Not range-checked.
    pub rating: Option<f64>,
    pub logo: Option<String>,
    pub app_link: Option<String>,
    pub widgets_img_path: Option<String>,
    pub cookie_expire: Option<DateTime<Utc>>,
    pub lang_install: Option<String>,
    pub lang_close: Option<String>,
    pub lang_desc: Option<String>,
    pub lang_category: Option<String>,
}

impl BannerOptions {
    /// Parse options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Fully resolved banner configuration. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerConfig {
    pub id: String,
    pub name: String,
    pub developer: String,
    pub rating: Option<f64>,
    pub logo: String,
    pub app_link: String,
    pub widgets_img_path: String,
    pub cookie_expire: DateTime<Utc>,
    pub lang_install: String,
    pub lang_close: String,
    pub lang_desc: String,
    pub lang_category: String,
}

impl BannerConfig {
    /// Resolve options against the defaults, measuring the default expiry from `now`.
    pub fn resolve(options: BannerOptions, now: DateTime<Utc>) -> Self {
        let BannerOptions {
            id,
            name,
            developer,
            rating,
            logo,
            app_link,
            widgets_img_path,
            cookie_expire,
            lang_install,
            lang_close,
            lang_desc,
            lang_category,
        } = options;

        Self {
            id: id.unwrap_or_default(),
            name: name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            developer: developer.unwrap_or_else(|| DEFAULT_DEVELOPER.to_string()),
            rating,
            logo: logo.unwrap_or_default(),
            app_link: app_link.unwrap_or_default(),
            widgets_img_path: widgets_img_path
                .unwrap_or_else(|| DEFAULT_WIDGETS_IMG_PATH.to_string()),
            cookie_expire: cookie_expire.unwrap_or_else(|| default_expiry(now)),
            lang_install: lang_install.unwrap_or_else(|| DEFAULT_LANG_INSTALL.to_string()),
            lang_close: lang_close.unwrap_or_else(|| DEFAULT_LANG_CLOSE.to_string()),
            lang_desc: lang_desc.unwrap_or_else(|| DEFAULT_LANG_DESC.to_string()),
            lang_category: lang_category.unwrap_or_default(),
        }
    }

    /// Resolve options against the defaults using the current wall clock.
    pub fn from_options(options: BannerOptions) -> Self {
        Self::resolve(options, Utc::now())
    }

    /// Cookie key remembering that this banner was dismissed.
    pub fn dismissal_key(&self) -> String {
        dismissal_key(&self.id)
    }
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self::from_options(BannerOptions::default())
    }
}

pub fn dismissal_key(id: &str) -> String {
    format!("{}{}", DISMISSAL_KEY_PREFIX, id)
}

/// One calendar month after `now`. Day-of-month overflow clamps to the last
/// day of the target month.
pub fn default_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_add_months(Months::new(1)).unwrap_or(now)
}
