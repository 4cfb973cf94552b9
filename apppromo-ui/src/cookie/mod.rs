mod memory;

pub use memory::{CookieWrite, MemoryCookieStore};

use crate::error::Result;
use chrono::{DateTime, Utc};

/// Attributes attached to a cookie write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOptions {
    pub expires: Option<DateTime<Utc>>,
    pub path: Option<String>,
}

impl CookieOptions {
    pub fn expiring(expires: DateTime<Utc>) -> Self {
        Self {
            expires: Some(expires),
            path: None,
        }
    }
}

/// Key/value storage with expiry, e.g. browser cookies.
pub trait CookieStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str, options: &CookieOptions) -> Result<()>;
}

/// Build the string assigned to `document.cookie` for a write.
///
/// The key is percent-encoded; [`read_cookie`] matches on the same encoding.
pub fn format_set_cookie(key: &str, value: &str, options: &CookieOptions) -> String {
    let mut cookie = format!("{}={}", urlencoding::encode(key), value);
    if let Some(expires) = options.expires {
        cookie.push_str("; expires=");
        cookie.push_str(&expires.format("%a, %d %b %Y %H:%M:%S GMT").to_string());
    }
    if let Some(path) = &options.path {
        cookie.push_str("; path=");
        cookie.push_str(path);
    }
    cookie
}

/// Look up `key` in a `name=value; name=value` cookie header.
pub fn read_cookie(header: &str, key: &str) -> Option<String> {
    let encoded = urlencoding::encode(key);
    header.split(';').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name.trim() == encoded.as_ref()).then(|| value.trim().to_string())
    })
}
