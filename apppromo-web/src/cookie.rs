use apppromo_ui::cookie::{CookieOptions, CookieStore, format_set_cookie, read_cookie};
use apppromo_ui::{BannerError, Result};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlDocument;

fn storage_err(e: JsValue) -> BannerError {
    BannerError::Storage(format!("{:?}", e))
}

/// [`CookieStore`] over `document.cookie`
pub struct DocumentCookieStore {
    document: HtmlDocument,
}

impl DocumentCookieStore {
    pub fn new() -> std::result::Result<Self, JsValue> {
        let document = web_sys::window()
            .ok_or("no window")?
            .document()
            .ok_or("no document")?
            .dyn_into::<HtmlDocument>()
            .map_err(|_| JsValue::from_str("document is not an HTML document"))?;
        Ok(Self { document })
    }
}

impl CookieStore for DocumentCookieStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let header = self.document.cookie().map_err(storage_err)?;
        Ok(read_cookie(&header, key))
    }

    fn set(&self, key: &str, value: &str, options: &CookieOptions) -> Result<()> {
        self.document
            .set_cookie(&format_set_cookie(key, value, options))
            .map_err(storage_err)
    }
}
