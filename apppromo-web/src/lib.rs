use apppromo_ui::{AppPromotionBanner, BannerError, BannerOptions, Callback, Host};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;

pub mod cookie;
pub mod dom;
pub mod events;
pub mod platform;
pub mod timer;

pub use cookie::DocumentCookieStore;
pub use dom::WebDom;
pub use events::WindowEventHub;
pub use platform::NavigatorPlatform;
pub use timer::WindowTimer;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Collaborators wired to the current browser window
pub fn web_host() -> Result<Host<WebDom>, JsValue> {
    Ok(Host::new(
        Rc::new(WebDom::new()?),
        Rc::new(DocumentCookieStore::new()?),
        Rc::new(NavigatorPlatform::new()),
        Rc::new(WindowEventHub::new()?),
        Rc::new(WindowTimer::new()?),
    ))
}

fn to_js(e: BannerError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Options come in as a plain JS object; `Date` values serialize to RFC 3339.
fn parse_options(options: &JsValue) -> Result<BannerOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(BannerOptions::default());
    }
    let json: String = js_sys::JSON::stringify(options)?.into();
    BannerOptions::from_json(&json).map_err(to_js)
}

fn js_callback(function: js_sys::Function) -> Callback {
    Box::new(move || {
        if let Err(e) = function.call0(&JsValue::NULL) {
            web_sys::console::error_1(&e);
        }
    })
}

/// Android app promotion banner, exposed to JavaScript.
///
/// ```js
/// const banner = new AppPromotion(
///     document.getElementById("promotionWrapper"),
///     { name: "Seznam.cz", logo: "/img/app-icon.png", appLink: "https://play.google.com/..." },
///     () => console.log("closed"),
/// );
/// ```
#[wasm_bindgen]
pub struct AppPromotion {
    banner: AppPromotionBanner<WebDom>,
}

#[wasm_bindgen]
impl AppPromotion {
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: Element,
        options: JsValue,
        on_dismiss: Option<js_sys::Function>,
        on_unload: Option<js_sys::Function>,
    ) -> Result<AppPromotion, JsValue> {
        let options = parse_options(&options)?;
        let banner = AppPromotionBanner::new(
            web_host()?,
            container,
            options,
            on_dismiss.map(js_callback),
            on_unload.map(js_callback),
        )
        .map_err(to_js)?;
        Ok(Self { banner })
    }

    /// Run the close flow as if the close icon was clicked
    pub fn close(&self) -> Result<(), JsValue> {
        self.banner.dismiss().map_err(to_js)
    }

    pub fn destroy(&self) -> Result<(), JsValue> {
        self.banner.destroy().map_err(to_js)
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.banner.state().as_str().to_string()
    }

    #[wasm_bindgen(getter, js_name = dismissalKey)]
    pub fn dismissal_key(&self) -> String {
        self.banner.dismissal_key().to_string()
    }
}
