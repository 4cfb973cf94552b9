use apppromo_ui::scheduler::{Timer, TimerTask};
use apppromo_ui::{BannerError, Result};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// [`Timer`] over `window.setTimeout`
pub struct WindowTimer {
    window: Window,
}

impl WindowTimer {
    pub fn new() -> std::result::Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        Ok(Self { window })
    }
}

impl Timer for WindowTimer {
    fn set_timeout(&self, delay: Duration, task: TimerTask) -> Result<()> {
        let callback = Closure::once_into_js(move || task());
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay.as_millis().min(i32::MAX as u128) as i32,
            )
            .map_err(|e| BannerError::Timer(format!("{:?}", e)))?;
        Ok(())
    }
}
