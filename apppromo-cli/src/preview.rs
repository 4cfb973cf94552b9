use anyhow::{Context, Result};
use apppromo_ui::config::NO_SHOW;
use apppromo_ui::cookie::{CookieOptions, CookieStore, MemoryCookieStore, format_set_cookie};
use apppromo_ui::dom::{MemoryDom, NodeId};
use apppromo_ui::events::MemoryEventHub;
use apppromo_ui::platform::FixedPlatform;
use apppromo_ui::scheduler::ManualTimer;
use apppromo_ui::{
    AppPromotionBanner, BannerConfig, BannerOptions, BannerState, COLLAPSE_DELAY, Host, Platform,
};
use serde_json::json;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

/// In-memory page hosting a single banner
pub struct Preview {
    pub dom: Rc<MemoryDom>,
    pub cookies: Rc<MemoryCookieStore>,
    pub events: Rc<MemoryEventHub<NodeId>>,
    pub timer: Rc<ManualTimer>,
    pub container: NodeId,
}

impl Preview {
    pub fn new() -> Self {
        let dom = Rc::new(MemoryDom::new());
        let container = dom.container("div");
        Self {
            dom,
            cookies: Rc::new(MemoryCookieStore::new()),
            events: Rc::new(MemoryEventHub::new()),
            timer: Rc::new(ManualTimer::new()),
            container,
        }
    }

    pub fn host(&self, platform: Platform) -> Host<MemoryDom> {
        Host::new(
            self.dom.clone(),
            self.cookies.clone(),
            Rc::new(FixedPlatform(platform)),
            self.events.clone(),
            self.timer.clone(),
        )
    }
}

/// Outcome of a preview run
#[derive(Debug)]
pub struct Report {
    pub state: BannerState,
    pub key: String,
    pub cookies: Vec<String>,
    pub callback_fired: Option<bool>,
    pub html: String,
}

impl Report {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "state": self.state.as_str(),
            "key": self.key,
            "cookies": self.cookies,
            "callbackFired": self.callback_fired,
            "html": self.html,
        })
    }
}

pub fn load_options(path: Option<&Path>) -> Result<BannerOptions> {
    let Some(path) = path else {
        return Ok(BannerOptions::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read options file '{}'", path.display()))?;
    BannerOptions::from_json(&content)
        .with_context(|| format!("Failed to parse options file '{}'", path.display()))
}

/// Mount the banner and report what the container ends up holding
pub fn render(options: BannerOptions, platform: Platform, dismissed: bool) -> Result<Report> {
    let preview = Preview::new();
    let config = BannerConfig::from_options(options);

    if dismissed {
        preview.cookies.set(
            &config.dismissal_key(),
            NO_SHOW,
            &CookieOptions::expiring(config.cookie_expire),
        )?;
    }

    let banner =
        AppPromotionBanner::with_config(preview.host(platform), preview.container, config, None, None)?;

    Ok(Report {
        state: banner.state(),
        key: banner.dismissal_key().to_string(),
        cookies: Vec::new(),
        callback_fired: None,
        html: preview.dom.to_html(preview.container),
    })
}

/// Mount the banner, click its close icon and let the collapse delay pass
pub fn simulate(options: BannerOptions, platform: Platform) -> Result<Report> {
    let preview = Preview::new();
    let fired = Rc::new(Cell::new(false));

    let f = fired.clone();
    let banner = AppPromotionBanner::new(
        preview.host(platform),
        preview.container,
        options,
        Some(Box::new(move || f.set(true))),
        None,
    )?;

    if banner.state() == BannerState::Visible {
        let close_id = format!("apClose{}", banner.config().id);
        let close = preview
            .dom
            .find_by_id(preview.container, &close_id)
            .context("Rendered banner has no close icon")?;
        preview.events.click(&close)?;
        let ran = preview.timer.advance(COLLAPSE_DELAY);
        tracing::debug!("{} deferred task(s) ran after close", ran);
    } else {
        tracing::warn!(
            "Banner was suppressed on {}; nothing to dismiss",
            platform.as_str()
        );
    }

    let cookies = preview
        .cookies
        .writes()
        .iter()
        .map(|w| format_set_cookie(&w.key, &w.value, &w.options))
        .collect();

    Ok(Report {
        state: banner.state(),
        key: banner.dismissal_key().to_string(),
        cookies,
        callback_fired: Some(fired.get()),
        html: preview.dom.to_html(preview.container),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_options_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "id": "x", "rating": 75, "appLink": "market://details" }}"#).unwrap();

        let options = load_options(Some(file.path())).unwrap();
        assert_eq!(options.id.as_deref(), Some("x"));
        assert_eq!(options.rating, Some(75.0));
        assert_eq!(options.app_link.as_deref(), Some("market://details"));
    }

    #[test]
    fn test_load_options_reports_path_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_options(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse options file"));
        assert!(load_options(None).unwrap() == BannerOptions::default());
    }

    #[test]
    fn test_render_android() {
        let options = BannerOptions {
            id: Some("x".into()),
            rating: Some(75.0),
            ..Default::default()
        };
        let report = render(options, Platform::Android, false).unwrap();

        assert_eq!(report.state, BannerState::Visible);
        assert_eq!(report.key, "andAppPromotionx");
        assert!(report.html.starts_with(r#"<div class="appPromotion">"#));
        assert!(report.html.contains(r#"id="apClosex""#));
        assert!(report.html.contains("width: 75%;"));
        assert!(report.html.contains(r#"<a id="apInstallx" href="">Nainstalovat</a>"#));
    }

    #[test]
    fn test_render_dismissed_is_suppressed() {
        let report = render(BannerOptions::default(), Platform::Android, true).unwrap();
        assert_eq!(report.state, BannerState::Suppressed);
        assert_eq!(report.html, r#"<div class="noDisplay"></div>"#);
    }

    #[test]
    fn test_simulate_close() {
        let report = simulate(BannerOptions::default(), Platform::Android).unwrap();

        assert_eq!(report.state, BannerState::Dismissed);
        assert_eq!(report.callback_fired, Some(true));
        assert_eq!(report.cookies.len(), 1);
        assert!(report.cookies[0].starts_with("andAppPromotion=noShow; expires="));
        assert_eq!(
            report.html,
            r#"<div class="appPromotion noDisplay" style="height: 0px;"></div>"#
        );
        assert_eq!(report.to_json()["state"], "dismissed");
    }

    #[test]
    fn test_simulate_on_desktop_does_nothing() {
        let report = simulate(BannerOptions::default(), Platform::Desktop).unwrap();
        assert_eq!(report.state, BannerState::Suppressed);
        assert_eq!(report.callback_fired, Some(false));
        assert!(report.cookies.is_empty());
    }
}
