//! The app promotion banner component.
//!
//! Lifecycle: construction either renders the banner (`Visible`) or hides it
//! straight away (`Suppressed`). Clicking the close icon persists a dismissal
//! cookie, collapses the container and, after [`COLLAPSE_DELAY`], hides it and
//! tears everything down (`Dismissed`). Neither terminal state leads back to
//! `Visible`; a new banner has to be constructed to show it again.
//!
//! Registered listeners hold a strong reference to the banner, so a visible
//! banner stays alive after its handle is dropped until teardown releases
//! them.

use crate::config::{BannerConfig, BannerOptions, NO_SHOW};
use crate::cookie::{CookieOptions, CookieStore};
use crate::dom::Dom;
use crate::error::Result;
use crate::events::{EventHub, EventKind, ListenerFn, ListenerId, ListenerTarget};
use crate::platform::PlatformDetector;
use crate::scheduler::Timer;
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Delay between collapsing the container and tearing it down.
pub const COLLAPSE_DELAY: Duration = Duration::from_millis(500);

/// Class added to the container when the banner renders.
pub const PROMOTION_CLASS: &str = "appPromotion";

/// Class added to the container when the banner is hidden.
pub const HIDDEN_CLASS: &str = "noDisplay";

/// Completion or unload hook. Invoked at most once.
pub type Callback = Box<dyn FnOnce()>;

/// Collaborators a banner talks to.
pub struct Host<D: Dom> {
    pub dom: Rc<D>,
    pub cookies: Rc<dyn CookieStore>,
    pub platform: Rc<dyn PlatformDetector>,
    pub events: Rc<dyn EventHub<D::Element>>,
    pub timer: Rc<dyn Timer>,
}

impl<D: Dom> Host<D> {
    pub fn new(
        dom: Rc<D>,
        cookies: Rc<dyn CookieStore>,
        platform: Rc<dyn PlatformDetector>,
        events: Rc<dyn EventHub<D::Element>>,
        timer: Rc<dyn Timer>,
    ) -> Self {
        Self {
            dom,
            cookies,
            platform,
            events,
            timer,
        }
    }
}

impl<D: Dom> Clone for Host<D> {
    fn clone(&self) -> Self {
        Self {
            dom: Rc::clone(&self.dom),
            cookies: Rc::clone(&self.cookies),
            platform: Rc::clone(&self.platform),
            events: Rc::clone(&self.events),
            timer: Rc::clone(&self.timer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    /// Not shown: wrong platform or already dismissed
    Suppressed,
    Visible,
    /// Closed by the user; teardown may still be pending
    Dismissed,
}

impl BannerState {
    pub fn as_str(self) -> &'static str {
        match self {
            BannerState::Suppressed => "suppressed",
            BannerState::Visible => "visible",
            BannerState::Dismissed => "dismissed",
        }
    }
}

pub struct AppPromotionBanner<D: Dom> {
    inner: Rc<Inner<D>>,
}

struct Inner<D: Dom> {
    host: Host<D>,
    container: D::Element,
    config: BannerConfig,
    key: String,
    listeners: RefCell<Vec<ListenerId>>,
    on_dismiss: RefCell<Option<Callback>>,
    on_unload: RefCell<Option<Callback>>,
    state: Cell<BannerState>,
}

impl<D: Dom + 'static> AppPromotionBanner<D> {
    /// Resolve `options` against the defaults and mount the banner into `container`.
    pub fn new(
        host: Host<D>,
        container: D::Element,
        options: BannerOptions,
        on_dismiss: Option<Callback>,
        on_unload: Option<Callback>,
    ) -> Result<Self> {
        Self::with_config(
            host,
            container,
            BannerConfig::from_options(options),
            on_dismiss,
            on_unload,
        )
    }

    /// Mount a banner with an already resolved configuration.
    ///
    /// The banner renders only on the promotion platform and only while no
    /// dismissal cookie exists. Otherwise the container is hidden and
    /// cleared without rendering. The clear also wipes anything the host
    /// placed in the container beforehand.
    pub fn with_config(
        host: Host<D>,
        container: D::Element,
        config: BannerConfig,
        on_dismiss: Option<Callback>,
        on_unload: Option<Callback>,
    ) -> Result<Self> {
        let key = config.dismissal_key();
        let platform = host.platform.platform();

        let inner = Rc::new(Inner {
            host,
            container,
            config,
            key,
            listeners: RefCell::new(Vec::new()),
            on_dismiss: RefCell::new(on_dismiss),
            on_unload: RefCell::new(on_unload),
            state: Cell::new(BannerState::Suppressed),
        });

        if platform.is_promotion_target() {
            if inner.host.cookies.get(&inner.key)?.is_none() {
                inner.build()?;
                inner.state.set(BannerState::Visible);
                return Ok(Self { inner });
            }
            debug!("Suppressing banner '{}': dismissal cookie present", inner.key);
        } else {
            debug!(
                "Suppressing banner '{}': platform is {}",
                inner.key,
                platform.as_str()
            );
        }

        inner.hide()?;
        Ok(Self { inner })
    }

    pub fn state(&self) -> BannerState {
        self.inner.state.get()
    }

    pub fn config(&self) -> &BannerConfig {
        &self.inner.config
    }

    pub fn container(&self) -> &D::Element {
        &self.inner.container
    }

    /// Cookie key holding this banner's dismissal flag
    pub fn dismissal_key(&self) -> &str {
        &self.inner.key
    }

    /// Number of listeners currently registered by this banner
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Run the close flow, as if the close icon had been clicked.
    pub fn dismiss(&self) -> Result<()> {
        self.inner.dismiss()
    }

    /// Write the dismissal cookie with an explicit expiry.
    pub fn persist_dismissal(&self, expires: DateTime<Utc>) -> Result<()> {
        self.inner.persist_dismissal(expires)
    }

    /// Clear the container and remove every registered listener.
    ///
    /// A visible banner ends up `Dismissed`.
    pub fn destroy(&self) -> Result<()> {
        self.inner.teardown()
    }
}

impl<D: Dom + 'static> Inner<D> {
    fn build(self: &Rc<Self>) -> Result<()> {
        let dom = &self.host.dom;
        let cfg = &self.config;

        dom.add_class(&self.container, PROMOTION_CLASS)?;

        let close_src = format!("{}/close.png", cfg.widgets_img_path);
        let close_id = format!("apClose{}", cfg.id);
        let close = dom.create_element(
            "img",
            &[
                ("src", close_src.as_str()),
                ("alt", cfg.lang_close.as_str()),
                ("id", close_id.as_str()),
            ],
        )?;
        let banner = Rc::clone(self);
        self.listen(
            ListenerTarget::Element(close.clone()),
            EventKind::Click,
            Box::new(move || banner.dismiss()),
        )?;
        dom.append_child(&self.container, &close)?;

        let logo = dom.create_element(
            "img",
            &[("src", cfg.logo.as_str()), ("alt", ""), ("class", "apLogo")],
        )?;
        dom.append_child(&self.container, &logo)?;

        let info = self.build_info()?;
        dom.append_child(&self.container, &info)?;

        let install_id = format!("apInstall{}", cfg.id);
        let install = dom.create_element(
            "a",
            &[("id", install_id.as_str()), ("href", cfg.app_link.as_str())],
        )?;
        dom.set_text(&install, &cfg.lang_install)?;
        dom.append_child(&self.container, &install)?;

        if self.on_unload.borrow().is_some() {
            let banner = Rc::clone(self);
            self.listen(
                ListenerTarget::Window,
                EventKind::Unload,
                Box::new(move || {
                    banner.execute_unload();
                    Ok(())
                }),
            )?;
        }

        info!("Rendered app promotion banner '{}'", self.key);
        Ok(())
    }

    /// Heading, developer, optional rating and category, caption
    fn build_info(&self) -> Result<D::Element> {
        let dom = &self.host.dom;
        let cfg = &self.config;

        let info = dom.create_element("div", &[("class", "apInfo")])?;

        let heading = dom.create_element("h4", &[])?;
        dom.set_text(&heading, &cfg.name)?;
        dom.append_child(&info, &heading)?;

        let list = dom.create_element("ul", &[])?;

        let developer = dom.create_element("li", &[])?;
        dom.set_text(&developer, &cfg.developer)?;
        dom.append_child(&list, &developer)?;

        if let Some(rating) = cfg.rating {
            let item = dom.create_element("li", &[("class", "rating")])?;
            let stars_style = format!("background-image: url({}/star.png);", cfg.widgets_img_path);
            let stars = dom.create_element(
                "span",
                &[("class", "stars"), ("style", stars_style.as_str())],
            )?;
            let progress_style = format!("width:{}%", rating);
            let progress = dom.create_element(
                "span",
                &[("class", "progress"), ("style", progress_style.as_str())],
            )?;
            dom.append_child(&item, &stars)?;
            dom.append_child(&item, &progress)?;
            dom.append_child(&list, &item)?;
        }

        if !cfg.lang_category.is_empty() {
            let category = dom.create_element("li", &[("class", "apCategory")])?;
            dom.set_text(&category, &cfg.lang_category)?;
            dom.append_child(&list, &category)?;
        }

        let caption = dom.create_element("li", &[("class", "apFree")])?;
        dom.set_text(&caption, &cfg.lang_desc)?;
        dom.append_child(&list, &caption)?;

        dom.append_child(&info, &list)?;
        Ok(info)
    }

    fn listen(
        &self,
        target: ListenerTarget<D::Element>,
        kind: EventKind,
        handler: ListenerFn,
    ) -> Result<()> {
        let id = self.host.events.add_listener(target, kind, handler)?;
        self.listeners.borrow_mut().push(id);
        Ok(())
    }

    fn dismiss(self: &Rc<Self>) -> Result<()> {
        info!("Dismissing app promotion banner '{}'", self.key);
        self.persist_dismissal(self.config.cookie_expire)?;
        if self.state.get() == BannerState::Visible {
            self.state.set(BannerState::Dismissed);
        }

        self.host.dom.set_style(&self.container, "height", "0px")?;

        let banner = Rc::clone(self);
        self.host.timer.set_timeout(
            COLLAPSE_DELAY,
            Box::new(move || {
                if let Err(e) = banner.hide() {
                    error!("Failed to hide banner '{}': {}", banner.key, e);
                }
            }),
        )?;

        let callback = self.on_dismiss.borrow_mut().take();
        if let Some(callback) = callback {
            self.host.timer.set_timeout(COLLAPSE_DELAY, callback)?;
        }
        Ok(())
    }

    fn persist_dismissal(&self, expires: DateTime<Utc>) -> Result<()> {
        self.host
            .cookies
            .set(&self.key, NO_SHOW, &CookieOptions::expiring(expires))
    }

    fn hide(&self) -> Result<()> {
        self.host.dom.add_class(&self.container, HIDDEN_CLASS)?;
        self.teardown()
    }

    fn execute_unload(&self) {
        let callback = self.on_unload.borrow_mut().take();
        if let Some(callback) = callback {
            debug!("Running unload callback for banner '{}'", self.key);
            callback();
        }
    }

    /// Safe to run repeatedly and on a banner that never rendered.
    fn teardown(&self) -> Result<()> {
        self.host.dom.clear_children(&self.container)?;
        if self.state.get() == BannerState::Visible {
            self.state.set(BannerState::Dismissed);
        }
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        self.host.events.remove_listeners(&listeners);
        debug!(
            "Tore down banner '{}' ({} listener(s) removed)",
            self.key,
            listeners.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::MemoryCookieStore;
    use crate::dom::{MemoryDom, NodeId};
    use crate::events::MemoryEventHub;
    use crate::platform::{FixedPlatform, Platform};
    use crate::scheduler::ManualTimer;

    struct Fixture {
        dom: Rc<MemoryDom>,
        cookies: Rc<MemoryCookieStore>,
        events: Rc<MemoryEventHub<NodeId>>,
        timer: Rc<ManualTimer>,
        container: NodeId,
    }

    impl Fixture {
        fn new() -> Self {
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

        fn host(&self, platform: Platform) -> Host<MemoryDom> {
            Host::new(
                self.dom.clone(),
                self.cookies.clone(),
                Rc::new(FixedPlatform(platform)),
                self.events.clone(),
                self.timer.clone(),
            )
        }

        fn mount(&self, platform: Platform, options: BannerOptions) -> AppPromotionBanner<MemoryDom> {
            AppPromotionBanner::new(self.host(platform), self.container, options, None, None).unwrap()
        }
    }

    #[test]
    fn test_renders_children_in_order() {
        let fx = Fixture::new();
        let banner = fx.mount(Platform::Android, BannerOptions::default());

        assert_eq!(banner.state(), BannerState::Visible);
        let tags: Vec<String> = fx
            .dom
            .children(fx.container)
            .into_iter()
            .filter_map(|c| fx.dom.tag(c))
            .collect();
        assert_eq!(tags, vec!["img", "img", "div", "a"]);
        assert!(fx.dom.has_class(fx.container, PROMOTION_CLASS));
    }

    #[test]
    fn test_close_icon_uses_image_path_and_label() {
        let fx = Fixture::new();
        fx.mount(
            Platform::Android,
            BannerOptions {
                widgets_img_path: Some("/img".into()),
                lang_close: Some("close".into()),
                ..Default::default()
            },
        );

        let close = fx.dom.find_by_id(fx.container, "apClose").unwrap();
        assert_eq!(fx.dom.attr(close, "src").as_deref(), Some("/img/close.png"));
        assert_eq!(fx.dom.attr(close, "alt").as_deref(), Some("close"));
    }

    #[test]
    fn test_category_rendered_only_when_set() {
        let fx = Fixture::new();
        fx.mount(Platform::Android, BannerOptions::default());
        assert!(fx.dom.find_by_class(fx.container, "apCategory").is_none());

        let fx = Fixture::new();
        fx.mount(
            Platform::Android,
            BannerOptions {
                lang_category: Some("Navigace".into()),
                ..Default::default()
            },
        );
        let category = fx.dom.find_by_class(fx.container, "apCategory").unwrap();
        assert_eq!(fx.dom.text(category).as_deref(), Some("Navigace"));
    }

    #[test]
    fn test_dismiss_on_suppressed_banner_keeps_state() {
        let fx = Fixture::new();
        let banner = fx.mount(Platform::Desktop, BannerOptions::default());
        assert_eq!(banner.state(), BannerState::Suppressed);

        banner.dismiss().unwrap();
        assert_eq!(banner.state(), BannerState::Suppressed);
        assert_eq!(fx.cookies.write_count(), 1);
    }

    #[test]
    fn test_repeated_dismiss_runs_callback_once() {
        let fx = Fixture::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let banner = AppPromotionBanner::new(
            fx.host(Platform::Android),
            fx.container,
            BannerOptions::default(),
            Some(Box::new(move || c.set(c.get() + 1))),
            None,
        )
        .unwrap();

        banner.dismiss().unwrap();
        banner.dismiss().unwrap();
        // Two hide tasks plus one callback
        assert_eq!(fx.timer.pending_count(), 3);

        fx.timer.advance(COLLAPSE_DELAY);
        assert_eq!(calls.get(), 1);
        assert_eq!(fx.cookies.write_count(), 2);
        assert!(fx.dom.children(fx.container).is_empty());
    }

    #[test]
    fn test_persist_dismissal_uses_given_expiry() {
        let fx = Fixture::new();
        let banner = fx.mount(Platform::Android, BannerOptions::default());
        let expires = Utc::now() + chrono::Duration::days(3);

        banner.persist_dismissal(expires).unwrap();

        let writes = fx.cookies.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].key, "andAppPromotion");
        assert_eq!(writes[0].value, NO_SHOW);
        assert_eq!(writes[0].options.expires, Some(expires));
        // Writing the cookie alone does not close the banner
        assert_eq!(banner.state(), BannerState::Visible);
    }

    #[test]
    fn test_destroy_leaves_visible_banner_dismissed() {
        let fx = Fixture::new();
        let banner = fx.mount(Platform::Android, BannerOptions::default());
        assert_eq!(banner.state(), BannerState::Visible);

        banner.destroy().unwrap();
        assert_eq!(banner.state(), BannerState::Dismissed);
        assert!(fx.dom.children(fx.container).is_empty());
        assert_eq!(banner.listener_count(), 0);
        assert_eq!(fx.cookies.write_count(), 0);

        let fx = Fixture::new();
        let banner = fx.mount(Platform::Desktop, BannerOptions::default());
        banner.destroy().unwrap();
        assert_eq!(banner.state(), BannerState::Suppressed);
    }
}
