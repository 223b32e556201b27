//! Interactive behaviors for the marketing landing page: nav bar styling on
//! scroll, anchor scrolling, section reveals, the download modal with its
//! redirect toast, focus outlines and the mobile menu toggle.
//!
//! Every behavior attaches to an injected [`dom::Dom`] and
//! [`timer::Scheduler`], so the same code drives the browser page and the
//! in-memory document used by the tests.

use std::rc::Rc;

use log::info;

pub mod config;
pub mod dom;
pub mod error;
pub mod style;
pub mod timer;
pub mod web;
pub mod components {
    pub mod anchor_scroll;
    pub mod download;
    pub mod focus;
    pub mod mobile_menu;
    pub mod nav_scroll;
    pub mod reveal;
    pub mod toast;
}

#[cfg(test)]
mod testing;

use components::{
    anchor_scroll,
    download::DownloadFlow,
    focus,
    mobile_menu::MobileMenu,
    nav_scroll::NavScroll,
    reveal::RevealObserver,
};
use config::Config;
use dom::Dom;
use timer::Scheduler;

/// Handles to every attached behavior.
pub struct Landing<D: Dom> {
    pub nav_scroll: Option<Rc<NavScroll<D>>>,
    pub anchor_links: usize,
    pub reveal: Rc<RevealObserver<D>>,
    pub download: Rc<DownloadFlow<D>>,
    pub focusable: usize,
    pub mobile_menu: Rc<MobileMenu<D>>,
}

impl<D: Dom> Landing<D> {
    /// Wires every behavior once. Components whose anchor elements are
    /// missing stay inert instead of failing the rest.
    pub fn attach(dom: Rc<D>, scheduler: Rc<dyn Scheduler>, config: Config) -> Self {
        let nav_scroll = NavScroll::attach(dom.clone(), scheduler.clone(), &config);
        let anchor_links = anchor_scroll::attach(&dom, &config);
        let download = DownloadFlow::attach(dom.clone(), scheduler, &config);
        let reveal = RevealObserver::attach(dom.clone(), &config);
        let focusable = focus::attach(&dom);
        let mobile_menu = MobileMenu::attach(dom, &config);

        let landing = Self {
            nav_scroll,
            anchor_links,
            reveal,
            download,
            focusable,
            mobile_menu,
        };
        info!("landing page ready");
        landing
    }

    pub fn summary(&self) -> String {
        format!(
            "scroll styling {}, {} anchor links, {} reveal sections, {} focusable controls, menu toggle {}",
            if self.nav_scroll.is_some() { "on" } else { "off" },
            self.anchor_links,
            self.reveal.section_count(),
            self.focusable,
            if self.mobile_menu.toggle_button().is_some() { "shown" } else { "hidden" },
        )
    }
}
