use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info};

use crate::components::focus;
use crate::config::Config;
use crate::dom::{Dom, DomEvent, EventKind, Source};
use crate::style::{self, MenuLinks};

pub const CONTAINER_SELECTOR: &str = ".nav-container";
pub const LINKS_SELECTOR: &str = ".nav-links";
pub const TOGGLE_CLASS: &str = "mobile-menu-btn";

/// Hamburger button for narrow viewports.
///
/// The toggle is created the first time the viewport is at or below the
/// breakpoint and stays for the life of the page, even if the viewport
/// widens again.
pub struct MobileMenu<D: Dom> {
    dom: Rc<D>,
    breakpoint: f64,
    toggle: RefCell<Option<D::Node>>,
    open: Cell<bool>,
}

impl<D: Dom> MobileMenu<D> {
    pub fn attach(dom: Rc<D>, config: &Config) -> Rc<Self> {
        let menu = Rc::new(Self {
            dom: dom.clone(),
            breakpoint: config.mobile_breakpoint,
            toggle: RefCell::new(None),
            open: Cell::new(false),
        });
        menu.ensure_toggle();

        let handler = menu.clone();
        dom.listen(
            Source::Window,
            EventKind::Resize,
            Rc::new(move |_: &DomEvent<D::Node>| handler.ensure_toggle()),
        )
        .forget();
        menu
    }

    /// Creates the toggle if the viewport is narrow and none exists yet.
    pub fn ensure_toggle(self: &Rc<Self>) {
        if self.dom.inner_width() > self.breakpoint || self.toggle.borrow().is_some() {
            return;
        }
        if self.dom.query(&format!(".{}", TOGGLE_CLASS)).is_some() {
            return;
        }
        let Some(container) = self.dom.query(CONTAINER_SELECTOR) else {
            debug!("no {} to hold the menu toggle", CONTAINER_SELECTOR);
            return;
        };
        let Some(button) = self.dom.build("button", TOGGLE_CLASS, Some("☰")) else {
            return;
        };
        self.dom.set_attribute(&button, "aria-label", "Toggle navigation");
        self.dom.set_attribute(&button, "aria-expanded", "false");
        style::apply_declarations(&*self.dom, &button, style::MENU_BUTTON);
        self.dom.append_child(&container, &button);

        let handler = self.clone();
        self.dom.listen(
            Source::Node(&button),
            EventKind::Click,
            Rc::new(move |_: &DomEvent<D::Node>| handler.toggle()),
        )
        .forget();
        for listener in focus::track(&self.dom, &button) {
            listener.forget();
        }

        *self.toggle.borrow_mut() = Some(button);
        info!("mobile menu toggle created at width {}", self.dom.inner_width());
    }

    /// Flips the link list between hidden and the column overlay.
    pub fn toggle(&self) {
        let open = !self.open.get();
        self.open.set(open);
        let state = if open { MenuLinks::Expanded } else { MenuLinks::Collapsed };
        if let Some(links) = self.dom.query(LINKS_SELECTOR) {
            style::apply(&*self.dom, &links, &state);
        }
        if let Some(button) = self.toggle.borrow().as_ref() {
            self.dom
                .set_attribute(button, "aria-expanded", if open { "true" } else { "false" });
        }
        debug!("mobile menu {:?}", state);
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn toggle_button(&self) -> Option<D::Node> {
        self.toggle.borrow().clone()
    }
}
