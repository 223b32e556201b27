use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, trace, warn};

use crate::config::Config;
use crate::dom::{Dom, DomEvent, EventKind, Source};
use crate::style::{self, NavBar};
use crate::timer::{Scheduler, TimerHandle};

pub const NAV_SELECTOR: &str = ".navigation";

/// Frosts the navigation bar once the page is scrolled past the threshold.
pub struct NavScroll<D: Dom> {
    dom: Rc<D>,
    scheduler: Rc<dyn Scheduler>,
    nav: D::Node,
    threshold: f64,
    debounce_ms: u32,
    state: Cell<NavBar>,
    last_scroll_y: Cell<f64>,
    settle: RefCell<Option<TimerHandle>>,
}

impl<D: Dom> NavScroll<D> {
    pub fn attach(dom: Rc<D>, scheduler: Rc<dyn Scheduler>, config: &Config) -> Option<Rc<Self>> {
        let Some(nav) = dom.query(NAV_SELECTOR) else {
            warn!("no {} element, scroll styling disabled", NAV_SELECTOR);
            return None;
        };

        let last_scroll_y = dom.scroll_y();
        let nav_scroll = Rc::new(Self {
            dom: dom.clone(),
            scheduler,
            nav,
            threshold: config.scroll_threshold,
            debounce_ms: config.scroll_debounce_ms,
            state: Cell::new(NavBar::Transparent),
            last_scroll_y: Cell::new(last_scroll_y),
            settle: RefCell::new(None),
        });

        let handler = nav_scroll.clone();
        dom.listen(
            Source::Window,
            EventKind::Scroll,
            Rc::new(move |_: &DomEvent<D::Node>| handler.on_scroll()),
        )
        .forget();
        debug!("scroll styling attached, threshold {}", nav_scroll.threshold);
        Some(nav_scroll)
    }

    pub fn on_scroll(&self) {
        let scroll_y = self.dom.scroll_y();
        let next = NavBar::for_offset(scroll_y, self.threshold);
        style::apply(&*self.dom, &self.nav, &next);
        if self.state.replace(next) != next {
            debug!("nav bar now {:?} at offset {}", next, scroll_y);
        }
        self.last_scroll_y.set(scroll_y);

        // Replacing the handle drops, and so cancels, the previous one.
        let settled = self.scheduler.schedule(
            self.debounce_ms,
            Box::new(move || trace!("scroll settled at {}", scroll_y)),
        );
        *self.settle.borrow_mut() = Some(settled);
    }

    pub fn state(&self) -> NavBar {
        self.state.get()
    }

    pub fn last_scroll_y(&self) -> f64 {
        self.last_scroll_y.get()
    }
}
