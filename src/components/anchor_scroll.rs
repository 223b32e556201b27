use std::rc::Rc;

use log::debug;

use crate::config::Config;
use crate::dom::{Dom, DomEvent, EventKind, Source};

pub const NAV_LINK_SELECTOR: &str = ".nav-links a";

/// Fragment id of an in-page link, `None` for anything that leaves the page.
pub fn fragment(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Where the viewport has to go so `href`'s target clears the fixed nav bar.
pub fn scroll_target<D: Dom>(dom: &D, href: &str, nav_offset: f64) -> Option<f64> {
    let id = fragment(href)?;
    let target = dom.element_by_id(id)?;
    Some(dom.offset_top(&target) - nav_offset)
}

/// Hooks every navigation link. Returns how many links were wired.
pub fn attach<D: Dom>(dom: &Rc<D>, config: &Config) -> usize {
    let links = dom.query_all(NAV_LINK_SELECTOR);
    for link in &links {
        let handler_dom = dom.clone();
        let handler_link = link.clone();
        let nav_offset = config.nav_offset;
        dom.listen(
            Source::Node(link),
            EventKind::Click,
            Rc::new(move |event: &DomEvent<D::Node>| {
                on_click(&*handler_dom, &handler_link, event, nav_offset)
            }),
        )
        .forget();
    }
    debug!("anchor scrolling attached to {} links", links.len());
    links.len()
}

fn on_click<D: Dom>(dom: &D, link: &D::Node, event: &DomEvent<D::Node>, nav_offset: f64) {
    let Some(href) = dom.attribute(link, "href") else {
        return;
    };
    // Any in-page link is ours, even a bare `#` with nothing to scroll to.
    if !href.starts_with('#') {
        return;
    }
    event.prevent_default();
    match scroll_target(dom, &href, nav_offset) {
        Some(top) => dom.smooth_scroll_to(top),
        None => debug!("anchor {} has no target", href),
    }
}
