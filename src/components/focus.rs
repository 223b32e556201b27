use std::rc::Rc;

use log::debug;

use crate::dom::{Dom, DomEvent, EventKind, Listener, Source};
use crate::style::{self, Focus};

pub const FOCUSABLE_SELECTOR: &str = "button, a, input, textarea, select";

/// Outlines every focusable control already on the page. Returns the count.
pub fn attach<D: Dom>(dom: &Rc<D>) -> usize {
    let controls = dom.query_all(FOCUSABLE_SELECTOR);
    for control in &controls {
        for listener in track(dom, control) {
            listener.forget();
        }
    }
    debug!("focus styling attached to {} controls", controls.len());
    controls.len()
}

/// Outline on focus, cleared on blur. Also used for controls built later;
/// the styling lasts as long as the returned listeners.
pub fn track<D: Dom>(dom: &Rc<D>, control: &D::Node) -> Vec<Listener> {
    [(EventKind::Focus, Focus::Ring), (EventKind::Blur, Focus::Unfocused)]
        .into_iter()
        .map(|(kind, state)| {
            let handler_dom = dom.clone();
            let node = control.clone();
            dom.listen(
                Source::Node(control),
                kind,
                Rc::new(move |_: &DomEvent<D::Node>| style::apply(&*handler_dom, &node, &state)),
            )
        })
        .collect()
}
