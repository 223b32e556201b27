//! The slice of the document the page behaviors need.
//!
//! Components are generic over [`Dom`] so they can run against the real
//! browser document ([`crate::web::WebDom`]) or a fake tree in tests.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Scroll,
    Resize,
    Click,
    KeyDown,
    Focus,
    Blur,
    PointerEnter,
    PointerLeave,
}

impl EventKind {
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::Scroll => "scroll",
            EventKind::Resize => "resize",
            EventKind::Click => "click",
            EventKind::KeyDown => "keydown",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::PointerEnter => "mouseenter",
            EventKind::PointerLeave => "mouseleave",
        }
    }
}

/// Where a listener is registered.
#[derive(Debug, PartialEq)]
pub enum Source<'a, N> {
    Window,
    Document,
    Node(&'a N),
}

pub struct DomEvent<N> {
    pub kind: EventKind,
    /// Element the event was dispatched to, if any.
    pub target: Option<N>,
    /// Key value for keyboard events.
    pub key: Option<String>,
    default_prevented: Cell<bool>,
}

impl<N> DomEvent<N> {
    pub fn new(kind: EventKind, target: Option<N>, key: Option<String>) -> Self {
        Self {
            kind,
            target,
            key,
            default_prevented: Cell::new(false),
        }
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

pub type Handler<N> = Rc<dyn Fn(&DomEvent<N>)>;

/// An event listener currently registered with the document.
pub trait Registration {
    fn remove(self: Box<Self>);
    /// Leaves the listener registered for the rest of the page's life.
    fn keep(self: Box<Self>);
}

/// Owner of one registered listener. Dropping it removes the listener, like
/// [`crate::timer::TimerHandle`] does for timers; call [`Listener::forget`]
/// for listeners that live as long as the page.
#[must_use = "dropping a Listener removes it"]
pub struct Listener {
    registration: Option<Box<dyn Registration>>,
}

impl Listener {
    pub fn new(registration: impl Registration + 'static) -> Self {
        Self {
            registration: Some(Box::new(registration)),
        }
    }

    pub fn forget(mut self) {
        if let Some(registration) = self.registration.take() {
            registration.keep();
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(registration) = self.registration.take() {
            registration.remove();
        }
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("registered", &self.registration.is_some())
            .finish()
    }
}

/// Options for the viewport-intersection watcher.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionOptions {
    pub threshold: f64,
    pub root_margin: String,
}

pub trait Dom: 'static {
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    fn query(&self, selector: &str) -> Option<Self::Node> {
        self.query_all(selector).into_iter().next()
    }

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    fn body(&self) -> Option<Self::Node>;
    fn create_element(&self, tag: &str) -> Option<Self::Node>;

    fn set_class(&self, node: &Self::Node, class: &str);
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn set_text(&self, node: &Self::Node, text: &str);
    fn text(&self, node: &Self::Node) -> Option<String>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node);
    /// Detaches `node`. Detaching a node that is not in the document does nothing.
    fn remove(&self, node: &Self::Node);
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Sets an inline style property; an empty value clears it.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    fn offset_top(&self, node: &Self::Node) -> f64;
    fn scroll_y(&self) -> f64;
    fn inner_width(&self) -> f64;
    /// Eased scroll of the viewport to `top`.
    fn smooth_scroll_to(&self, top: f64);

    fn listen(
        &self,
        source: Source<'_, Self::Node>,
        kind: EventKind,
        handler: Handler<Self::Node>,
    ) -> Listener;

    /// Calls `handler` with each target that starts intersecting.
    fn observe_intersections(
        &self,
        targets: &[Self::Node],
        options: &IntersectionOptions,
        handler: Rc<dyn Fn(&Self::Node)>,
    );

    /// Creates an element with a class and optional text content.
    fn build(&self, tag: &str, class: &str, text: Option<&str>) -> Option<Self::Node> {
        let node = self.create_element(tag)?;
        if !class.is_empty() {
            self.set_class(&node, class);
        }
        if let Some(text) = text {
            self.set_text(&node, text);
        }
        Some(node)
    }
}
