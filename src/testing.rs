//! In-memory document and clock for exercising the page behaviors natively.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::dom::{
    Dom, DomEvent, EventKind, Handler, IntersectionOptions, Listener, Registration, Source,
};
use crate::timer::{Pending, Scheduler, TimerHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FakeNode(usize);

#[derive(Default)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    style: BTreeMap<String, String>,
    parent: Option<usize>,
    children: Vec<usize>,
    offset_top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Origin {
    Window,
    Document,
    Node(FakeNode),
}

struct Registered {
    id: u64,
    origin: Origin,
    kind: EventKind,
    handler: Handler<FakeNode>,
}

/// Removes its entry from the listener table it came from.
struct FakeRegistration {
    id: u64,
    table: Weak<RefCell<Vec<Registered>>>,
}

impl Registration for FakeRegistration {
    fn remove(self: Box<Self>) {
        if let Some(table) = self.table.upgrade() {
            table.borrow_mut().retain(|entry| entry.id != self.id);
        }
    }

    fn keep(self: Box<Self>) {}
}

struct Observer {
    targets: Vec<FakeNode>,
    options: IntersectionOptions,
    handler: Rc<dyn Fn(&FakeNode)>,
}

/// Tree rooted at an `html` node (index 0) with a `body` (index 1).
pub struct FakeDom {
    nodes: RefCell<Vec<NodeData>>,
    scroll_y: Cell<f64>,
    inner_width: Cell<f64>,
    scroll_requests: RefCell<Vec<f64>>,
    listeners: Rc<RefCell<Vec<Registered>>>,
    next_listener: Cell<u64>,
    observers: RefCell<Vec<Observer>>,
}

const ROOT: usize = 0;
const BODY: usize = 1;

impl FakeDom {
    pub fn new() -> Self {
        let root = NodeData {
            tag: "html".to_string(),
            children: vec![BODY],
            ..NodeData::default()
        };
        let body = NodeData {
            tag: "body".to_string(),
            parent: Some(ROOT),
            ..NodeData::default()
        };
        Self {
            nodes: RefCell::new(vec![root, body]),
            scroll_y: Cell::new(0.0),
            inner_width: Cell::new(1280.0),
            scroll_requests: RefCell::new(Vec::new()),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener: Cell::new(0),
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Navigation with four links, two call-to-action buttons, three
    /// revealable sections and a text input.
    pub fn landing_page() -> Self {
        let dom = Self::new();
        let body = FakeNode(BODY);

        let nav = dom.add(&body, "nav", "navigation");
        let container = dom.add(&nav, "div", "nav-container");
        let links = dom.add(&container, "ul", "nav-links");
        for href in ["#features", "#download", "#missing", "https://blog.example.com"] {
            let item = dom.add(&links, "li", "");
            let link = dom.add(&item, "a", "");
            dom.set_attribute(&link, "href", href);
        }

        let hero = dom.add(&body, "header", "hero");
        dom.add(&hero, "button", "btn-primary");
        dom.add(&hero, "button", "btn-secondary");

        let features = dom.add(&body, "section", "light-section");
        dom.set_attribute(&features, "id", "features");
        dom.set_offset_top(&features, 900.0);

        let download = dom.add(&body, "section", "white-section");
        dom.set_attribute(&download, "id", "download");
        dom.set_offset_top(&download, 1800.0);

        let footer = dom.add(&body, "section", "dark-section");
        dom.set_offset_top(&footer, 2700.0);
        dom.add(&footer, "input", "newsletter-email");

        dom
    }

    pub fn add(&self, parent: &FakeNode, tag: &str, class: &str) -> FakeNode {
        let node = self.create_element(tag).expect("fake elements always build");
        if !class.is_empty() {
            self.set_class(&node, class);
        }
        self.append_child(parent, &node);
        node
    }

    pub fn set_offset_top(&self, node: &FakeNode, top: f64) {
        self.nodes.borrow_mut()[node.0].offset_top = top;
    }

    pub fn style(&self, node: &FakeNode, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].style.get(property).cloned()
    }

    pub fn children(&self, node: &FakeNode) -> Vec<FakeNode> {
        self.nodes.borrow()[node.0].children.iter().map(|&i| FakeNode(i)).collect()
    }

    /// Listeners registered on `node` that have not been removed.
    pub fn listeners_on(&self, node: &FakeNode) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|entry| entry.origin == Origin::Node(*node))
            .count()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn scroll_requests(&self) -> Vec<f64> {
        self.scroll_requests.borrow().clone()
    }

    pub fn observed_options(&self) -> Vec<IntersectionOptions> {
        self.observers.borrow().iter().map(|o| o.options.clone()).collect()
    }

    pub fn scroll_window(&self, y: f64) {
        self.scroll_y.set(y);
        self.dispatch(Origin::Window, EventKind::Scroll, None, None);
    }

    pub fn resize(&self, width: f64) {
        self.inner_width.set(width);
        self.dispatch(Origin::Window, EventKind::Resize, None, None);
    }

    pub fn set_width(&self, width: f64) {
        self.inner_width.set(width);
    }

    /// Clicks bubble from the target up through its ancestors.
    pub fn click(&self, node: &FakeNode) -> DomEvent<FakeNode> {
        let event = DomEvent::new(EventKind::Click, Some(*node), None);
        let mut path = Vec::new();
        let mut current = Some(node.0);
        while let Some(index) = current {
            path.push(index);
            current = self.nodes.borrow()[index].parent;
        }
        for index in path {
            self.deliver(Origin::Node(FakeNode(index)), &event);
        }
        self.deliver(Origin::Document, &event);
        event
    }

    pub fn press_key(&self, key: &str) -> DomEvent<FakeNode> {
        self.dispatch(Origin::Document, EventKind::KeyDown, None, Some(key.to_string()))
    }

    pub fn focus(&self, node: &FakeNode) {
        self.dispatch(Origin::Node(*node), EventKind::Focus, Some(*node), None);
    }

    pub fn blur(&self, node: &FakeNode) {
        self.dispatch(Origin::Node(*node), EventKind::Blur, Some(*node), None);
    }

    pub fn pointer_enter(&self, node: &FakeNode) {
        self.dispatch(Origin::Node(*node), EventKind::PointerEnter, Some(*node), None);
    }

    pub fn pointer_leave(&self, node: &FakeNode) {
        self.dispatch(Origin::Node(*node), EventKind::PointerLeave, Some(*node), None);
    }

    /// Signals that `node` crossed into view for every watcher observing it.
    pub fn intersect(&self, node: &FakeNode) {
        let handlers: Vec<_> = self
            .observers
            .borrow()
            .iter()
            .filter(|o| o.targets.contains(node))
            .map(|o| o.handler.clone())
            .collect();
        for handler in handlers {
            handler(node);
        }
    }

    fn dispatch(
        &self,
        origin: Origin,
        kind: EventKind,
        target: Option<FakeNode>,
        key: Option<String>,
    ) -> DomEvent<FakeNode> {
        let event = DomEvent::new(kind, target, key);
        self.deliver(origin, &event);
        event
    }

    fn deliver(&self, origin: Origin, event: &DomEvent<FakeNode>) {
        // Handlers may register more listeners, so collect before calling.
        let handlers: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .filter(|entry| entry.origin == origin && entry.kind == event.kind)
            .map(|entry| entry.handler.clone())
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    fn connected(&self, index: usize) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = index;
        loop {
            if current == ROOT {
                return true;
            }
            match nodes[current].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn document_order(&self) -> Vec<usize> {
        let nodes = self.nodes.borrow();
        let mut order = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(nodes[index].children.iter().rev());
        }
        order
    }

    fn matches_simple(node: &NodeData, part: &str) -> bool {
        if let Some(class) = part.strip_prefix('.') {
            node.classes.iter().any(|c| c == class)
        } else if let Some(id) = part.strip_prefix('#') {
            node.attributes.get("id").map(String::as_str) == Some(id)
        } else {
            node.tag == part
        }
    }

    /// Supports `tag`, `.class`, `#id`, descendant combinators and comma lists.
    fn matches(&self, index: usize, selector: &str) -> bool {
        let nodes = self.nodes.borrow();
        selector.split(',').any(|alternative| {
            let mut parts: Vec<&str> = alternative.split_whitespace().collect();
            let Some(last) = parts.pop() else {
                return false;
            };
            if !Self::matches_simple(&nodes[index], last) {
                return false;
            }
            let mut ancestor = nodes[index].parent;
            while let Some(part) = parts.last() {
                match ancestor {
                    Some(a) => {
                        if Self::matches_simple(&nodes[a], part) {
                            parts.pop();
                        }
                        ancestor = nodes[a].parent;
                    }
                    None => return false,
                }
            }
            true
        })
    }
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for FakeDom {
    type Node = FakeNode;

    fn query_all(&self, selector: &str) -> Vec<FakeNode> {
        self.document_order()
            .into_iter()
            .filter(|&i| i != ROOT && self.matches(i, selector))
            .map(FakeNode)
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<FakeNode> {
        if id.is_empty() {
            return None;
        }
        self.document_order()
            .into_iter()
            .find(|&i| self.nodes.borrow()[i].attributes.get("id").map(String::as_str) == Some(id))
            .map(FakeNode)
    }

    fn body(&self) -> Option<FakeNode> {
        Some(FakeNode(BODY))
    }

    fn create_element(&self, tag: &str) -> Option<FakeNode> {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData {
            tag: tag.to_string(),
            ..NodeData::default()
        });
        Some(FakeNode(nodes.len() - 1))
    }

    fn set_class(&self, node: &FakeNode, class: &str) {
        self.nodes.borrow_mut()[node.0].classes =
            class.split_whitespace().map(str::to_string).collect();
    }

    fn has_class(&self, node: &FakeNode, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|c| c == class)
    }

    fn attribute(&self, node: &FakeNode, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attributes.get(name).cloned()
    }

    fn set_attribute(&self, node: &FakeNode, name: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn set_text(&self, node: &FakeNode, text: &str) {
        self.nodes.borrow_mut()[node.0].text = Some(text.to_string());
    }

    fn text(&self, node: &FakeNode) -> Option<String> {
        self.nodes.borrow()[node.0].text.clone()
    }

    fn append_child(&self, parent: &FakeNode, child: &FakeNode) {
        self.remove(child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent.0);
        nodes[parent.0].children.push(child.0);
    }

    fn remove(&self, node: &FakeNode) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent].children.retain(|&c| c != node.0);
        }
    }

    fn is_connected(&self, node: &FakeNode) -> bool {
        self.connected(node.0)
    }

    fn set_style(&self, node: &FakeNode, property: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let style = &mut nodes[node.0].style;
        if value.is_empty() {
            style.remove(property);
        } else {
            style.insert(property.to_string(), value.to_string());
        }
    }

    fn offset_top(&self, node: &FakeNode) -> f64 {
        self.nodes.borrow()[node.0].offset_top
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn inner_width(&self) -> f64 {
        self.inner_width.get()
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.scroll_requests.borrow_mut().push(top);
    }

    fn listen(
        &self,
        source: Source<'_, FakeNode>,
        kind: EventKind,
        handler: Handler<FakeNode>,
    ) -> Listener {
        let origin = match source {
            Source::Window => Origin::Window,
            Source::Document => Origin::Document,
            Source::Node(node) => Origin::Node(*node),
        };
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push(Registered {
            id,
            origin,
            kind,
            handler,
        });
        Listener::new(FakeRegistration {
            id,
            table: Rc::downgrade(&self.listeners),
        })
    }

    fn observe_intersections(
        &self,
        targets: &[FakeNode],
        options: &IntersectionOptions,
        handler: Rc<dyn Fn(&FakeNode)>,
    ) {
        self.observers.borrow_mut().push(Observer {
            targets: targets.to_vec(),
            options: options.clone(),
            handler,
        });
    }
}

struct Entry {
    due: u64,
    seq: u64,
    task: Box<dyn FnOnce()>,
    cancelled: Rc<Cell<bool>>,
}

struct ManualPending {
    cancelled: Rc<Cell<bool>>,
}

impl Pending for ManualPending {
    fn cancel(self: Box<Self>) {
        self.cancelled.set(true);
    }

    fn forget(self: Box<Self>) {}
}

/// Clock that only moves when told to.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<u64>,
    seq: Cell<u64>,
    queue: RefCell<Vec<Entry>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now.get()
    }

    /// Timers that are neither cancelled nor already run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().iter().filter(|e| !e.cancelled.get()).count()
    }

    /// Runs every task due within the next `ms` milliseconds, in due order.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let position = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.due <= target)
                    .min_by_key(|(_, e)| (e.due, e.seq))
                    .map(|(i, _)| i);
                position.map(|i| queue.remove(i))
            };
            let Some(entry) = next else { break };
            self.now.set(entry.due);
            if !entry.cancelled.get() {
                (entry.task)();
            }
        }
        self.now.set(target);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerHandle {
        let cancelled = Rc::new(Cell::new(false));
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        self.queue.borrow_mut().push(Entry {
            due: self.now.get() + u64::from(delay_ms),
            seq,
            task,
            cancelled: cancelled.clone(),
        });
        TimerHandle::new(ManualPending { cancelled })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selectors_cover_landing_markup() {
        let dom = FakeDom::landing_page();
        assert_eq!(dom.query_all(".nav-links a").len(), 4);
        assert_eq!(dom.query_all(".btn-primary, .btn-secondary").len(), 2);
        assert_eq!(
            dom.query_all(".light-section, .white-section, .dark-section").len(),
            3
        );
        assert!(dom.element_by_id("download").is_some());
        assert!(dom.element_by_id("missing").is_none());
    }

    #[test]
    fn removed_nodes_are_disconnected_and_unqueryable() {
        let dom = FakeDom::new();
        let body = dom.body().unwrap();
        let outer = dom.add(&body, "div", "outer");
        let inner = dom.add(&outer, "span", "inner");
        assert!(dom.is_connected(&inner));

        dom.remove(&outer);
        assert!(!dom.is_connected(&inner));
        assert!(dom.query(".inner").is_none());
        // Second removal is harmless.
        dom.remove(&outer);
    }

    #[test]
    fn click_bubbles_to_ancestors() {
        let dom = FakeDom::new();
        let body = dom.body().unwrap();
        let outer = dom.add(&body, "div", "");
        let inner = dom.add(&outer, "button", "");
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            dom.listen(
                Source::Node(&outer),
                EventKind::Click,
                Rc::new(move |event: &DomEvent<FakeNode>| seen.borrow_mut().push(event.target)),
            )
            .forget();
        }
        dom.click(&inner);
        assert_eq!(*seen.borrow(), vec![Some(inner)]);
    }

    #[test]
    fn dropped_listener_stops_hearing_events() {
        let dom = FakeDom::new();
        let button = dom.add(&dom.body().unwrap(), "button", "");
        let clicks = Rc::new(Cell::new(0));
        let listener = {
            let clicks = clicks.clone();
            dom.listen(
                Source::Node(&button),
                EventKind::Click,
                Rc::new(move |_: &DomEvent<FakeNode>| clicks.set(clicks.get() + 1)),
            )
        };
        dom.click(&button);
        assert_eq!(dom.listeners_on(&button), 1);

        drop(listener);
        dom.click(&button);
        assert_eq!(clicks.get(), 1);
        assert_eq!(dom.listener_count(), 0);
    }
}
