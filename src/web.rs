//! [`Dom`] over the real browser document.

use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Function};
use web_sys::{
    Document, Element, EventTarget, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, ScrollBehavior, ScrollToOptions, Window,
};

use crate::config::{Config, CONFIG_ELEMENT_ID};
use crate::dom::{
    Dom, DomEvent, EventKind, Handler, IntersectionOptions, Listener, Registration, Source,
};
use crate::error::{Error, Result};
use crate::timer::BrowserScheduler;
use crate::Landing;

pub struct WebDom {
    window: Window,
    document: Document,
}

impl WebDom {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or(Error::NoWindow)?;
        let document = window.document().ok_or(Error::NoDocument)?;
        Ok(Self { window, document })
    }

    fn wrap(kind: EventKind, handler: Handler<Element>) -> Closure<dyn FnMut(web_sys::Event)> {
        Closure::wrap(Box::new(move |event: web_sys::Event| {
            let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
            let key = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key);
            let dom_event = DomEvent::new(kind, target, key);
            handler(&dom_event);
            if dom_event.default_prevented() {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(web_sys::Event)>)
    }
}

/// A `web_sys` listener, kept alive until removed.
struct WebListener {
    target: EventTarget,
    kind: EventKind,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Registration for WebListener {
    fn remove(self: Box<Self>) {
        let name = self.kind.dom_name();
        let callback: &Function = self.callback.as_ref().unchecked_ref();
        if let Err(err) = self.target.remove_event_listener_with_callback(name, callback) {
            warn!("could not remove {} listener: {:?}", name, err);
        }
    }

    fn keep(self: Box<Self>) {
        self.callback.forget();
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            warn!("bad selector {}", selector);
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn create_element(&self, tag: &str) -> Option<Element> {
        self.document.create_element(tag).ok()
    }

    fn set_class(&self, node: &Element, class: &str) {
        node.set_class_name(class);
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn text(&self, node: &Element) -> Option<String> {
        node.text_content()
    }

    fn append_child(&self, parent: &Element, child: &Element) {
        let _ = parent.append_child(child);
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        let Some(html) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = html.style();
        let _ = if value.is_empty() {
            style.remove_property(property).map(|_| ())
        } else {
            style.set_property(property, value)
        };
    }

    fn offset_top(&self, node: &Element) -> f64 {
        node.dyn_ref::<HtmlElement>()
            .map(|html| f64::from(html.offset_top()))
            .unwrap_or_default()
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or_default()
    }

    fn inner_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or_default()
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn listen(
        &self,
        source: Source<'_, Element>,
        kind: EventKind,
        handler: Handler<Element>,
    ) -> Listener {
        let target: EventTarget = match source {
            Source::Window => self.window.clone().into(),
            Source::Document => self.document.clone().into(),
            Source::Node(node) => node.clone().into(),
        };
        let callback = Self::wrap(kind, handler);
        let function: &Function = callback.as_ref().unchecked_ref();
        if let Err(err) = target.add_event_listener_with_callback(kind.dom_name(), function) {
            warn!("could not listen for {}: {:?}", kind.dom_name(), err);
        }
        Listener::new(WebListener {
            target,
            kind,
            callback,
        })
    }

    fn observe_intersections(
        &self,
        targets: &[Element],
        options: &IntersectionOptions,
        handler: Rc<dyn Fn(&Element)>,
    ) {
        let on_entries = move |entries: Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    handler(&entry.target());
                }
            }
        };
        let callback =
            Closure::wrap(Box::new(on_entries) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                for target in targets {
                    observer.observe(target);
                }
            }
            Err(err) => warn!("intersection observer unavailable: {:?}", err),
        }
        callback.forget();
    }
}

/// Reads overrides from `<script type="application/json" id="landing-config">`.
pub fn load_config(dom: &WebDom) -> Config {
    let Some(raw) = dom
        .element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    else {
        return Config::default();
    };
    match Config::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            warn!("ignoring page config: {}", err);
            Config::default()
        }
    }
}

fn attach_page() -> Result<()> {
    let dom = Rc::new(WebDom::new()?);
    let config = load_config(&dom);
    let landing = Landing::attach(dom, Rc::new(BrowserScheduler), config);
    info!("{}", landing.summary());
    // Everything stays attached until the page unloads.
    std::mem::forget(landing);
    Ok(())
}

/// Attaches once the document is parsed.
pub fn run() -> Result<()> {
    let dom = WebDom::new()?;
    if dom.document.ready_state() != "loading" {
        return attach_page();
    }

    let on_ready: Closure<dyn FnMut()> = Closure::once(move || {
        if let Err(err) = attach_page() {
            warn!("landing page setup failed: {}", err);
        }
    });
    dom.document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
    on_ready.forget();
    Ok(())
}
