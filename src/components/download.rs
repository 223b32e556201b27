//! Call-to-action → platform modal → redirect toast.
//!
//! The flow is an explicit state machine. Only one modal exists at a time;
//! a call-to-action pressed while a modal is up only gets its press
//! feedback. Toasts are independent and may stack.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info, warn};

use crate::components::focus;
use crate::components::toast::Toast;
use crate::config::Config;
use crate::dom::{Dom, DomEvent, EventKind, Listener, Source};
use crate::style::{self, Hover, Modal, Press};
use crate::timer::Scheduler;

pub const CTA_SELECTOR: &str = ".btn-primary, .btn-secondary";
pub const OVERLAY_CLASS: &str = "download-modal";
pub const PANEL_CLASS: &str = "download-modal-content";
pub const CLOSE_CLASS: &str = "close-modal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Ios, Platform::Android];

    pub fn label(self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Android => "Android",
        }
    }

    pub fn store_name(self) -> &'static str {
        match self {
            Platform::Ios => "App Store",
            Platform::Android => "Google Play",
        }
    }

    /// Store listing a production build would open.
    pub fn store_url(self) -> &'static str {
        match self {
            Platform::Ios => "https://apps.apple.com/app/improvu",
            Platform::Android => "https://play.google.com/store/apps/details?id=com.improvu.app",
        }
    }

    pub fn button_class(self) -> &'static str {
        match self {
            Platform::Ios => "platform-btn ios-btn",
            Platform::Android => "platform-btn android-btn",
        }
    }

    pub fn redirect_message(self) -> String {
        format!("Redirecting to {}...", self.store_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    ModalOpening,
    ModalOpen,
    PlatformChosen(Platform),
    ModalClosing,
}

impl FlowState {
    fn modal_present(self) -> bool {
        !matches!(self, FlowState::Idle)
    }

    fn can_close(self) -> bool {
        matches!(
            self,
            FlowState::ModalOpening | FlowState::ModalOpen | FlowState::PlatformChosen(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Platform(Platform),
    CloseButton,
    Backdrop,
    Escape,
}

/// Nodes of the modal currently in the document.
#[derive(Debug, Clone)]
pub struct ModalNodes<N> {
    pub overlay: N,
    pub panel: N,
    pub close: N,
    pub platforms: Vec<(Platform, N)>,
}

/// The modal in the document and the listeners wired to its nodes. Dropping
/// it removes the listeners.
struct OpenModal<N> {
    nodes: ModalNodes<N>,
    listeners: Vec<Listener>,
}

pub struct DownloadFlow<D: Dom> {
    dom: Rc<D>,
    scheduler: Rc<dyn Scheduler>,
    config: Config,
    state: Cell<FlowState>,
    modal: RefCell<Option<OpenModal<D::Node>>>,
    toasts: RefCell<Vec<Rc<Toast<D>>>>,
}

impl<D: Dom> DownloadFlow<D> {
    pub fn attach(dom: Rc<D>, scheduler: Rc<dyn Scheduler>, config: &Config) -> Rc<Self> {
        let flow = Rc::new(Self {
            dom: dom.clone(),
            scheduler,
            config: config.clone(),
            state: Cell::new(FlowState::Idle),
            modal: RefCell::new(None),
            toasts: RefCell::new(Vec::new()),
        });

        let buttons = dom.query_all(CTA_SELECTOR);
        for button in &buttons {
            let handler = flow.clone();
            let pressed = button.clone();
            dom.listen(
                Source::Node(button),
                EventKind::Click,
                Rc::new(move |event: &DomEvent<D::Node>| {
                    event.prevent_default();
                    handler.on_cta(&pressed);
                }),
            )
            .forget();
        }

        let handler = flow.clone();
        dom.listen(
            Source::Document,
            EventKind::KeyDown,
            Rc::new(move |event: &DomEvent<D::Node>| {
                if event.key.as_deref() == Some("Escape") {
                    handler.close(CloseReason::Escape);
                }
            }),
        )
        .forget();

        info!("download flow attached to {} buttons", buttons.len());
        flow
    }

    pub fn state(&self) -> FlowState {
        self.state.get()
    }

    pub fn modal(&self) -> Option<ModalNodes<D::Node>> {
        self.modal.borrow().as_ref().map(|open| open.nodes.clone())
    }

    /// Toasts that are still in the document.
    pub fn active_toasts(&self) -> Vec<Rc<Toast<D>>> {
        self.toasts
            .borrow()
            .iter()
            .filter(|t| self.dom.is_connected(t.node()))
            .cloned()
            .collect()
    }

    /// A call-to-action press: feedback always, modal only from `Idle`.
    pub fn on_cta(self: &Rc<Self>, button: &D::Node) {
        self.press_feedback(button);

        if self.state.get().modal_present() {
            debug!("modal already up ({:?}), ignoring press", self.state.get());
            return;
        }

        let Some(open) = self.build_modal() else {
            warn!("could not build download modal");
            return;
        };
        *self.modal.borrow_mut() = Some(open);
        self.transition(FlowState::ModalOpening);

        let flow = self.clone();
        self.scheduler
            .schedule(self.config.enter_delay_ms, Box::new(move || flow.finish_opening()))
            .forget();
    }

    fn press_feedback(&self, button: &D::Node) {
        style::apply(&*self.dom, button, &Press::Down);
        let dom = self.dom.clone();
        let button = button.clone();
        self.scheduler
            .schedule(
                self.config.press_feedback_ms,
                Box::new(move || style::apply(&*dom, &button, &Press::Up)),
            )
            .forget();
    }

    fn finish_opening(&self) {
        if self.state.get() != FlowState::ModalOpening {
            return;
        }
        if let Some(open) = self.modal.borrow().as_ref() {
            style::apply_declarations(&*self.dom, &open.nodes.overlay, Modal::Shown.overlay());
            style::apply_declarations(&*self.dom, &open.nodes.panel, Modal::Shown.panel());
        }
        self.transition(FlowState::ModalOpen);
    }

    /// Platform button pressed: toast first, then close.
    pub fn choose(self: &Rc<Self>, platform: Platform) {
        if !matches!(self.state.get(), FlowState::ModalOpening | FlowState::ModalOpen) {
            return;
        }
        self.transition(FlowState::PlatformChosen(platform));
        info!(
            "{} selected, store link {} not opened",
            platform.label(),
            platform.store_url()
        );

        let message = platform.redirect_message();
        if let Some(toast) =
            Toast::show(self.dom.clone(), self.scheduler.clone(), &self.config, &message)
        {
            let mut toasts = self.toasts.borrow_mut();
            toasts.retain(|t| self.dom.is_connected(t.node()));
            toasts.push(toast);
        }
        self.close(CloseReason::Platform(platform));
    }

    /// Starts the exit transition. Closing twice, or with no modal, is a no-op.
    pub fn close(self: &Rc<Self>, reason: CloseReason) {
        if !self.state.get().can_close() {
            return;
        }
        if let Some(open) = self.modal.borrow().as_ref() {
            style::apply_declarations(&*self.dom, &open.nodes.overlay, Modal::Hidden.overlay());
            style::apply_declarations(&*self.dom, &open.nodes.panel, Modal::Hidden.panel());
        }
        debug!("closing download modal: {:?}", reason);
        self.transition(FlowState::ModalClosing);

        let flow = self.clone();
        self.scheduler
            .schedule(self.config.modal_transition_ms, Box::new(move || flow.finish_closing()))
            .forget();
    }

    fn finish_closing(&self) {
        if self.state.get() != FlowState::ModalClosing {
            return;
        }
        let open = self.modal.borrow_mut().take();
        if let Some(open) = open {
            if self.dom.is_connected(&open.nodes.overlay) {
                self.dom.remove(&open.nodes.overlay);
            }
            debug!("releasing {} modal listeners", open.listeners.len());
        }
        self.transition(FlowState::Idle);
    }

    fn transition(&self, next: FlowState) {
        let previous = self.state.replace(next);
        debug!("download flow {:?} -> {:?}", previous, next);
    }

    fn build_modal(self: &Rc<Self>) -> Option<OpenModal<D::Node>> {
        let dom = &self.dom;
        let body = dom.body()?;
        let mut listeners = Vec::new();

        let overlay = dom.build("div", OVERLAY_CLASS, None)?;
        dom.set_attribute(&overlay, "role", "dialog");
        dom.set_attribute(&overlay, "aria-modal", "true");
        style::apply_declarations(&**dom, &overlay, style::MODAL_OVERLAY);
        style::apply_declarations(&**dom, &overlay, Modal::Hidden.overlay());

        let panel = dom.build("div", PANEL_CLASS, None)?;
        style::apply_declarations(&**dom, &panel, style::MODAL_PANEL);
        style::apply_declarations(&**dom, &panel, Modal::Hidden.panel());

        let heading = dom.build("h3", "", Some("Choose Your Platform"))?;
        style::apply_declarations(&**dom, &heading, style::MODAL_HEADING);
        dom.append_child(&panel, &heading);

        let list = dom.build("div", "platform-options", None)?;
        style::apply_declarations(&**dom, &list, style::PLATFORM_LIST);
        let mut platforms = Vec::with_capacity(Platform::ALL.len());
        for platform in Platform::ALL {
            let text = format!("Download for {}", platform.label());
            let button = dom.build("button", platform.button_class(), Some(&text))?;
            style::apply_declarations(&**dom, &button, style::PLATFORM_BUTTON);
            listeners.extend(self.wire_platform_button(&button, platform));
            dom.append_child(&list, &button);
            platforms.push((platform, button));
        }
        dom.append_child(&panel, &list);

        let close = dom.build("button", CLOSE_CLASS, Some("×"))?;
        dom.set_attribute(&close, "aria-label", "Close");
        style::apply_declarations(&**dom, &close, style::CLOSE_BUTTON);
        let handler = self.clone();
        listeners.push(dom.listen(
            Source::Node(&close),
            EventKind::Click,
            Rc::new(move |_: &DomEvent<D::Node>| handler.close(CloseReason::CloseButton)),
        ));
        listeners.extend(focus::track(dom, &close));
        dom.append_child(&panel, &close);

        let handler = self.clone();
        let backdrop = overlay.clone();
        listeners.push(dom.listen(
            Source::Node(&overlay),
            EventKind::Click,
            Rc::new(move |event: &DomEvent<D::Node>| {
                // Clicks inside the panel bubble here too.
                if event.target.as_ref() == Some(&backdrop) {
                    handler.close(CloseReason::Backdrop);
                }
            }),
        ));

        dom.append_child(&overlay, &panel);
        dom.append_child(&body, &overlay);

        Some(OpenModal {
            nodes: ModalNodes {
                overlay,
                panel,
                close,
                platforms,
            },
            listeners,
        })
    }

    fn wire_platform_button(
        self: &Rc<Self>,
        button: &D::Node,
        platform: Platform,
    ) -> Vec<Listener> {
        let handler = self.clone();
        let mut listeners = vec![self.dom.listen(
            Source::Node(button),
            EventKind::Click,
            Rc::new(move |_: &DomEvent<D::Node>| handler.choose(platform)),
        )];
        for (kind, state) in [
            (EventKind::PointerEnter, Hover::Lifted),
            (EventKind::PointerLeave, Hover::Rest),
        ] {
            let dom = self.dom.clone();
            let node = button.clone();
            listeners.push(self.dom.listen(
                Source::Node(button),
                kind,
                Rc::new(move |_: &DomEvent<D::Node>| style::apply(&*dom, &node, &state)),
            ));
        }
        listeners.extend(focus::track(&self.dom, button));
        listeners
    }
}
