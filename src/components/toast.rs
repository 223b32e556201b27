use std::cell::Cell;
use std::rc::Rc;

use log::{debug, warn};

use crate::config::Config;
use crate::dom::Dom;
use crate::style::{self, ToastPosition};
use crate::timer::Scheduler;

pub const TOAST_CLASS: &str = "download-toast";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Entering,
    Visible,
    Leaving,
    Removed,
}

/// Self-dismissing notification pinned to the top right corner.
pub struct Toast<D: Dom> {
    dom: Rc<D>,
    node: D::Node,
    message: String,
    phase: Cell<ToastPhase>,
}

impl<D: Dom> Toast<D> {
    /// Inserts the toast off-screen and schedules its whole lifecycle:
    /// slide in, hold for the configured duration, slide out, detach.
    pub fn show(
        dom: Rc<D>,
        scheduler: Rc<dyn Scheduler>,
        config: &Config,
        message: &str,
    ) -> Option<Rc<Self>> {
        let Some(body) = dom.body() else {
            warn!("no document body, dropping toast {:?}", message);
            return None;
        };
        let node = dom.build("div", TOAST_CLASS, Some(message))?;
        dom.set_attribute(&node, "role", "status");
        style::apply_declarations(&*dom, &node, style::TOAST);
        style::apply(&*dom, &node, &ToastPosition::Offscreen);
        dom.append_child(&body, &node);

        let toast = Rc::new(Self {
            dom,
            node,
            message: message.to_string(),
            phase: Cell::new(ToastPhase::Entering),
        });
        debug!("toast shown: {}", toast.message);

        let entering = toast.clone();
        scheduler
            .schedule(config.enter_delay_ms, Box::new(move || entering.slide_in()))
            .forget();

        let leaving = toast.clone();
        let exit_ms = config.modal_transition_ms;
        let exit_scheduler = scheduler.clone();
        scheduler
            .schedule(
                config.toast_duration_ms,
                Box::new(move || {
                    leaving.slide_out();
                    exit_scheduler
                        .schedule(exit_ms, Box::new(move || leaving.detach()))
                        .forget();
                }),
            )
            .forget();

        Some(toast)
    }

    fn slide_in(&self) {
        if self.phase.get() == ToastPhase::Entering {
            style::apply(&*self.dom, &self.node, &ToastPosition::Onscreen);
            self.phase.set(ToastPhase::Visible);
        }
    }

    fn slide_out(&self) {
        style::apply(&*self.dom, &self.node, &ToastPosition::Offscreen);
        self.phase.set(ToastPhase::Leaving);
    }

    fn detach(&self) {
        if self.dom.is_connected(&self.node) {
            self.dom.remove(&self.node);
        }
        self.phase.set(ToastPhase::Removed);
        debug!("toast removed: {}", self.message);
    }

    pub fn phase(&self) -> ToastPhase {
        self.phase.get()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn node(&self) -> &D::Node {
        &self.node
    }
}
