use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info};

use crate::config::Config;
use crate::dom::{Dom, IntersectionOptions};
use crate::style::{self, Reveal};

pub const SECTION_SELECTOR: &str = ".light-section, .white-section, .dark-section";

/// One-shot fade and slide-in for content sections.
pub struct RevealObserver<D: Dom> {
    dom: Rc<D>,
    sections: Vec<D::Node>,
    revealed: RefCell<Vec<D::Node>>,
}

impl<D: Dom> RevealObserver<D> {
    pub fn attach(dom: Rc<D>, config: &Config) -> Rc<Self> {
        let sections = dom.query_all(SECTION_SELECTOR);
        for section in &sections {
            style::apply(&*dom, section, &Reveal::Hidden);
        }

        let observer = Rc::new(Self {
            dom: dom.clone(),
            sections,
            revealed: RefCell::new(Vec::new()),
        });

        let options = IntersectionOptions {
            threshold: config.reveal_threshold,
            root_margin: config.reveal_root_margin(),
        };
        let handler = observer.clone();
        dom.observe_intersections(
            &observer.sections,
            &options,
            Rc::new(move |section: &D::Node| handler.on_visible(section)),
        );
        info!("watching {} sections for reveal", observer.sections.len());
        observer
    }

    pub fn on_visible(&self, section: &D::Node) {
        if !self.sections.contains(section) || self.is_revealed(section) {
            return;
        }
        style::apply(&*self.dom, section, &Reveal::Shown);
        self.revealed.borrow_mut().push(section.clone());
        debug!("revealed section {:?}", section);
    }

    pub fn is_revealed(&self, section: &D::Node) -> bool {
        self.revealed.borrow().contains(section)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.borrow().len()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}
