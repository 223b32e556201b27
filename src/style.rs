//! Named visual states and the CSS declarations each one stands for.
//!
//! Components only ever touch inline styles through these tables, so the
//! mapping from state to appearance lives in one place.

use crate::dom::Dom;

pub type Declarations = &'static [(&'static str, &'static str)];

pub trait VisualState {
    fn declarations(&self) -> Declarations;
}

pub fn apply<D: Dom>(dom: &D, node: &D::Node, state: &impl VisualState) {
    apply_declarations(dom, node, state.declarations());
}

pub fn apply_declarations<D: Dom>(dom: &D, node: &D::Node, declarations: Declarations) {
    for (property, value) in declarations {
        dom.set_style(node, property, value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavBar {
    Transparent,
    Frosted,
}

impl NavBar {
    pub fn for_offset(scroll_y: f64, threshold: f64) -> Self {
        if scroll_y > threshold {
            NavBar::Frosted
        } else {
            NavBar::Transparent
        }
    }
}

impl VisualState for NavBar {
    fn declarations(&self) -> Declarations {
        match self {
            NavBar::Transparent => &[
                ("backdrop-filter", "none"),
                ("background-color", "transparent"),
            ],
            NavBar::Frosted => &[
                ("backdrop-filter", "blur(10px)"),
                ("background-color", "rgba(0, 0, 0, 0.1)"),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    Hidden,
    Shown,
}

impl VisualState for Reveal {
    fn declarations(&self) -> Declarations {
        match self {
            Reveal::Hidden => &[
                ("opacity", "0"),
                ("transform", "translateY(20px)"),
                ("transition", "opacity 0.6s ease-out, transform 0.6s ease-out"),
            ],
            Reveal::Shown => &[("opacity", "1"), ("transform", "translateY(0)")],
        }
    }
}

/// Call-to-action button feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    Down,
    Up,
}

impl VisualState for Press {
    fn declarations(&self) -> Declarations {
        match self {
            Press::Down => &[("transform", "scale(0.95)")],
            Press::Up => &[("transform", "")],
        }
    }
}

/// Overlay and panel of the download modal move together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Hidden,
    Shown,
}

impl Modal {
    pub fn overlay(&self) -> Declarations {
        match self {
            Modal::Hidden => &[("opacity", "0")],
            Modal::Shown => &[("opacity", "1")],
        }
    }

    pub fn panel(&self) -> Declarations {
        match self {
            Modal::Hidden => &[("transform", "scale(0.9)")],
            Modal::Shown => &[("transform", "scale(1)")],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hover {
    Rest,
    Lifted,
}

impl VisualState for Hover {
    fn declarations(&self) -> Declarations {
        match self {
            Hover::Rest => &[("transform", ""), ("box-shadow", "")],
            Hover::Lifted => &[
                ("transform", "translateY(-2px)"),
                ("box-shadow", "0 4px 12px rgba(0, 0, 0, 0.1)"),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPosition {
    Offscreen,
    Onscreen,
}

impl VisualState for ToastPosition {
    fn declarations(&self) -> Declarations {
        match self {
            ToastPosition::Offscreen => &[("transform", "translateX(100%)")],
            ToastPosition::Onscreen => &[("transform", "translateX(0)")],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Unfocused,
    Ring,
}

impl VisualState for Focus {
    fn declarations(&self) -> Declarations {
        match self {
            Focus::Unfocused => &[("outline", ""), ("outline-offset", "")],
            Focus::Ring => &[("outline", "2px solid #3B82F6"), ("outline-offset", "2px")],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuLinks {
    Collapsed,
    Expanded,
}

impl VisualState for MenuLinks {
    fn declarations(&self) -> Declarations {
        match self {
            MenuLinks::Collapsed => &[("display", "none")],
            MenuLinks::Expanded => &[
                ("display", "flex"),
                ("flex-direction", "column"),
                ("position", "absolute"),
                ("top", "100%"),
                ("left", "0"),
                ("right", "0"),
                ("background", "rgba(0, 0, 0, 0.9)"),
                ("padding", "24px"),
            ],
        }
    }
}

// Fixed chrome for elements this crate creates.

pub const MODAL_OVERLAY: Declarations = &[
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("background", "rgba(0, 0, 0, 0.8)"),
    ("display", "flex"),
    ("justify-content", "center"),
    ("align-items", "center"),
    ("z-index", "1000"),
    ("transition", "opacity 0.3s ease"),
];

pub const MODAL_PANEL: Declarations = &[
    ("position", "relative"),
    ("background", "#FFFFFF"),
    ("padding", "48px"),
    ("border-radius", "8px"),
    ("text-align", "center"),
    ("max-width", "400px"),
    ("margin", "20px"),
    ("transition", "transform 0.3s ease"),
];

pub const MODAL_HEADING: Declarations = &[
    ("font-size", "clamp(24px, 3vw, 36px)"),
    ("font-weight", "700"),
    ("color", "#000000"),
    ("margin-bottom", "32px"),
];

pub const PLATFORM_LIST: Declarations = &[
    ("display", "flex"),
    ("flex-direction", "column"),
    ("gap", "16px"),
];

pub const PLATFORM_BUTTON: Declarations = &[
    ("background", "#000000"),
    ("color", "#FFFFFF"),
    ("font-size", "16px"),
    ("font-weight", "600"),
    ("padding", "16px 32px"),
    ("border-radius", "8px"),
    ("border", "none"),
    ("cursor", "pointer"),
    ("transition", "all 0.2s ease"),
];

pub const CLOSE_BUTTON: Declarations = &[
    ("position", "absolute"),
    ("top", "16px"),
    ("right", "16px"),
    ("background", "none"),
    ("border", "none"),
    ("font-size", "24px"),
    ("cursor", "pointer"),
    ("color", "#666666"),
    ("width", "32px"),
    ("height", "32px"),
    ("display", "flex"),
    ("align-items", "center"),
    ("justify-content", "center"),
];

pub const TOAST: Declarations = &[
    ("position", "fixed"),
    ("top", "24px"),
    ("right", "24px"),
    ("background", "#000000"),
    ("color", "#FFFFFF"),
    ("padding", "16px 24px"),
    ("border-radius", "8px"),
    ("font-weight", "600"),
    ("z-index", "1001"),
    ("transition", "transform 0.3s ease"),
    ("font-size", "16px"),
];

pub const MENU_BUTTON: Declarations = &[
    ("background", "none"),
    ("border", "none"),
    ("color", "#FFFFFF"),
    ("font-size", "24px"),
    ("cursor", "pointer"),
    ("display", "block"),
];
