//! What a successfully handled DevMode command did.
//!
//! The host matches on `Outcome` to decide what to show and whether the
//! renderer has to re-read the element set.

use crate::data::ElementKind;
use std::fmt;

/// Persistence target touched by a save command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    Layout,
    Settings,
    Hierarchy,
}

impl SaveTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveTarget::Layout => "layout",
            SaveTarget::Settings => "settings",
            SaveTarget::Hierarchy => "hierarchy",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `0` flipped DevMode
    Toggled { enabled: bool },

    /// DevMode is off; the command was ignored
    Disabled,

    /// A property of an element changed
    Applied { element: String, change: String },

    /// Command was valid but had nothing to act on
    NoOp { reason: String },

    Added { name: String, kind: ElementKind },

    Deleted { name: String },

    Saved { target: SaveTarget },

    /// Elements and menus were replaced from a saved hierarchy
    Loaded { elements: usize, menus: usize },

    /// Renderer should re-read the element set
    RefreshRequested,

    /// Informational text (print_info, listmenus, ...)
    Info(String),
}

impl Outcome {
    /// Whether the element set changed shape and the renderer must rebuild
    pub fn needs_refresh(&self) -> bool {
        matches!(
            self,
            Outcome::RefreshRequested
                | Outcome::Added { .. }
                | Outcome::Deleted { .. }
                | Outcome::Loaded { .. }
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Toggled { enabled: true } => write!(f, "DevMode enabled"),
            Outcome::Toggled { enabled: false } => write!(f, "DevMode disabled"),
            Outcome::Disabled => write!(f, "DevMode is disabled (enter 0 to enable)"),
            Outcome::Applied { element, change } => write!(f, "{}: {}", element, change),
            Outcome::NoOp { reason } => write!(f, "No change: {}", reason),
            Outcome::Added { name, kind } => write!(f, "Added {} '{}'", kind, name),
            Outcome::Deleted { name } => write!(f, "Deleted '{}'", name),
            Outcome::Saved { target } => write!(f, "Saved {} config", target.as_str()),
            Outcome::Loaded { elements, menus } => write!(
                f,
                "Loaded {} elements and {} menus from hierarchy",
                elements, menus
            ),
            Outcome::RefreshRequested => write!(f, "UI refresh requested"),
            Outcome::Info(text) => f.write_str(text),
        }
    }
}
