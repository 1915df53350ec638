//! Data layer - UI elements, menus and their collections
//!
//! Pure state with no rendering or I/O. The DevMode interpreter mutates these
//! structures; the renderer only reads them.

pub mod element;
pub mod element_set;
pub mod hierarchy;
pub mod menu;

pub use element::*;
pub use element_set::*;
pub use hierarchy::*;
pub use menu::*;
