//! # Projboard Core
//!
//! State and component core for a drag-and-drop project board.
//!
//! A single [`ProjectStore`] holds every project and notifies its listeners
//! after each mutation. Widgets ([`ProjectInput`], [`ProjectList`],
//! [`ProjectItem`]) render into an in-memory [`Dom`] and follow the shared
//! [`Component`] lifecycle. [`App`] wires them together.

pub mod app;
pub mod components;
pub mod dom;
pub mod domain;
pub mod error;
pub mod page;
pub mod state;

// Re-export commonly used types
pub use app::App;
pub use components::{
    Component, DragTarget, Draggable, ProjectInput, ProjectItem, ProjectList,
};
pub use dom::Dom;
pub use domain::{
    board::{BoardConfig, InputRules, ListConfig},
    project::{Project, ProjectId, ProjectStatus},
};
pub use error::{ProjboardError, Result};
pub use state::ProjectStore;
