//! Widgets rendered into the document.
//!
//! Every widget follows the same construction sequence: [`mount`] clones its
//! template and attaches the root into a host, then the widget's constructor
//! calls [`Component::configure`] followed by [`Component::render_content`]
//! before handing the instance out.

pub mod drag_drop;
pub mod project_input;
pub mod project_item;
pub mod project_list;

pub use drag_drop::{DragTarget, Draggable};
pub use project_input::ProjectInput;
pub use project_item::ProjectItem;
pub use project_list::ProjectList;

use crate::{
    dom::{Dom, InsertPosition, NodeId},
    error::{ProjboardError, Result},
};

/// Lifecycle hooks shared by every widget
pub trait Component {
    /// Root element of this widget
    fn element(&self) -> NodeId;

    /// Wires event handlers and store subscriptions. Called once, after the
    /// root element is attached.
    fn configure(&self) -> Result<()>;

    /// Writes static or derived content into the root element
    fn render_content(&self) -> Result<()>;
}

/// Nodes produced by [`mount`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mounted {
    pub host: NodeId,
    pub element: NodeId,
}

/// Clones `template_id`, optionally gives the root `element_id`, and inserts
/// it into the element with id `host_id`.
pub fn mount(
    dom: &Dom,
    template_id: &str,
    host_id: &str,
    position: InsertPosition,
    element_id: Option<&str>,
) -> Result<Mounted> {
    let host = dom
        .get_element_by_id(host_id)
        .ok_or_else(|| ProjboardError::MissingElement(format!("#{}", host_id)))?;
    mount_into(dom, template_id, host, position, element_id)
}

/// Same as [`mount`] for a host the caller already holds, skipping the
/// document-wide id lookup.
pub fn mount_into(
    dom: &Dom,
    template_id: &str,
    host: NodeId,
    position: InsertPosition,
    element_id: Option<&str>,
) -> Result<Mounted> {
    if !dom.contains(host) {
        return Err(ProjboardError::MissingElement(host.to_string()));
    }
    let element = dom.instantiate(template_id)?;

    if let Some(id) = element_id {
        dom.set_id(element, id)?;
    }
    dom.insert(host, element, position)?;

    Ok(Mounted { host, element })
}

/// Looks up a descendant the template is expected to provide
pub(crate) fn require(dom: &Dom, root: NodeId, selector: &str) -> Result<NodeId> {
    dom.query(root, selector)
        .ok_or_else(|| ProjboardError::MissingElement(selector.to_string()))
}
