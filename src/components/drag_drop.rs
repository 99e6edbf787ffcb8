//! Drag-and-drop roles a widget can take on.
//!
//! Widgets implement these on the state their event handlers upgrade to, and
//! wire each method to the matching [`EventKind`](crate::dom::EventKind) in
//! [`Component::configure`](super::Component::configure).

use crate::dom::Event;

/// Something the user can pick up
pub trait Draggable {
    /// Fills the event's data transfer with whatever identifies the source
    fn drag_start(&self, event: &mut Event);

    /// Called on the source once the drag is over, dropped or not
    fn drag_end(&self, event: &mut Event);
}

/// Something a dragged item can be dropped onto
pub trait DragTarget {
    /// Called while a drag hovers. Accepting means calling
    /// [`Event::prevent_default`].
    fn drag_over(&self, event: &mut Event);

    fn drop(&self, event: &mut Event);

    fn drag_leave(&self, event: &mut Event);
}
