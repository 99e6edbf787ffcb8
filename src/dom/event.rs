use super::NodeId;
use std::rc::Rc;

/// MIME type the board uses for drag payloads
pub const TEXT_PLAIN: &str = "text/plain";

pub type EventHandler = Rc<dyn Fn(&mut Event)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Submit,
    DragStart,
    DragEnd,
    DragOver,
    DragLeave,
    Drop,
}

/// Operations a drag source permits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropEffect {
    #[default]
    Uninitialized,
    None,
    Copy,
    Move,
    Link,
}

/// Data carried between a drag source and a drop target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTransfer {
    items: Vec<(String, String)>,
    pub effect_allowed: DropEffect,
    pub drop_effect: DropEffect,
}

impl DataTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `data` under `format`, replacing any previous value
    pub fn set_data(&mut self, format: &str, data: &str) {
        match self.items.iter_mut().find(|(f, _)| f == format) {
            Some(item) => item.1 = data.to_string(),
            None => self.items.push((format.to_string(), data.to_string())),
        }
    }

    pub fn get_data(&self, format: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(f, _)| f == format)
            .map(|(_, data)| data.as_str())
    }

    /// Formats in the order they were first set
    pub fn types(&self) -> Vec<&str> {
        self.items.iter().map(|(f, _)| f.as_str()).collect()
    }

    pub fn clear_data(&mut self) {
        self.items.clear();
    }
}

#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    target: Option<NodeId>,
    current_target: Option<NodeId>,
    default_prevented: bool,
    propagation_stopped: bool,
    pub data_transfer: Option<DataTransfer>,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target: None,
            current_target: None,
            default_prevented: false,
            propagation_stopped: false,
            data_transfer: None,
        }
    }

    pub fn with_data_transfer(mut self, data_transfer: DataTransfer) -> Self {
        self.data_transfer = Some(data_transfer);
        self
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Node the event was dispatched on
    pub fn target(&self) -> Option<NodeId> {
        self.target
    }

    /// Node whose handler is currently running
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub(super) fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub(super) fn set_target(&mut self, target: NodeId) {
        self.target = Some(target);
    }

    pub(super) fn set_current_target(&mut self, node: Option<NodeId>) {
        self.current_target = node;
    }
}
