//! In-memory document tree the board's widgets render into.
//!
//! Nodes live in a generational arena owned by a shared [`Dom`] handle.
//! Freed slots are reused; a [`NodeId`] from before the reuse no longer
//! resolves. Templates are
//! registered as [`ElementSpec`]s and deep-cloned on instantiation. Event
//! handlers run with no borrow of the tree held, so a handler may freely read
//! and mutate the document it was dispatched on.

pub mod event;
pub mod template;

pub use event::{DataTransfer, DropEffect, Event, EventHandler, EventKind, TEXT_PLAIN};
pub use template::ElementSpec;

use crate::error::{ProjboardError, Result};
use std::{
    cell::RefCell,
    collections::{BTreeSet, HashMap},
    fmt,
    rc::Rc,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}.{}", self.index, self.generation)
    }
}

/// Where a node is inserted relative to its new parent's children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before the first child
    AfterBegin,
    /// After the last child
    BeforeEnd,
}

struct Node {
    tag: String,
    id: Option<String>,
    classes: BTreeSet<String>,
    text: String,
    value: String,
    draggable: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    handlers: Vec<(EventKind, EventHandler)>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            classes: BTreeSet::new(),
            text: String::new(),
            value: String::new(),
            draggable: false,
            parent: None,
            children: Vec::new(),
            handlers: Vec::new(),
        }
    }
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

struct Tree {
    slots: Vec<Slot>,
    vacant: Vec<usize>,
    templates: HashMap<String, ElementSpec>,
    alerts: Vec<String>,
}

impl Tree {
    fn node(&self, id: NodeId) -> Result<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or_else(|| ProjboardError::MissingElement(id.to_string()))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or_else(|| ProjboardError::MissingElement(id.to_string()))
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.vacant.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    fn build(&mut self, spec: &ElementSpec) -> NodeId {
        let mut node = Node::new(&spec.tag);
        node.id = spec.id.clone();
        node.classes = spec.classes.iter().cloned().collect();
        node.text = spec.text.clone();
        let id = self.alloc(node);

        for child_spec in &spec.children {
            let child = self.build(child_spec);
            if let Ok(child_node) = self.node_mut(child) {
                child_node.parent = Some(id);
            }
            if let Ok(node) = self.node_mut(id) {
                node.children.push(child);
            }
        }
        id
    }

    fn detach(&mut self, id: NodeId) -> Result<()> {
        if let Some(parent) = self.node_mut(id)?.parent.take() {
            self.node_mut(parent)?.children.retain(|child| *child != id);
        }
        Ok(())
    }

    /// Releases the subtree rooted at `id`, bumping each slot's generation
    fn free(&mut self, id: NodeId) {
        let Some(slot) = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
        else {
            return;
        };
        let Some(node) = slot.node.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.vacant.push(id.index);

        for child in node.children {
            self.free(child);
        }
    }

    fn find(&self, root: NodeId, matches: &dyn Fn(&Node) -> bool) -> Option<NodeId> {
        let node = self.node(root).ok()?;
        for child in &node.children {
            if self.node(*child).map(|n| matches(n)).unwrap_or(false) {
                return Some(*child);
            }
            if let Some(found) = self.find(*child, matches) {
                return Some(found);
            }
        }
        None
    }

    fn text_content(&self, id: NodeId, out: &mut String) {
        if let Ok(node) = self.node(id) {
            out.push_str(&node.text);
            for child in &node.children {
                self.text_content(*child, out);
            }
        }
    }
}

/// Shared handle onto a document. Clones refer to the same tree.
#[derive(Clone)]
pub struct Dom {
    tree: Rc<RefCell<Tree>>,
    body: NodeId,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// Creates an empty document with a `body` root
    pub fn new() -> Self {
        let mut tree = Tree {
            slots: Vec::new(),
            vacant: Vec::new(),
            templates: HashMap::new(),
            alerts: Vec::new(),
        };
        let body = tree.alloc(Node::new("body"));
        Self {
            tree: Rc::new(RefCell::new(tree)),
            body,
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn register_template(&self, id: impl Into<String>, content: ElementSpec) {
        self.tree.borrow_mut().templates.insert(id.into(), content);
    }

    /// Deep-clones a template's content into a new detached subtree
    pub fn instantiate(&self, template_id: &str) -> Result<NodeId> {
        let mut tree = self.tree.borrow_mut();
        let spec = tree
            .templates
            .get(template_id)
            .cloned()
            .ok_or_else(|| ProjboardError::MissingTemplate(template_id.to_string()))?;
        Ok(tree.build(&spec))
    }

    /// Creates a detached element
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.tree.borrow_mut().alloc(Node::new(tag))
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.insert(parent, child, InsertPosition::BeforeEnd)
    }

    /// Moves `node` under `host` at the given position
    pub fn insert(&self, host: NodeId, node: NodeId, position: InsertPosition) -> Result<()> {
        let mut tree = self.tree.borrow_mut();
        tree.node(host)?;
        tree.detach(node)?;
        tree.node_mut(node)?.parent = Some(host);

        let children = &mut tree.node_mut(host)?.children;
        match position {
            InsertPosition::AfterBegin => children.insert(0, node),
            InsertPosition::BeforeEnd => children.push(node),
        }
        Ok(())
    }

    /// Finds an element attached under `body` by id
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.tree.borrow();
        tree.find(self.body, &|node: &Node| node.id.as_deref() == Some(id))
    }

    /// First descendant of `root` matching `#id`, `.class` or a tag name
    pub fn query(&self, root: NodeId, selector: &str) -> Option<NodeId> {
        let tree = self.tree.borrow();
        if let Some(id) = selector.strip_prefix('#') {
            tree.find(root, &|node: &Node| node.id.as_deref() == Some(id))
        } else if let Some(class) = selector.strip_prefix('.') {
            tree.find(root, &|node: &Node| node.classes.contains(class))
        } else {
            tree.find(root, &|node: &Node| node.tag.eq_ignore_ascii_case(selector))
        }
    }

    /// Arena slots currently allocated, live or vacant
    pub fn slot_count(&self) -> usize {
        self.tree.borrow().slots.len()
    }

    /// Nodes currently alive, attached or not
    pub fn live_count(&self) -> usize {
        let tree = self.tree.borrow();
        tree.slots.len() - tree.vacant.len()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.tree.borrow().node(node).is_ok()
    }

    pub fn tag(&self, node: NodeId) -> Result<String> {
        Ok(self.tree.borrow().node(node)?.tag.clone())
    }

    pub fn id_of(&self, node: NodeId) -> Result<Option<String>> {
        Ok(self.tree.borrow().node(node)?.id.clone())
    }

    pub fn set_id(&self, node: NodeId, id: &str) -> Result<()> {
        self.tree.borrow_mut().node_mut(node)?.id = Some(id.to_string());
        Ok(())
    }

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.tree.borrow().node(node)?.parent)
    }

    pub fn children(&self, node: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.tree.borrow().node(node)?.children.clone())
    }

    /// Removes and frees every descendant of `node`
    pub fn clear_children(&self, node: NodeId) -> Result<()> {
        let mut tree = self.tree.borrow_mut();
        let children = std::mem::take(&mut tree.node_mut(node)?.children);
        for child in children {
            tree.free(child);
        }
        Ok(())
    }

    /// The node's own text
    pub fn text(&self, node: NodeId) -> Result<String> {
        Ok(self.tree.borrow().node(node)?.text.clone())
    }

    pub fn set_text(&self, node: NodeId, text: &str) -> Result<()> {
        self.tree.borrow_mut().node_mut(node)?.text = text.to_string();
        Ok(())
    }

    /// Concatenated text of the node and all its descendants
    pub fn text_content(&self, node: NodeId) -> Result<String> {
        let tree = self.tree.borrow();
        tree.node(node)?;
        let mut out = String::new();
        tree.text_content(node, &mut out);
        Ok(out)
    }

    /// Form field value
    pub fn value(&self, node: NodeId) -> Result<String> {
        Ok(self.tree.borrow().node(node)?.value.clone())
    }

    pub fn set_value(&self, node: NodeId, value: &str) -> Result<()> {
        self.tree.borrow_mut().node_mut(node)?.value = value.to_string();
        Ok(())
    }

    pub fn add_class(&self, node: NodeId, class: &str) -> Result<()> {
        self.tree
            .borrow_mut()
            .node_mut(node)?
            .classes
            .insert(class.to_string());
        Ok(())
    }

    pub fn remove_class(&self, node: NodeId, class: &str) -> Result<()> {
        self.tree.borrow_mut().node_mut(node)?.classes.remove(class);
        Ok(())
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> Result<bool> {
        Ok(self.tree.borrow().node(node)?.classes.contains(class))
    }

    pub fn set_draggable(&self, node: NodeId, draggable: bool) -> Result<()> {
        self.tree.borrow_mut().node_mut(node)?.draggable = draggable;
        Ok(())
    }

    pub fn is_draggable(&self, node: NodeId) -> Result<bool> {
        Ok(self.tree.borrow().node(node)?.draggable)
    }

    pub fn add_event_listener(
        &self,
        node: NodeId,
        kind: EventKind,
        handler: impl Fn(&mut Event) + 'static,
    ) -> Result<()> {
        self.tree
            .borrow_mut()
            .node_mut(node)?
            .handlers
            .push((kind, Rc::new(handler)));
        Ok(())
    }

    /// Dispatches `event` at `target`, bubbling up through its ancestors.
    ///
    /// Returns false when a handler called `prevent_default`.
    pub fn dispatch(&self, target: NodeId, event: &mut Event) -> Result<bool> {
        let path = {
            let tree = self.tree.borrow();
            let mut path = vec![target];
            let mut current = tree.node(target)?.parent;
            while let Some(node) = current {
                path.push(node);
                current = tree.node(node)?.parent;
            }
            path
        };

        event.set_target(target);
        for node in path {
            let handlers: Vec<EventHandler> = match self.tree.borrow().node(node) {
                Ok(n) => n
                    .handlers
                    .iter()
                    .filter(|(kind, _)| *kind == event.kind())
                    .map(|(_, handler)| Rc::clone(handler))
                    .collect(),
                // A handler further down removed this ancestor
                Err(_) => break,
            };

            event.set_current_target(Some(node));
            for handler in handlers {
                handler(event);
            }
            if event.propagation_stopped() {
                break;
            }
        }
        event.set_current_target(None);

        Ok(!event.default_prevented())
    }

    /// Simulates a user dragging `source` onto `target`.
    ///
    /// The drop only happens when the target accepts the drag-over by
    /// preventing its default; otherwise the target sees a drag-leave.
    /// Returns whether the drop took place.
    pub fn drag_and_drop(&self, source: NodeId, target: NodeId) -> Result<bool> {
        let mut start = Event::new(EventKind::DragStart).with_data_transfer(DataTransfer::new());
        self.dispatch(source, &mut start)?;
        let transfer = start.data_transfer.take().unwrap_or_default();

        let mut over = Event::new(EventKind::DragOver).with_data_transfer(transfer.clone());
        let accepted = !self.dispatch(target, &mut over)?;

        if accepted {
            let mut drop = Event::new(EventKind::Drop).with_data_transfer(transfer.clone());
            self.dispatch(target, &mut drop)?;
        } else {
            let mut leave = Event::new(EventKind::DragLeave).with_data_transfer(transfer.clone());
            self.dispatch(target, &mut leave)?;
        }
        debug!(%source, %target, accepted, "Drag finished");

        // The source may have been re-rendered away by the drop
        if self.contains(source) {
            let mut end = Event::new(EventKind::DragEnd).with_data_transfer(transfer);
            self.dispatch(source, &mut end)?;
        }
        Ok(accepted)
    }

    /// Shows a blocking message to the user
    pub fn alert(&self, message: &str) {
        info!(text = message, "Alert raised");
        self.tree.borrow_mut().alerts.push(message.to_string());
    }

    pub fn alerts(&self) -> Vec<String> {
        self.tree.borrow().alerts.clone()
    }

    pub fn take_alerts(&self) -> Vec<String> {
        std::mem::take(&mut self.tree.borrow_mut().alerts)
    }
}
