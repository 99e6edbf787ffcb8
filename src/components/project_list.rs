use crate::{
    components::{mount, require, Component, DragTarget, ProjectItem},
    dom::{Dom, Event, EventKind, InsertPosition, NodeId, TEXT_PLAIN},
    domain::{BoardConfig, ListConfig, Project, ProjectId, ProjectStatus},
    error::Result,
    state::ProjectStore,
};
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    str::FromStr,
};
use tracing::{debug, error, warn};

/// Class marking a list as a valid drop target while a drag hovers over it
pub const DROPPABLE_CLASS: &str = "droppable";

struct ListState {
    dom: Dom,
    store: ProjectStore,
    status: ProjectStatus,
    heading: String,
    item_template: String,
    element: NodeId,
    list_element: NodeId,
    assigned: RefCell<Vec<Project>>,
    items: RefCell<Vec<ProjectItem>>,
}

impl ListState {
    fn list_id(&self) -> String {
        format!("{}-projects-list", self.status)
    }

    /// Replaces the cached view with the projects matching this list's status
    /// and rebuilds the rendered rows.
    fn apply_snapshot(&self, projects: &[Project]) -> Result<()> {
        let relevant: Vec<Project> = projects
            .iter()
            .filter(|p| p.status == self.status)
            .cloned()
            .collect();
        *self.assigned.borrow_mut() = relevant;
        self.render_projects()
    }

    fn render_projects(&self) -> Result<()> {
        self.items.borrow_mut().clear();
        self.dom.clear_children(self.list_element)?;

        let assigned = self.assigned.borrow().clone();
        let items = assigned
            .into_iter()
            .map(|project| {
                ProjectItem::new(&self.dom, &self.item_template, self.list_element, project)
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(status = %self.status, count = items.len(), "List rendered");
        *self.items.borrow_mut() = items;
        Ok(())
    }

    fn clear_highlight(&self) {
        if let Err(err) = self.dom.remove_class(self.list_element, DROPPABLE_CLASS) {
            warn!(error = %err, "Could not clear drop target highlight");
        }
    }
}

impl DragTarget for ListState {
    fn drag_over(&self, event: &mut Event) {
        let compatible = event
            .data_transfer
            .as_ref()
            .and_then(|transfer| transfer.types().first().map(|t| *t == TEXT_PLAIN))
            .unwrap_or(false);
        if !compatible {
            return;
        }

        event.prevent_default();
        if let Err(err) = self.dom.add_class(self.list_element, DROPPABLE_CLASS) {
            warn!(error = %err, "Could not highlight drop target");
        }
    }

    fn drop(&self, event: &mut Event) {
        event.prevent_default();
        self.clear_highlight();

        let payload = event
            .data_transfer
            .as_ref()
            .and_then(|transfer| transfer.get_data(TEXT_PLAIN))
            .map(str::to_string);

        match payload.as_deref().map(ProjectId::from_str) {
            Some(Ok(id)) => {
                self.store.move_project(id, self.status);
            }
            _ => debug!(?payload, "Ignoring drop without a project id"),
        }
    }

    fn drag_leave(&self, _event: &mut Event) {
        self.clear_highlight();
    }
}

/// Renders every project with one status and accepts drops of the others
pub struct ProjectList {
    state: Rc<ListState>,
}

impl ProjectList {
    pub fn new(
        dom: &Dom,
        store: &ProjectStore,
        config: &BoardConfig,
        list: &ListConfig,
    ) -> Result<Self> {
        let element_id = format!("{}-projects", list.status);
        let mounted = mount(
            dom,
            &config.list_template,
            &config.host_id,
            InsertPosition::BeforeEnd,
            Some(&element_id),
        )?;
        let list_element = require(dom, mounted.element, "ul")?;

        let project_list = Self {
            state: Rc::new(ListState {
                dom: dom.clone(),
                store: store.clone(),
                status: list.status,
                heading: list.heading(),
                item_template: config.item_template.clone(),
                element: mounted.element,
                list_element,
                assigned: RefCell::new(Vec::new()),
                items: RefCell::new(Vec::new()),
            }),
        };
        project_list.configure()?;
        project_list.render_content()?;

        // The store does not replay existing projects to new listeners
        project_list.state.apply_snapshot(&store.projects())?;
        Ok(project_list)
    }

    pub fn status(&self) -> ProjectStatus {
        self.state.status
    }

    /// The `ul` holding the rendered rows
    pub fn list_element(&self) -> NodeId {
        self.state.list_element
    }

    /// Projects currently shown, in store order
    pub fn projects(&self) -> Vec<Project> {
        self.state.assigned.borrow().clone()
    }

    /// Rendered rows, in the same order as [`ProjectList::projects`]
    pub fn items(&self) -> Vec<ProjectItem> {
        self.state.items.borrow().clone()
    }

    fn on_event(
        &self,
        kind: EventKind,
        handler: fn(&ListState, &mut Event),
    ) -> Result<()> {
        let weak: Weak<ListState> = Rc::downgrade(&self.state);
        self.state
            .dom
            .add_event_listener(self.state.element, kind, move |event| {
                if let Some(state) = weak.upgrade() {
                    handler(&state, event);
                }
            })
    }
}

impl Component for ProjectList {
    fn element(&self) -> NodeId {
        self.state.element
    }

    fn configure(&self) -> Result<()> {
        self.on_event(EventKind::DragOver, <ListState as DragTarget>::drag_over)?;
        self.on_event(EventKind::Drop, <ListState as DragTarget>::drop)?;
        self.on_event(EventKind::DragLeave, <ListState as DragTarget>::drag_leave)?;

        let weak = Rc::downgrade(&self.state);
        self.state.store.add_listener(move |projects| {
            if let Some(state) = weak.upgrade() {
                if let Err(err) = state.apply_snapshot(projects) {
                    error!(status = %state.status, error = %err, "Failed to render project list");
                }
            }
        });
        Ok(())
    }

    fn render_content(&self) -> Result<()> {
        let state = &self.state;
        state.dom.set_id(state.list_element, &state.list_id())?;
        let heading = require(&state.dom, state.element, "h2")?;
        state.dom.set_text(heading, &state.heading)?;
        Ok(())
    }
}
