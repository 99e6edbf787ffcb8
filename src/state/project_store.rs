use crate::domain::{Project, ProjectId, ProjectStatus};
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};
use tracing::debug;

/// Callback invoked with a snapshot of every project after each mutation
pub type Listener = Rc<dyn Fn(&[Project])>;

#[derive(Default)]
struct StoreState {
    projects: RefCell<Vec<Project>>,
    listeners: RefCell<Vec<Listener>>,
    notifying: Cell<bool>,
    pending: Cell<bool>,
}

/// Single source of truth for the board's projects.
///
/// Cloning yields another handle onto the same store. Projects are kept in
/// insertion order, listeners are never removed, and every mutation is
/// followed by a synchronous fan-out to all listeners carrying a copy of the
/// collection.
///
/// A mutation made by a listener during a fan-out does not start a nested
/// one. The running fan-out finishes, then a fresh round delivers the new
/// state to every listener, so the last snapshot each listener sees always
/// matches the store.
#[derive(Clone, Default)]
pub struct ProjectStore {
    state: Rc<StoreState>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. It is not called until the next mutation.
    pub fn add_listener(&self, listener: impl Fn(&[Project]) + 'static) {
        self.state.listeners.borrow_mut().push(Rc::new(listener));
        debug!(
            listeners = self.listener_count(),
            "Project store listener registered"
        );
    }

    /// Appends a new active project and notifies listeners. Never fails;
    /// callers validate beforehand.
    pub fn add_project(&self, title: &str, description: &str, people: u32) -> ProjectId {
        let project = Project::new(title.to_string(), description.to_string(), people);
        let id = project.id;
        debug!(project_id = %id, title = %project.title, people, "Adding project");

        self.state.projects.borrow_mut().push(project);
        self.notify();
        id
    }

    /// Moves a project to `new_status`.
    ///
    /// Returns true and notifies only when the status actually changed. An
    /// unknown id is a stale drag and is ignored.
    pub fn move_project(&self, id: ProjectId, new_status: ProjectStatus) -> bool {
        let mut projects = self.state.projects.borrow_mut();
        let Some(project) = projects.iter_mut().find(|p| p.id == id) else {
            debug!(project_id = %id, "Ignoring move of unknown project");
            return false;
        };
        let changed = project.set_status(new_status);
        drop(projects);

        if changed {
            debug!(project_id = %id, status = %new_status, "Project moved");
            self.notify();
        }
        changed
    }

    /// Snapshot of all projects in insertion order
    pub fn projects(&self) -> Vec<Project> {
        self.state.projects.borrow().clone()
    }

    pub fn get(&self, id: ProjectId) -> Option<Project> {
        self.state
            .projects
            .borrow()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.state.projects.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn listener_count(&self) -> usize {
        self.state.listeners.borrow().len()
    }

    fn notify(&self) {
        if self.state.notifying.replace(true) {
            self.state.pending.set(true);
            return;
        }

        loop {
            self.state.pending.set(false);

            // No borrow is held while listeners run
            let snapshot = self.projects();
            let listeners: Vec<Listener> = self.state.listeners.borrow().clone();

            debug!(
                projects = snapshot.len(),
                listeners = listeners.len(),
                "Notifying project listeners"
            );
            for listener in listeners {
                listener(&snapshot);
            }

            if !self.state.pending.get() {
                break;
            }
        }
        self.state.notifying.set(false);
    }
}
