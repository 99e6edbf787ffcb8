//! Composition root: owns the store and mounts every widget onto a document.

use crate::{
    components::{Component, ProjectInput, ProjectList},
    dom::{Dom, Event, EventKind},
    domain::{BoardConfig, Project, ProjectId, ProjectStatus},
    error::{ProjboardError, Result},
    page,
    state::ProjectStore,
};
use std::fmt;
use tracing::info;

pub struct App {
    dom: Dom,
    store: ProjectStore,
    config: BoardConfig,
    input: ProjectInput,
    lists: Vec<ProjectList>,
}

impl App {
    /// Mounts the board onto an existing document that already holds the
    /// host container and templates named in `config`.
    pub fn mount(dom: Dom, config: BoardConfig) -> Result<Self> {
        config.validate()?;

        let store = ProjectStore::new();
        let input = ProjectInput::new(&dom, &store, &config)?;
        let lists = config
            .lists
            .iter()
            .map(|list| ProjectList::new(&dom, &store, &config, list))
            .collect::<Result<Vec<_>>>()?;

        info!(board = %config.name, lists = lists.len(), "Board mounted");
        Ok(Self {
            dom,
            store,
            config,
            input,
            lists,
        })
    }

    /// Mounts the board onto a fresh default page
    pub fn with_default_page(config: BoardConfig) -> Result<Self> {
        let dom = page::default_document(&config)?;
        Self::mount(dom, config)
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn input(&self) -> &ProjectInput {
        &self.input
    }

    pub fn lists(&self) -> &[ProjectList] {
        &self.lists
    }

    pub fn list(&self, status: ProjectStatus) -> Option<&ProjectList> {
        self.lists.iter().find(|list| list.status() == status)
    }

    /// Types the values into the form and submits it. Returns whether a
    /// project was added.
    pub fn submit_project(&self, title: &str, description: &str, people: &str) -> Result<bool> {
        let before = self.store.len();
        self.input.fill(title, description, people)?;
        self.dom
            .dispatch(self.input.element(), &mut Event::new(EventKind::Submit))?;
        Ok(self.store.len() > before)
    }

    /// Drags the rendered row of `id` onto the list for `to`. Returns whether
    /// the target list accepted the drop.
    pub fn drag_project(&self, id: ProjectId, to: ProjectStatus) -> Result<bool> {
        let source = self
            .dom
            .get_element_by_id(&id.to_string())
            .ok_or_else(|| ProjboardError::MissingElement(format!("#{}", id)))?;
        let target = self
            .list(to)
            .ok_or_else(|| ProjboardError::MissingElement(format!("{}-projects", to)))?;
        self.dom.drag_and_drop(source, target.element())
    }

    /// Finds a project whose id starts with `prefix`. Ambiguous prefixes
    /// match nothing.
    pub fn resolve_project(&self, prefix: &str) -> Option<Project> {
        let prefix = prefix.trim().to_lowercase();
        if prefix.is_empty() {
            return None;
        }
        let mut matches = self
            .store
            .projects()
            .into_iter()
            .filter(|p| p.id.to_string().starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(project), None) => Some(project),
            _ => None,
        }
    }

    /// Plain-text rendering of every list as currently shown in the document
    pub fn render_text(&self) -> Result<String> {
        let mut out = String::new();
        self.write_text(&mut out)?;
        Ok(out)
    }

    /// Writes [`App::render_text`] into `out`, failing if the writer does
    pub fn write_text(&self, out: &mut impl fmt::Write) -> Result<()> {
        for list in &self.lists {
            let heading = self
                .dom
                .query(list.element(), "h2")
                .map(|node| self.dom.text(node))
                .transpose()?
                .unwrap_or_default();
            writeln!(out, "{}", heading)?;

            let rows = self.dom.children(list.list_element())?;
            if rows.is_empty() {
                writeln!(out, "  (empty)")?;
            }
            for row in rows {
                let id = self.dom.id_of(row)?.unwrap_or_default();
                let short_id: String = id.chars().take(8).collect();
                let field = |selector: &str| -> Result<String> {
                    match self.dom.query(row, selector) {
                        Some(node) => self.dom.text(node),
                        None => Ok(String::new()),
                    }
                };
                writeln!(
                    out,
                    "  [{}] {} ({}): {}",
                    short_id,
                    field("h2")?,
                    field("h3")?,
                    field("p")?
                )?;
            }
        }
        Ok(())
    }
}
