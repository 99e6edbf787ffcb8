use crate::{
    components::{mount_into, require, Component, Draggable},
    dom::{DropEffect, Dom, Event, EventKind, InsertPosition, NodeId, TEXT_PLAIN},
    domain::Project,
    error::Result,
};
use std::rc::{Rc, Weak};
use tracing::debug;

struct ItemState {
    dom: Dom,
    element: NodeId,
    project: Project,
}

/// One rendered project row and drag source.
///
/// Handlers on the row hold only a weak reference, so the row stops reacting
/// to drags once every `ProjectItem` handle for it is dropped.
#[derive(Clone)]
pub struct ProjectItem {
    state: Rc<ItemState>,
}

impl ProjectItem {
    /// Appends a row for `project` to `host`, the list's `ul`
    pub fn new(dom: &Dom, template_id: &str, host: NodeId, project: Project) -> Result<Self> {
        let element_id = project.id.to_string();
        let mounted = mount_into(
            dom,
            template_id,
            host,
            InsertPosition::BeforeEnd,
            Some(&element_id),
        )?;

        let item = Self {
            state: Rc::new(ItemState {
                dom: dom.clone(),
                element: mounted.element,
                project,
            }),
        };
        item.configure()?;
        item.render_content()?;
        Ok(item)
    }

    pub fn project(&self) -> &Project {
        &self.state.project
    }

    pub fn person_count(&self) -> String {
        self.state.project.person_count()
    }

    fn on_event(&self, kind: EventKind, handler: fn(&ProjectItem, &mut Event)) -> Result<()> {
        let weak: Weak<ItemState> = Rc::downgrade(&self.state);
        self.state
            .dom
            .add_event_listener(self.state.element, kind, move |event| {
                if let Some(state) = weak.upgrade() {
                    handler(&ProjectItem { state }, event);
                }
            })
    }
}

impl Draggable for ProjectItem {
    fn drag_start(&self, event: &mut Event) {
        let id = self.state.project.id;
        if let Some(transfer) = event.data_transfer.as_mut() {
            transfer.set_data(TEXT_PLAIN, &id.to_string());
            transfer.effect_allowed = DropEffect::Move;
        }
        debug!(project_id = %id, "Drag started");
    }

    fn drag_end(&self, _event: &mut Event) {
        debug!(project_id = %self.state.project.id, "Drag ended");
    }
}

impl Component for ProjectItem {
    fn element(&self) -> NodeId {
        self.state.element
    }

    fn configure(&self) -> Result<()> {
        self.state.dom.set_draggable(self.state.element, true)?;
        self.on_event(EventKind::DragStart, ProjectItem::drag_start)?;
        self.on_event(EventKind::DragEnd, ProjectItem::drag_end)?;
        Ok(())
    }

    fn render_content(&self) -> Result<()> {
        let dom = &self.state.dom;
        let heading = require(dom, self.state.element, "h2")?;
        let assigned = require(dom, self.state.element, "h3")?;
        let body = require(dom, self.state.element, "p")?;

        dom.set_text(heading, &self.state.project.title)?;
        dom.set_text(assigned, &format!("{} assigned", self.person_count()))?;
        dom.set_text(body, &self.state.project.description)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dom::{DataTransfer, ElementSpec, Event},
        page,
    };

    fn list_document() -> Dom {
        let dom = Dom::new();
        let ul = dom.create_element("ul");
        dom.set_id(ul, "active-projects-list").unwrap();
        dom.append_child(dom.body(), ul).unwrap();
        dom.register_template("single-project", page::single_project_template());
        dom
    }

    fn list(dom: &Dom) -> NodeId {
        dom.get_element_by_id("active-projects-list").unwrap()
    }

    fn project(people: u32) -> Project {
        Project::new(
            "Build API".to_string(),
            "Implement REST endpoints".to_string(),
            people,
        )
    }

    fn text_of(dom: &Dom, item: &ProjectItem, selector: &str) -> String {
        dom.text(dom.query(item.element(), selector).unwrap()).unwrap()
    }

    #[test]
    fn test_render_content() {
        let dom = list_document();
        let item = ProjectItem::new(&dom, "single-project", list(&dom), project(3)).unwrap();

        assert_eq!(text_of(&dom, &item, "h2"), "Build API");
        assert_eq!(text_of(&dom, &item, "h3"), "3 people assigned");
        assert_eq!(text_of(&dom, &item, "p"), "Implement REST endpoints");
        assert!(dom.is_draggable(item.element()).unwrap());
        assert_eq!(
            dom.id_of(item.element()).unwrap(),
            Some(item.project().id.to_string())
        );
    }

    #[test]
    fn test_singular_person_phrase() {
        let dom = list_document();
        let item = ProjectItem::new(&dom, "single-project", list(&dom), project(1)).unwrap();
        assert_eq!(text_of(&dom, &item, "h3"), "1 person assigned");

        let item = ProjectItem::new(&dom, "single-project", list(&dom), project(5)).unwrap();
        assert_eq!(text_of(&dom, &item, "h3"), "5 people assigned");
    }

    #[test]
    fn test_items_append_in_order() {
        let dom = list_document();
        let ul = list(&dom);
        let a = ProjectItem::new(&dom, "single-project", list(&dom), project(1)).unwrap();
        let b = ProjectItem::new(&dom, "single-project", list(&dom), project(2)).unwrap();
        assert_eq!(dom.children(ul).unwrap(), vec![a.element(), b.element()]);
    }

    #[test]
    fn test_drag_start_carries_only_the_id() {
        let dom = list_document();
        let item = ProjectItem::new(&dom, "single-project", list(&dom), project(2)).unwrap();

        let mut event = Event::new(EventKind::DragStart).with_data_transfer(DataTransfer::new());
        dom.dispatch(item.element(), &mut event).unwrap();

        let transfer = event.data_transfer.unwrap();
        assert_eq!(transfer.types(), vec![TEXT_PLAIN]);
        assert_eq!(
            transfer.get_data(TEXT_PLAIN),
            Some(item.project().id.to_string().as_str())
        );
        assert_eq!(transfer.effect_allowed, DropEffect::Move);
    }

    #[test]
    fn test_drag_end_leaves_project_untouched() {
        let dom = list_document();
        let original = project(2);
        let item = ProjectItem::new(&dom, "single-project", list(&dom), original.clone()).unwrap();

        dom.dispatch(item.element(), &mut Event::new(EventKind::DragEnd))
            .unwrap();
        assert_eq!(item.project(), &original);
    }

    #[test]
    fn test_incomplete_template_is_an_error() {
        let dom = list_document();
        dom.register_template(
            "broken",
            ElementSpec::new("li").child(ElementSpec::new("h2")),
        );
        assert!(ProjectItem::new(&dom, "broken", list(&dom), project(2)).is_err());
    }

    #[test]
    fn test_drag_start_called_directly() {
        let dom = list_document();
        let item = ProjectItem::new(&dom, "single-project", list(&dom), project(2)).unwrap();

        let mut event = Event::new(EventKind::DragStart).with_data_transfer(DataTransfer::new());
        item.drag_start(&mut event);
        assert_eq!(
            event.data_transfer.unwrap().get_data(TEXT_PLAIN),
            Some(item.project().id.to_string().as_str())
        );
    }

    #[test]
    fn test_dropped_item_no_longer_fills_payload() {
        let dom = list_document();
        let item = ProjectItem::new(&dom, "single-project", list(&dom), project(2)).unwrap();
        let element = item.element();
        drop(item);

        let mut event = Event::new(EventKind::DragStart).with_data_transfer(DataTransfer::new());
        dom.dispatch(element, &mut event).unwrap();
        assert!(event.data_transfer.unwrap().types().is_empty());
    }

    #[test]
    fn test_rendering_does_not_need_host_id() {
        let dom = list_document();
        let anonymous = dom.create_element("ul");
        dom.append_child(dom.body(), anonymous).unwrap();

        let item = ProjectItem::new(&dom, "single-project", anonymous, project(2)).unwrap();
        assert_eq!(dom.children(anonymous).unwrap(), vec![item.element()]);
    }
}
