use crate::{
    components::{mount, require, Component},
    dom::{Dom, Event, EventKind, InsertPosition, NodeId},
    domain::{validate, BoardConfig, InputRules, Validatable},
    error::Result,
    state::ProjectStore,
};
use std::rc::Rc;
use tracing::{debug, error, warn};

/// Message shown when a submission is rejected
pub const INVALID_INPUT_ALERT: &str = "Please enter valid values";

struct InputState {
    dom: Dom,
    store: ProjectStore,
    rules: InputRules,
    element: NodeId,
    title_input: NodeId,
    description_input: NodeId,
    people_input: NodeId,
}

impl InputState {
    /// Reads and validates the three fields. `None` when any field is invalid.
    fn gather_user_input(&self) -> Result<Option<(String, String, u32)>> {
        let entered_title = self.dom.value(self.title_input)?;
        let entered_description = self.dom.value(self.description_input)?;
        let entered_people = self.dom.value(self.people_input)?;

        let people = entered_people.trim().parse::<u32>().ok();

        let title_validatable = Validatable::text(entered_title.as_str()).required();
        let description_validatable = Validatable::text(entered_description.as_str())
            .required()
            .min_length(self.rules.description_min_length);
        let people_validatable = Validatable::number(people.map_or(f64::NAN, f64::from))
            .required()
            .min(f64::from(self.rules.people_min))
            .max(f64::from(self.rules.people_max));

        let all_valid = validate(&title_validatable)
            && validate(&description_validatable)
            && validate(&people_validatable);

        match (all_valid, people) {
            (true, Some(people)) => Ok(Some((entered_title, entered_description, people))),
            _ => Ok(None),
        }
    }

    fn clear_inputs(&self) -> Result<()> {
        for input in [self.title_input, self.description_input, self.people_input] {
            self.dom.set_value(input, "")?;
        }
        Ok(())
    }

    fn submit(&self) -> Result<bool> {
        match self.gather_user_input()? {
            Some((title, description, people)) => {
                self.store.add_project(&title, &description, people);
                self.clear_inputs()?;
                Ok(true)
            }
            None => {
                warn!("Rejected project submission with invalid values");
                self.dom.alert(INVALID_INPUT_ALERT);
                Ok(false)
            }
        }
    }

    fn submit_handler(&self, event: &mut Event) {
        event.prevent_default();
        match self.submit() {
            Ok(accepted) => debug!(accepted, "Project form submitted"),
            Err(err) => error!(error = %err, "Project form submission failed"),
        }
    }
}

/// The new-project form
pub struct ProjectInput {
    state: Rc<InputState>,
}

impl ProjectInput {
    pub fn new(dom: &Dom, store: &ProjectStore, config: &BoardConfig) -> Result<Self> {
        let mounted = mount(
            dom,
            &config.input_template,
            &config.host_id,
            InsertPosition::AfterBegin,
            Some("user-input"),
        )?;

        let input = Self {
            state: Rc::new(InputState {
                dom: dom.clone(),
                store: store.clone(),
                rules: config.input.clone(),
                element: mounted.element,
                title_input: require(dom, mounted.element, "#title")?,
                description_input: require(dom, mounted.element, "#description")?,
                people_input: require(dom, mounted.element, "#people")?,
            }),
        };
        input.configure()?;
        input.render_content()?;
        Ok(input)
    }

    /// Writes raw values into the three fields, as a user typing would
    pub fn fill(&self, title: &str, description: &str, people: &str) -> Result<()> {
        let state = &self.state;
        state.dom.set_value(state.title_input, title)?;
        state.dom.set_value(state.description_input, description)?;
        state.dom.set_value(state.people_input, people)?;
        Ok(())
    }

    /// Current raw values of the title, description and people fields
    pub fn values(&self) -> Result<(String, String, String)> {
        let state = &self.state;
        Ok((
            state.dom.value(state.title_input)?,
            state.dom.value(state.description_input)?,
            state.dom.value(state.people_input)?,
        ))
    }
}

impl Component for ProjectInput {
    fn element(&self) -> NodeId {
        self.state.element
    }

    fn configure(&self) -> Result<()> {
        let weak = Rc::downgrade(&self.state);
        self.state
            .dom
            .add_event_listener(self.state.element, EventKind::Submit, move |event| {
                if let Some(state) = weak.upgrade() {
                    state.submit_handler(event);
                }
            })
    }

    fn render_content(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::ProjectStatus, page};

    fn setup() -> (Dom, ProjectStore, ProjectInput) {
        let config = BoardConfig::default();
        let dom = page::default_document(&config).unwrap();
        let store = ProjectStore::new();
        let input = ProjectInput::new(&dom, &store, &config).unwrap();
        (dom, store, input)
    }

    fn submit(dom: &Dom, input: &ProjectInput) -> bool {
        dom.dispatch(input.element(), &mut Event::new(EventKind::Submit))
            .unwrap()
    }

    #[test]
    fn test_form_is_mounted_first() {
        let (dom, _, input) = setup();
        let host = dom.get_element_by_id("app").unwrap();
        assert_eq!(dom.children(host).unwrap().first(), Some(&input.element()));
        assert_eq!(dom.get_element_by_id("user-input"), Some(input.element()));
    }

    #[test]
    fn test_valid_submission_adds_project_and_clears_fields() {
        let (dom, store, input) = setup();
        input
            .fill("Build API", "Implement REST endpoints", "3")
            .unwrap();

        // the handler always prevents the browser's default submit
        assert!(!submit(&dom, &input));

        assert_eq!(store.len(), 1);
        let project = &store.projects()[0];
        assert_eq!(project.title, "Build API");
        assert_eq!(project.description, "Implement REST endpoints");
        assert_eq!(project.people, 3);
        assert_eq!(project.status, ProjectStatus::Active);

        let empty = (String::new(), String::new(), String::new());
        assert_eq!(input.values().unwrap(), empty);
        assert!(dom.alerts().is_empty());
    }

    #[test]
    fn test_short_description_is_rejected() {
        let (dom, store, input) = setup();
        input.fill("Build API", "hi", "3").unwrap();
        submit(&dom, &input);

        assert!(store.is_empty());
        assert_eq!(dom.alerts(), vec![INVALID_INPUT_ALERT.to_string()]);
        assert_eq!(
            input.values().unwrap(),
            ("Build API".to_string(), "hi".to_string(), "3".to_string())
        );
    }

    #[test]
    fn test_any_single_invalid_field_rejects() {
        let cases = [
            ("", "Implement REST endpoints", "3"),
            ("Build API", "", "3"),
            ("Build API", "Implement REST endpoints", "0"),
            ("Build API", "Implement REST endpoints", "7"),
            ("Build API", "Implement REST endpoints", ""),
            ("Build API", "Implement REST endpoints", "two"),
            ("Build API", "Implement REST endpoints", "2.5"),
        ];

        for (title, description, people) in cases {
            let (dom, store, input) = setup();
            input.fill(title, description, people).unwrap();
            submit(&dom, &input);
            assert!(
                store.is_empty(),
                "accepted {:?}",
                (title, description, people)
            );
            assert_eq!(dom.alerts().len(), 1);
        }
    }

    #[test]
    fn test_two_invalid_fields_are_still_rejected() {
        let (dom, store, input) = setup();
        input.fill("", "hi", "3").unwrap();
        submit(&dom, &input);
        assert!(store.is_empty());

        input.fill("Build API", "hi", "9").unwrap();
        submit(&dom, &input);
        assert!(store.is_empty());
        assert_eq!(dom.alerts().len(), 2);
    }

    #[test]
    fn test_people_bounds_are_inclusive() {
        let (dom, store, input) = setup();
        for people in ["1", "6", " 4 "] {
            input.fill("Build API", "Implement REST endpoints", people).unwrap();
            submit(&dom, &input);
        }
        let counts: Vec<u32> = store.projects().iter().map(|p| p.people).collect();
        assert_eq!(counts, vec![1, 6, 4]);
    }

    #[test]
    fn test_configured_rules_apply() {
        let mut config = BoardConfig::default();
        config.input.description_min_length = 10;
        config.input.people_max = 2;
        let dom = page::default_document(&config).unwrap();
        let store = ProjectStore::new();
        let input = ProjectInput::new(&dom, &store, &config).unwrap();

        input.fill("Build API", "too short", "2").unwrap();
        submit(&dom, &input);
        input.fill("Build API", "long enough text", "3").unwrap();
        submit(&dom, &input);
        assert!(store.is_empty());

        input.fill("Build API", "long enough text", "2").unwrap();
        submit(&dom, &input);
        assert_eq!(store.len(), 1);
    }
}
