//! The board's host page: the `#app` container and the three templates the
//! widgets are cloned from.

use crate::{
    dom::{Dom, ElementSpec},
    domain::BoardConfig,
    error::Result,
};

pub fn project_input_template() -> ElementSpec {
    let field = |label: &str, tag: &str, id: &str| {
        ElementSpec::new("div")
            .class("form-control")
            .child(ElementSpec::new("label").text(label))
            .child(ElementSpec::new(tag).id(id))
    };

    ElementSpec::new("form")
        .child(field("Title", "input", "title"))
        .child(field("Description", "textarea", "description"))
        .child(field("People", "input", "people"))
        .child(ElementSpec::new("button").text("ADD PROJECT"))
}

pub fn project_list_template() -> ElementSpec {
    ElementSpec::new("section")
        .class("projects")
        .child(ElementSpec::new("header").child(ElementSpec::new("h2")))
        .child(ElementSpec::new("ul"))
}

pub fn single_project_template() -> ElementSpec {
    ElementSpec::new("li")
        .child(ElementSpec::new("h2"))
        .child(ElementSpec::new("h3"))
        .child(ElementSpec::new("p"))
}

/// Registers the board templates under the ids named in `config`
pub fn register_templates(dom: &Dom, config: &BoardConfig) {
    dom.register_template(config.input_template.as_str(), project_input_template());
    dom.register_template(config.list_template.as_str(), project_list_template());
    dom.register_template(config.item_template.as_str(), single_project_template());
}

/// Builds a fresh document with the host container and templates in place
pub fn default_document(config: &BoardConfig) -> Result<Dom> {
    let dom = Dom::new();
    let host = dom.create_element("div");
    dom.set_id(host, &config.host_id)?;
    dom.append_child(dom.body(), host)?;
    register_templates(&dom, config);
    Ok(dom)
}
