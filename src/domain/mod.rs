pub mod board;
pub mod project;
pub mod validation;

pub use board::{BoardConfig, InputRules, ListConfig};
pub use project::{Project, ProjectId, ProjectStatus};
pub use validation::{validate, Validatable, ValidatableValue};
