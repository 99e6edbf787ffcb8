pub mod project_store;

pub use project_store::{Listener, ProjectStore};
