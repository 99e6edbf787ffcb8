use crate::{
    domain::project::ProjectStatus,
    error::{ProjboardError, Result},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};

/// Configuration for one project list on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ListConfig {
    pub fn new(status: ProjectStatus) -> Self {
        Self {
            status,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Header text shown above the list
    pub fn heading(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("{} PROJECTS", self.status.as_str().to_uppercase()))
    }
}

/// Limits applied to the new-project form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputRules {
    pub description_min_length: usize,
    pub people_min: u32,
    pub people_max: u32,
}

impl Default for InputRules {
    fn default() -> Self {
        Self {
            description_min_length: 5,
            people_min: 1,
            people_max: 6,
        }
    }
}

/// Board configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub name: String,
    pub host_id: String,
    pub input_template: String,
    pub list_template: String,
    pub item_template: String,
    pub lists: Vec<ListConfig>,
    pub input: InputRules,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            name: "Project Board".to_string(),
            host_id: "app".to_string(),
            input_template: "project-input".to_string(),
            list_template: "project-list".to_string(),
            item_template: "single-project".to_string(),
            lists: vec![
                ListConfig::new(ProjectStatus::Active),
                ListConfig::new(ProjectStatus::Finished),
            ],
            input: InputRules::default(),
        }
    }
}

impl BoardConfig {
    /// Parses and validates a JSON configuration. Missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Rejects configurations the board cannot be mounted with
    pub fn validate(&self) -> Result<()> {
        if self.host_id.trim().is_empty() {
            return Err(ProjboardError::ConfigError("host_id is empty".to_string()));
        }
        if self.lists.is_empty() {
            return Err(ProjboardError::ConfigError(
                "at least one list is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for list in &self.lists {
            if !seen.insert(list.status) {
                return Err(ProjboardError::ConfigError(format!(
                    "duplicate list for status {}",
                    list.status
                )));
            }
        }

        if self.input.people_min > self.input.people_max {
            return Err(ProjboardError::ConfigError(format!(
                "people_min {} exceeds people_max {}",
                self.input.people_min, self.input.people_max
            )));
        }

        Ok(())
    }

    /// Gets the list configuration for a status
    pub fn list_for_status(&self, status: ProjectStatus) -> Option<&ListConfig> {
        self.lists.iter().find(|list| list.status == status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = BoardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lists.len(), 2);
        assert_eq!(config.lists[0].status, ProjectStatus::Active);
        assert_eq!(config.input.description_min_length, 5);
    }

    #[test]
    fn test_list_heading() {
        assert_eq!(
            ListConfig::new(ProjectStatus::Active).heading(),
            "ACTIVE PROJECTS"
        );
        assert_eq!(
            ListConfig::new(ProjectStatus::Finished)
                .with_title("Done")
                .heading(),
            "Done"
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = BoardConfig::from_json_str(r#"{"name": "Sprint 4"}"#).unwrap();
        assert_eq!(config.name, "Sprint 4");
        assert_eq!(config.host_id, "app");
        assert_eq!(config.input, InputRules::default());
    }

    #[test]
    fn test_duplicate_lists_rejected() {
        let json = r#"{"lists": [{"status": "active"}, {"status": "active"}]}"#;
        assert!(matches!(
            BoardConfig::from_json_str(json),
            Err(ProjboardError::ConfigError(_))
        ));
    }

    #[test]
    fn test_empty_lists_rejected() {
        assert!(BoardConfig::from_json_str(r#"{"lists": []}"#).is_err());
    }

    #[test]
    fn test_inverted_people_bounds_rejected() {
        let json = r#"{"input": {"people_min": 4, "people_max": 2}}"#;
        assert!(BoardConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"lists": [{{"status": "finished", "title": "Shipped"}}]}}"#
        )
        .unwrap();

        let config = BoardConfig::load(file.path()).unwrap();
        let list = config.list_for_status(ProjectStatus::Finished).unwrap();
        assert_eq!(list.heading(), "Shipped");
        assert!(config.list_for_status(ProjectStatus::Active).is_none());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            BoardConfig::load("/nonexistent/board.json"),
            Err(ProjboardError::IoError(_))
        ));
    }
}
