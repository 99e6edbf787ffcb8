use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::error::ProjboardError;

/// Unique identifier for a project, carried as the drag payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for ProjectId {
    type Err = ProjboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| ProjboardError::InvalidProjectId(s.to_string()))
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Which list a project belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Finished,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ProjboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "finished" => Ok(Self::Finished),
            _ => Err(ProjboardError::InvalidStatus(s.to_string())),
        }
    }
}

/// A project on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    pub people: u32,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a new active project with a freshly generated id
    pub fn new(title: String, description: String, people: u32) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::generate(),
            title,
            description,
            people,
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the project to `status`. Returns false when it was already there.
    pub(crate) fn set_status(&mut self, status: ProjectStatus) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.updated_at = Utc::now();
        true
    }

    /// Headcount phrase, singular for exactly one person
    pub fn person_count(&self) -> String {
        if self.people == 1 {
            "1 person".to_string()
        } else {
            format!("{} people", self.people)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_project_is_active() {
        let project = Project::new("Title".to_string(), "Description".to_string(), 2);
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn test_project_ids_are_unique() {
        let a = ProjectId::generate();
        let b = ProjectId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_project_id_parsing() {
        let id = ProjectId::generate();
        let parsed = ProjectId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);

        assert!(ProjectId::from_str("not-an-id").is_err());
        assert!(ProjectId::from_str("").is_err());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(ProjectStatus::from_str("active").unwrap(), ProjectStatus::Active);
        assert_eq!(ProjectStatus::from_str("FINISHED").unwrap(), ProjectStatus::Finished);
        assert!(ProjectStatus::from_str("done").is_err());
    }

    #[test]
    fn test_set_status() {
        let mut project = Project::new("Title".to_string(), "Description".to_string(), 2);
        assert!(!project.set_status(ProjectStatus::Active));

        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(project.set_status(ProjectStatus::Finished));
        assert_eq!(project.status, ProjectStatus::Finished);
        assert!(project.updated_at > project.created_at);
    }

    #[test]
    fn test_person_count() {
        let mut project = Project::new("Title".to_string(), "Description".to_string(), 1);
        assert_eq!(project.person_count(), "1 person");

        project.people = 5;
        assert_eq!(project.person_count(), "5 people");
    }

    #[test]
    fn test_project_serialization() {
        let project = Project::new("Build API".to_string(), "REST endpoints".to_string(), 3);
        let json = serde_json::to_string(&project).unwrap();
        assert!(json.contains("\"status\":\"active\""));

        let deserialized: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, project);
    }
}
