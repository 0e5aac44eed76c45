//! Project entity, creation DTO and its validation rules.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Area assigned when the client omits one or sends a blank value.
pub const DEFAULT_AREA: &str = "Sistemas";

/// Type assigned when the client omits one.
pub const DEFAULT_PROJECT_TYPE: &str = "REPORTE";

/// Project types offered by the client form. Advisory only: the server
/// accepts any non-blank string.
pub const KNOWN_PROJECT_TYPES: &[&str] = &["REPORTE", "SISTEMA", "WEB APP"];

/// Areas offered by the client form. Advisory only.
pub const KNOWN_AREAS: &[&str] = &["Sistemas", "Analistas", "Soporte", "Desarrollo", "Auxiliares"];

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A tracked project with its ordered module names.
///
/// Projects are never updated in place: they are created and deleted only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type", default = "default_project_type")]
    pub project_type: String,
    #[serde(default = "default_area")]
    pub area: String,
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<Timestamp>,
}

impl Project {
    /// Number of modules used for progress math: an empty list counts as one.
    pub fn module_count(&self) -> usize {
        self.modules.len().max(1)
    }
}

fn default_area() -> String {
    DEFAULT_AREA.to_string()
}

fn default_project_type() -> String {
    DEFAULT_PROJECT_TYPE.to_string()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// Request body for creating a project. Everything but `name` is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProject {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<String>>,
}

/// A validated [`CreateProject`] with every default applied. Stores only
/// ever receive this form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub project_type: String,
    pub area: String,
    pub modules: Vec<String>,
}

impl CreateProject {
    /// Apply defaults and reject a blank name.
    ///
    /// - `name` is trimmed and must be non-empty.
    /// - `type` defaults to [`DEFAULT_PROJECT_TYPE`] when absent or blank.
    /// - `area` defaults to [`DEFAULT_AREA`] when absent or blank.
    /// - `modules` are trimmed; blank entries are dropped.
    pub fn validate(self) -> Result<NewProject, CoreError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::Validation("Project name must not be empty".into()));
        }

        let project_type = non_blank(self.project_type).unwrap_or_else(default_project_type);
        let area = non_blank(self.area).unwrap_or_else(default_area);
        let modules = normalize_modules(self.modules.unwrap_or_default());

        Ok(NewProject {
            name,
            project_type,
            area,
            modules,
        })
    }
}

impl NewProject {
    /// Materialize the project under an id assigned by the store.
    pub fn into_project(self, id: DbId, created_at: Option<Timestamp>) -> Project {
        Project {
            id,
            name: self.name,
            project_type: self.project_type,
            area: self.area,
            modules: self.modules,
            created_at,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim module names and drop blank ones, preserving order.
pub fn normalize_modules<I, S>(modules: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    modules
        .into_iter()
        .map(|m| m.as_ref().trim().to_string())
        .filter(|m| !m.is_empty())
        .collect()
}

/// Parse the "one module per line" text the client form collects.
pub fn parse_modules_text(text: &str) -> Vec<String> {
    normalize_modules(text.lines())
}

/// Id the file-backed store assigns next: one past the largest existing id,
/// so an empty collection starts (again) at 1.
pub fn next_project_id(projects: &[Project]) -> DbId {
    projects.iter().map(|p| p.id).max().unwrap_or(0) + 1
}
