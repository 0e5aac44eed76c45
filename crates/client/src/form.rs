//! The create-project form.

use folio_core::project::{parse_modules_text, CreateProject, DEFAULT_AREA, DEFAULT_PROJECT_TYPE};

use crate::error::ClientResult;

/// Raw form input: module names are typed one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectForm {
    pub name: String,
    pub project_type: String,
    pub area: String,
    pub modules_text: String,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            project_type: DEFAULT_PROJECT_TYPE.to_string(),
            area: DEFAULT_AREA.to_string(),
            modules_text: String::new(),
        }
    }
}

impl ProjectForm {
    /// Build the request body. A blank name is rejected here, before any
    /// request is sent.
    pub fn to_request(&self) -> ClientResult<CreateProject> {
        let request = CreateProject {
            name: self.name.trim().to_string(),
            project_type: Some(self.project_type.clone()),
            area: Some(self.area.clone()),
            modules: Some(parse_modules_text(&self.modules_text)),
        };
        request.clone().validate()?;
        Ok(request)
    }

    /// Back to the blank form shown after a successful create.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
