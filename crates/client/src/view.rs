//! Row view-model for the collapsible project list.

use folio_core::module_key::{project_slots, ModuleKey, ModuleSlot};
use folio_core::project::Project;
use folio_core::upload::UploadView;

/// One project line plus, when expanded, its module rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRow {
    pub project: Project,
    pub expanded: bool,
    pub progress: u32,
    pub completed_modules: usize,
    pub total_modules: usize,
    /// Empty unless `expanded`.
    pub modules: Vec<ModuleRow>,
}

/// One module of an expanded project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRow {
    pub key: ModuleKey,
    /// Module name, or the project name for the implicit `main` slot.
    pub label: String,
    /// Whether this is the implicit slot of a project without named modules.
    pub is_main: bool,
    pub completed: bool,
    pub upload: Option<UploadView>,
}

impl ModuleRow {
    pub(crate) fn build(
        project: &Project,
        is_completed: impl Fn(&str) -> bool,
        upload_for: impl Fn(&str) -> Option<UploadView>,
    ) -> Vec<Self> {
        let implicit = project.modules.is_empty();
        project_slots(project)
            .into_iter()
            .map(|slot| {
                let label = match (&slot, implicit) {
                    (ModuleSlot::Main, true) => project.name.clone(),
                    _ => slot.as_str().to_string(),
                };
                let key = ModuleKey::new(project.id, slot);
                let wire = key.to_string();
                Self {
                    completed: is_completed(&wire),
                    upload: upload_for(&wire),
                    label,
                    is_main: implicit,
                    key,
                }
            })
            .collect()
    }
}
