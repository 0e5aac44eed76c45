//! Derived progress metrics.
//!
//! Pure functions of the current project list and completion map. Nothing
//! here is stored: callers recompute on every render.

use std::collections::{BTreeMap, HashMap};

use crate::module_key::project_keys;
use crate::project::Project;

/// Read access to completion flags by wire-form module key.
pub trait CompletionLookup {
    fn is_completed(&self, module_key: &str) -> bool;

    /// Number of keys currently flagged `true`, whether or not they still
    /// match a project slot.
    fn completed_count(&self) -> usize;
}

impl CompletionLookup for HashMap<String, bool> {
    fn is_completed(&self, module_key: &str) -> bool {
        self.get(module_key).copied().unwrap_or(false)
    }

    fn completed_count(&self) -> usize {
        self.values().filter(|done| **done).count()
    }
}

impl CompletionLookup for BTreeMap<String, bool> {
    fn is_completed(&self, module_key: &str) -> bool {
        self.get(module_key).copied().unwrap_or(false)
    }

    fn completed_count(&self) -> usize {
        self.values().filter(|done| **done).count()
    }
}

/// Number of completed slots of `project`.
pub fn completed_module_count<C: CompletionLookup>(project: &Project, completed: &C) -> usize {
    project_keys(project)
        .iter()
        .filter(|key| completed.is_completed(&key.to_string()))
        .count()
}

/// Completion percentage of one project, rounded half up.
///
/// A project without named modules counts as one module, keyed by its
/// implicit `main` slot: 100 when that key is completed, else 0.
pub fn project_progress<C: CompletionLookup>(project: &Project, completed: &C) -> u32 {
    percent(completed_module_count(project, completed), project.module_count())
}

/// Completion percentage across all projects, rounded half up.
///
/// `completed keys / sum(max(1, module count))`. Every `true` flag counts,
/// including flags left behind by renamed modules or deleted projects, so
/// the result can exceed 100. Returns 0 for an empty project list.
pub fn total_progress<C: CompletionLookup>(projects: &[Project], completed: &C) -> u32 {
    if projects.is_empty() {
        return 0;
    }
    let total: usize = projects.iter().map(Project::module_count).sum();
    percent(completed.completed_count(), total)
}

/// Headline numbers shown beside the project list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub projects: usize,
    pub completed_modules: usize,
    pub total_modules: usize,
    pub uploads: usize,
    pub progress: u32,
}

/// Compute the summary. `upload_keys` are the keys that currently have an
/// upload. Flags and uploads are counted as stored, orphans included.
pub fn summary<'a, C, I>(projects: &[Project], completed: &C, upload_keys: I) -> Summary
where
    C: CompletionLookup,
    I: IntoIterator<Item = &'a str>,
{
    Summary {
        projects: projects.len(),
        completed_modules: completed.completed_count(),
        total_modules: projects.iter().map(Project::module_count).sum(),
        uploads: upload_keys.into_iter().count(),
        progress: total_progress(projects, completed),
    }
}

/// `round(100 * part / whole)`, halves rounded up; 0 when `whole` is 0.
fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((200 * part + whole) / (2 * whole)) as u32
}
