//! Module keys: the derived identifier that completion flags and uploads
//! are stored under.
//!
//! A key is the pair `(project id, module slot)` rendered as
//! `"{project_id}-{slot}"`. The project with no named modules has a single
//! implicit slot rendered as `main`.
//!
//! Keys are a back-reference, not a foreign key. Renaming or removing a
//! module (or deleting its project) leaves every record stored under the
//! old key orphaned; nothing migrates or deletes them. A module literally
//! named `main` shares its key with the implicit slot of the same project.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::project::Project;
use crate::types::DbId;

/// Literal used for the implicit slot of a project without named modules.
pub const MAIN_SLOT: &str = "main";

/// Which module of a project a key points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleSlot {
    /// The single implicit module of a project whose `modules` list is empty.
    Main,
    /// A module by its display name.
    Named(String),
}

impl ModuleSlot {
    /// Parse a slot from its wire form. `"main"` always maps to [`ModuleSlot::Main`].
    pub fn from_name(name: &str) -> Self {
        if name == MAIN_SLOT {
            Self::Main
        } else {
            Self::Named(name.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Main => MAIN_SLOT,
            Self::Named(name) => name,
        }
    }
}

/// Composite `(project id, slot)` identifier for completion and upload records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleKey {
    pub project_id: DbId,
    pub slot: ModuleSlot,
}

impl ModuleKey {
    pub fn new(project_id: DbId, slot: ModuleSlot) -> Self {
        Self { project_id, slot }
    }

    pub fn main(project_id: DbId) -> Self {
        Self::new(project_id, ModuleSlot::Main)
    }

    /// Key for a module by display name. A module named `main` maps to the
    /// implicit slot.
    pub fn named(project_id: DbId, module: &str) -> Self {
        Self::new(project_id, ModuleSlot::from_name(module))
    }

    /// Parse and validate a key received from a client.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        raw.parse()
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.project_id, self.slot.as_str())
    }
}

impl FromStr for ModuleKey {
    type Err = CoreError;

    /// Split at the first `-`: the prefix is the project id, the remainder
    /// (which may itself contain dashes) is the slot.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (id, slot) = raw.split_once('-').ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid module key '{raw}': expected '<projectId>-<module>'"
            ))
        })?;

        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::Validation(format!(
                "Invalid module key '{raw}': project id must be a non-negative integer"
            )));
        }
        let project_id: DbId = id.parse().map_err(|_| {
            CoreError::Validation(format!("Invalid module key '{raw}': project id out of range"))
        })?;

        if slot.is_empty() {
            return Err(CoreError::Validation(format!(
                "Invalid module key '{raw}': module name is empty"
            )));
        }

        Ok(Self::new(project_id, ModuleSlot::from_name(slot)))
    }
}

impl Serialize for ModuleKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModuleKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Resolution against the current project list
// ---------------------------------------------------------------------------

/// The slots a project currently exposes, in display order.
///
/// An empty `modules` list yields exactly one slot, [`ModuleSlot::Main`].
pub fn project_slots(project: &Project) -> Vec<ModuleSlot> {
    if project.modules.is_empty() {
        vec![ModuleSlot::Main]
    } else {
        project
            .modules
            .iter()
            .map(|m| ModuleSlot::from_name(m))
            .collect()
    }
}

/// The keys a project currently exposes, in display order.
pub fn project_keys(project: &Project) -> Vec<ModuleKey> {
    project_slots(project)
        .into_iter()
        .map(|slot| ModuleKey::new(project.id, slot))
        .collect()
}

/// Find the project a key refers to, if the key still matches one of its slots.
///
/// Returns `None` for orphaned keys.
pub fn resolve<'a>(projects: &'a [Project], key: &ModuleKey) -> Option<&'a Project> {
    projects
        .iter()
        .find(|p| p.id == key.project_id)
        .filter(|p| project_slots(p).contains(&key.slot))
}

/// Keys (raw strings) that no longer correspond to any current project slot.
///
/// Unparseable keys count as orphans. Read-only: callers must not use this
/// to delete records automatically.
pub fn orphaned_keys<'a, I>(projects: &[Project], keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut orphans: Vec<String> = keys
        .into_iter()
        .filter(|raw| match ModuleKey::parse(raw) {
            Ok(key) => resolve(projects, &key).is_none(),
            Err(_) => true,
        })
        .map(str::to_string)
        .collect();
    orphans.sort();
    orphans
}
