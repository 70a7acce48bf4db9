//! The fixed role table mapping symbolic names to ports and model names.

use std::collections::HashSet;

use thiserror::Error;

/// Attributes of a single role: the port its server listens on and the
/// model the role is expected to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleSpec {
    pub port: u32,
    pub model: String,
}

impl RoleSpec {
    pub fn new(port: u32, model: impl Into<String>) -> Self {
        Self {
            port,
            model: model.into(),
        }
    }
}

/// One row of a [`RoleTable`] before validation.
#[derive(Clone, Debug)]
pub struct RoleEntry {
    pub name: String,
    pub spec: RoleSpec,
}

impl RoleEntry {
    pub fn new(name: impl Into<String>, port: u32, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spec: RoleSpec::new(port, model),
        }
    }
}

/// Errors detected while constructing a [`RoleTable`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleTableError {
    #[error("role {0:?} appears more than once")]
    DuplicateRole(String),
    #[error("port {0} is assigned to more than one role")]
    DuplicatePort(u32),
}

/// Immutable mapping of role name to [`RoleSpec`], built once at startup
/// and handed to the registry. Iteration preserves insertion order.
#[derive(Clone, Debug, Default)]
pub struct RoleTable {
    entries: Vec<RoleEntry>,
}

impl RoleTable {
    /// Validate and build a table. Role names and ports must be unique.
    pub fn from_entries(entries: Vec<RoleEntry>) -> Result<Self, RoleTableError> {
        let mut names = HashSet::new();
        let mut ports = HashSet::new();
        for entry in &entries {
            if !names.insert(entry.name.clone()) {
                return Err(RoleTableError::DuplicateRole(entry.name.clone()));
            }
            if !ports.insert(entry.spec.port) {
                return Err(RoleTableError::DuplicatePort(entry.spec.port));
            }
        }
        Ok(Self { entries })
    }

    /// The stock four-role table: a fast general model, a reasoning model,
    /// and two coding models.
    pub fn standard() -> Self {
        Self::from_entries(vec![
            RoleEntry::new("granite", 55077, "granite4"),
            RoleEntry::new("think", 55088, "deepseek-r1"),
            RoleEntry::new("qwen", 66044, "qwen2.5-coder"),
            RoleEntry::new("code", 66033, "codellama"),
        ])
        .expect("standard table has unique names and ports")
    }

    /// Look up a role by name. Absence is a normal outcome, not an error.
    pub fn get(&self, role: &str) -> Option<&RoleSpec> {
        self.entries
            .iter()
            .find(|e| e.name == role)
            .map(|e| &e.spec)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
