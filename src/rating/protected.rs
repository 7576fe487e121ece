// Registry of file names exempt from deletion suggestions

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context;
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProtectedDocument {
    #[serde(default)]
    protected_files: Vec<String>,
    #[serde(default)]
    last_updated: String,
}

/// File names that must never appear in a deletion list.
#[derive(Debug, Clone, Default)]
pub struct ProtectedFiles {
    names: BTreeSet<String>,
}

impl ProtectedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Missing or malformed registries degrade to empty with a warning.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<ProtectedDocument>(&raw) {
                Ok(doc) => Self {
                    names: doc.protected_files.into_iter().collect(),
                },
                Err(e) => {
                    log::warn!(
                        "Ignoring malformed protected file registry {}: {}",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read protected file registry {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let doc = ProtectedDocument {
            protected_files: self.names.iter().cloned().collect(),
            last_updated: Local::now().to_rfc3339(),
        };
        let json = serde_json::to_string_pretty(&doc)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing protected file registry {}", path.display()))?;
        Ok(())
    }

    /// Returns false if the name was already protected.
    pub fn add(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    /// Returns false if the name was not protected.
    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn is_protected(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
