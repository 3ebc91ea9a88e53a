//! Serializable view of a provenance map.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::exports::ProvenanceMap;

/// Provenance of one exported name, with module paths relative to the
/// report root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEntry {
    pub original_location: String,
    pub re_export_path: Vec<String>,
    pub kind: String,
}

/// All exported names, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportReport {
    entries: BTreeMap<String, ExportEntry>,
}

impl ExportReport {
    pub fn new(map: &ProvenanceMap, root: &Path) -> Self {
        let entries = map
            .iter()
            .map(|(name, record)| {
                let entry = ExportEntry {
                    original_location: record.original_location.display_relative(root),
                    re_export_path: record
                        .re_export_path
                        .iter()
                        .map(|module| module.display_relative(root))
                        .collect(),
                    kind: record.kind.to_string(),
                };
                (name.to_string(), entry)
            })
            .collect();
        ExportReport { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ExportEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), ExportError> {
        let mut json = self.to_json_pretty()?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }
}
