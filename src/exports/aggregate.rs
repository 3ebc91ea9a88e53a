//! Provenance aggregation.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

use crate::module::ModuleId;

use super::classify::DeclarationKind;

/// Declaration kind of a symbol, once its declaration has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Declared(DeclarationKind),
    Unknown,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Declared(kind) => kind.as_str(),
            SymbolKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<Option<DeclarationKind>> for SymbolKind {
    fn from(kind: Option<DeclarationKind>) -> Self {
        kind.map_or(SymbolKind::Unknown, SymbolKind::Declared)
    }
}

/// Where an exported symbol comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvenanceRecord {
    /// The module visited last for this symbol.
    pub original_location: ModuleId,
    /// Every module that forwarded or declared the symbol, in first-visit
    /// order.
    pub re_export_path: IndexSet<ModuleId>,
    pub kind: SymbolKind,
}

impl ProvenanceRecord {
    fn new(module: &ModuleId, kind: Option<DeclarationKind>) -> Self {
        let mut re_export_path = IndexSet::new();
        re_export_path.insert(module.clone());
        ProvenanceRecord {
            original_location: module.clone(),
            re_export_path,
            kind: kind.into(),
        }
    }
}

/// Symbol name to provenance, accumulated over one walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProvenanceMap {
    records: IndexMap<String, ProvenanceRecord>,
}

impl ProvenanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `name` was seen in `module`.
    ///
    /// The latest call always moves `original_location`; `module` joins the
    /// path only once; `kind` is only ever replaced by a known kind.
    pub fn record(&mut self, name: &str, module: &ModuleId, kind: Option<DeclarationKind>) {
        match self.records.get_mut(name) {
            None => {
                self.records
                    .insert(name.to_string(), ProvenanceRecord::new(module, kind));
            }
            Some(record) => {
                record.original_location = module.clone();
                record.re_export_path.insert(module.clone());
                if let Some(kind) = kind {
                    record.kind = SymbolKind::Declared(kind);
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&ProvenanceRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProvenanceRecord)> {
        self.records.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Recorded names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}
