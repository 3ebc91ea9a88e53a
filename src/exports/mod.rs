//! Export-provenance resolution.
//!
//! Starting from an entry module, the walker follows re-export edges through
//! the module graph and records, for every name the entry module exposes,
//! where it is declared and which modules forwarded it.

pub mod aggregate;
pub mod classify;
pub mod filter;
pub mod target;
pub mod walker;

pub use aggregate::{ProvenanceMap, ProvenanceRecord, SymbolKind};
pub use classify::{classify, DeclarationKind, ExportBinding, ExportStatement};
pub use filter::{EdgeNames, EntryExportSurface, VisibilityFilter};
pub use target::{resolve_target, strip_quotes, Forwarded, ReExportTarget};
pub use walker::{ExportWalker, VisitContext, WalkStats};
