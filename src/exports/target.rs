//! Re-export target resolution.

use indexmap::IndexSet;

use crate::module::{ModuleId, ModuleResolver, SymbolTable};

use super::classify::{ExportBinding, ExportStatement};

/// Remove the delimiters around a module specifier as written in source.
pub fn strip_quotes(raw: &str) -> &str {
    raw.trim_matches(|c| matches!(c, '\'' | '"' | '`'))
}

/// The names a re-export statement forwards from its target.
#[derive(Debug, Clone, PartialEq)]
pub enum Forwarded {
    /// An explicit clause: `export { a, b as c } from './m'`.
    Named(Vec<ExportBinding>),
    /// The target's whole surface, minus `default`.
    All(IndexSet<String>),
    /// `export * as ns from './m'` forwards only `ns`.
    Namespace(String),
}

impl Forwarded {
    /// Names as seen by importers of the re-exporting module.
    pub fn exported_names(&self) -> Vec<&str> {
        match self {
            Forwarded::Named(bindings) => bindings
                .iter()
                .map(|b| b.exported_name.as_str())
                .collect(),
            Forwarded::All(names) => names.iter().map(String::as_str).collect(),
            Forwarded::Namespace(name) => vec![name.as_str()],
        }
    }
}

/// A resolved re-export.
#[derive(Debug, Clone, PartialEq)]
pub struct ReExportTarget {
    pub module: ModuleId,
    pub forwarded: Forwarded,
}

/// Resolve the module a re-export statement points at and the names it
/// forwards. Returns `None` for statements without a module specifier and
/// for specifiers that do not resolve; the latter are logged.
pub fn resolve_target<H>(
    stmt: &ExportStatement,
    from: &ModuleId,
    host: &mut H,
) -> Option<ReExportTarget>
where
    H: ModuleResolver + SymbolTable + ?Sized,
{
    let target = lookup_target(stmt, from, host);
    if target.is_none() {
        if let Some(source) = stmt.source() {
            let specifier = strip_quotes(&source.raw);
            tracing::warn!(specifier, module = %from, "cannot resolve re-exported module");
        }
    }
    target
}

/// [`resolve_target`] without logging.
pub(crate) fn lookup_target<H>(
    stmt: &ExportStatement,
    from: &ModuleId,
    host: &mut H,
) -> Option<ReExportTarget>
where
    H: ModuleResolver + SymbolTable + ?Sized,
{
    let source = stmt.source()?;
    let module = host.resolve_module(strip_quotes(&source.raw), from)?;

    let forwarded = match stmt {
        ExportStatement::NamedReExport { bindings, .. } => Forwarded::Named(bindings.clone()),
        ExportStatement::WildcardReExport { .. } => {
            let mut names = host.export_surface_of(&module);
            names.shift_remove("default");
            Forwarded::All(names)
        }
        ExportStatement::NamespaceReExport { exported_name, .. } => {
            Forwarded::Namespace(exported_name.clone())
        }
        ExportStatement::InlineDeclaration { .. } => return None,
    };

    Some(ReExportTarget { module, forwarded })
}
