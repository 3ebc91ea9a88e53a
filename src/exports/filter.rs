//! Visibility filtering.
//!
//! A name found below the entry module is only recorded when the entry module
//! exposes it, and when every re-export edge on the way down lets it through.

use indexmap::{IndexMap, IndexSet};

use crate::ast::Program;
use crate::module::{ModuleId, ModuleResolver, SymbolTable};

use super::classify::{classify, ExportBinding, ExportStatement};
use super::target::{lookup_target, strip_quotes};

/// The names the entry module re-exports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryExportSurface {
    names: IndexSet<String>,
}

impl EntryExportSurface {
    /// Union of the names forwarded by every re-export of the entry module:
    /// export clause names (exported side), namespace names, and the
    /// surfaces of wildcard targets.
    pub fn compute<H>(entry: &ModuleId, program: &Program, host: &mut H) -> Self
    where
        H: ModuleResolver + SymbolTable + ?Sized,
    {
        let mut names = IndexSet::new();
        for stmt in &program.statements {
            let export = match classify(stmt) {
                Some(export) => export,
                None => continue,
            };
            match &export {
                ExportStatement::InlineDeclaration { .. } => {}
                ExportStatement::NamedReExport { bindings, .. } => {
                    names.extend(bindings.iter().map(|b| b.exported_name.clone()));
                }
                ExportStatement::NamespaceReExport { exported_name, .. } => {
                    names.insert(exported_name.clone());
                }
                ExportStatement::WildcardReExport { source } => {
                    // The walker resolves this edge again and reports it there.
                    match lookup_target(&export, entry, host) {
                        Some(target) => {
                            let forwarded = target.forwarded.exported_names();
                            names.extend(forwarded.into_iter().map(String::from));
                        }
                        None => tracing::debug!(
                            specifier = strip_quotes(&source.raw),
                            "entry wildcard target unresolved"
                        ),
                    }
                }
            }
        }
        EntryExportSurface { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for EntryExportSurface {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        EntryExportSurface {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Restrictions accumulated along the re-export edges from the entry module
/// down to the module being visited.
///
/// `renames` maps a name as declared in the current module to the name the
/// entry module exposes it under; `None` means every name passes unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeNames {
    renames: Option<IndexMap<String, String>>,
    via_wildcard: bool,
}

impl EdgeNames {
    /// No restriction: the entry module, or a module reached only through
    /// wildcards from it.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// The entry-facing name of `name`, or `None` if the edge blocks it.
    pub fn admit<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.via_wildcard && name == "default" {
            return None;
        }
        match &self.renames {
            None => Some(name),
            Some(renames) => renames.get(name).map(String::as_str),
        }
    }

    /// Edge into the target of `export { local as exported } from '...'`.
    pub fn through_named(&self, bindings: &[ExportBinding]) -> Self {
        let renames = bindings
            .iter()
            .filter_map(|binding| {
                self.admit(&binding.exported_name)
                    .map(|facing| (binding.local_name.clone(), facing.to_string()))
            })
            .collect();
        EdgeNames {
            renames: Some(renames),
            via_wildcard: false,
        }
    }

    /// Edge into the target of `export * from '...'`.
    pub fn through_wildcard(&self) -> Self {
        EdgeNames {
            renames: self.renames.clone(),
            via_wildcard: true,
        }
    }

    /// Nothing can pass this edge.
    pub fn is_closed(&self) -> bool {
        matches!(&self.renames, Some(renames) if renames.is_empty())
    }
}

/// Decides whether a name seen during the walk is recorded, and under which
/// name.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityFilter<'s> {
    surface: &'s EntryExportSurface,
}

impl<'s> VisibilityFilter<'s> {
    pub fn new(surface: &'s EntryExportSurface) -> Self {
        VisibilityFilter { surface }
    }

    /// Everything in the entry module is admitted. Elsewhere a name must pass
    /// the edge restrictions and be part of the entry surface.
    pub fn admit<'a>(&self, name: &'a str, is_entry: bool, edge: &'a EdgeNames) -> Option<&'a str> {
        if is_entry {
            return Some(name);
        }
        let facing = edge.admit(name)?;
        if self.surface.contains(facing) {
            Some(facing)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{MemoryFs, ProjectHost};
    use crate::parser::parse_source;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_surface_collects_all_re_export_forms() {
        let fs = MemoryFs::new()
            .with_file("/p/a.ts", "export const a1 = 1; export default 1; export * from './b';")
            .with_file("/p/b.ts", "export function b1() {}");
        let mut host = ProjectHost::new(fs);
        let entry = ModuleId::new("/p/index.ts");
        let program = parse_source(
            "export * from './a';\n\
             export { x, y as z } from './elsewhere';\n\
             export { local };\n\
             export * as ns from './a';\n\
             export * from './missing';\n\
             export const own = 1;",
        )
        .unwrap();

        let surface = EntryExportSurface::compute(&entry, &program, &mut host);
        let names: Vec<&str> = surface.iter().collect();
        assert_eq!(names, vec!["a1", "b1", "x", "z", "local", "ns"]);
        assert!(!surface.contains("own"));
        assert!(!surface.contains("default"));
    }

    #[test]
    fn test_edge_names_compose_renames() {
        let root = EdgeNames::unrestricted();
        assert_eq!(root.admit("anything"), Some("anything"));

        let first = root.through_named(&[
            ExportBinding::new("x", "x"),
            ExportBinding::new("q", "r"),
        ]);
        assert_eq!(first.admit("q"), Some("r"));
        assert_eq!(first.admit("r"), None);
        assert_eq!(first.admit("s"), None);

        // The next module re-exports `inner as q`
        let second = first.through_named(&[
            ExportBinding::new("inner", "q"),
            ExportBinding::new("other", "other"),
        ]);
        assert_eq!(second.admit("inner"), Some("r"));
        assert_eq!(second.admit("other"), None);

        let below_wildcard = second.through_wildcard();
        assert_eq!(below_wildcard.admit("inner"), Some("r"));
    }

    #[test]
    fn test_wildcard_edges_block_default() {
        let edge = EdgeNames::unrestricted().through_wildcard();
        assert_eq!(edge.admit("default"), None);
        assert_eq!(edge.admit("value"), Some("value"));

        let named = edge.through_named(&[ExportBinding::new("default", "default")]);
        assert!(named.is_closed());

        let explicit = EdgeNames::unrestricted()
            .through_named(&[ExportBinding::new("default", "Widget")]);
        assert_eq!(explicit.admit("default"), Some("Widget"));
    }

    #[test]
    fn test_filter_admits_entry_names_unconditionally() {
        let surface: EntryExportSurface = ["shared"].into_iter().collect();
        let filter = VisibilityFilter::new(&surface);
        let edge = EdgeNames::unrestricted();

        assert_eq!(filter.admit("own", true, &edge), Some("own"));
        assert_eq!(filter.admit("own", false, &edge), None);
        assert_eq!(filter.admit("shared", false, &edge), Some("shared"));

        let restricted = edge.through_named(&[ExportBinding::new("other", "other")]);
        assert_eq!(filter.admit("shared", false, &restricted), None);
    }
}
