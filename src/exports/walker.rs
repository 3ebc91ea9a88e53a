//! Module graph walk.
//!
//! Each module is processed in two phases: every export statement is
//! recorded first, then the walk descends into the re-exported modules in
//! statement order. Modules already on the active path are not re-entered,
//! so re-export cycles terminate.

use std::collections::HashSet;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::ast::Program;
use crate::error::ExportError;
use crate::module::{ModuleId, ModuleResolver, SourceAnalyzer, SymbolTable};

use super::aggregate::ProvenanceMap;
use super::classify::{classify, ExportStatement};
use super::filter::{EdgeNames, EntryExportSurface, VisibilityFilter};
use super::target::{resolve_target, Forwarded};

/// Counters for one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub modules_visited: usize,
    /// Re-exports whose specifier did not resolve.
    pub unresolved: usize,
    /// Descents skipped because the target was already on the active path.
    pub cycles_skipped: usize,
    /// Re-exported modules that could not be loaded or parsed.
    pub load_failures: usize,
}

/// The module being visited and how it was reached.
#[derive(Debug, Clone)]
pub struct VisitContext {
    pub module: ModuleId,
    pub program: Rc<Program>,
    pub edge: EdgeNames,
    pub depth: usize,
}

impl VisitContext {
    pub fn is_entry(&self) -> bool {
        self.depth == 0
    }
}

/// Walks the re-export graph below an entry module.
pub struct ExportWalker<'h, H: ?Sized> {
    host: &'h mut H,
    stats: WalkStats,
}

impl<'h, H> ExportWalker<'h, H>
where
    H: SourceAnalyzer + ModuleResolver + SymbolTable + ?Sized,
{
    pub fn new(host: &'h mut H) -> Self {
        ExportWalker {
            host,
            stats: WalkStats::default(),
        }
    }

    /// Statistics of the most recent walk.
    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Resolve the provenance of every name the entry module exposes.
    pub fn walk(&mut self, entry: &ModuleId) -> Result<ProvenanceMap, ExportError> {
        self.stats = WalkStats::default();

        let program = self
            .host
            .parse_module(entry)
            .map_err(|err| ExportError::missing_entry(entry.to_string(), err))?;

        let surface = EntryExportSurface::compute(entry, &program, self.host);
        debug!(entry = %entry, names = surface.len(), "computed entry export surface");

        let filter = VisibilityFilter::new(&surface);
        let mut map = ProvenanceMap::new();
        let mut active = HashSet::new();
        let root = VisitContext {
            module: entry.clone(),
            program,
            edge: EdgeNames::unrestricted(),
            depth: 0,
        };
        self.visit(&root, &filter, &mut map, &mut active);

        debug!(
            entry = %entry,
            symbols = map.len(),
            modules_visited = self.stats.modules_visited,
            unresolved = self.stats.unresolved,
            cycles_skipped = self.stats.cycles_skipped,
            load_failures = self.stats.load_failures,
            "walk finished"
        );
        Ok(map)
    }

    fn visit(
        &mut self,
        ctx: &VisitContext,
        filter: &VisibilityFilter<'_>,
        map: &mut ProvenanceMap,
        active: &mut HashSet<ModuleId>,
    ) {
        self.stats.modules_visited += 1;
        active.insert(ctx.module.clone());
        debug!(module = %ctx.module, depth = ctx.depth, "visiting module");

        let is_entry = ctx.is_entry();
        let mut children = Vec::new();

        for stmt in &ctx.program.statements {
            let export = match classify(stmt) {
                Some(export) => export,
                None => continue,
            };

            match &export {
                ExportStatement::InlineDeclaration {
                    declared_names,
                    kind,
                } => {
                    for name in declared_names {
                        if let Some(name) = filter.admit(name, is_entry, &ctx.edge) {
                            map.record(name, &ctx.module, Some(*kind));
                        }
                    }
                }

                ExportStatement::NamedReExport {
                    source: None,
                    bindings,
                } => {
                    for binding in bindings {
                        let admitted = filter.admit(&binding.exported_name, is_entry, &ctx.edge);
                        if let Some(name) = admitted {
                            map.record(name, &ctx.module, None);
                        }
                    }
                }

                _ => {
                    let target = match resolve_target(&export, &ctx.module, self.host) {
                        Some(target) => target,
                        None => {
                            self.stats.unresolved += 1;
                            continue;
                        }
                    };

                    for name in target.forwarded.exported_names() {
                        if let Some(name) = filter.admit(name, is_entry, &ctx.edge) {
                            map.record(name, &ctx.module, None);
                        }
                    }

                    let edge = match &target.forwarded {
                        Forwarded::Named(bindings) => ctx.edge.through_named(bindings),
                        Forwarded::All(_) => ctx.edge.through_wildcard(),
                        Forwarded::Namespace(_) => continue,
                    };
                    children.push((target.module, edge));
                }
            }
        }

        for (module, edge) in children {
            if active.contains(&module) {
                debug!(from = %ctx.module, to = %module, "re-export cycle, not descending");
                self.stats.cycles_skipped += 1;
                continue;
            }
            if edge.is_closed() {
                continue;
            }

            let program = match self.host.parse_module(&module) {
                Ok(program) => program,
                Err(err) => {
                    warn!(module = %module, error = %err, "skipping re-exported module");
                    self.stats.load_failures += 1;
                    continue;
                }
            };

            let child = VisitContext {
                module,
                program,
                edge,
                depth: ctx.depth + 1,
            };
            self.visit(&child, filter, map, active);
        }

        active.remove(&ctx.module);
    }
}
