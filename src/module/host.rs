//! Project host: parsing, resolution and export surfaces over one file system.

use std::collections::HashMap;
use std::io;
use std::rc::Rc;

use indexmap::IndexSet;
use tracing::{debug, warn};

use crate::ast::Program;
use crate::exports::{classify, strip_quotes, ExportStatement};
use crate::parser::parse_file_source;

use super::fs::{FileSystem, RealFs};
use super::resolver::{Resolver, ResolverConfig};
use super::{ModuleId, ModuleResolver, ResolveError, SourceAnalyzer, SymbolTable};

/// Parses, resolves and answers export-surface queries for one project.
///
/// Parsed modules and complete export surfaces are cached for the lifetime of
/// the host.
pub struct ProjectHost<F: FileSystem = RealFs> {
    fs: F,
    config: ResolverConfig,
    programs: HashMap<ModuleId, Rc<Program>>,
    surfaces: HashMap<ModuleId, IndexSet<String>>,
    /// Modules whose surface is being computed (for cycle detection)
    computing: Vec<ModuleId>,
    /// Lowest index in `computing` that a cycle pointed back to. Surfaces of
    /// modules above it are incomplete until that module finishes.
    cycle_floor: Option<usize>,
}

impl<F: FileSystem> ProjectHost<F> {
    pub fn new(fs: F) -> Self {
        Self::with_config(fs, ResolverConfig::default())
    }

    pub fn with_config(fs: F, config: ResolverConfig) -> Self {
        ProjectHost {
            fs,
            config,
            programs: HashMap::new(),
            surfaces: HashMap::new(),
            computing: Vec::new(),
            cycle_floor: None,
        }
    }

    /// Number of modules parsed so far.
    pub fn parsed_modules(&self) -> usize {
        self.programs.len()
    }

    fn collect_surface(&mut self, id: &ModuleId, program: &Program) -> IndexSet<String> {
        let mut names = IndexSet::new();
        for stmt in &program.statements {
            match classify(stmt) {
                Some(ExportStatement::InlineDeclaration { declared_names, .. }) => {
                    names.extend(declared_names);
                }
                Some(ExportStatement::NamedReExport { bindings, .. }) => {
                    names.extend(bindings.into_iter().map(|b| b.exported_name));
                }
                Some(ExportStatement::NamespaceReExport { exported_name, .. }) => {
                    names.insert(exported_name);
                }
                Some(ExportStatement::WildcardReExport { source }) => {
                    let target = match self.resolve_module(strip_quotes(&source.raw), id) {
                        Some(target) => target,
                        None => continue,
                    };
                    let forwarded = self.export_surface_of(&target);
                    names.extend(forwarded.into_iter().filter(|name| name != "default"));
                }
                None => {}
            }
        }
        names
    }
}

impl<F: FileSystem> SourceAnalyzer for ProjectHost<F> {
    fn parse_module(&mut self, id: &ModuleId) -> Result<Rc<Program>, ResolveError> {
        if let Some(program) = self.programs.get(id) {
            return Ok(Rc::clone(program));
        }

        let source = self.fs.read_to_string(id.path()).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                ResolveError::NotFound(id.to_string())
            } else {
                ResolveError::io(id.path(), err)
            }
        })?;
        let program = parse_file_source(&source, id.path())
            .map_err(|err| ResolveError::parse(id, err))?;
        let program = Rc::new(program);
        debug!(module = %id, statements = program.statements.len(), "parsed module");

        self.programs.insert(id.clone(), Rc::clone(&program));
        Ok(program)
    }
}

impl<F: FileSystem> ModuleResolver for ProjectHost<F> {
    fn resolve_module(&self, specifier: &str, from: &ModuleId) -> Option<ModuleId> {
        Resolver::new(&self.fs, &self.config).resolve(specifier, from)
    }
}

impl<F: FileSystem> SymbolTable for ProjectHost<F> {
    /// A module on the current computation stack contributes nothing more, so
    /// wildcard cycles terminate.
    fn export_surface_of(&mut self, id: &ModuleId) -> IndexSet<String> {
        if let Some(surface) = self.surfaces.get(id) {
            return surface.clone();
        }
        if let Some(index) = self.computing.iter().position(|m| m == id) {
            debug!(module = %id, "wildcard re-export cycle");
            self.cycle_floor = Some(self.cycle_floor.map_or(index, |floor| floor.min(index)));
            return IndexSet::new();
        }

        let program = match self.parse_module(id) {
            Ok(program) => program,
            Err(err) => {
                warn!(module = %id, error = %err, "cannot compute export surface");
                return IndexSet::new();
            }
        };

        let depth = self.computing.len();
        self.computing.push(id.clone());
        let surface = self.collect_surface(id, &program);
        self.computing.pop();

        match self.cycle_floor {
            Some(floor) if floor < depth => {}
            Some(_) => {
                self.cycle_floor = None;
                self.surfaces.insert(id.clone(), surface.clone());
            }
            None => {
                self.surfaces.insert(id.clone(), surface.clone());
            }
        }
        surface
    }
}
