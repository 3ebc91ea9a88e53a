//! Module loading and resolution for TypeScript projects.
//!
//! This module provides:
//! - Module identifiers and the collaborator traits the export walker uses
//! - A file-system abstraction with real and in-memory implementations
//! - Node-style specifier resolution driven by `tsconfig.json`
//! - `ProjectHost`, which parses, resolves and caches export surfaces

mod fs;
mod host;
mod resolver;
mod tsconfig;

pub use fs::{normalize_path, FileSystem, MemoryFs, RealFs};
pub use host::ProjectHost;
pub use resolver::{Resolver, ResolverConfig};
pub use tsconfig::{CompilerOptions, TsConfig};

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexSet;
use thiserror::Error;

use crate::ast::Program;
use crate::error::ParserError;

/// Identity of a module: its absolute, lexically normalized path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(PathBuf);

impl ModuleId {
    pub fn new(path: impl AsRef<Path>) -> Self {
        ModuleId(normalize_path(path.as_ref()))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// The directory relative specifiers are resolved against.
    pub fn dir(&self) -> &Path {
        self.0.parent().unwrap_or_else(|| Path::new("/"))
    }

    /// Path relative to `root` with `/` separators, or the full path when the
    /// module lies outside `root`.
    pub fn display_relative(&self, root: &Path) -> String {
        let root = normalize_path(root);
        match self.0.strip_prefix(&root) {
            Ok(relative) if !relative.as_os_str().is_empty() => slashed(relative),
            _ => slashed(&self.0),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", slashed(&self.0))
    }
}

fn slashed(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Errors from loading a single module or project configuration.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Module not found: {0}")]
    NotFound(String),

    #[error("Parse error in {module}: {source}")]
    Parse {
        module: String,
        #[source]
        source: ParserError,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ResolveError {
    pub fn parse(module: &ModuleId, source: ParserError) -> Self {
        ResolveError::Parse {
            module: module.to_string(),
            source,
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        ResolveError::Io {
            path: slashed(path),
            source,
        }
    }
}

/// Loads and parses modules.
pub trait SourceAnalyzer {
    fn parse_module(&mut self, id: &ModuleId) -> Result<Rc<Program>, ResolveError>;
}

/// Maps a module specifier, as written in `from`, to a module.
pub trait ModuleResolver {
    fn resolve_module(&self, specifier: &str, from: &ModuleId) -> Option<ModuleId>;
}

/// Answers which names a module makes available to importers.
pub trait SymbolTable {
    fn export_surface_of(&mut self, id: &ModuleId) -> IndexSet<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_id_normalizes() {
        let id = ModuleId::new("/proj/src/./lib/../index.ts");
        assert_eq!(id.to_string(), "/proj/src/index.ts");
        assert_eq!(id.dir(), Path::new("/proj/src"));
    }

    #[test]
    fn test_display_relative() {
        let id = ModuleId::new("/proj/src/index.ts");
        assert_eq!(id.display_relative(Path::new("/proj")), "src/index.ts");
        assert_eq!(id.display_relative(Path::new("/proj/")), "src/index.ts");
        assert_eq!(id.display_relative(Path::new("/other")), "/proj/src/index.ts");
    }
}
