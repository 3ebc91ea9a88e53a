//! tsexports: export-provenance resolution for TypeScript modules.
//!
//! Given an entry module, finds every name it exposes, the module that
//! declares each name, and the chain of modules that re-export it.
//!
//! # Pipeline
//!
//! - **Source analysis**: `lexer` and `parser` turn a module into its
//!   top-level declarations and export statements
//! - **Resolution**: `module` maps specifiers to files using `tsconfig.json`
//! - **Provenance**: `exports` walks the re-export graph from the entry
//! - **Output**: `report` renders the result as JSON

// Allow some clippy lints that are stylistic and not critical
#![allow(clippy::module_inception)]
#![allow(clippy::result_large_err)]
#![allow(clippy::new_without_default)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::unnecessary_lazy_evaluations)]
#![allow(clippy::len_zero)]
#![allow(clippy::unnecessary_map_or)]

pub mod ast;
pub mod error;
pub mod exports;
pub mod lexer;
pub mod module;
pub mod parser;
pub mod report;
pub mod span;

use std::path::{Path, PathBuf};

use error::ExportError;
use exports::{ExportWalker, ProvenanceMap, WalkStats};
use module::{
    FileSystem, ModuleId, ModuleResolver, ProjectHost, RealFs, ResolverConfig, SourceAnalyzer,
    SymbolTable, TsConfig,
};
use report::ExportReport;

/// Options for a resolution run.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Explicit `tsconfig.json`. When unset, the nearest one above the entry
    /// module is used if it exists.
    pub tsconfig: Option<PathBuf>,
}

/// The outcome of resolving one entry module.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub entry: ModuleId,
    pub exports: ProvenanceMap,
    pub stats: WalkStats,
}

impl Resolution {
    /// Render with module paths relative to `root`.
    pub fn report(&self, root: &Path) -> ExportReport {
        ExportReport::new(&self.exports, root)
    }
}

/// Resolve the exports of the entry module at `path` on the real file system.
/// Relative paths are taken from the current directory.
pub fn resolve_entry(path: &Path, options: &Options) -> Result<Resolution, ExportError> {
    let cwd = std::env::current_dir()?;
    let options = Options {
        tsconfig: options.tsconfig.as_ref().map(|p| cwd.join(p)),
    };
    resolve_entry_in(RealFs, &cwd.join(path), &options)
}

/// Resolve the exports of the entry module at the absolute `path` on `fs`.
pub fn resolve_entry_in<F: FileSystem>(
    fs: F,
    path: &Path,
    options: &Options,
) -> Result<Resolution, ExportError> {
    let entry = ModuleId::new(path);
    let config = load_resolver_config(&fs, &entry, options)?;
    let mut host = ProjectHost::with_config(fs, config);
    resolve_with_host(&mut host, &entry)
}

/// Resolve the exports of `entry` using caller-provided collaborators.
pub fn resolve_with_host<H>(host: &mut H, entry: &ModuleId) -> Result<Resolution, ExportError>
where
    H: SourceAnalyzer + ModuleResolver + SymbolTable + ?Sized,
{
    let mut walker = ExportWalker::new(host);
    let exports = walker.walk(entry)?;
    Ok(Resolution {
        entry: entry.clone(),
        exports,
        stats: walker.stats(),
    })
}

fn load_resolver_config<F: FileSystem>(
    fs: &F,
    entry: &ModuleId,
    options: &Options,
) -> Result<ResolverConfig, ExportError> {
    let path = match &options.tsconfig {
        Some(path) => path.clone(),
        None => match TsConfig::find(fs, entry.dir()) {
            Some(path) => path,
            None => return Ok(ResolverConfig::default()),
        },
    };

    let config = TsConfig::load(fs, &path).map_err(|e| ExportError::config(e.to_string()))?;
    tracing::debug!(tsconfig = %config.path.display(), "loaded compiler options");
    Ok(config.compiler_options.into())
}
