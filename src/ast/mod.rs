//! Abstract Syntax Tree for TypeScript module surfaces.

pub mod stmt;

pub use stmt::{
    BindingElement, BindingPattern, Declaration, ExportAll, ExportModifier, ExportSpecifier,
    ModuleSource, NamedExports, Program, Stmt, StmtKind, VariableKind,
};
