//! Top-level statement AST nodes.
//!
//! Only the shape of module-level declarations and export statements is
//! modelled. Bodies, initializers and type annotations are skipped by the
//! parser and never stored.

use crate::span::Span;

/// A top-level statement in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// A declaration, optionally carrying `export` or `export default`.
    Declaration {
        decl: Declaration,
        export: ExportModifier,
    },

    /// `export { a, b as c }` or `export { a } from './m'`
    ExportNamed(NamedExports),

    /// `export * from './m'` or `export * as ns from './m'`
    ExportAll(ExportAll),

    /// `export default <expression>;`
    ExportDefaultExpression,

    /// `export = value;`
    ExportAssignment,

    /// Anything else: imports, expressions, ambient modules, ...
    Other,
}

/// How a declaration is exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportModifier {
    #[default]
    None,
    Export,
    ExportDefault,
}

/// Declarations the parser understands structurally.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `class Name {}`; the name is optional for `export default class {}`.
    Class { name: Option<String> },
    Interface { name: String },
    Enum { name: String },
    /// `function name() {}`; the name is optional for default exports.
    Function { name: Option<String> },
    /// `type Name = ...`
    TypeAlias { name: String },
    /// `namespace Name {}` or `module Name {}`
    Namespace { name: String },
    /// `const a = 1, { b } = c;`
    Variable {
        kind: VariableKind,
        declarators: Vec<BindingPattern>,
    },
}

impl Declaration {
    /// The single name a non-variable declaration introduces.
    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Class { name } | Declaration::Function { name } => name.as_deref(),
            Declaration::Interface { name }
            | Declaration::Enum { name }
            | Declaration::TypeAlias { name }
            | Declaration::Namespace { name } => Some(name),
            Declaration::Variable { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Const,
    Let,
    Var,
}

/// The left-hand side of a variable declarator.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingPattern {
    Identifier(String),
    Object(Vec<BindingElement>),
    Array(Vec<BindingElement>),
}

/// One element of an object or array binding pattern.
///
/// For `{ b: bAlias }` the property is `b` and the target is `bAlias`.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingElement {
    pub property: Option<String>,
    pub target: BindingPattern,
    pub rest: bool,
}

/// A module specifier exactly as written, delimiters included.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSource {
    pub raw: String,
    pub span: Span,
}

/// `local as exported` inside an export clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: Option<String>,
    pub type_only: bool,
    pub span: Span,
}

impl ExportSpecifier {
    /// The name importers see.
    pub fn exported_name(&self) -> &str {
        self.exported.as_deref().unwrap_or(&self.local)
    }
}

/// An export clause, with or without a source module.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedExports {
    pub specifiers: Vec<ExportSpecifier>,
    pub source: Option<ModuleSource>,
    pub type_only: bool,
}

/// A star export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportAll {
    pub source: ModuleSource,
    pub alias: Option<String>,
    pub type_only: bool,
}

/// A parsed module.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}
