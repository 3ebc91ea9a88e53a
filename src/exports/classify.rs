//! Export statement classification.

use std::fmt;

use crate::ast::{
    BindingPattern, Declaration, ExportModifier, ModuleSource, Stmt, StmtKind,
};

/// What kind of declaration introduced an exported name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Class,
    Interface,
    Enum,
    Function,
    Variable,
    DestructuredBinding,
    TypeAlias,
    Namespace,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Function => "function",
            DeclarationKind::Variable => "variable",
            DeclarationKind::DestructuredBinding => "destructuredBinding",
            DeclarationKind::TypeAlias => "typeAlias",
            DeclarationKind::Namespace => "namespace",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One `local as exported` pair of an export clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBinding {
    pub local_name: String,
    pub exported_name: String,
}

impl ExportBinding {
    pub fn new(local_name: impl Into<String>, exported_name: impl Into<String>) -> Self {
        ExportBinding {
            local_name: local_name.into(),
            exported_name: exported_name.into(),
        }
    }
}

/// An export-related top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatement {
    /// `export class A {}`, `export const a = 1, { b } = c`, ...
    InlineDeclaration {
        declared_names: Vec<String>,
        kind: DeclarationKind,
    },
    /// `export { a, b as c }` (no source) or `export { a } from './m'`.
    NamedReExport {
        source: Option<ModuleSource>,
        bindings: Vec<ExportBinding>,
    },
    /// `export * from './m'`
    WildcardReExport { source: ModuleSource },
    /// `export * as ns from './m'`
    NamespaceReExport {
        source: ModuleSource,
        exported_name: String,
    },
}

impl ExportStatement {
    /// The module specifier of a re-export, if it has one.
    pub fn source(&self) -> Option<&ModuleSource> {
        match self {
            ExportStatement::InlineDeclaration { .. } => None,
            ExportStatement::NamedReExport { source, .. } => source.as_ref(),
            ExportStatement::WildcardReExport { source }
            | ExportStatement::NamespaceReExport { source, .. } => Some(source),
        }
    }
}

/// Classify a top-level statement; `None` if it exports nothing.
pub fn classify(stmt: &Stmt) -> Option<ExportStatement> {
    match &stmt.kind {
        StmtKind::Declaration { decl, export } => classify_declaration(decl, *export),

        StmtKind::ExportDefaultExpression => Some(ExportStatement::InlineDeclaration {
            declared_names: vec!["default".to_string()],
            kind: DeclarationKind::Variable,
        }),

        StmtKind::ExportNamed(named) => Some(ExportStatement::NamedReExport {
            source: named.source.clone(),
            bindings: named
                .specifiers
                .iter()
                .map(|s| ExportBinding::new(s.local.clone(), s.exported_name()))
                .collect(),
        }),

        StmtKind::ExportAll(all) => Some(match &all.alias {
            Some(alias) => ExportStatement::NamespaceReExport {
                source: all.source.clone(),
                exported_name: alias.clone(),
            },
            None => ExportStatement::WildcardReExport {
                source: all.source.clone(),
            },
        }),

        StmtKind::ExportAssignment | StmtKind::Other => None,
    }
}

fn classify_declaration(decl: &Declaration, export: ExportModifier) -> Option<ExportStatement> {
    let kind = match decl {
        Declaration::Class { .. } => DeclarationKind::Class,
        Declaration::Interface { .. } => DeclarationKind::Interface,
        Declaration::Enum { .. } => DeclarationKind::Enum,
        Declaration::Function { .. } => DeclarationKind::Function,
        Declaration::TypeAlias { .. } => DeclarationKind::TypeAlias,
        Declaration::Namespace { .. } => DeclarationKind::Namespace,
        Declaration::Variable { declarators, .. } => {
            if export != ExportModifier::Export {
                return None;
            }
            return classify_variables(declarators);
        }
    };

    let name = match export {
        ExportModifier::None => return None,
        ExportModifier::ExportDefault => "default",
        ExportModifier::Export => decl.name()?,
    };

    Some(ExportStatement::InlineDeclaration {
        declared_names: vec![name.to_string()],
        kind,
    })
}

/// Names bound by `export const/let/var`. A statement containing any
/// destructuring declarator is classified as a destructured binding.
fn classify_variables(declarators: &[BindingPattern]) -> Option<ExportStatement> {
    let mut declared_names = Vec::new();
    let mut destructured = false;

    for pattern in declarators {
        match pattern {
            BindingPattern::Identifier(name) => declared_names.push(name.clone()),
            BindingPattern::Object(elements) | BindingPattern::Array(elements) => {
                destructured = true;
                for element in elements {
                    match &element.target {
                        BindingPattern::Identifier(name) => declared_names.push(name.clone()),
                        nested => {
                            tracing::debug!(
                                property = element.property.as_deref().unwrap_or("<element>"),
                                pattern = ?nested,
                                "skipping nested destructuring target"
                            );
                        }
                    }
                }
            }
        }
    }

    if declared_names.is_empty() {
        return None;
    }

    let kind = if destructured {
        DeclarationKind::DestructuredBinding
    } else {
        DeclarationKind::Variable
    };
    Some(ExportStatement::InlineDeclaration {
        declared_names,
        kind,
    })
}
