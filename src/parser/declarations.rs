//! Declaration and export parsing.

use crate::ast::*;
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};
use super::statements::{starts_declaration, Tail};

impl Parser {
    pub(crate) fn declaration(&mut self) -> ParseResult<Stmt> {
        let start_span = self.current_span();
        self.skip_decorators()?;

        if self.check(&TokenKind::Export) {
            return self.export_declaration(start_span);
        }

        let kind = match self.try_declaration()? {
            Some(decl) => StmtKind::Declaration {
                decl,
                export: ExportModifier::None,
            },
            None => {
                self.skip_statement()?;
                StmtKind::Other
            }
        };

        Ok(Stmt::new(kind, start_span.merge(&self.previous_span())))
    }

    /// Parse an export statement.
    /// Syntax:
    ///   export const a = 1, { b, c: d } = obj;
    ///   export class A {} / export function f() {} / export enum E {} ...
    ///   export default <declaration or expression>
    ///   export { a, b as c };
    ///   export { a, b as c } from './m';
    ///   export type { T } from './m';
    ///   export * from './m';
    ///   export * as ns from './m';
    ///   export = value;
    fn export_declaration(&mut self, start_span: crate::span::Span) -> ParseResult<Stmt> {
        self.expect(&TokenKind::Export)?;

        let kind = if self.match_token(&TokenKind::Default) {
            self.export_default()?
        } else if self.match_token(&TokenKind::Equal) {
            self.skip_statement()?;
            StmtKind::ExportAssignment
        } else if self.check_word("as") && self.peek_nth(1).is_word("namespace") {
            // UMD global: export as namespace Foo;
            self.skip_statement()?;
            StmtKind::Other
        } else if self.check(&TokenKind::Import) {
            // Import alias: export import A = B.C;
            self.skip_statement()?;
            StmtKind::Other
        } else {
            let type_only = self.check_word("type")
                && matches!(
                    self.peek_nth(1).kind,
                    TokenKind::LeftBrace | TokenKind::Star
                );
            if type_only {
                self.advance();
            }

            if self.match_token(&TokenKind::Star) {
                self.export_all(type_only)?
            } else if self.check(&TokenKind::LeftBrace) {
                self.export_named(type_only)?
            } else {
                match self.try_declaration()? {
                    Some(decl) => StmtKind::Declaration {
                        decl,
                        export: ExportModifier::Export,
                    },
                    None => {
                        // export declare global { ... }, export declare module 'x' { ... }
                        let consumed_modifier = self.previous().kind != TokenKind::Export;
                        if !consumed_modifier {
                            return Err(self.unexpected("declaration after 'export'"));
                        }
                        self.skip_statement()?;
                        StmtKind::Other
                    }
                }
            }
        };

        Ok(Stmt::new(kind, start_span.merge(&self.previous_span())))
    }

    fn export_default(&mut self) -> ParseResult<StmtKind> {
        self.skip_modifiers();

        let decl = if self.check(&TokenKind::Class) {
            Some(self.class_declaration()?)
        } else if self.check(&TokenKind::Function) {
            Some(self.function_declaration()?)
        } else if self.check(&TokenKind::Interface) {
            Some(self.interface_declaration()?)
        } else {
            None
        };

        match decl {
            Some(decl) => Ok(StmtKind::Declaration {
                decl,
                export: ExportModifier::ExportDefault,
            }),
            None => {
                self.skip_statement()?;
                Ok(StmtKind::ExportDefaultExpression)
            }
        }
    }

    /// After `export *` (and an optional `type`).
    fn export_all(&mut self, type_only: bool) -> ParseResult<StmtKind> {
        let alias = if self.match_word("as") {
            Some(self.module_export_name()?)
        } else {
            None
        };
        self.expect_word("from")?;
        let source = self.module_source()?;
        self.skip_import_attributes()?;
        self.match_token(&TokenKind::Semicolon);

        Ok(StmtKind::ExportAll(ExportAll {
            source,
            alias,
            type_only,
        }))
    }

    /// An export clause `{ ... }` with an optional `from` source.
    fn export_named(&mut self, type_only: bool) -> ParseResult<StmtKind> {
        self.expect(&TokenKind::LeftBrace)?;
        let mut specifiers = Vec::new();

        while !self.check(&TokenKind::RightBrace) {
            let item_span = self.current_span();

            // `type` modifier on a single specifier: export { type T, U }
            let specifier_type_only = self.check_word("type")
                && !matches!(
                    self.peek_nth(1).kind,
                    TokenKind::Comma | TokenKind::RightBrace
                )
                && !self.peek_nth(1).is_word("as");
            if specifier_type_only {
                self.advance();
            }

            let local = self.module_export_name()?;
            let exported = if self.match_word("as") {
                Some(self.module_export_name()?)
            } else {
                None
            };

            specifiers.push(ExportSpecifier {
                local,
                exported,
                type_only: specifier_type_only,
                span: item_span.merge(&self.previous_span()),
            });

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RightBrace)?;

        let source = if self.match_word("from") {
            Some(self.module_source()?)
        } else {
            None
        };
        self.skip_import_attributes()?;
        self.match_token(&TokenKind::Semicolon);

        Ok(StmtKind::ExportNamed(NamedExports {
            specifiers,
            source,
            type_only,
        }))
    }

    /// An identifier, a reserved word such as `default`, or a string literal.
    fn module_export_name(&mut self) -> ParseResult<String> {
        let name = match &self.peek().kind {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::StringLiteral(raw) => unquote(raw).to_string(),
            other => match other.keyword_text() {
                Some(text) => text.to_string(),
                None => return Err(self.unexpected("export name")),
            },
        };
        self.advance();
        Ok(name)
    }

    fn module_source(&mut self) -> ParseResult<ModuleSource> {
        match &self.peek().kind {
            TokenKind::StringLiteral(raw) => {
                let source = ModuleSource {
                    raw: raw.clone(),
                    span: self.current_span(),
                };
                self.advance();
                Ok(source)
            }
            _ => Err(self.unexpected("module specifier string")),
        }
    }

    /// Parse a declaration if one starts here. Returns `None` (possibly after
    /// consuming `declare`/`abstract` modifiers) for anything else.
    pub(crate) fn try_declaration(&mut self) -> ParseResult<Option<Declaration>> {
        self.skip_modifiers();

        let next = self.peek_nth(1);
        let next_is_name = !next.newline_before && matches!(next.kind, TokenKind::Identifier(_));
        let next_is_enum = next.kind == TokenKind::Enum;
        let let_binding = matches!(
            next.kind,
            TokenKind::Identifier(_) | TokenKind::LeftBrace | TokenKind::LeftBracket
        );

        let decl = match &self.peek().kind {
            TokenKind::Const if next_is_enum => {
                self.advance();
                self.enum_declaration()?
            }
            TokenKind::Const | TokenKind::Var => self.variable_declaration()?,
            TokenKind::Let if let_binding => self.variable_declaration()?,
            TokenKind::Function => self.function_declaration()?,
            TokenKind::Class => self.class_declaration()?,
            TokenKind::Enum => self.enum_declaration()?,
            TokenKind::Interface => self.interface_declaration()?,
            TokenKind::Identifier(word) if word == "type" && next_is_name => {
                self.type_alias_declaration()?
            }
            TokenKind::Identifier(word)
                if (word == "namespace" || word == "module") && next_is_name =>
            {
                self.namespace_declaration()?
            }
            _ => return Ok(None),
        };

        Ok(Some(decl))
    }

    /// Skip `declare`, `abstract` and `async` modifiers in front of a declaration.
    fn skip_modifiers(&mut self) {
        loop {
            let next = self.peek_nth(1);
            let is_modifier = if self.check_word("declare") || self.check_word("abstract") {
                !next.newline_before && starts_declaration(next)
            } else if self.check_word("async") {
                !next.newline_before && next.kind == TokenKind::Function
            } else {
                false
            };
            if !is_modifier {
                return;
            }
            self.advance();
        }
    }

    pub(crate) fn class_declaration(&mut self) -> ParseResult<Declaration> {
        self.expect(&TokenKind::Class)?;

        let name = match &self.peek().kind {
            TokenKind::Identifier(name) if name != "extends" && name != "implements" => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        };

        if self.skip_to_body()? {
            self.skip_balanced()?;
        }
        Ok(Declaration::Class { name })
    }

    pub(crate) fn function_declaration(&mut self) -> ParseResult<Declaration> {
        self.expect(&TokenKind::Function)?;
        // Generator
        self.match_token(&TokenKind::Star);

        let name = match &self.peek().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        };

        if self.skip_to_body()? {
            self.skip_balanced()?;
        }
        Ok(Declaration::Function { name })
    }

    pub(crate) fn interface_declaration(&mut self) -> ParseResult<Declaration> {
        self.expect(&TokenKind::Interface)?;
        let name = self.expect_identifier()?;
        if self.skip_to_body()? {
            self.skip_balanced()?;
        }
        Ok(Declaration::Interface { name })
    }

    fn enum_declaration(&mut self) -> ParseResult<Declaration> {
        self.expect(&TokenKind::Enum)?;
        let name = self.expect_identifier()?;
        if self.skip_to_body()? {
            self.skip_balanced()?;
        }
        Ok(Declaration::Enum { name })
    }

    fn type_alias_declaration(&mut self) -> ParseResult<Declaration> {
        self.expect_word("type")?;
        let name = self.expect_identifier()?;
        self.skip_declarator_tail(false)?;
        Ok(Declaration::TypeAlias { name })
    }

    /// `namespace A.B.C { }` exports the outermost name, `A`.
    fn namespace_declaration(&mut self) -> ParseResult<Declaration> {
        self.advance();
        let name = self.expect_identifier()?;
        while self.match_token(&TokenKind::Dot) {
            self.expect_identifier()?;
        }
        if self.skip_to_body()? {
            self.skip_balanced()?;
        }
        Ok(Declaration::Namespace { name })
    }

    fn variable_declaration(&mut self) -> ParseResult<Declaration> {
        let kind = match self.advance().kind {
            TokenKind::Const => VariableKind::Const,
            TokenKind::Let => VariableKind::Let,
            _ => VariableKind::Var,
        };

        let mut declarators = Vec::new();
        loop {
            match self.binding_pattern()? {
                Some(pattern) => declarators.push(pattern),
                None => {
                    self.skip_declarator_tail(false)?;
                    break;
                }
            }
            if self.skip_declarator_tail(true)? == Tail::End {
                break;
            }
        }

        Ok(Declaration::Variable { kind, declarators })
    }
}

/// Drop the delimiters of a raw string lexeme.
pub(crate) fn unquote(raw: &str) -> &str {
    let mut chars = raw.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && matches!(open, '\'' | '"' | '`') => {
            &raw[1..raw.len() - 1]
        }
        _ => raw,
    }
}
