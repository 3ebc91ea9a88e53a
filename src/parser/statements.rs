//! Skipping code the export analysis does not model.
//!
//! Statement ends follow a simplified automatic-semicolon-insertion rule: a
//! statement ends at `;` at bracket depth 0, or before a token that sits on a
//! new line and can only begin a new declaration or export.

use crate::lexer::{Token, TokenKind};

use super::core::{ParseResult, Parser};

/// What ended a declarator tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tail {
    /// A `,` at depth 0: another declarator follows.
    Next,
    End,
}

impl Parser {
    /// Skip one statement of unknown shape.
    pub(crate) fn skip_statement(&mut self) -> ParseResult<()> {
        let mut first = true;
        loop {
            if self.is_at_end() || (!first && self.at_statement_boundary()) {
                return Ok(());
            }
            first = false;
            match self.peek().kind {
                TokenKind::Semicolon => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::LeftParen | TokenKind::LeftBrace | TokenKind::LeftBracket => {
                    self.skip_balanced()?;
                }
                TokenKind::RightParen | TokenKind::RightBrace | TokenKind::RightBracket => {
                    // Stray closer
                    self.advance();
                    return Ok(());
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip from an opening bracket through its matching closer.
    pub(crate) fn skip_balanced(&mut self) -> ParseResult<()> {
        let open_span = self.current_span();
        let mut depth = 0usize;
        loop {
            match self.peek().kind {
                TokenKind::Eof => {
                    return Err(crate::error::ParserError::unexpected_eof(open_span));
                }
                TokenKind::LeftParen | TokenKind::LeftBrace | TokenKind::LeftBracket => {
                    depth += 1;
                }
                TokenKind::RightParen | TokenKind::RightBrace | TokenKind::RightBracket => {
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
            self.advance();
            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Skip tokens at depth 0 until `stop` matches; brackets are skipped whole.
    pub(crate) fn skip_until(&mut self, stop: &[TokenKind]) -> ParseResult<()> {
        loop {
            if self.is_at_end() || stop.iter().any(|kind| self.check(kind)) {
                return Ok(());
            }
            match self.peek().kind {
                TokenKind::LeftParen | TokenKind::LeftBrace | TokenKind::LeftBracket => {
                    self.skip_balanced()?;
                }
                TokenKind::RightParen | TokenKind::RightBrace | TokenKind::RightBracket => {
                    return Ok(());
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip a declaration header (generics, heritage clauses, parameters,
    /// return types) up to its body.
    ///
    /// Returns true when positioned on the body's `{`; false when the
    /// declaration has no body (overload signatures, ambient declarations).
    pub(crate) fn skip_to_body(&mut self) -> ParseResult<bool> {
        let mut angle = 0usize;
        loop {
            if self.is_at_end() {
                return Ok(false);
            }
            match self.peek().kind {
                TokenKind::LeftBrace => {
                    if angle == 0 && !self.brace_in_type_position() {
                        return Ok(true);
                    }
                    self.skip_balanced()?;
                    continue;
                }
                TokenKind::LeftParen | TokenKind::LeftBracket => {
                    self.skip_balanced()?;
                    continue;
                }
                TokenKind::Less => angle += 1,
                TokenKind::Greater => angle = angle.saturating_sub(1),
                TokenKind::Semicolon if angle == 0 => {
                    self.advance();
                    return Ok(false);
                }
                TokenKind::RightBrace | TokenKind::RightParen | TokenKind::RightBracket => {
                    return Ok(false);
                }
                _ => {
                    if angle == 0 && self.at_statement_boundary() {
                        return Ok(false);
                    }
                }
            }
            self.advance();
        }
    }

    /// Skip the rest of a declarator: definite-assignment `!`, type
    /// annotation and initializer.
    ///
    /// A `<` that opens a type argument list (`Map<K, V>`, `new Map<K, V>()`)
    /// is skipped through its closing `>` so the commas inside do not split
    /// declarators. Any other `<` is a comparison. A `;` or a statement
    /// boundary always ends the tail.
    pub(crate) fn skip_declarator_tail(&mut self, allow_comma: bool) -> ParseResult<Tail> {
        loop {
            if self.is_at_end() || self.at_statement_boundary() {
                return Ok(Tail::End);
            }
            match self.peek().kind {
                TokenKind::Semicolon => {
                    self.advance();
                    return Ok(Tail::End);
                }
                TokenKind::Comma if allow_comma => {
                    self.advance();
                    return Ok(Tail::Next);
                }
                TokenKind::LeftParen | TokenKind::LeftBrace | TokenKind::LeftBracket => {
                    self.skip_balanced()?;
                    continue;
                }
                TokenKind::RightParen | TokenKind::RightBrace | TokenKind::RightBracket => {
                    return Ok(Tail::End);
                }
                TokenKind::Less => {
                    if let Some(len) = self.type_arguments_len() {
                        for _ in 0..len {
                            self.advance();
                        }
                        continue;
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Number of tokens in the type argument list opened by the current `<`,
    /// or `None` when the `<` cannot open one and is a comparison.
    fn type_arguments_len(&self) -> Option<usize> {
        let mut angle = 0usize;
        let mut brackets = 0usize;
        let mut offset = 0;
        loop {
            let token = self.peek_nth(offset);
            if offset > 0 && token.newline_before && self.starts_statement(offset) {
                return None;
            }
            offset += 1;
            match &token.kind {
                TokenKind::Eof => return None,
                TokenKind::LeftParen | TokenKind::LeftBrace | TokenKind::LeftBracket => {
                    brackets += 1;
                }
                TokenKind::RightParen | TokenKind::RightBrace | TokenKind::RightBracket => {
                    if brackets == 0 {
                        return None;
                    }
                    brackets -= 1;
                }
                _ if brackets > 0 => {}
                TokenKind::Less => angle += 1,
                TokenKind::Greater => {
                    angle = angle.saturating_sub(1);
                    if angle == 0 {
                        return Some(offset);
                    }
                }
                TokenKind::Identifier(_)
                | TokenKind::Dot
                | TokenKind::Comma
                | TokenKind::Pipe
                | TokenKind::Ampersand
                | TokenKind::Question
                | TokenKind::Colon
                | TokenKind::FatArrow
                | TokenKind::StringLiteral(_)
                | TokenKind::NumberLiteral(_)
                | TokenKind::Template(_) => {}
                _ => return None,
            }
        }
    }

    /// Skip `@decorator`, `@a.b(...)` and `@(expr)` prefixes.
    pub(crate) fn skip_decorators(&mut self) -> ParseResult<()> {
        while self.match_token(&TokenKind::At) {
            if self.check(&TokenKind::LeftParen) {
                self.skip_balanced()?;
                continue;
            }
            self.expect_identifier()?;
            while self.match_token(&TokenKind::Dot) {
                self.expect_identifier()?;
            }
            if self.check(&TokenKind::LeftParen) {
                self.skip_balanced()?;
            }
        }
        Ok(())
    }

    /// Skip `with { ... }` / `assert { ... }` import attributes.
    pub(crate) fn skip_import_attributes(&mut self) -> ParseResult<()> {
        let is_attributes = (self.check_word("with") || self.check_word("assert"))
            && !self.peek().newline_before
            && self.peek_nth(1).kind == TokenKind::LeftBrace;
        if is_attributes {
            self.advance();
            self.skip_balanced()?;
        }
        Ok(())
    }

    /// The current token begins a new statement on a fresh line.
    pub(crate) fn at_statement_boundary(&self) -> bool {
        self.peek().newline_before && self.starts_statement(0)
    }

    /// The token `offset` positions ahead can only begin a declaration or
    /// module statement.
    pub(crate) fn starts_statement(&self, offset: usize) -> bool {
        let token = self.peek_nth(offset);
        let next = self.peek_nth(offset + 1);
        match &token.kind {
            TokenKind::Export
            | TokenKind::Const
            | TokenKind::Let
            | TokenKind::Var
            | TokenKind::Function
            | TokenKind::Class
            | TokenKind::Enum
            | TokenKind::Interface
            | TokenKind::At => true,
            TokenKind::Import => !matches!(next.kind, TokenKind::LeftParen | TokenKind::Dot),
            TokenKind::Identifier(word) => match word.as_str() {
                "type" | "namespace" | "module" => {
                    !next.newline_before && matches!(next.kind, TokenKind::Identifier(_))
                }
                "declare" | "abstract" => !next.newline_before && starts_declaration(next),
                "async" => !next.newline_before && next.kind == TokenKind::Function,
                _ => false,
            },
            _ => false,
        }
    }

    /// A `{` at the current position opens a type literal, not a body.
    fn brace_in_type_position(&self) -> bool {
        if self.current == 0 {
            return false;
        }
        match &self.previous().kind {
            TokenKind::Colon
            | TokenKind::Pipe
            | TokenKind::Ampersand
            | TokenKind::Less
            | TokenKind::Comma
            | TokenKind::FatArrow
            | TokenKind::Question
            | TokenKind::LeftBracket => true,
            TokenKind::Identifier(word) => {
                matches!(word.as_str(), "keyof" | "typeof" | "is" | "readonly" | "extends")
            }
            _ => false,
        }
    }
}

/// Tokens that can follow `declare` / `abstract` as part of a declaration.
pub(crate) fn starts_declaration(token: &Token) -> bool {
    match &token.kind {
        TokenKind::Const
        | TokenKind::Let
        | TokenKind::Var
        | TokenKind::Function
        | TokenKind::Class
        | TokenKind::Enum
        | TokenKind::Interface => true,
        TokenKind::Identifier(word) => matches!(
            word.as_str(),
            "type" | "namespace" | "module" | "global" | "abstract" | "async" | "declare"
        ),
        _ => false,
    }
}
