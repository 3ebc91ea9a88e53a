//! Binding patterns on the left-hand side of variable declarators.

use crate::ast::*;
use crate::lexer::TokenKind;

use super::core::{ParseResult, Parser};
use super::declarations::unquote;

impl Parser {
    /// Parse `name`, `{ ... }` or `[ ... ]`; `None` if no pattern starts here.
    pub(crate) fn binding_pattern(&mut self) -> ParseResult<Option<BindingPattern>> {
        let pattern = match &self.peek().kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                BindingPattern::Identifier(name)
            }
            TokenKind::LeftBrace => self.object_pattern()?,
            TokenKind::LeftBracket => self.array_pattern()?,
            _ => return Ok(None),
        };
        Ok(Some(pattern))
    }

    /// `{ a, b: bAlias, c = 1, d: { e }, [key]: f, ...rest }`
    fn object_pattern(&mut self) -> ParseResult<BindingPattern> {
        self.expect(&TokenKind::LeftBrace)?;
        let mut elements = Vec::new();

        while !self.check(&TokenKind::RightBrace) {
            if self.match_token(&TokenKind::Spread) {
                if let Some(target) = self.binding_pattern()? {
                    elements.push(BindingElement {
                        property: None,
                        target,
                        rest: true,
                    });
                }
            } else {
                let property = self.property_key()?;
                let target = if self.match_token(&TokenKind::Colon) {
                    self.binding_pattern()?
                } else {
                    // Shorthand: the key is also the local binding
                    property.clone().map(BindingPattern::Identifier)
                };
                self.skip_default_value(&TokenKind::RightBrace)?;
                if let Some(target) = target {
                    elements.push(BindingElement {
                        property,
                        target,
                        rest: false,
                    });
                }
            }

            if !self.match_token(&TokenKind::Comma) {
                self.skip_until(&[TokenKind::RightBrace])?;
                break;
            }
        }

        self.expect(&TokenKind::RightBrace)?;
        Ok(BindingPattern::Object(elements))
    }

    /// `[a, , b = 2, [c], ...rest]`; holes are dropped.
    fn array_pattern(&mut self) -> ParseResult<BindingPattern> {
        self.expect(&TokenKind::LeftBracket)?;
        let mut elements = Vec::new();

        while !self.check(&TokenKind::RightBracket) {
            if self.match_token(&TokenKind::Comma) {
                continue;
            }

            let rest = self.match_token(&TokenKind::Spread);
            if let Some(target) = self.binding_pattern()? {
                elements.push(BindingElement {
                    property: None,
                    target,
                    rest,
                });
            }
            self.skip_default_value(&TokenKind::RightBracket)?;

            if !self.match_token(&TokenKind::Comma) {
                self.skip_until(&[TokenKind::RightBracket])?;
                break;
            }
        }

        self.expect(&TokenKind::RightBracket)?;
        Ok(BindingPattern::Array(elements))
    }

    /// A property name in an object pattern. Computed keys yield `None`.
    fn property_key(&mut self) -> ParseResult<Option<String>> {
        let key = match &self.peek().kind {
            TokenKind::Identifier(name) => Some(name.clone()),
            TokenKind::StringLiteral(raw) => Some(unquote(raw).to_string()),
            TokenKind::NumberLiteral(raw) => Some(raw.clone()),
            TokenKind::LeftBracket => {
                self.skip_balanced()?;
                return Ok(None);
            }
            other => match other.keyword_text() {
                Some(text) => Some(text.to_string()),
                None => return Err(self.unexpected("property name")),
            },
        };
        self.advance();
        Ok(key)
    }

    /// Skip `= expr` up to the next `,` or the pattern's closer.
    fn skip_default_value(&mut self, closer: &TokenKind) -> ParseResult<()> {
        if self.match_token(&TokenKind::Equal) {
            self.skip_until(&[TokenKind::Comma, closer.clone()])?;
        }
        Ok(())
    }
}
