//! Scanner for TypeScript source code.
//!
//! The scanner only has to be precise enough for the statement parser to skip
//! arbitrary code: bracket tokens must never be produced from inside strings,
//! templates, regular expressions or comments.

use crate::error::LexerError;
use crate::lexer::jsx;
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

/// The lexer transforms source code into a stream of tokens.
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: usize,
    column: usize,
    start_pos: usize,
    start_line: usize,
    start_column: usize,
    saw_newline: bool,
    regex_allowed: bool,
    jsx: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut scanner = Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            column: 1,
            start_pos: 0,
            start_line: 1,
            start_column: 1,
            saw_newline: true,
            regex_allowed: true,
            jsx: false,
        };
        scanner.skip_bom_and_shebang();
        scanner
    }

    /// Accept JSX elements wherever an expression operand may start.
    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    /// Scan all tokens from the source.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            self.regex_allowed = token.kind.allows_regex_after();
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    /// Scan the next token.
    pub fn scan_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace_and_comments()?;
        self.mark_start();

        let Some((_, c)) = self.advance() else {
            return Ok(Token::eof(self.current_pos, self.line, self.column));
        };

        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '@' => TokenKind::At,
            '~' => TokenKind::Operator("~".to_string()),
            '>' => TokenKind::Greater,

            '.' => {
                if self.peek().is_some_and(|n| n.is_ascii_digit()) {
                    return self.scan_number(c);
                }
                if self.peek() == Some('.') && self.peek_next() == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::Spread
                } else {
                    TokenKind::Dot
                }
            }
            '?' => {
                if self.peek() == Some('.') && !self.peek_next().is_some_and(|n| n.is_ascii_digit())
                {
                    self.advance();
                    TokenKind::QuestionDot
                } else if self.match_char('?') {
                    self.operator_with_assign("??")
                } else {
                    TokenKind::Question
                }
            }
            '=' => {
                if self.match_char('>') {
                    TokenKind::FatArrow
                } else if self.match_char('=') {
                    if self.match_char('=') {
                        TokenKind::Operator("===".to_string())
                    } else {
                        TokenKind::Operator("==".to_string())
                    }
                } else {
                    TokenKind::Equal
                }
            }
            '!' => {
                if self.match_char('=') {
                    if self.match_char('=') {
                        TokenKind::Operator("!==".to_string())
                    } else {
                        TokenKind::Operator("!=".to_string())
                    }
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.jsx
                    && self.regex_allowed
                    && jsx::starts_element(self.source.as_bytes(), self.start_pos)
                {
                    return self.scan_jsx();
                }
                if self.match_char('=') {
                    TokenKind::Operator("<=".to_string())
                } else if self.match_char('<') {
                    self.operator_with_assign("<<")
                } else {
                    TokenKind::Less
                }
            }
            '|' => {
                if self.match_char('|') {
                    self.operator_with_assign("||")
                } else if self.match_char('=') {
                    TokenKind::Operator("|=".to_string())
                } else {
                    TokenKind::Pipe
                }
            }
            '&' => {
                if self.match_char('&') {
                    self.operator_with_assign("&&")
                } else if self.match_char('=') {
                    TokenKind::Operator("&=".to_string())
                } else {
                    TokenKind::Ampersand
                }
            }
            '*' => {
                if self.match_char('*') {
                    self.operator_with_assign("**")
                } else if self.match_char('=') {
                    TokenKind::Operator("*=".to_string())
                } else {
                    TokenKind::Star
                }
            }
            '+' | '-' => {
                if self.match_char(c) {
                    TokenKind::Operator(format!("{}{}", c, c))
                } else {
                    self.operator_with_assign(&c.to_string())
                }
            }
            '%' | '^' => self.operator_with_assign(&c.to_string()),
            '/' => {
                if self.regex_allowed {
                    return self.scan_regex();
                }
                if self.match_char('=') {
                    TokenKind::Operator("/=".to_string())
                } else {
                    TokenKind::Slash
                }
            }

            // String and template literals
            '"' | '\'' => return self.scan_string(c),
            '`' => return self.scan_template(),

            '#' => {
                let Some(next) = self.peek().filter(|n| is_identifier_start(*n)) else {
                    return Err(LexerError::unexpected_char(c, self.current_span()));
                };
                self.advance();
                let name = self.scan_identifier_rest(next)?;
                TokenKind::PrivateName(name)
            }

            // Numbers
            c if c.is_ascii_digit() => return self.scan_number(c),

            // Identifiers and keywords
            c if is_identifier_start(c) || c == '\\' => {
                let first = if c == '\\' {
                    self.scan_unicode_escape()?
                } else {
                    c
                };
                let value = self.scan_identifier_rest(first)?;
                TokenKind::keyword(&value).unwrap_or(TokenKind::Identifier(value))
            }

            _ => return Err(LexerError::unexpected_char(c, self.current_span())),
        };

        Ok(self.make_token(kind))
    }

    fn skip_bom_and_shebang(&mut self) {
        if self.peek() == Some('\u{feff}') {
            self.advance();
        }
        if self.source[self.current_pos..].starts_with("#!") {
            while self.peek().is_some_and(|c| c != '\n') {
                self.advance();
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexerError> {
        loop {
            match self.peek() {
                Some('\n' | '\u{2028}' | '\u{2029}') => {
                    self.newline();
                }
                Some(c) if c.is_whitespace() || c == '\u{feff}' => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_next() == Some('/') {
                        // Line comment
                        while self.peek().is_some_and(|c| c != '\n') {
                            self.advance();
                        }
                    } else if self.peek_next() == Some('*') {
                        // Block comment, not nestable
                        let opened = Span::new(
                            self.current_pos,
                            self.current_pos + 2,
                            self.line,
                            self.column,
                        );
                        self.advance();
                        self.advance();
                        loop {
                            match self.peek() {
                                None => return Err(LexerError::unterminated_comment(opened)),
                                Some('*') if self.peek_next() == Some('/') => {
                                    self.advance();
                                    self.advance();
                                    break;
                                }
                                Some('\n') => self.newline(),
                                _ => {
                                    self.advance();
                                }
                            }
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn scan_string(&mut self, quote: char) -> Result<Token, LexerError> {
        self.skip_quoted(quote)?;
        let raw = self.source[self.start_pos..self.current_pos].to_string();
        Ok(self.make_token(TokenKind::StringLiteral(raw)))
    }

    /// Consume the rest of a quoted string whose opening quote was already read.
    fn skip_quoted(&mut self, quote: char) -> Result<(), LexerError> {
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexerError::unterminated_string(self.current_span()));
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('\n') => self.newline(),
                        Some(_) => {
                            self.advance();
                        }
                        None => {
                            return Err(LexerError::unterminated_string(self.current_span()));
                        }
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(());
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn scan_template(&mut self) -> Result<Token, LexerError> {
        self.skip_template_rest()?;
        let raw = self.source[self.start_pos..self.current_pos].to_string();
        Ok(self.make_token(TokenKind::Template(raw)))
    }

    /// Consume a template literal after its opening backtick, including any
    /// `${ ... }` substitutions and templates nested inside them.
    fn skip_template_rest(&mut self) -> Result<(), LexerError> {
        loop {
            match self.peek() {
                None => return Err(LexerError::unterminated_template(self.current_span())),
                Some('`') => {
                    self.advance();
                    return Ok(());
                }
                Some('\\') => {
                    self.advance();
                    if self.peek() == Some('\n') {
                        self.newline();
                    } else {
                        self.advance();
                    }
                }
                Some('$') if self.peek_next() == Some('{') => {
                    self.advance();
                    self.advance();
                    self.skip_substitution()?;
                }
                Some('\n') => self.newline(),
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn skip_substitution(&mut self) -> Result<(), LexerError> {
        let mut depth = 1;
        while depth > 0 {
            match self.peek() {
                None => return Err(LexerError::unterminated_template(self.current_span())),
                Some('{') => {
                    self.advance();
                    depth += 1;
                }
                Some('}') => {
                    self.advance();
                    depth -= 1;
                }
                Some(q @ ('"' | '\'')) => {
                    self.advance();
                    self.skip_quoted(q)?;
                }
                Some('`') => {
                    self.advance();
                    self.skip_template_rest()?;
                }
                Some('/') if self.peek_next() == Some('/') || self.peek_next() == Some('*') => {
                    self.skip_whitespace_and_comments()?;
                }
                Some('\n') => self.newline(),
                Some(_) => {
                    self.advance();
                }
            }
        }
        Ok(())
    }

    fn scan_regex(&mut self) -> Result<Token, LexerError> {
        let mut in_class = false;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(LexerError::unterminated_regex(self.current_span()));
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }

        // Flags
        while self.peek().is_some_and(is_identifier_part) {
            self.advance();
        }

        let raw = self.source[self.start_pos..self.current_pos].to_string();
        Ok(self.make_token(TokenKind::RegexLiteral(raw)))
    }

    /// Consume a JSX element whose `<` was already read.
    fn scan_jsx(&mut self) -> Result<Token, LexerError> {
        let Some(end) = jsx::element_end(self.source.as_bytes(), self.start_pos) else {
            return Err(LexerError::unterminated_jsx(self.current_span()));
        };
        let newline_before = self.saw_newline;
        while self.current_pos < end {
            if self.peek() == Some('\n') {
                self.newline();
            } else {
                self.advance();
            }
        }
        self.saw_newline = newline_before;
        Ok(self.make_token(TokenKind::Jsx))
    }

    fn scan_number(&mut self, first: char) -> Result<Token, LexerError> {
        let radix_prefix = first == '0'
            && matches!(self.peek(), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B'));

        if radix_prefix {
            self.advance();
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                self.advance();
            }
        } else {
            let mut seen_dot = first == '.';
            loop {
                match self.peek() {
                    Some(c) if c.is_ascii_digit() || c == '_' => {
                        self.advance();
                    }
                    Some('.') if !seen_dot => {
                        // `1.toString` is not a number; `1.5` and `1.` are
                        if self.peek_next().is_some_and(is_identifier_start) {
                            break;
                        }
                        seen_dot = true;
                        self.advance();
                    }
                    Some('e' | 'E') => {
                        let sign_or_digit = self
                            .peek_next()
                            .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-');
                        if !sign_or_digit {
                            break;
                        }
                        self.advance();
                        if matches!(self.peek(), Some('+' | '-')) {
                            self.advance();
                        }
                        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                            self.advance();
                        }
                        break;
                    }
                    _ => break,
                }
            }
        }

        // BigInt suffix
        if self.peek() == Some('n') {
            self.advance();
        }

        let raw = self.source[self.start_pos..self.current_pos].to_string();
        Ok(self.make_token(TokenKind::NumberLiteral(raw)))
    }

    fn scan_identifier_rest(&mut self, first: char) -> Result<String, LexerError> {
        let mut value = String::from(first);

        loop {
            match self.peek() {
                Some(c) if is_identifier_part(c) => {
                    value.push(c);
                    self.advance();
                }
                Some('\\') => {
                    self.advance();
                    value.push(self.scan_unicode_escape()?);
                }
                _ => break,
            }
        }

        Ok(value)
    }

    /// Decode `\uXXXX` or `\u{X...}` after the backslash has been consumed.
    fn scan_unicode_escape(&mut self) -> Result<char, LexerError> {
        if !self.match_char('u') {
            return Err(LexerError::unexpected_char('\\', self.current_span()));
        }
        let mut digits = String::new();
        if self.match_char('{') {
            while let Some(c) = self.peek().filter(|c| c.is_ascii_hexdigit()) {
                digits.push(c);
                self.advance();
            }
            if !self.match_char('}') {
                return Err(LexerError::unexpected_char('\\', self.current_span()));
            }
        } else {
            for _ in 0..4 {
                match self.peek().filter(|c| c.is_ascii_hexdigit()) {
                    Some(c) => {
                        digits.push(c);
                        self.advance();
                    }
                    None => return Err(LexerError::unexpected_char('\\', self.current_span())),
                }
            }
        }
        u32::from_str_radix(&digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| LexerError::unexpected_char('\\', self.current_span()))
    }

    fn operator_with_assign(&mut self, op: &str) -> TokenKind {
        if self.match_char('=') {
            TokenKind::Operator(format!("{}=", op))
        } else {
            TokenKind::Operator(op.to_string())
        }
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            self.column += 1;
            Some((pos, c))
        } else {
            None
        }
    }

    fn newline(&mut self) {
        self.advance();
        self.line += 1;
        self.column = 1;
        self.saw_newline = true;
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn mark_start(&mut self) {
        self.start_pos = self.current_pos;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn current_span(&self) -> Span {
        Span::new(
            self.start_pos,
            self.current_pos,
            self.start_line,
            self.start_column,
        )
    }

    fn make_token(&mut self, kind: TokenKind) -> Token {
        let newline_before = std::mem::take(&mut self.saw_newline);
        Token::new(kind, self.current_span(), newline_before)
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '\u{200c}' || c == '\u{200d}'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(source: &str) -> Vec<TokenKind> {
        Scanner::new(source)
            .scan_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn ident(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            scan("(){}[];"),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBrace,
                TokenKind::RightBrace,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_reserved_and_contextual_keywords() {
        assert_eq!(
            scan("export type { a as b } from"),
            vec![
                TokenKind::Export,
                ident("type"),
                TokenKind::LeftBrace,
                ident("a"),
                ident("as"),
                ident("b"),
                TokenKind::RightBrace,
                ident("from"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_keeps_quotes() {
        assert_eq!(
            scan(r#"'./m' "./n""#),
            vec![
                TokenKind::StringLiteral("'./m'".to_string()),
                TokenKind::StringLiteral("\"./n\"".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes_do_not_terminate() {
        assert_eq!(
            scan(r#"'it\'s {'"#),
            vec![
                TokenKind::StringLiteral(r#"'it\'s {'"#.to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_template_with_nested_braces() {
        let kinds = scan("`a ${ { b: `c${d}` }.b } e` ;");
        assert_eq!(kinds.len(), 3);
        assert!(matches!(kinds[0], TokenKind::Template(_)));
        assert_eq!(kinds[1], TokenKind::Semicolon);
    }

    #[test]
    fn test_regex_after_equal() {
        let kinds = scan("const re = /[}]+/g;");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Const,
                ident("re"),
                TokenKind::Equal,
                TokenKind::RegexLiteral("/[}]+/g".to_string()),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_division_after_identifier() {
        assert_eq!(
            scan("a / b"),
            vec![ident("a"), TokenKind::Slash, ident("b"), TokenKind::Eof]
        );
        assert_eq!(
            scan("(a) / 2"),
            vec![
                TokenKind::LeftParen,
                ident("a"),
                TokenKind::RightParen,
                TokenKind::Slash,
                TokenKind::NumberLiteral("2".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            scan("42 3.14 0xFF 1_000 10n 1e-3 .5"),
            vec![
                TokenKind::NumberLiteral("42".to_string()),
                TokenKind::NumberLiteral("3.14".to_string()),
                TokenKind::NumberLiteral("0xFF".to_string()),
                TokenKind::NumberLiteral("1_000".to_string()),
                TokenKind::NumberLiteral("10n".to_string()),
                TokenKind::NumberLiteral("1e-3".to_string()),
                TokenKind::NumberLiteral(".5".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            scan("a // { \n /* } */ b"),
            vec![ident("a"), ident("b"), TokenKind::Eof]
        );
    }

    #[test]
    fn test_newline_before_flag() {
        let tokens = Scanner::new("a\nb /*\n*/ c d").scan_tokens().unwrap();
        let flags: Vec<bool> = tokens.iter().map(|t| t.newline_before).collect();
        assert_eq!(flags, vec![true, true, true, false, true]);
    }

    #[test]
    fn test_angle_brackets_are_single_tokens() {
        assert_eq!(
            scan("A<B<C>>"),
            vec![
                ident("A"),
                TokenKind::Less,
                ident("B"),
                TokenKind::Less,
                ident("C"),
                TokenKind::Greater,
                TokenKind::Greater,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_private_name_and_optional_chain() {
        assert_eq!(
            scan("#x?.y ?? z"),
            vec![
                TokenKind::PrivateName("x".to_string()),
                TokenKind::QuestionDot,
                ident("y"),
                TokenKind::Operator("??".to_string()),
                ident("z"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_shebang_is_skipped() {
        assert_eq!(
            scan("#!/usr/bin/env node\nexport"),
            vec![TokenKind::Export, TokenKind::Eof]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = Scanner::new("'abc\n'").scan_tokens().unwrap_err();
        assert!(matches!(err, LexerError::UnterminatedString(_)));
    }

    #[test]
    fn test_jsx_element_is_one_token() {
        let kinds: Vec<TokenKind> = Scanner::new("const B = () => <div>hi</div>;\nx")
            .jsx(true)
            .scan_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Const,
                ident("B"),
                TokenKind::Equal,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::FatArrow,
                TokenKind::Jsx,
                TokenKind::Semicolon,
                ident("x"),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_jsx_keeps_comparisons_and_line_tracking() {
        let tokens = Scanner::new("a < b;\nconst e = (\n  <p>\n  </p>\n);\nz")
            .jsx(true)
            .scan_tokens()
            .unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Less);

        let jsx = tokens.iter().find(|t| t.kind == TokenKind::Jsx).unwrap();
        assert!(jsx.newline_before);
        let z = &tokens[tokens.len() - 2];
        assert_eq!(z.kind, ident("z"));
        assert_eq!(z.span.line, 6);
    }

    #[test]
    fn test_jsx_closing_tag_without_jsx_mode_is_a_regex_error() {
        let err = Scanner::new("const B = <div>hi</div>;").scan_tokens().unwrap_err();
        assert!(matches!(err, LexerError::UnterminatedRegex(_)));
    }

    #[test]
    fn test_unterminated_jsx() {
        let err = Scanner::new("const B = <div>").jsx(true).scan_tokens().unwrap_err();
        assert!(matches!(err, LexerError::UnterminatedJsx(_)));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = Scanner::new("/* never closed").scan_tokens().unwrap_err();
        assert!(matches!(err, LexerError::UnterminatedComment(_)));
    }
}
