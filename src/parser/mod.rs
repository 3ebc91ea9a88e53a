//! Parser for the module-level surface of TypeScript sources.
//!
//! Only top-level declarations and export statements are parsed into the AST;
//! everything else is skipped with bracket matching.

mod core;
mod declarations;
mod patterns;
mod statements;

#[cfg(test)]
mod tests;

pub use self::core::{ParseResult, Parser};

use std::path::Path;

use crate::ast::Program;
use crate::error::ParserError;
use crate::lexer::Scanner;

/// Scan and parse a module source without JSX.
pub fn parse_source(source: &str) -> Result<Program, ParserError> {
    parse(source, false)
}

/// Scan and parse the source of the file at `path`, accepting JSX when the
/// extension allows it.
pub fn parse_file_source(source: &str, path: &Path) -> Result<Program, ParserError> {
    parse(source, allows_jsx(path))
}

/// `.tsx` files and JavaScript files may contain JSX elements.
pub fn allows_jsx(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("tsx" | "jsx" | "js" | "mjs" | "cjs")
    )
}

fn parse(source: &str, jsx: bool) -> Result<Program, ParserError> {
    let tokens = Scanner::new(source).jsx(jsx).scan_tokens()?;
    Parser::new(tokens).parse()
}
