//! Lexer module for TypeScript sources.

mod jsx;
pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{Token, TokenKind};
