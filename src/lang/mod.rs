/*!
# Rust Language Module

This Rust module provides lexical analysis, parsing and semantic
checking of the CineBrew language.

*/

pub type LineNumber = usize;

#[macro_use]
mod error;
mod lex;
mod parse;
mod semantic;
mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use error::Stage;
pub use lex::lex;
pub use lex::Lexer;
pub use parse::parse;
pub use parse::Parser;
pub use semantic::analyze;
pub use semantic::Analyzer;
pub use semantic::Symbol;
pub use semantic::SymbolKind;
pub use token::Keywords;
pub use token::Token;
pub use token::TokenKind;

pub mod ast;
