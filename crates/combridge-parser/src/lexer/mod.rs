//! Lexical analysis for C/C++ header text.
//!
//! Only the token shapes needed to recognize identifier declarations and
//! `#define` constants are produced; everything else comes through as
//! punctuation.

mod cursor;
mod lexer;
mod token;

pub use lexer::{Lexed, Lexer};
pub use token::{Token, TokenKind};
