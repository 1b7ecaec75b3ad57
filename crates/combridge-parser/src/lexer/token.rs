//! Header tokens.

use combridge_core::Span;

/// Kind of a header token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident,
    /// Integer or floating-point literal, as written.
    Number,
    /// String literal; the token's `text` holds the unescaped contents.
    Str,
    /// Character literal, as written.
    Char,
    /// `#` at the start of a preprocessor directive.
    Hash,
    /// Any other single character.
    Punct(char),
}

/// A header token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Check if this is the identifier `name`.
    pub fn is_ident(&self, name: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == name
    }

    /// Check if this is the punctuation character `ch`.
    pub fn is_punct(&self, ch: char) -> bool {
        self.kind == TokenKind::Punct(ch)
    }

    /// Line the token starts on.
    pub fn line(&self) -> u32 {
        self.span.line
    }
}
