//! Header lexer.
//!
//! The [`Lexer`] converts header text into a stream of [`Token`]s. Comments
//! and whitespace are dropped. Each token records its *logical* line: lines
//! joined with a trailing backslash and newlines inside block comments do not
//! start a new logical line, which is what preprocessor directives need.

use combridge_core::{ScanError, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind};

/// Lexer for C/C++ header text.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    logical_line: u32,
    done: bool,
}

/// A token together with the logical line it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed {
    pub token: Token,
    pub logical_line: u32,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given header text.
    pub fn new(source: &'src str) -> Self {
        let mut cursor = Cursor::new(source);
        cursor.eat('\u{FEFF}');
        Self {
            cursor,
            logical_line: 1,
            done: false,
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), ScanError> {
        loop {
            match self.cursor.peek() {
                Some('\n') => {
                    self.cursor.advance();
                    self.logical_line += 1;
                }
                Some(c) if c.is_whitespace() => {
                    self.cursor.advance();
                }
                Some('\\') if self.cursor.peek_nth(1) == Some('\n') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('\\')
                    if self.cursor.peek_nth(1) == Some('\r')
                        && self.cursor.peek_nth(2) == Some('\n') =>
                {
                    self.cursor.advance();
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('/') if self.cursor.check_str("//") => {
                    self.cursor.eat_while(|c| c != '\n');
                }
                Some('/') if self.cursor.check_str("/*") => {
                    let span = Span::new(self.cursor.line(), self.cursor.column(), 2);
                    self.cursor.advance();
                    self.cursor.advance();
                    loop {
                        if self.cursor.check_str("*/") {
                            self.cursor.advance();
                            self.cursor.advance();
                            break;
                        }
                        if self.cursor.advance().is_none() {
                            return Err(ScanError::UnterminatedComment { span });
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn scan_token(&mut self, c: char) -> Result<Token, ScanError> {
        let line = self.cursor.line();
        let col = self.cursor.column();
        let start = self.cursor.offset();
        let span = |cursor: &Cursor<'_>| Span::new(line, col, cursor.offset() - start);

        if is_ident_start(c) {
            // Prefixed literals: L"..", u"..", U"..", u8"..".
            let ident = self.cursor.eat_while(is_ident_continue);
            if matches!(ident, "L" | "u" | "U" | "u8") && self.cursor.peek() == Some('"') {
                return self.scan_string(line, col, start);
            }
            return Ok(Token::new(TokenKind::Ident, ident, span(&self.cursor)));
        }

        if c.is_ascii_digit() || (c == '.' && self.cursor.peek_nth(1).is_some_and(|d| d.is_ascii_digit())) {
            let text = self.scan_number();
            return Ok(Token::new(TokenKind::Number, text, span(&self.cursor)));
        }

        match c {
            '"' => self.scan_string(line, col, start),
            '\'' => {
                self.cursor.advance();
                while let Some(ch) = self.cursor.peek() {
                    match ch {
                        '\'' => break,
                        '\n' => {
                            return Err(ScanError::UnterminatedString { span: span(&self.cursor) });
                        }
                        '\\' => {
                            self.cursor.advance();
                            self.cursor.advance();
                        }
                        _ => {
                            self.cursor.advance();
                        }
                    }
                }
                if !self.cursor.eat('\'') {
                    return Err(ScanError::UnterminatedString { span: span(&self.cursor) });
                }
                Ok(Token::new(TokenKind::Char, self.cursor.slice_from(start), span(&self.cursor)))
            }
            '#' => {
                self.cursor.advance();
                Ok(Token::new(TokenKind::Hash, "#", span(&self.cursor)))
            }
            other => {
                self.cursor.advance();
                Ok(Token::new(TokenKind::Punct(other), other.to_string(), span(&self.cursor)))
            }
        }
    }

    /// Scan a numeric literal including any suffix, exponent or hex digits.
    fn scan_number(&mut self) -> &'src str {
        let start = self.cursor.offset();
        loop {
            match self.cursor.peek() {
                Some(c) if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '\'' => {
                    let was_exponent = matches!(c, 'e' | 'E' | 'p' | 'P');
                    self.cursor.advance();
                    if was_exponent && self.cursor.check(|s| s == '+' || s == '-') {
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }
        self.cursor.slice_from(start)
    }

    /// Scan a string literal, unescaping its contents.
    fn scan_string(&mut self, line: u32, col: u32, start: u32) -> Result<Token, ScanError> {
        self.cursor.advance(); // opening quote
        let mut value = String::new();
        loop {
            let span = Span::new(line, col, self.cursor.offset() - start);
            if self.cursor.check(|c| c == '\n') {
                return Err(ScanError::UnterminatedString { span });
            }
            match self.cursor.advance() {
                None => return Err(ScanError::UnterminatedString { span }),
                Some('"') => break,
                Some('\\') => match self.cursor.advance() {
                    None | Some('\n') => return Err(ScanError::UnterminatedString { span }),
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('0') => value.push('\0'),
                    Some(other) => value.push(other),
                },
                Some(ch) => value.push(ch),
            }
        }
        Ok(Token::new(
            TokenKind::Str,
            value,
            Span::new(line, col, self.cursor.offset() - start),
        ))
    }

    /// Skip the rest of the current physical line after an error.
    fn recover(&mut self) {
        self.cursor.eat_while(|c| c != '\n');
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Lexed, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Err(err) = self.skip_trivia() {
            self.done = true;
            return Some(Err(err));
        }
        let Some(c) = self.cursor.peek() else {
            self.done = true;
            return None;
        };
        let logical_line = self.logical_line;
        match self.scan_token(c) {
            Ok(token) => Some(Ok(Lexed {
                token,
                logical_line,
            })),
            Err(err) => {
                self.recover();
                Some(Err(err))
            }
        }
    }
}
