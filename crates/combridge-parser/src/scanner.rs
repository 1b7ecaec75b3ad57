//! Declaration scanner.
//!
//! Recognizes two shapes in header text:
//!
//! - identifier declarations `MACRO(InterfaceName, 0xHEX, 0xHEX, 0xHEX, 0xHEX)`
//!   for every macro name in [`ScanConfig::identifier_macros`]
//! - object-like `#define NAME value` directives whose value is a string
//!   literal (adjacent literals are concatenated) or a single numeric literal
//!
//! Every other token is ignored. Macro *definitions* (`#define MACRO(...)`)
//! are skipped as a whole, so a header that defines the identifier macro
//! itself scans cleanly.

use tracing::{debug, trace};

use combridge_core::{ConstantEntry, ConstantValue, Guid, ScanError, ScanErrors, Span};

use crate::lexer::{Lexed, Lexer, Token, TokenKind};

/// Scanner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Macro names that declare an interface identifier.
    pub identifier_macros: Vec<String>,
    /// Collect `#define` constants.
    pub collect_constants: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            identifier_macros: vec!["DECLARE_CLASS_IID".to_string()],
            collect_constants: true,
        }
    }
}

impl ScanConfig {
    /// Recognize an additional identifier macro.
    pub fn with_identifier_macro(mut self, name: impl Into<String>) -> Self {
        self.identifier_macros.push(name.into());
        self
    }

    /// Replace the identifier macro list.
    pub fn with_identifier_macros<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.identifier_macros = names.into_iter().map(Into::into).collect();
        self
    }

    /// Turn `#define` collection on or off.
    pub fn with_constants(mut self, collect: bool) -> Self {
        self.collect_constants = collect;
        self
    }
}

/// An identifier declaration found in header text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedIdentifier {
    pub name: String,
    pub guid: Guid,
    pub span: Span,
}

/// Everything the scanner found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutput {
    /// Identifier declarations, first occurrence order.
    pub identifiers: Vec<ScannedIdentifier>,
    /// Constants, first occurrence order.
    pub constants: Vec<ConstantEntry>,
}

impl ScanOutput {
    /// Look up a scanned identifier by interface name.
    pub fn identifier(&self, name: &str) -> Option<Guid> {
        self.identifiers.iter().find(|i| i.name == name).map(|i| i.guid)
    }

    /// Merge the results of scanning another header.
    pub fn extend(&mut self, other: ScanOutput) -> Result<(), ScanError> {
        for ident in other.identifiers {
            push_identifier(&mut self.identifiers, ident)?;
        }
        for constant in other.constants {
            push_constant(&mut self.constants, constant);
        }
        Ok(())
    }
}

/// Scans header text for declarations.
#[derive(Debug, Clone, Default)]
pub struct DeclarationScanner {
    config: ScanConfig,
}

impl DeclarationScanner {
    /// Create a scanner with the given configuration.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan one header.
    ///
    /// Scanning continues past bad declarations so that all problems are
    /// reported together.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn scan(&self, source: &str) -> Result<ScanOutput, ScanErrors> {
        let mut errors = ScanErrors::new();
        let mut tokens = Vec::new();
        for lexed in Lexer::new(source) {
            match lexed {
                Ok(lexed) => tokens.push(lexed),
                Err(err) => errors.push(err),
            }
        }

        let mut output = ScanOutput::default();
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i].token;
            if token.kind == TokenKind::Hash {
                let end = directive_end(&tokens, i);
                if self.config.collect_constants
                    && let Some(constant) = parse_define(&tokens[i + 1..end])
                {
                    trace!(name = %constant.name, "scanned constant");
                    push_constant(&mut output.constants, constant);
                }
                i = end;
                continue;
            }

            let is_macro = token.kind == TokenKind::Ident
                && self.config.identifier_macros.iter().any(|m| *m == token.text)
                && tokens.get(i + 1).is_some_and(|t| t.token.is_punct('('));
            if !is_macro {
                i += 1;
                continue;
            }

            match parse_invocation(&tokens, i) {
                Ok((ident, next)) => {
                    trace!(name = %ident.name, guid = %ident.guid, "scanned identifier");
                    if let Err(err) = push_identifier(&mut output.identifiers, ident) {
                        errors.push(err);
                    }
                    i = next;
                }
                Err((err, next)) => {
                    errors.push(err);
                    i = next;
                }
            }
        }

        debug!(
            identifiers = output.identifiers.len(),
            constants = output.constants.len(),
            errors = errors.len(),
            "scanned header"
        );

        if errors.is_empty() {
            Ok(output)
        } else {
            Err(errors)
        }
    }
}

fn push_identifier(list: &mut Vec<ScannedIdentifier>, ident: ScannedIdentifier) -> Result<(), ScanError> {
    match list.iter().find(|existing| existing.name == ident.name) {
        Some(existing) if existing.guid != ident.guid => Err(ScanError::ConflictingIdentifier {
            name: ident.name,
            span: ident.span,
        }),
        Some(_) => Ok(()),
        None => {
            list.push(ident);
            Ok(())
        }
    }
}

/// Keeps the first definition; later ones usually sit in other `#if` branches.
fn push_constant(list: &mut Vec<ConstantEntry>, constant: ConstantEntry) {
    if !list.iter().any(|c| c.name == constant.name) {
        list.push(constant);
    }
}

/// Index one past the last token of the directive starting at `start`.
fn directive_end(tokens: &[Lexed], start: usize) -> usize {
    let line = tokens[start].logical_line;
    tokens[start..]
        .iter()
        .position(|t| t.logical_line != line)
        .map_or(tokens.len(), |offset| start + offset)
}

/// Parse `define NAME value...` (the tokens after `#`).
fn parse_define(tokens: &[Lexed]) -> Option<ConstantEntry> {
    let [directive, name, value @ ..] = tokens else {
        return None;
    };
    if !directive.token.is_ident("define") || name.token.kind != TokenKind::Ident {
        return None;
    }
    // Function-like macro: '(' directly after the name.
    if let Some(first) = value.first()
        && first.token.is_punct('(')
        && first.token.span.line == name.token.span.line
        && first.token.span.col == name.token.span.end_col()
    {
        return None;
    }

    let value: Vec<&Token> = value.iter().map(|t| &t.token).collect();
    let value = strip_parens(&value);
    let parsed = match value {
        [] => return None,
        strings if strings.iter().all(|t| t.kind == TokenKind::Str) => {
            ConstantValue::Str(strings.iter().map(|t| t.text.as_str()).collect())
        }
        [number] if number.kind == TokenKind::Number => parse_number(&number.text, false)?,
        [minus, number] if minus.is_punct('-') && number.kind == TokenKind::Number => {
            parse_number(&number.text, true)?
        }
        _ => return None,
    };
    Some(ConstantEntry::new(name.token.text.clone(), parsed))
}

fn strip_parens<'a, 'b>(mut tokens: &'b [&'a Token]) -> &'b [&'a Token] {
    while let [open, inner @ .., close] = tokens {
        if open.is_punct('(') && close.is_punct(')') {
            tokens = inner;
        } else {
            break;
        }
    }
    tokens
}

/// Parse a numeric literal as written in C.
fn parse_number(text: &str, negative: bool) -> Option<ConstantValue> {
    let text: String = text.chars().filter(|&c| c != '\'').collect();
    let lower = text.to_ascii_lowercase();
    let is_hex = lower.starts_with("0x");

    if !is_hex && (lower.contains('.') || lower.contains('e')) {
        let digits = lower.trim_end_matches(['f', 'l']);
        let value: f64 = digits.parse().ok()?;
        return Some(ConstantValue::Float(if negative { -value } else { value }));
    }

    let suffix_start = lower
        .rfind(|c: char| !matches!(c, 'u' | 'l'))
        .map_or(0, |idx| idx + 1);
    let (digits, suffix) = lower.split_at(suffix_start);
    let value = parse_integer(digits)?;
    if negative {
        let value = i64::try_from(value).ok()?;
        return Some(ConstantValue::Signed(-value));
    }
    if suffix.contains('u') {
        return Some(ConstantValue::Unsigned(value));
    }
    Some(match i64::try_from(value) {
        Ok(signed) => ConstantValue::Signed(signed),
        Err(_) => ConstantValue::Unsigned(value),
    })
}

/// Parse the digits of an integer literal, without suffix.
fn parse_integer(digits: &str) -> Option<u64> {
    if let Some(hex) = digits.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = digits.strip_prefix("0b") {
        u64::from_str_radix(bin, 2).ok()
    } else if digits.len() > 1 && digits.starts_with('0') {
        u64::from_str_radix(&digits[1..], 8).ok()
    } else {
        digits.parse().ok()
    }
}

/// Parse one identifier group as an unsigned 32-bit value.
fn parse_group(token: &Token) -> Option<u32> {
    if token.kind != TokenKind::Number {
        return None;
    }
    match parse_number(&token.text, false)? {
        ConstantValue::Signed(v) => u32::try_from(v).ok(),
        ConstantValue::Unsigned(v) => u32::try_from(v).ok(),
        ConstantValue::Float(_) | ConstantValue::Str(_) => None,
    }
}

type InvocationResult = Result<(ScannedIdentifier, usize), (ScanError, usize)>;

/// Parse `MACRO ( name , g0 , g1 , g2 , g3 )` starting at the macro name.
///
/// On success returns the identifier and the index after `)`. On failure
/// returns the error and the index to resume scanning from.
fn parse_invocation(tokens: &[Lexed], start: usize) -> InvocationResult {
    let macro_token = &tokens[start].token;
    let open = start + 1;

    let mut args: Vec<Vec<&Token>> = vec![Vec::new()];
    let mut depth = 0usize;
    let mut close = None;
    for (idx, lexed) in tokens.iter().enumerate().skip(open + 1) {
        let token = &lexed.token;
        if token.is_punct('(') {
            depth += 1;
        } else if token.is_punct(')') {
            if depth == 0 {
                close = Some(idx);
                break;
            }
            depth -= 1;
        } else if token.is_punct(',') && depth == 0 {
            args.push(Vec::new());
            continue;
        } else if token.is_punct(';') || token.kind == TokenKind::Hash {
            break;
        }
        if let Some(arg) = args.last_mut() {
            arg.push(token);
        }
    }

    let Some(close) = close else {
        return Err((
            ScanError::Malformed {
                detail: format!("missing ')' after {}(", macro_token.text),
                span: macro_token.span,
            },
            open + 1,
        ));
    };
    let span = macro_token.span.through(tokens[close].token.span);
    let next = close + 1;

    let name = args
        .first()
        .and_then(|arg| arg.iter().rev().find(|t| t.kind == TokenKind::Ident))
        .map(|t| t.text.clone());
    let Some(name) = name else {
        return Err((
            ScanError::Malformed {
                detail: "expected an interface name".to_string(),
                span,
            },
            next,
        ));
    };

    let groups = &args[1..];
    if groups.len() != 4 {
        return Err((
            ScanError::WrongGroupCount {
                name,
                found: groups.len(),
                span,
            },
            next,
        ));
    }

    let mut words = [0u32; 4];
    for (word, group) in words.iter_mut().zip(groups) {
        let parsed = match group.as_slice() {
            [token] => parse_group(token),
            _ => None,
        };
        match parsed {
            Some(value) => *word = value,
            None => {
                let text = group.iter().map(|t| t.text.as_str()).collect::<Vec<_>>().join(" ");
                let span = group.first().map_or(span, |t| t.span);
                return Err((ScanError::InvalidGroup { text, span }, next));
            }
        }
    }

    Ok((
        ScannedIdentifier {
            name,
            guid: Guid::from_words(words[0], words[1], words[2], words[3]),
            span,
        },
        next,
    ))
}
