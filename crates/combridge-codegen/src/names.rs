//! Foreign names as Rust identifiers.
//!
//! Keywords are emitted raw and the few words that cannot be raw get a
//! trailing underscore. Anything else must already be a Rust identifier;
//! names are checked before emission so a bad name is a diagnostic rather
//! than a panic inside `proc_macro2`.

use combridge_core::GenerationError;

/// Words that must be written as raw identifiers.
pub(crate) const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Words that cannot even be raw identifiers.
pub(crate) const RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Whether `name` can be emitted as an identifier.
pub(crate) fn is_valid(name: &str) -> bool {
    if RESERVED.contains(&name) || KEYWORDS.contains(&name) {
        return true;
    }
    !name.starts_with("r#") && syn::parse_str::<syn::Ident>(name).is_ok()
}

/// Check a name used by `declaration`.
pub(crate) fn check(declaration: &str, name: &str) -> Result<(), GenerationError> {
    if is_valid(name) {
        Ok(())
    } else {
        Err(GenerationError::InvalidName {
            declaration: declaration.to_string(),
            name: name.to_string(),
        })
    }
}
