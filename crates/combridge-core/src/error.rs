//! Unified error types for combridge.
//!
//! This module provides the error type hierarchy for every offline phase of
//! the bridge generator: scanning header text, building the interface model
//! and generating the bindings.
//!
//! ## Error Hierarchy
//!
//! ```text
//! BridgeError (top-level wrapper)
//! ├── ScanErrors       - Declaration scanner errors (one or more ScanError)
//! ├── ModelError       - Interface model construction errors
//! └── GenerationError  - Classification, layout, slot and emission errors
//! ```
//!
//! Generation never skips a declaration silently: every error names the
//! declaration that caused it.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Scan Errors
// ============================================================================

/// Errors that occur while scanning header text for declarations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// An identifier declaration did not have exactly four groups.
    #[error("identifier declaration for '{name}' at {span} has {found} groups, expected 4")]
    WrongGroupCount {
        name: String,
        found: usize,
        span: Span,
    },

    /// A group was not a hexadecimal or decimal 32-bit literal.
    #[error("invalid identifier group '{text}' at {span}")]
    InvalidGroup { text: String, span: Span },

    /// The macro invocation was malformed.
    #[error("malformed identifier declaration at {span}: {detail}")]
    Malformed { detail: String, span: Span },

    /// A string literal was not properly terminated.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// A block comment was not properly terminated.
    #[error("unterminated comment at {span}")]
    UnterminatedComment { span: Span },

    /// The same interface was given two different identifiers.
    #[error("conflicting identifiers declared for '{name}' at {span}")]
    ConflictingIdentifier { name: String, span: Span },
}

impl ScanError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            ScanError::WrongGroupCount { span, .. }
            | ScanError::InvalidGroup { span, .. }
            | ScanError::Malformed { span, .. }
            | ScanError::UnterminatedString { span }
            | ScanError::UnterminatedComment { span }
            | ScanError::ConflictingIdentifier { span, .. } => *span,
        }
    }
}

/// A collection of scan errors.
///
/// The scanner keeps going after a bad declaration so every problem in a
/// header is reported at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanErrors {
    errors: Vec<ScanError>,
}

impl ScanErrors {
    /// Create a new empty error collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn push(&mut self, error: ScanError) {
        self.errors.push(error);
    }

    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &ScanError> {
        self.errors.iter()
    }

    /// Convert to a Vec of errors.
    pub fn into_vec(self) -> Vec<ScanError> {
        self.errors
    }
}

impl std::fmt::Display for ScanErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "no scan errors"),
            [only] => write!(f, "{only}"),
            [first, rest @ ..] => write!(f, "{first} (and {} more)", rest.len()),
        }
    }
}

impl std::error::Error for ScanErrors {}

impl IntoIterator for ScanErrors {
    type Item = ScanError;
    type IntoIter = std::vec::IntoIter<ScanError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ScanErrors {
    type Item = &'a ScanError;
    type IntoIter = std::slice::Iter<'a, ScanError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl From<ScanError> for ScanErrors {
    fn from(error: ScanError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

// ============================================================================
// Model Errors
// ============================================================================

/// Errors that occur while building the interface model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Two declarations share a name.
    #[error("duplicate declaration: '{name}' is already declared as {existing}")]
    Duplicate { name: String, existing: &'static str },

    /// A class names a base that is not declared.
    #[error("'{class}' derives from unknown base '{base}'")]
    UnknownBase { class: String, base: String },

    /// A class names a base that is not a class.
    #[error("'{class}' derives from '{base}', which is not a class")]
    BaseNotClass { class: String, base: String },

    /// The inheritance graph has a cycle.
    #[error("circular inheritance involving '{class}'")]
    CircularInheritance { class: String },

    /// An identifier was scanned for a class that does not exist.
    #[error("identifier declared for unknown class '{name}'")]
    OrphanIdentifier { name: String },

    /// A scanned identifier disagrees with the one in the model.
    #[error("identifier for '{name}' differs from the one already in the model")]
    ConflictingIdentifier { name: String },

    /// The JSON document could not be read.
    #[error("invalid interface model document: {0}")]
    Document(String),
}

impl ModelError {
    /// Name of the declaration this error concerns, if any.
    pub fn declaration(&self) -> Option<&str> {
        match self {
            ModelError::Duplicate { name, .. }
            | ModelError::OrphanIdentifier { name }
            | ModelError::ConflictingIdentifier { name } => Some(name),
            ModelError::UnknownBase { class, .. }
            | ModelError::BaseNotClass { class, .. }
            | ModelError::CircularInheritance { class } => Some(class),
            ModelError::Document(_) => None,
        }
    }
}

// ============================================================================
// Generation Errors
// ============================================================================

/// Errors that halt binding generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A type spelling the layout resolver cannot express.
    #[error("unsupported type '{spelling}' in '{declaration}'")]
    UnsupportedType {
        declaration: String,
        spelling: String,
    },

    /// A name that is not declared anywhere in the model.
    #[error("unknown type '{name}' referenced from '{declaration}'")]
    UnknownType { declaration: String, name: String },

    /// An interface used by value instead of through a pointer.
    #[error("interface '{interface}' used by value in '{declaration}'")]
    InterfaceByValue {
        declaration: String,
        interface: String,
    },

    /// A record that contains itself without indirection.
    #[error("record '{declaration}' contains itself by value")]
    RecursiveRecord { declaration: String },

    /// A fixed-size array of zero elements.
    #[error("zero-length array in '{declaration}'")]
    ZeroLengthArray { declaration: String },

    /// An interface with more than one base.
    #[error("interface '{declaration}' has {count} bases; only single inheritance is supported")]
    AmbiguousInheritance { declaration: String, count: usize },

    /// An interface without an identifier.
    #[error("interface '{declaration}' has no identifier")]
    MissingIdentifier { declaration: String },

    /// A name that is not an interface where one is required.
    #[error("'{declaration}' is not an interface")]
    NotAnInterface { declaration: String },

    /// Inbound proxies requested while an ancestor has none.
    #[error("interface '{declaration}' requests inbound proxies but its ancestor '{ancestor}' does not")]
    InboundAncestor {
        declaration: String,
        ancestor: String,
    },

    /// A declared name that cannot be emitted as a Rust identifier.
    #[error("'{name}' in '{declaration}' is not a valid identifier")]
    InvalidName { declaration: String, name: String },

    /// Outbound proxies requested while an ancestor has none.
    #[error("interface '{declaration}' requests outbound proxies but its ancestor '{ancestor}' does not")]
    OutboundAncestor {
        declaration: String,
        ancestor: String,
    },

    /// A configured runtime path or identifier that is not valid Rust.
    #[error("invalid configuration: {detail}")]
    InvalidConfig { detail: String },
}

impl GenerationError {
    /// Name of the declaration that caused this error.
    pub fn declaration(&self) -> Option<&str> {
        match self {
            GenerationError::UnsupportedType { declaration, .. }
            | GenerationError::UnknownType { declaration, .. }
            | GenerationError::InterfaceByValue { declaration, .. }
            | GenerationError::RecursiveRecord { declaration }
            | GenerationError::ZeroLengthArray { declaration }
            | GenerationError::AmbiguousInheritance { declaration, .. }
            | GenerationError::MissingIdentifier { declaration }
            | GenerationError::NotAnInterface { declaration }
            | GenerationError::InboundAncestor { declaration, .. }
            | GenerationError::OutboundAncestor { declaration, .. }
            | GenerationError::InvalidName { declaration, .. } => Some(declaration),
            GenerationError::InvalidConfig { .. } => None,
        }
    }
}

// ============================================================================
// Top-level Error
// ============================================================================

/// Top-level error type for the whole generation pipeline.
///
/// # Example
///
/// ```ignore
/// use combridge_core::BridgeError;
///
/// fn run(header: &str, mut idm: IdmBuilder) -> Result<GeneratedBindings, BridgeError> {
///     let scanned = scanner.scan(header)?;           // ScanErrors -> BridgeError
///     for id in scanned.identifiers {
///         idm.add_identifier(id.name, id.guid);
///     }
///     let idm = idm.build()?;                        // ModelError -> BridgeError
///     Ok(generate(&idm, &GeneratorConfig::new())?)   // GenerationError -> BridgeError
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// Scanning errors.
    #[error(transparent)]
    Scan(#[from] ScanErrors),

    /// Model errors.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Generation errors.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl BridgeError {
    /// Check if this is a scan error.
    pub fn is_scan(&self) -> bool {
        matches!(self, BridgeError::Scan(_))
    }

    /// Check if this is a model error.
    pub fn is_model(&self) -> bool {
        matches!(self, BridgeError::Model(_))
    }

    /// Check if this is a generation error.
    pub fn is_generation(&self) -> bool {
        matches!(self, BridgeError::Generation(_))
    }
}

impl From<ScanError> for BridgeError {
    fn from(error: ScanError) -> Self {
        BridgeError::Scan(error.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_span() {
        let span = Span::new(3, 1, 40);
        let err = ScanError::WrongGroupCount {
            name: "IFoo".into(),
            found: 3,
            span,
        };
        assert_eq!(err.span(), span);
        assert!(err.to_string().contains("has 3 groups"));
    }

    #[test]
    fn scan_errors_display() {
        let mut errors = ScanErrors::new();
        assert!(errors.is_empty());
        errors.push(ScanError::UnterminatedString {
            span: Span::new(1, 1, 1),
        });
        errors.push(ScanError::UnterminatedComment {
            span: Span::new(2, 1, 1),
        });
        assert_eq!(errors.len(), 2);
        assert!(errors.to_string().ends_with("(and 1 more)"));
    }

    #[test]
    fn generation_error_names_declaration() {
        let err = GenerationError::AmbiguousInheritance {
            declaration: "IBoth".into(),
            count: 2,
        };
        assert_eq!(err.declaration(), Some("IBoth"));
        assert!(err.to_string().contains("IBoth"));
    }

    #[test]
    fn bridge_error_from_phases() {
        let err: BridgeError = ModelError::CircularInheritance {
            class: "IA".into(),
        }
        .into();
        assert!(err.is_model());
        assert_eq!(err.to_string(), "circular inheritance involving 'IA'");

        let err: BridgeError = GenerationError::MissingIdentifier {
            declaration: "IFoo".into(),
        }
        .into();
        assert!(err.is_generation());

        let err: BridgeError = ScanError::Malformed {
            detail: "missing ')'".into(),
            span: Span::new(1, 1, 5),
        }
        .into();
        assert!(err.is_scan());
    }
}
