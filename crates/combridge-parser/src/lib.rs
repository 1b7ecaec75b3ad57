//! Declaration scanner for combridge.
//!
//! The full native header analysis is done by an external tool that writes an
//! interface model document. Two things are recovered directly from header
//! text here, because the analyzer does not carry them:
//!
//! - interface identifiers declared through a macro such as
//!   `DECLARE_CLASS_IID(IFoo, 0x11111111, 0x22222222, 0x33333333, 0x44444444)`
//! - `#define` constants, in particular the string constants that name plug-in
//!   categories
//!
//! # Example
//!
//! ```
//! use combridge_parser::{DeclarationScanner, ScanConfig};
//!
//! let scanner = DeclarationScanner::new(ScanConfig::default());
//! let output = scanner
//!     .scan("DECLARE_CLASS_IID (IFoo, 0x11111111, 0x22222222, 0x33333333, 0x44444444)")
//!     .unwrap();
//! assert_eq!(output.identifiers[0].name, "IFoo");
//! ```

pub mod lexer;
mod scanner;

pub use scanner::{DeclarationScanner, ScanConfig, ScanOutput, ScannedIdentifier};
