//! The plug-in fixture bindings, generated at build time.
//!
//! `build.rs` runs the full pipeline over `tests/fixtures` at the workspace
//! root and this crate compiles the result, so every emitted item (layout
//! assertions included) is checked by rustc and the tests call into the
//! real generated proxies and trampolines.

include!(concat!(env!("OUT_DIR"), "/plugin.rs"));

/// The analyzer document the bindings were generated from.
pub const MODEL: &str = include_str!("../../../tests/fixtures/plugin_model.json");

/// The header the identifiers and `#define` constants were scanned from.
pub const HEADER: &str = include_str!("../../../tests/fixtures/plugin_interfaces.h");

/// The generated source compiled into this crate.
pub const SOURCE: &str = include_str!(concat!(env!("OUT_DIR"), "/plugin.rs"));
