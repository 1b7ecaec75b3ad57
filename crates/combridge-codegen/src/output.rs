//! Generated bindings.

use std::fmt;

use proc_macro2::TokenStream;
use xxhash_rust::xxh64::xxh64;

use combridge_core::{BridgeDirections, Guid};

use crate::slots::SlotAllocation;

/// First line of every rendered file.
pub const HEADER: &str = "// @generated by combridge. Do not edit.";

/// What a generated item represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Record,
    Alias,
    Enum,
    Constant,
    Interface,
    LayoutAssertions,
}

/// One generated item, named after the declaration it came from.
#[derive(Debug, Clone)]
pub struct GeneratedItem {
    pub kind: ItemKind,
    pub name: String,
    pub tokens: TokenStream,
}

/// Summary of one generated interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSummary {
    pub name: String,
    pub guid: Guid,
    pub base: Option<String>,
    pub slots: SlotAllocation,
    pub directions: BridgeDirections,
}

/// The output of one generation run.
///
/// Rendering is deterministic: the same model and configuration always
/// produce byte-identical text and therefore the same [`fingerprint`].
///
/// [`fingerprint`]: GeneratedBindings::fingerprint
#[derive(Debug, Clone)]
pub struct GeneratedBindings {
    items: Vec<GeneratedItem>,
    interfaces: Vec<InterfaceSummary>,
    source: String,
    fingerprint: u64,
}

impl GeneratedBindings {
    pub(crate) fn new(items: Vec<GeneratedItem>, interfaces: Vec<InterfaceSummary>) -> Self {
        let source = render(&items);
        let fingerprint = xxh64(source.as_bytes(), 0);
        Self {
            items,
            interfaces,
            source,
            fingerprint,
        }
    }

    pub fn items(&self) -> &[GeneratedItem] {
        &self.items
    }

    /// Find the item generated for `name`.
    pub fn item(&self, kind: ItemKind, name: &str) -> Option<&GeneratedItem> {
        self.items.iter().find(|i| i.kind == kind && i.name == name)
    }

    pub fn interfaces(&self) -> &[InterfaceSummary] {
        &self.interfaces
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceSummary> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    /// All items as one token stream.
    pub fn tokens(&self) -> TokenStream {
        self.items.iter().map(|i| i.tokens.clone()).collect()
    }

    /// The rendered source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// xxh64 of the rendered source text.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

impl fmt::Display for GeneratedBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn render(items: &[GeneratedItem]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for item in items {
        out.push('\n');
        out.push_str(&item.tokens.to_string());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn item(name: &str, tokens: TokenStream) -> GeneratedItem {
        GeneratedItem {
            kind: ItemKind::Constant,
            name: name.to_string(),
            tokens,
        }
    }

    #[test]
    fn fingerprint_follows_text() {
        let a = GeneratedBindings::new(vec![item("A", quote!(pub const A: i32 = 1;))], Vec::new());
        let b = GeneratedBindings::new(vec![item("A", quote!(pub const A: i32 = 1;))], Vec::new());
        let c = GeneratedBindings::new(vec![item("A", quote!(pub const A: i32 = 2;))], Vec::new());

        assert_eq!(a.source(), b.source());
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert!(a.source().starts_with(HEADER));
        assert!(a.item(ItemKind::Constant, "A").is_some());
        assert!(a.item(ItemKind::Record, "A").is_none());
    }
}
