//! JSON exchange format with the external header analyzer.
//!
//! The analyzer writes one document per header set:
//!
//! ```json
//! {
//!   "types": [
//!     { "entry": "class", "name": "IFoo", "methods": [
//!         { "name": "getValue", "return_type": { "primitive": "int32" } } ] }
//!   ],
//!   "constants": [ { "name": "kVendor", "value": { "str": "Acme" } } ],
//!   "identifiers": [ { "name": "IFoo", "guid": "11111111-22222222-33333333-44444444" } ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use combridge_core::{ConstantEntry, Guid, ModelError, TypeEntry};

use crate::IdmBuilder;

/// An identifier declaration carried in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierDecl {
    pub name: String,
    pub guid: Guid,
}

/// Serialized interface model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdmDocument {
    #[serde(default)]
    pub types: Vec<TypeEntry>,
    #[serde(default)]
    pub constants: Vec<ConstantEntry>,
    #[serde(default)]
    pub identifiers: Vec<IdentifierDecl>,
}

impl IdmDocument {
    /// Parse a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        serde_json::from_str(text).map_err(|e| ModelError::Document(e.to_string()))
    }

    /// Render the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(self).map_err(|e| ModelError::Document(e.to_string()))
    }

    /// Convert into a builder so more declarations can be added.
    pub fn into_builder(self) -> IdmBuilder {
        let mut builder = IdmBuilder::new();
        for entry in self.types {
            builder.add_type(entry);
        }
        for constant in self.constants {
            builder.add_constant(constant);
        }
        for decl in self.identifiers {
            builder.add_identifier(decl.name, decl.guid);
        }
        builder
    }
}
