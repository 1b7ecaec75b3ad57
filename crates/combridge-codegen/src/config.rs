//! Generator configuration.

use std::collections::BTreeMap;

use combridge_core::{BridgeDirections, GenerationError};

/// A per-interface override of the proxy directions.
///
/// Every override carries the reason it exists so that exclusions stay
/// reviewable instead of living in a bare list of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionPolicy {
    pub directions: BridgeDirections,
    pub reason: String,
}

/// Names of the three identity methods on the root interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityMethods {
    pub query_interface: String,
    pub add_ref: String,
    pub release: String,
}

impl Default for IdentityMethods {
    fn default() -> Self {
        Self {
            query_interface: "queryInterface".to_string(),
            add_ref: "addRef".to_string(),
            release: "release".to_string(),
        }
    }
}

/// Configuration for binding generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Root identity interface. Only classes deriving from it (or the root
    /// itself) can be interfaces. `None` classifies by method shape alone.
    pub root_interface: Option<String>,
    /// Identity method names on the root interface.
    pub identity_methods: IdentityMethods,
    /// Typedef name that denotes the foreign result code.
    pub result_code_typedef: Option<String>,
    /// Typedef name of the 16-byte identifier; parameters of this type are
    /// passed as `*const`.
    pub identifier_typedef: Option<String>,
    /// Macro names the declaration scanner treats as identifier declarations.
    pub identifier_macros: Vec<String>,
    /// Path of the runtime crate as seen from the generated code.
    pub runtime_path: String,
    /// Target pointer width in bits.
    pub pointer_width: usize,
    /// Emit compile-time size, alignment and offset assertions.
    pub layout_assertions: bool,
    /// Per-interface direction overrides, keyed by interface name.
    pub directions: BTreeMap<String, DirectionPolicy>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root_interface: Some("FUnknown".to_string()),
            identity_methods: IdentityMethods::default(),
            result_code_typedef: Some("tresult".to_string()),
            identifier_typedef: Some("TUID".to_string()),
            identifier_macros: vec!["DECLARE_CLASS_IID".to_string()],
            runtime_path: "::combridge_runtime".to_string(),
            pointer_width: 64,
            layout_assertions: true,
            directions: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root identity interface.
    pub fn with_root_interface(mut self, name: impl Into<String>) -> Self {
        self.root_interface = Some(name.into());
        self
    }

    /// Classify interfaces by method shape alone.
    pub fn without_root_interface(mut self) -> Self {
        self.root_interface = None;
        self
    }

    /// Set the identity method names.
    pub fn with_identity_methods(
        mut self,
        query_interface: impl Into<String>,
        add_ref: impl Into<String>,
        release: impl Into<String>,
    ) -> Self {
        self.identity_methods = IdentityMethods {
            query_interface: query_interface.into(),
            add_ref: add_ref.into(),
            release: release.into(),
        };
        self
    }

    /// Set the result-code typedef name.
    pub fn with_result_code_typedef(mut self, name: impl Into<String>) -> Self {
        self.result_code_typedef = Some(name.into());
        self
    }

    /// Set the identifier typedef name.
    pub fn with_identifier_typedef(mut self, name: impl Into<String>) -> Self {
        self.identifier_typedef = Some(name.into());
        self
    }

    /// Recognize an additional identifier macro.
    pub fn with_identifier_macro(mut self, name: impl Into<String>) -> Self {
        self.identifier_macros.push(name.into());
        self
    }

    /// Set the runtime crate path.
    pub fn with_runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }

    /// Set the target pointer width in bits (32 or 64).
    pub fn with_pointer_width(mut self, bits: usize) -> Self {
        self.pointer_width = bits;
        self
    }

    /// Turn layout assertions on or off.
    pub fn with_layout_assertions(mut self, enabled: bool) -> Self {
        self.layout_assertions = enabled;
        self
    }

    /// Override the directions of one interface.
    pub fn with_direction(
        mut self,
        interface: impl Into<String>,
        directions: BridgeDirections,
        reason: impl Into<String>,
    ) -> Self {
        self.directions.insert(
            interface.into(),
            DirectionPolicy {
                directions,
                reason: reason.into(),
            },
        );
        self
    }

    /// Pointer size in bytes.
    pub fn pointer_size(&self) -> usize {
        self.pointer_width / 8
    }

    /// Check the configuration before generating.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if !matches!(self.pointer_width, 32 | 64) {
            return Err(GenerationError::InvalidConfig {
                detail: format!("unsupported pointer width {}", self.pointer_width),
            });
        }
        if syn::parse_str::<syn::Path>(&self.runtime_path).is_err() {
            return Err(GenerationError::InvalidConfig {
                detail: format!("runtime path '{}' is not a Rust path", self.runtime_path),
            });
        }
        if let Some((name, _)) = self.directions.iter().find(|(_, p)| p.reason.trim().is_empty()) {
            return Err(GenerationError::InvalidConfig {
                detail: format!("direction override for '{name}' has no reason"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.root_interface.as_deref(), Some("FUnknown"));
        assert_eq!(config.pointer_size(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder() {
        let config = GeneratorConfig::new()
            .without_root_interface()
            .with_pointer_width(32)
            .with_runtime_path("crate::rt")
            .with_direction("IPlugView", BridgeDirections::OUTBOUND, "host-provided only");

        assert_eq!(config.root_interface, None);
        assert_eq!(config.pointer_size(), 4);
        assert_eq!(
            config.directions["IPlugView"].directions,
            BridgeDirections::OUTBOUND
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_configs() {
        assert!(GeneratorConfig::new().with_pointer_width(16).validate().is_err());
        assert!(GeneratorConfig::new().with_runtime_path("not a path!").validate().is_err());
        assert!(
            GeneratorConfig::new()
                .with_direction("IFoo", BridgeDirections::OUTBOUND, " ")
                .validate()
                .is_err()
        );
    }
}
