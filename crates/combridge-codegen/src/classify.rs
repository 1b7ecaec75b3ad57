//! Interface / record classification.
//!
//! A class is an interface iff it has no data, every method is pure
//! virtual, and it is (or derives from) the configured root identity
//! interface. Everything else is a record. Results are memoized in the
//! [`GenerationContext`].

use tracing::trace;

use combridge_core::{BridgeDirections, ClassEntry, GenerationError, Guid, InterfaceEntry};

use crate::context::GenerationContext;

/// What a class declaration turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    /// A vtable-only contract with an identifier.
    Interface,
    /// Plain data: a struct or union.
    Record,
}

impl<'idm> GenerationContext<'idm> {
    /// Classify the class called `name`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn classify(&mut self, name: &str) -> Result<ClassKind, GenerationError> {
        if let Some(kind) = self.kinds.get(name) {
            return Ok(*kind);
        }

        let class = self
            .idm()
            .class(name)
            .ok_or_else(|| self.unknown(name, name))?;
        let kind = if self.has_interface_shape(class) {
            ClassKind::Interface
        } else {
            ClassKind::Record
        };

        trace!(class = name, ?kind, "classified");
        self.kinds.insert(name.to_string(), kind);
        Ok(kind)
    }

    fn has_interface_shape(&self, class: &ClassEntry) -> bool {
        if class.is_union || !class.fields.is_empty() {
            return false;
        }
        if !class.methods.iter().all(|m| m.is_pure_virtual) {
            return false;
        }
        match &self.config().root_interface {
            Some(root) => class.name == *root || self.idm().derives_from(&class.name, root),
            None => !class.methods.is_empty() || !class.bases.is_empty(),
        }
    }

    /// Get the validated interface view of `name`.
    ///
    /// Fails if the class is not an interface, has more than one base, has
    /// no identifier, derives from a non-interface, or requests a direction
    /// (inbound or outbound) that an ancestor does not provide.
    pub fn interface(&mut self, name: &str) -> Result<&InterfaceEntry, GenerationError> {
        if !self.interfaces.contains_key(name) {
            let entry = self.build_interface(name)?;
            self.interfaces.insert(name.to_string(), entry);
        }
        self.interfaces
            .get(name)
            .ok_or_else(|| GenerationError::NotAnInterface {
                declaration: name.to_string(),
            })
    }

    fn build_interface(&mut self, name: &str) -> Result<InterfaceEntry, GenerationError> {
        if self.classify(name)? != ClassKind::Interface {
            return Err(GenerationError::NotAnInterface {
                declaration: name.to_string(),
            });
        }

        let idm = self.idm();
        let class = idm.class(name).ok_or_else(|| self.unknown(name, name))?;
        if class.bases.len() > 1 {
            return Err(GenerationError::AmbiguousInheritance {
                declaration: name.to_string(),
                count: class.bases.len(),
            });
        }
        let guid = class.guid.ok_or_else(|| GenerationError::MissingIdentifier {
            declaration: name.to_string(),
        })?;

        let directions = self.directions_of(class);
        let base = class.bases.first().cloned();
        if let Some(base) = &base {
            let base_entry = self.interface(base)?;
            if directions.inbound() && !base_entry.directions.inbound() {
                return Err(GenerationError::InboundAncestor {
                    declaration: name.to_string(),
                    ancestor: base_entry.name.clone(),
                });
            }
            // Inherited slots are only callable through the ancestors' traits.
            if directions.outbound() && !base_entry.directions.outbound() {
                return Err(GenerationError::OutboundAncestor {
                    declaration: name.to_string(),
                    ancestor: base_entry.name.clone(),
                });
            }
        }

        Ok(InterfaceEntry {
            name: name.to_string(),
            guid,
            base,
            methods: class.methods.clone(),
            directions,
        })
    }

    fn directions_of(&self, class: &ClassEntry) -> BridgeDirections {
        self.config()
            .directions
            .get(&class.name)
            .map(|policy| policy.directions)
            .unwrap_or(class.directions)
    }

    /// The identifier of an interface.
    pub fn identifier(&mut self, name: &str) -> Result<Guid, GenerationError> {
        Ok(self.interface(name)?.guid)
    }

    /// Ancestors of an interface, root first, excluding the interface itself.
    pub fn ancestors(&mut self, name: &str) -> Result<Vec<String>, GenerationError> {
        let mut chain = Vec::new();
        let mut current = self.interface(name)?.base.clone();
        while let Some(base) = current {
            current = self.interface(&base)?.base.clone();
            chain.push(base);
        }
        chain.reverse();
        Ok(chain)
    }
}
