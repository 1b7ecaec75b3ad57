//! Builder for [`Idm`].

use rustc_hash::FxHashMap;
use tracing::debug;

use combridge_core::{
    ClassEntry, ConstantEntry, EnumEntry, Guid, ModelError, TypeEntry, TypedefEntry,
};

use crate::{Idm, InheritanceGraph};

/// Collects declarations and validates them into an [`Idm`].
#[derive(Debug, Default, Clone)]
pub struct IdmBuilder {
    types: Vec<TypeEntry>,
    constants: Vec<ConstantEntry>,
    identifiers: Vec<(String, Guid)>,
}

impl IdmBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type entry.
    pub fn add_type(&mut self, entry: impl Into<TypeEntry>) -> &mut Self {
        self.types.push(entry.into());
        self
    }

    /// Add a constant.
    pub fn add_constant(&mut self, constant: ConstantEntry) -> &mut Self {
        self.constants.push(constant);
        self
    }

    /// Attach an identifier found by the declaration scanner.
    pub fn add_identifier(&mut self, class: impl Into<String>, guid: Guid) -> &mut Self {
        self.identifiers.push((class.into(), guid));
        self
    }

    /// Add a class.
    pub fn with_class(mut self, class: ClassEntry) -> Self {
        self.add_type(class);
        self
    }

    /// Add an enum.
    pub fn with_enum(mut self, entry: EnumEntry) -> Self {
        self.add_type(entry);
        self
    }

    /// Add a typedef.
    pub fn with_typedef(mut self, entry: TypedefEntry) -> Self {
        self.add_type(entry);
        self
    }

    /// Add a constant.
    pub fn with_constant(mut self, constant: ConstantEntry) -> Self {
        self.add_constant(constant);
        self
    }

    /// Attach an identifier.
    pub fn with_identifier(mut self, class: impl Into<String>, guid: Guid) -> Self {
        self.add_identifier(class, guid);
        self
    }

    /// Validate everything and freeze it into an [`Idm`].
    ///
    /// # Errors
    ///
    /// - [`ModelError::Duplicate`] when two declarations share a name
    /// - [`ModelError::OrphanIdentifier`] / [`ModelError::ConflictingIdentifier`]
    ///   for identifiers that do not fit the declared classes
    /// - [`ModelError::UnknownBase`] / [`ModelError::BaseNotClass`] for bad bases
    /// - [`ModelError::CircularInheritance`] for inheritance cycles
    pub fn build(self) -> Result<Idm, ModelError> {
        let Self {
            mut types,
            constants,
            identifiers,
        } = self;

        let mut by_name: FxHashMap<String, usize> = FxHashMap::default();
        for (idx, entry) in types.iter().enumerate() {
            if let Some(&existing) = by_name.get(entry.name()) {
                return Err(ModelError::Duplicate {
                    name: entry.name().to_string(),
                    existing: types[existing].kind_name(),
                });
            }
            by_name.insert(entry.name().to_string(), idx);
        }
        for constant in &constants {
            if let Some(&existing) = by_name.get(&constant.name) {
                return Err(ModelError::Duplicate {
                    name: constant.name.clone(),
                    existing: types[existing].kind_name(),
                });
            }
        }
        let mut seen_constants = FxHashMap::default();
        for constant in &constants {
            if seen_constants.insert(constant.name.as_str(), ()).is_some() {
                return Err(ModelError::Duplicate {
                    name: constant.name.clone(),
                    existing: "constant",
                });
            }
        }

        for (name, guid) in identifiers {
            let class = by_name
                .get(&name)
                .and_then(|&idx| types[idx].as_class_mut())
                .ok_or_else(|| ModelError::OrphanIdentifier { name: name.clone() })?;
            match class.guid {
                Some(existing) if existing != guid => {
                    return Err(ModelError::ConflictingIdentifier { name });
                }
                _ => class.guid = Some(guid),
            }
        }

        for class in types.iter().filter_map(TypeEntry::as_class) {
            for base in &class.bases {
                match by_name.get(base).map(|&idx| &types[idx]) {
                    None => {
                        return Err(ModelError::UnknownBase {
                            class: class.name.clone(),
                            base: base.clone(),
                        });
                    }
                    Some(entry) if !entry.is_class() => {
                        return Err(ModelError::BaseNotClass {
                            class: class.name.clone(),
                            base: base.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        let inheritance = InheritanceGraph::build(types.iter().filter_map(TypeEntry::as_class))?;

        debug!(
            types = types.len(),
            constants = constants.len(),
            classes = inheritance.len(),
            "interface model built"
        );

        Ok(Idm {
            types,
            by_name,
            constants,
            inheritance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combridge_core::{MethodEntry, PrimitiveKind, TypeRef};

    fn foo_bar() -> IdmBuilder {
        IdmBuilder::new()
            .with_class(
                ClassEntry::new("IFoo")
                    .with_method(MethodEntry::new("getValue", TypeRef::primitive(PrimitiveKind::Int32))),
            )
            .with_class(
                ClassEntry::new("IBar").with_base("IFoo").with_method(
                    MethodEntry::new("setValue", TypeRef::ResultCode)
                        .with_param("value", TypeRef::primitive(PrimitiveKind::Int32)),
                ),
            )
    }

    #[test]
    fn build_indexes_by_name() {
        let idm = foo_bar().build().unwrap();
        assert_eq!(idm.type_count(), 2);
        assert!(idm.class("IBar").is_some());
        assert!(idm.enum_entry("IBar").is_none());
        assert!(idm.derives_from("IBar", "IFoo"));

        let names: Vec<_> = idm.classes().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["IFoo", "IBar"]);
    }

    #[test]
    fn identifiers_are_attached() {
        let guid = Guid::from_words(0x11111111, 0x22222222, 0x33333333, 0x44444444);
        let idm = foo_bar().with_identifier("IFoo", guid).build().unwrap();
        assert_eq!(idm.class("IFoo").unwrap().guid, Some(guid));
        assert_eq!(idm.class("IBar").unwrap().guid, None);
    }

    #[test]
    fn same_identifier_twice_is_fine() {
        let guid = Guid::from_words(1, 2, 3, 4);
        let idm = IdmBuilder::new()
            .with_class(ClassEntry::new("IFoo").with_guid(guid))
            .with_identifier("IFoo", guid)
            .build()
            .unwrap();
        assert_eq!(idm.class("IFoo").unwrap().guid, Some(guid));
    }

    #[test]
    fn conflicting_identifier() {
        let err = IdmBuilder::new()
            .with_class(ClassEntry::new("IFoo").with_guid(Guid::from_words(1, 2, 3, 4)))
            .with_identifier("IFoo", Guid::from_words(4, 3, 2, 1))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::ConflictingIdentifier {
                name: "IFoo".into()
            }
        );
    }

    #[test]
    fn orphan_identifier() {
        let err = IdmBuilder::new()
            .with_enum(EnumEntry::new("IFoo"))
            .with_identifier("IFoo", Guid::from_words(1, 2, 3, 4))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::OrphanIdentifier { .. }));
    }

    #[test]
    fn duplicate_names() {
        let err = IdmBuilder::new()
            .with_class(ClassEntry::new("Speaker"))
            .with_enum(EnumEntry::new("Speaker"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::Duplicate {
                name: "Speaker".into(),
                existing: "class"
            }
        );

        let err = IdmBuilder::new()
            .with_constant(ConstantEntry::string("kVstAudioEffectClass", "Audio Module Class"))
            .with_constant(ConstantEntry::string("kVstAudioEffectClass", "again"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::Duplicate { existing: "constant", .. }));
    }

    #[test]
    fn unknown_and_non_class_bases() {
        let err = IdmBuilder::new()
            .with_class(ClassEntry::new("IBar").with_base("IFoo"))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ModelError::UnknownBase {
                class: "IBar".into(),
                base: "IFoo".into()
            }
        );

        let err = IdmBuilder::new()
            .with_enum(EnumEntry::new("IFoo"))
            .with_class(ClassEntry::new("IBar").with_base("IFoo"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::BaseNotClass { .. }));
    }

    #[test]
    fn base_chain_is_root_first() {
        let idm = foo_bar()
            .with_class(ClassEntry::new("IBaz").with_base("IBar"))
            .build()
            .unwrap();
        let chain: Vec<_> = idm.base_chain("IBaz").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(chain, ["IFoo", "IBar"]);
        assert!(idm.base_chain("IFoo").is_empty());
        assert!(idm.base_chain("IMissing").is_empty());
    }
}
