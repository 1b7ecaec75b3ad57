//! The immutable Interface Description Model.

use rustc_hash::FxHashMap;

use combridge_core::{ClassEntry, ConstantEntry, EnumEntry, TypeEntry, TypedefEntry};

use crate::InheritanceGraph;

/// Immutable, validated description of a foreign ABI.
///
/// Built once by [`IdmBuilder`](crate::IdmBuilder) and only read afterwards.
/// Iteration always follows declaration order so that generation output is
/// reproducible.
#[derive(Debug, Clone)]
pub struct Idm {
    pub(crate) types: Vec<TypeEntry>,
    pub(crate) by_name: FxHashMap<String, usize>,
    pub(crate) constants: Vec<ConstantEntry>,
    pub(crate) inheritance: InheritanceGraph,
}

impl Idm {
    /// Get a type entry by name.
    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.by_name.get(name).map(|&idx| &self.types[idx])
    }

    /// Get a class by name.
    pub fn class(&self, name: &str) -> Option<&ClassEntry> {
        self.get(name).and_then(TypeEntry::as_class)
    }

    /// Get an enum by name.
    pub fn enum_entry(&self, name: &str) -> Option<&EnumEntry> {
        self.get(name).and_then(TypeEntry::as_enum)
    }

    /// Get a typedef by name.
    pub fn typedef(&self, name: &str) -> Option<&TypedefEntry> {
        self.get(name).and_then(TypeEntry::as_typedef)
    }

    /// Check if a name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// All type entries in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeEntry> {
        self.types.iter()
    }

    /// All classes in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassEntry> {
        self.types.iter().filter_map(TypeEntry::as_class)
    }

    /// All enums in declaration order.
    pub fn enums(&self) -> impl Iterator<Item = &EnumEntry> {
        self.types.iter().filter_map(TypeEntry::as_enum)
    }

    /// All typedefs in declaration order.
    pub fn typedefs(&self) -> impl Iterator<Item = &TypedefEntry> {
        self.types.iter().filter_map(TypeEntry::as_typedef)
    }

    /// All constants in declaration order.
    pub fn constants(&self) -> &[ConstantEntry] {
        &self.constants
    }

    /// Number of type entries.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// The inheritance graph.
    pub fn inheritance(&self) -> &InheritanceGraph {
        &self.inheritance
    }

    /// The chain of first bases of `name`, root first, excluding `name`.
    ///
    /// Only the first declared base is followed; whether a class may have
    /// more than one is a classification concern.
    pub fn base_chain(&self, name: &str) -> Vec<&ClassEntry> {
        let mut chain = Vec::new();
        let mut current = self.class(name).and_then(|c| c.bases.first());
        while let Some(base) = current {
            let Some(class) = self.class(base) else {
                break;
            };
            chain.push(class);
            current = class.bases.first();
        }
        chain.reverse();
        chain
    }

    /// Check whether `name` is `ancestor` or transitively derives from it.
    pub fn derives_from(&self, name: &str, ancestor: &str) -> bool {
        self.inheritance.derives_from(name, ancestor)
    }
}
