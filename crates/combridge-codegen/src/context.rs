//! Generation context.
//!
//! All derived state of one generation run lives here: classification
//! results, interface views, slot allocations and resolved record layouts.
//! Each result is computed once and never mutated afterwards.

use rustc_hash::{FxHashMap, FxHashSet};

use combridge_core::{GenerationError, InterfaceEntry};
use combridge_registry::Idm;

use crate::classify::ClassKind;
use crate::config::GeneratorConfig;
use crate::layout::{LayoutType, RecordId, RecordLayout};
use crate::slots::SlotAllocation;

/// State shared by the generation phases.
pub struct GenerationContext<'idm> {
    idm: &'idm Idm,
    config: &'idm GeneratorConfig,

    pub(crate) kinds: FxHashMap<String, ClassKind>,
    pub(crate) interfaces: FxHashMap<String, InterfaceEntry>,
    pub(crate) slots: FxHashMap<String, SlotAllocation>,

    /// Record layouts indexed by [`RecordId`]. A slot is reserved (as `None`)
    /// before the record's fields are resolved.
    pub(crate) records: Vec<Option<RecordLayout>>,
    pub(crate) record_ids: FxHashMap<String, RecordId>,
    /// Names whose layout is being resolved; a by-value reference to one of
    /// these is a recursion.
    pub(crate) in_progress: FxHashSet<String>,
    /// Resolved named types (records, enums, typedef aliases).
    pub(crate) named: FxHashMap<String, LayoutType>,
    /// Typedefs that alias another named type, in resolution order.
    pub(crate) aliases: Vec<(String, LayoutType)>,
}

impl<'idm> GenerationContext<'idm> {
    /// Create a context over a built model.
    pub fn new(idm: &'idm Idm, config: &'idm GeneratorConfig) -> Self {
        Self {
            idm,
            config,
            kinds: FxHashMap::default(),
            interfaces: FxHashMap::default(),
            slots: FxHashMap::default(),
            records: Vec::new(),
            record_ids: FxHashMap::default(),
            in_progress: FxHashSet::default(),
            named: FxHashMap::default(),
            aliases: Vec::new(),
        }
    }

    #[inline]
    pub fn idm(&self) -> &'idm Idm {
        self.idm
    }

    #[inline]
    pub fn config(&self) -> &'idm GeneratorConfig {
        self.config
    }

    /// Get a resolved record layout.
    pub fn record(&self, id: RecordId) -> Option<&RecordLayout> {
        self.records.get(id.index()).and_then(Option::as_ref)
    }

    /// Get a resolved record layout by name.
    pub fn record_by_name(&self, name: &str) -> Option<&RecordLayout> {
        self.record_ids.get(name).and_then(|id| self.record(*id))
    }

    /// Name a record id was reserved under.
    pub(crate) fn record_name(&self, id: RecordId) -> Option<&str> {
        self.record_ids
            .iter()
            .find(|(_, reserved)| **reserved == id)
            .map(|(name, _)| name.as_str())
    }

    /// All fully resolved records, in resolution order.
    pub fn records(&self) -> impl Iterator<Item = &RecordLayout> {
        self.records.iter().flatten()
    }

    /// Typedefs that alias another named type.
    pub fn aliases(&self) -> &[(String, LayoutType)] {
        &self.aliases
    }

    /// The memoized slot allocation of an interface, if allocated.
    pub fn slot_allocation(&self, name: &str) -> Option<SlotAllocation> {
        self.slots.get(name).copied()
    }

    /// Build the error for a name nothing in the model declares.
    pub(crate) fn unknown(&self, declaration: &str, name: &str) -> GenerationError {
        GenerationError::UnknownType {
            declaration: declaration.to_string(),
            name: name.to_string(),
        }
    }
}
