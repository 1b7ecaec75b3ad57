//! Vtable slot allocation.
//!
//! Slots are assigned root first: every slot of the base chain precedes the
//! interface's own methods, which follow in declaration order. The order is
//! never permuted.

use tracing::trace;

use combridge_core::GenerationError;

use crate::context::GenerationContext;

/// Slot counts of one interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotAllocation {
    /// Slots occupied by the whole base chain.
    pub base_slot_count: usize,
    /// Slots occupied by the interface's own methods.
    pub own_slot_count: usize,
}

impl SlotAllocation {
    #[inline]
    pub fn total(self) -> usize {
        self.base_slot_count + self.own_slot_count
    }
}

/// One entry of a flattened vtable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VtableSlot {
    /// Interface that declares the method.
    pub owner: String,
    pub method: String,
    /// Absolute slot index.
    pub index: usize,
}

/// Allocates vtable slots against a [`GenerationContext`].
pub struct SlotAllocator<'a, 'idm> {
    ctx: &'a mut GenerationContext<'idm>,
}

impl<'a, 'idm> SlotAllocator<'a, 'idm> {
    pub fn new(ctx: &'a mut GenerationContext<'idm>) -> Self {
        Self { ctx }
    }

    /// Allocate the slots of `name`, allocating its base first.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn allocate(&mut self, name: &str) -> Result<SlotAllocation, GenerationError> {
        if let Some(allocation) = self.ctx.slot_allocation(name) {
            return Ok(allocation);
        }

        let entry = self.ctx.interface(name)?;
        let own_slot_count = entry.own_method_count();
        let base = entry.base.clone();

        let base_slot_count = match base {
            Some(base) => self.allocate(&base)?.total(),
            None => 0,
        };
        let allocation = SlotAllocation {
            base_slot_count,
            own_slot_count,
        };

        trace!(interface = name, base_slot_count, own_slot_count, "allocated slots");
        self.ctx.slots.insert(name.to_string(), allocation);
        Ok(allocation)
    }

    /// Every slot of `name`, root first.
    pub fn vtable(&mut self, name: &str) -> Result<Vec<VtableSlot>, GenerationError> {
        let mut chain = self.ctx.ancestors(name)?;
        chain.push(name.to_string());

        let mut slots = Vec::with_capacity(self.allocate(name)?.total());
        for owner in chain {
            let entry = self.ctx.interface(&owner)?;
            for method in &entry.methods {
                slots.push(VtableSlot {
                    owner: owner.clone(),
                    method: method.name.clone(),
                    index: slots.len(),
                });
            }
        }
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use combridge_core::{ClassEntry, Guid, MethodEntry, PrimitiveKind, TypeRef};
    use combridge_registry::{Idm, IdmBuilder};

    fn foo_bar() -> Idm {
        IdmBuilder::new()
            .with_class(
                ClassEntry::new("IFoo")
                    .with_guid(Guid::from_words(0x11111111, 0x22222222, 0x33333333, 0x44444444))
                    .with_method(MethodEntry::new("getValue", TypeRef::primitive(PrimitiveKind::Int32))),
            )
            .with_class(
                ClassEntry::new("IBar")
                    .with_base("IFoo")
                    .with_guid(Guid::from_words(1, 2, 3, 4))
                    .with_method(
                        MethodEntry::new("setValue", TypeRef::ResultCode)
                            .with_param("value", TypeRef::primitive(PrimitiveKind::Int32)),
                    ),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn foo_bar_allocation() {
        let idm = foo_bar();
        let config = GeneratorConfig::default().without_root_interface();
        let mut ctx = GenerationContext::new(&idm, &config);
        let mut slots = SlotAllocator::new(&mut ctx);

        assert_eq!(
            slots.allocate("IBar").unwrap(),
            SlotAllocation {
                base_slot_count: 1,
                own_slot_count: 1
            }
        );
        assert_eq!(slots.allocate("IFoo").unwrap().total(), 1);

        let vtable = slots.vtable("IBar").unwrap();
        let order: Vec<_> = vtable
            .iter()
            .map(|s| (s.owner.as_str(), s.method.as_str(), s.index))
            .collect();
        assert_eq!(order, vec![("IFoo", "getValue", 0), ("IBar", "setValue", 1)]);
    }

    #[test]
    fn own_counts_sum_to_declared_methods() {
        let method = |name: &str| MethodEntry::new(name, TypeRef::void());
        let idm = IdmBuilder::new()
            .with_class(
                ClassEntry::new("FUnknown")
                    .with_guid(Guid::from_words(0, 0, 0, 1))
                    .with_method(method("queryInterface"))
                    .with_method(method("addRef"))
                    .with_method(method("release")),
            )
            .with_class(
                ClassEntry::new("IPluginBase")
                    .with_base("FUnknown")
                    .with_guid(Guid::from_words(0, 0, 0, 2))
                    .with_method(method("initialize"))
                    .with_method(method("terminate")),
            )
            .with_class(
                ClassEntry::new("IComponent")
                    .with_base("IPluginBase")
                    .with_guid(Guid::from_words(0, 0, 0, 3))
                    .with_method(method("getControllerClassId"))
                    .with_method(method("setIoMode"))
                    .with_method(method("getBusCount")),
            )
            .build()
            .unwrap();
        let config = GeneratorConfig::default();
        let mut ctx = GenerationContext::new(&idm, &config);
        let chain = ctx.ancestors("IComponent").unwrap();

        let mut slots = SlotAllocator::new(&mut ctx);
        let own = slots.allocate("IComponent").unwrap();
        let mut sum = own.own_slot_count;
        for base in &chain {
            sum += slots.allocate(base).unwrap().own_slot_count;
        }
        assert_eq!(sum, 8);
        assert_eq!(own.total(), 8);
        assert_eq!(own.base_slot_count, 5);

        let vtable = slots.vtable("IComponent").unwrap();
        assert_eq!(vtable[3].method, "initialize");
        assert_eq!(vtable[5].owner, "IComponent");
        assert!(vtable.iter().enumerate().all(|(i, s)| s.index == i));
    }

    #[test]
    fn allocation_of_a_record_fails() {
        let idm = IdmBuilder::new()
            .with_class(ClassEntry::new("Point").with_field("x", TypeRef::primitive(PrimitiveKind::Int32)))
            .build()
            .unwrap();
        let config = GeneratorConfig::default();
        let mut ctx = GenerationContext::new(&idm, &config);
        assert!(matches!(
            SlotAllocator::new(&mut ctx).allocate("Point"),
            Err(GenerationError::NotAnInterface { .. })
        ));
    }
}
