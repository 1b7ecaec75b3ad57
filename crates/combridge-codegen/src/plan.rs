//! Per-interface emission plans.
//!
//! A plan is everything the emitters need for one interface, resolved up
//! front: slot counts, ancestors, method signatures with ABI-adjusted
//! parameter types, and the interface's role in the identity model.

use combridge_core::{GenerationError, InterfaceEntry, MethodEntry, PrimitiveKind};
use rustc_hash::FxHashSet;

use crate::context::GenerationContext;
use crate::layout::{LayoutResolver, LayoutType, RecordKind};
use crate::names;
use crate::slots::{SlotAllocation, SlotAllocator};

/// Local names used by generated function bodies.
const RESERVED_LOCALS: &[&str] = &["this", "object", "f"];

/// How an interface relates to the identity root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityRole {
    /// The root itself, with the standard `queryInterface` / `addRef` /
    /// `release` shape. Its inbound side forwards to the runtime.
    Root,
    /// Derives from a standard-shaped root.
    Rooted,
    /// No standard identity root in the chain.
    Plain,
}

#[derive(Debug, Clone)]
pub struct ParamPlan {
    pub name: String,
    pub ty: LayoutType,
}

#[derive(Debug, Clone)]
pub struct MethodPlan {
    /// Name as declared.
    pub name: String,
    /// Name used in generated items, unique within the interface.
    pub rust_name: String,
    pub params: Vec<ParamPlan>,
    pub ret: LayoutType,
    /// Absolute vtable slot.
    pub slot: usize,
}

#[derive(Debug, Clone)]
pub struct InterfacePlan {
    pub entry: InterfaceEntry,
    pub slots: SlotAllocation,
    /// Ancestors, root first.
    pub ancestors: Vec<String>,
    pub methods: Vec<MethodPlan>,
    pub role: IdentityRole,
}

impl InterfacePlan {
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn base(&self) -> Option<&str> {
        self.entry.base.as_deref()
    }
}

/// Build the plan of interface `name`.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn plan_interface(ctx: &mut GenerationContext<'_>, name: &str) -> Result<InterfacePlan, GenerationError> {
    let entry = ctx.interface(name)?.clone();
    let slots = SlotAllocator::new(ctx).allocate(name)?;
    let ancestors = ctx.ancestors(name)?;

    let mut methods = Vec::with_capacity(entry.methods.len());
    let mut used = FxHashSet::default();
    for (i, method) in entry.methods.iter().enumerate() {
        names::check(name, &method.name)?;
        let rust_name = unique(&method.name, &mut used);
        let (params, ret) = resolve_signature(ctx, name, method)?;
        methods.push(MethodPlan {
            name: method.name.clone(),
            rust_name,
            params,
            ret,
            slot: slots.base_slot_count + i,
        });
    }

    let role = identity_role(ctx, &entry, &ancestors, &methods)?;
    Ok(InterfacePlan {
        entry,
        slots,
        ancestors,
        methods,
        role,
    })
}

fn unique(name: &str, used: &mut FxHashSet<String>) -> String {
    if used.insert(name.to_string()) {
        return name.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{name}_{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn resolve_signature(
    ctx: &mut GenerationContext<'_>,
    interface: &str,
    method: &MethodEntry,
) -> Result<(Vec<ParamPlan>, LayoutType), GenerationError> {
    let declaration = format!("{interface}::{}", method.name);
    let identifier = ctx.config().identifier_typedef.clone();
    let mut resolver = LayoutResolver::new(ctx);

    let mut used: FxHashSet<String> = RESERVED_LOCALS.iter().map(|s| s.to_string()).collect();
    let mut params = Vec::with_capacity(method.params.len());
    for (i, param) in method.params.iter().enumerate() {
        let ty = resolver.resolve(&declaration, &param.ty)?;
        let ty = match ty {
            LayoutType::Void => {
                return Err(GenerationError::UnsupportedType {
                    declaration,
                    spelling: param.ty.to_string(),
                });
            }
            LayoutType::Array { .. } => LayoutType::Pointer {
                pointee: Box::new(ty),
                is_const: false,
            },
            LayoutType::Record(id) => {
                let record = resolver.record(id);
                match record {
                    Some((name, RecordKind::InlineArray)) => LayoutType::Pointer {
                        pointee: Box::new(ty),
                        is_const: identifier.as_deref() == Some(name.as_str()),
                    },
                    _ => ty,
                }
            }
            other => other,
        };

        let base = if param.name.is_empty() || param.name == "_" {
            format!("arg{i}")
        } else {
            param.name.clone()
        };
        names::check(&declaration, &base)?;
        let name = if used.contains(&base) {
            unique(&format!("{base}_"), &mut used)
        } else {
            used.insert(base.clone());
            base
        };
        params.push(ParamPlan { name, ty });
    }

    let ret = resolver.resolve(&declaration, &method.return_type)?;
    let returns_array = match &ret {
        LayoutType::Array { .. } => true,
        LayoutType::Record(id) => matches!(resolver.record(*id), Some((_, RecordKind::InlineArray))),
        _ => false,
    };
    if returns_array {
        return Err(GenerationError::UnsupportedType {
            declaration,
            spelling: method.return_type.to_string(),
        });
    }
    Ok((params, ret))
}

fn identity_role(
    ctx: &mut GenerationContext<'_>,
    entry: &InterfaceEntry,
    ancestors: &[String],
    methods: &[MethodPlan],
) -> Result<IdentityRole, GenerationError> {
    let Some(root) = ctx.config().root_interface.clone() else {
        return Ok(IdentityRole::Plain);
    };
    if entry.name == root {
        return Ok(if has_identity_shape(ctx, methods) {
            IdentityRole::Root
        } else {
            IdentityRole::Plain
        });
    }
    if ancestors.first() != Some(&root) {
        return Ok(IdentityRole::Plain);
    }

    let root_entry = ctx.interface(&root)?.clone();
    let root_plan_methods = root_entry
        .methods
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let (params, ret) = resolve_signature(ctx, &root, m)?;
            Ok(MethodPlan {
                name: m.name.clone(),
                rust_name: m.name.clone(),
                params,
                ret,
                slot: i,
            })
        })
        .collect::<Result<Vec<_>, GenerationError>>()?;
    Ok(if has_identity_shape(ctx, &root_plan_methods) {
        IdentityRole::Rooted
    } else {
        IdentityRole::Plain
    })
}

/// Check for exactly `queryInterface(ptr, ptr) -> result`,
/// `addRef() -> uint32` and `release() -> uint32`.
pub fn has_identity_shape(ctx: &GenerationContext<'_>, methods: &[MethodPlan]) -> bool {
    let names = &ctx.config().identity_methods;
    let [query, add_ref, release] = methods else {
        return false;
    };
    let counter = LayoutType::Scalar(PrimitiveKind::Uint32);

    query.name == names.query_interface
        && query.ret == LayoutType::ResultCode
        && query.params.len() == 2
        && query
            .params
            .iter()
            .all(|p| matches!(p.ty, LayoutType::Pointer { .. }))
        && add_ref.name == names.add_ref
        && add_ref.params.is_empty()
        && add_ref.ret == counter
        && release.name == names.release
        && release.params.is_empty()
        && release.ret == counter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use combridge_core::{ClassEntry, Guid, TypeRef, TypedefEntry};
    use combridge_registry::{Idm, IdmBuilder};

    fn model() -> Idm {
        let u32_ = TypeRef::primitive(PrimitiveKind::Uint32);
        IdmBuilder::new()
            .with_typedef(TypedefEntry::new(
                "TUID",
                TypeRef::array(TypeRef::primitive(PrimitiveKind::Char8), 16),
            ))
            .with_class(
                ClassEntry::new("FUnknown")
                    .with_guid(Guid::from_words(0, 0, 0xC0000000, 0x46))
                    .with_method(
                        MethodEntry::new("queryInterface", TypeRef::ResultCode)
                            .with_param("_iid", TypeRef::named("TUID"))
                            .with_param("obj", TypeRef::ptr(TypeRef::ptr(TypeRef::void()))),
                    )
                    .with_method(MethodEntry::new("addRef", u32_.clone()))
                    .with_method(MethodEntry::new("release", u32_)),
            )
            .with_class(
                ClassEntry::new("IStream")
                    .with_base("FUnknown")
                    .with_guid(Guid::from_words(1, 1, 1, 1))
                    .with_method(
                        MethodEntry::new("read", TypeRef::ResultCode)
                            .with_param("this", TypeRef::ptr(TypeRef::void()))
                            .with_param("", TypeRef::primitive(PrimitiveKind::Int32))
                            .with_param("", TypeRef::array(TypeRef::primitive(PrimitiveKind::Char16), 8)),
                    )
                    .with_method(MethodEntry::new("read", TypeRef::ResultCode)),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn identity_roles() {
        let idm = model();
        let config = GeneratorConfig::default();
        let mut ctx = GenerationContext::new(&idm, &config);

        let root = plan_interface(&mut ctx, "FUnknown").unwrap();
        assert_eq!(root.role, IdentityRole::Root);
        assert_eq!(
            root.methods[0].params[0].ty,
            LayoutType::Pointer {
                pointee: Box::new(LayoutType::Record(ctx.record_by_name("TUID").unwrap().id)),
                is_const: true,
            }
        );

        let stream = plan_interface(&mut ctx, "IStream").unwrap();
        assert_eq!(stream.role, IdentityRole::Rooted);
        assert_eq!(stream.ancestors, vec!["FUnknown".to_string()]);
    }

    #[test]
    fn names_are_made_unique() {
        let idm = model();
        let config = GeneratorConfig::default();
        let mut ctx = GenerationContext::new(&idm, &config);
        let stream = plan_interface(&mut ctx, "IStream").unwrap();

        let read = &stream.methods[0];
        let names: Vec<_> = read.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["this_", "arg1", "arg2"]);
        assert!(matches!(read.params[2].ty, LayoutType::Pointer { is_const: false, .. }));
        assert_eq!(read.slot, 3);

        assert_eq!(stream.methods[1].rust_name, "read_2");
        assert_eq!(stream.methods[1].slot, 4);
    }

    #[test]
    fn renamed_identity_methods_are_plain() {
        let idm = model();
        let config = GeneratorConfig::default().with_identity_methods("QueryInterface", "AddRef", "Release");
        let mut ctx = GenerationContext::new(&idm, &config);
        assert_eq!(
            plan_interface(&mut ctx, "IStream").unwrap().role,
            IdentityRole::Plain
        );
    }
}
