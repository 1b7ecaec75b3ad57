//! Type layout resolution.
//!
//! Turns [`TypeRef`]s into [`LayoutType`]s and class declarations into
//! [`RecordLayout`]s with field offsets, size and alignment computed with
//! natural C alignment for the configured pointer width.
//!
//! Records are memoized by name and get a [`RecordId`] before their fields
//! are resolved, so records that point at themselves (or at each other)
//! resolve to the same id. A record that contains itself by value is an
//! error.

use tracing::trace;

use combridge_core::{ClassEntry, GenerationError, PrimitiveKind, TypeEntry, TypeRef};

use crate::classify::ClassKind;
use crate::context::GenerationContext;
use crate::names;

/// Index of a record in the generation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u32);

impl RecordId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A resolved type with a known ABI layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayoutType {
    /// Only valid as a return type or pointee.
    Void,
    /// A primitive. `Bool` is stored as a 1-byte integer.
    Scalar(PrimitiveKind),
    Pointer {
        pointee: Box<LayoutType>,
        is_const: bool,
    },
    Array {
        element: Box<LayoutType>,
        len: usize,
    },
    /// A struct, union or synthesized typedef record.
    Record(RecordId),
    /// An enum, represented as its underlying integer.
    Enum {
        name: String,
        underlying: PrimitiveKind,
    },
    /// An interface. Only ever reached through a pointer.
    Interface(String),
    /// The ABI result code (a 32-bit signed integer).
    ResultCode,
}

impl LayoutType {
    /// Check if this is `void`.
    pub fn is_void(&self) -> bool {
        matches!(self, LayoutType::Void)
    }
}

/// What a record was synthesized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Struct,
    Union,
    /// A typedef to an array: one `data` field holding the array.
    InlineArray,
    /// A typedef to a pointer or scalar: a transparent single-field wrapper.
    Wrapper,
}

/// One field of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: String,
    pub ty: LayoutType,
    pub offset: usize,
}

/// The resolved layout of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    pub id: RecordId,
    pub name: String,
    pub kind: RecordKind,
    pub fields: Vec<FieldLayout>,
    pub size: usize,
    pub align: usize,
}

impl RecordLayout {
    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Field name given to an embedded base record.
pub const BASE_FIELD: &str = "__base";
/// Field name of the placeholder byte in an empty record.
pub const RESERVED_FIELD: &str = "_reserved";
/// Field name of the array in an inline-array record.
pub const DATA_FIELD: &str = "data";

/// Resolves types and records against a [`GenerationContext`].
pub struct LayoutResolver<'a, 'idm> {
    ctx: &'a mut GenerationContext<'idm>,
}

impl<'a, 'idm> LayoutResolver<'a, 'idm> {
    pub fn new(ctx: &'a mut GenerationContext<'idm>) -> Self {
        Self { ctx }
    }

    /// Resolve `ty` as used by value inside `declaration`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve(&mut self, declaration: &str, ty: &TypeRef) -> Result<LayoutType, GenerationError> {
        match ty {
            TypeRef::Primitive(PrimitiveKind::Void) => Ok(LayoutType::Void),
            TypeRef::Primitive(kind) => Ok(LayoutType::Scalar(*kind)),
            TypeRef::Pointer { pointee, is_const } => Ok(LayoutType::Pointer {
                pointee: Box::new(self.resolve_pointee(declaration, pointee)?),
                is_const: *is_const,
            }),
            TypeRef::Array { element, len } => {
                if *len == 0 {
                    return Err(GenerationError::ZeroLengthArray {
                        declaration: declaration.to_string(),
                    });
                }
                let element = self.resolve_data(declaration, element)?;
                Ok(LayoutType::Array {
                    element: Box::new(element),
                    len: *len,
                })
            }
            TypeRef::Named(name) => self.resolve_named(declaration, name, true),
            TypeRef::ResultCode => Ok(LayoutType::ResultCode),
            TypeRef::Unsupported(spelling) => Err(GenerationError::UnsupportedType {
                declaration: declaration.to_string(),
                spelling: spelling.clone(),
            }),
        }
    }

    /// Resolve a type that must occupy storage (fields, array elements).
    fn resolve_data(&mut self, declaration: &str, ty: &TypeRef) -> Result<LayoutType, GenerationError> {
        match self.resolve(declaration, ty)? {
            LayoutType::Void => Err(GenerationError::UnsupportedType {
                declaration: declaration.to_string(),
                spelling: ty.to_string(),
            }),
            other => Ok(other),
        }
    }

    fn resolve_pointee(&mut self, declaration: &str, ty: &TypeRef) -> Result<LayoutType, GenerationError> {
        match ty {
            TypeRef::Named(name) => self.resolve_named(declaration, name, false),
            other => self.resolve(declaration, other),
        }
    }

    /// Resolve a named type. `by_value` is false when reached through a
    /// pointer; records are then only reserved, not laid out.
    pub fn resolve_named(
        &mut self,
        declaration: &str,
        name: &str,
        by_value: bool,
    ) -> Result<LayoutType, GenerationError> {
        if self.ctx.config().result_code_typedef.as_deref() == Some(name) {
            return Ok(LayoutType::ResultCode);
        }
        if let Some(resolved) = self.ctx.named.get(name) {
            return Ok(resolved.clone());
        }

        let idm = self.ctx.idm();
        match idm.get(name) {
            None => Err(self.ctx.unknown(declaration, name)),
            Some(TypeEntry::Class(class)) => match self.ctx.classify(name)? {
                ClassKind::Interface if by_value => Err(GenerationError::InterfaceByValue {
                    declaration: declaration.to_string(),
                    interface: name.to_string(),
                }),
                ClassKind::Interface => Ok(LayoutType::Interface(name.to_string())),
                ClassKind::Record if by_value => self.resolve_record(class),
                ClassKind::Record => Ok(LayoutType::Record(self.reserve(name))),
            },
            Some(TypeEntry::Enum(entry)) => {
                if !entry.underlying.is_enum_backing() {
                    return Err(GenerationError::UnsupportedType {
                        declaration: name.to_string(),
                        spelling: format!("enum {} : {}", name, entry.underlying),
                    });
                }
                if let Some(item) = entry
                    .values
                    .iter()
                    .find(|v| !fits(v.value, entry.underlying, self.ctx.config().pointer_width))
                {
                    return Err(GenerationError::UnsupportedType {
                        declaration: name.to_string(),
                        spelling: format!("{} = {}", item.name, item.value),
                    });
                }
                let ty = LayoutType::Enum {
                    name: name.to_string(),
                    underlying: entry.underlying,
                };
                self.ctx.named.insert(name.to_string(), ty.clone());
                Ok(ty)
            }
            Some(TypeEntry::Typedef(entry)) => {
                if !self.ctx.in_progress.insert(name.to_string()) {
                    return Err(GenerationError::RecursiveRecord {
                        declaration: name.to_string(),
                    });
                }
                let resolved = self.resolve_typedef(name, &entry.target, by_value);
                self.ctx.in_progress.remove(name);
                let resolved = resolved?;
                if by_value && matches!(resolved, LayoutType::Interface(_)) {
                    return Err(GenerationError::InterfaceByValue {
                        declaration: declaration.to_string(),
                        interface: name.to_string(),
                    });
                }
                Ok(resolved)
            }
        }
    }

    fn resolve_typedef(
        &mut self,
        name: &str,
        target: &TypeRef,
        by_value: bool,
    ) -> Result<LayoutType, GenerationError> {
        match target {
            TypeRef::Named(other) => {
                let resolved = self.resolve_named(name, other, by_value)?;
                if !self.ctx.aliases.iter().any(|(alias, _)| alias == name) {
                    self.ctx.aliases.push((name.to_string(), resolved.clone()));
                }
                Ok(resolved)
            }
            TypeRef::Array { .. } => {
                let data = self.resolve(name, target)?;
                self.synthesize(name, RecordKind::InlineArray, DATA_FIELD, data)
            }
            TypeRef::Pointer { .. } | TypeRef::Primitive(_) => {
                let inner = self.resolve_data(name, target)?;
                self.synthesize(name, RecordKind::Wrapper, "0", inner)
            }
            TypeRef::ResultCode => Ok(LayoutType::ResultCode),
            TypeRef::Unsupported(spelling) => Err(GenerationError::UnsupportedType {
                declaration: name.to_string(),
                spelling: spelling.clone(),
            }),
        }
    }

    fn synthesize(
        &mut self,
        name: &str,
        kind: RecordKind,
        field: &str,
        ty: LayoutType,
    ) -> Result<LayoutType, GenerationError> {
        let (size, align) = self.size_align(&ty)?;
        let id = self.reserve(name);
        let layout = RecordLayout {
            id,
            name: name.to_string(),
            kind,
            fields: vec![FieldLayout {
                name: field.to_string(),
                ty,
                offset: 0,
            }],
            size,
            align,
        };
        trace!(record = name, ?kind, size, align, "synthesized record");
        self.ctx.records[id.index()] = Some(layout);
        let ty = LayoutType::Record(id);
        self.ctx.named.insert(name.to_string(), ty.clone());
        Ok(ty)
    }

    fn reserve(&mut self, name: &str) -> RecordId {
        if let Some(id) = self.ctx.record_ids.get(name) {
            return *id;
        }
        let id = RecordId(self.ctx.records.len() as u32);
        self.ctx.records.push(None);
        self.ctx.record_ids.insert(name.to_string(), id);
        id
    }

    /// Lay out a class classified as a record.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn resolve_record(&mut self, class: &ClassEntry) -> Result<LayoutType, GenerationError> {
        let name = class.name.as_str();
        if let Some(layout) = self.ctx.record_by_name(name) {
            return Ok(LayoutType::Record(layout.id));
        }
        if !self.ctx.in_progress.insert(name.to_string()) {
            return Err(GenerationError::RecursiveRecord {
                declaration: name.to_string(),
            });
        }
        let id = self.reserve(name);
        let result = self.lay_out(id, class);
        self.ctx.in_progress.remove(name);
        let layout = result?;

        trace!(record = name, size = layout.size, align = layout.align, "resolved record");
        self.ctx.records[id.index()] = Some(layout);
        let ty = LayoutType::Record(id);
        self.ctx.named.insert(name.to_string(), ty.clone());
        Ok(ty)
    }

    fn lay_out(&mut self, id: RecordId, class: &ClassEntry) -> Result<RecordLayout, GenerationError> {
        let name = class.name.as_str();
        if class.methods.iter().any(|m| m.is_pure_virtual) {
            return Err(GenerationError::UnsupportedType {
                declaration: name.to_string(),
                spelling: format!("abstract class {name} with data"),
            });
        }

        let mut members = Vec::with_capacity(class.fields.len() + 1);
        match class.bases.as_slice() {
            [] => {}
            [base] => {
                let ty = self.resolve_named(name, base, true)?;
                if !self.is_empty_record(&ty) {
                    members.push((BASE_FIELD.to_string(), ty));
                }
            }
            bases => {
                return Err(GenerationError::UnsupportedType {
                    declaration: name.to_string(),
                    spelling: format!("{name} : {}", bases.join(", ")),
                });
            }
        }
        for field in &class.fields {
            names::check(name, &field.name)?;
            let ty = self.resolve_data(name, &field.ty)?;
            members.push((field.name.clone(), ty));
        }
        if members.is_empty() {
            members.push((RESERVED_FIELD.to_string(), LayoutType::Scalar(PrimitiveKind::Uint8)));
        }

        let mut fields = Vec::with_capacity(members.len());
        let mut end = 0;
        let mut align = 1;
        for (field_name, ty) in members {
            let (size, field_align) = self.size_align(&ty)?;
            let offset = if class.is_union {
                0
            } else {
                align_up(end, field_align)
            };
            end = end.max(offset + size);
            align = align.max(field_align);
            fields.push(FieldLayout {
                name: field_name,
                ty,
                offset,
            });
        }

        Ok(RecordLayout {
            id,
            name: name.to_string(),
            kind: if class.is_union {
                RecordKind::Union
            } else {
                RecordKind::Struct
            },
            fields,
            size: align_up(end, align),
            align,
        })
    }

    fn is_empty_record(&self, ty: &LayoutType) -> bool {
        match ty {
            LayoutType::Record(id) => self
                .ctx
                .record(*id)
                .is_some_and(|r| r.fields.len() == 1 && r.fields[0].name == RESERVED_FIELD),
            _ => false,
        }
    }

    /// Name and kind of a resolved record.
    pub(crate) fn record(&self, id: RecordId) -> Option<(&String, RecordKind)> {
        self.ctx.record(id).map(|r| (&r.name, r.kind))
    }

    /// Size and alignment of a type that occupies storage.
    pub fn size_align(&self, ty: &LayoutType) -> Result<(usize, usize), GenerationError> {
        size_align(self.ctx, ty)
    }
}

/// Size and alignment of `ty` in bytes.
pub fn size_align(ctx: &GenerationContext<'_>, ty: &LayoutType) -> Result<(usize, usize), GenerationError> {
    let pointer = ctx.config().pointer_size();
    match ty {
        LayoutType::Void => Err(GenerationError::UnsupportedType {
            declaration: String::new(),
            spelling: "void".to_string(),
        }),
        LayoutType::Scalar(kind) => Ok((kind.size(pointer), kind.align(pointer))),
        LayoutType::Pointer { .. } => Ok((pointer, pointer)),
        LayoutType::Array { element, len } => {
            let (size, align) = size_align(ctx, element)?;
            Ok((size * len, align))
        }
        LayoutType::Record(id) => ctx
            .record(*id)
            .map(|r| (r.size, r.align))
            .ok_or_else(|| GenerationError::RecursiveRecord {
                declaration: ctx.record_name(*id).unwrap_or_default().to_string(),
            }),
        LayoutType::Enum { underlying, .. } => Ok((underlying.size(pointer), underlying.align(pointer))),
        LayoutType::Interface(name) => Err(GenerationError::InterfaceByValue {
            declaration: String::new(),
            interface: name.clone(),
        }),
        LayoutType::ResultCode => Ok((4, 4)),
    }
}

#[inline]
fn align_up(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

/// Check if `value` is representable in `kind`.
pub(crate) fn fits(value: i64, kind: PrimitiveKind, pointer_width: usize) -> bool {
    let bits = kind.size(pointer_width / 8) * 8;
    if kind.is_signed() {
        bits >= 64 || (value >= -(1i64 << (bits - 1)) && value < (1i64 << (bits - 1)))
    } else {
        value >= 0 && (bits >= 64 || value < (1i64 << bits))
    }
}
