//! Token emission.
//!
//! Every generated item refers to the runtime and to `core` through fully
//! qualified paths, so the output can be `include!`d into any module.

mod constants;
mod identity;
mod inbound;
mod outbound;
mod records;

use proc_macro2::{Ident, Literal, Span, TokenStream};
use quote::{format_ident, quote};

use combridge_core::PrimitiveKind;

use crate::context::GenerationContext;
use crate::layout::LayoutType;
use crate::names::{KEYWORDS, RESERVED};

/// Build an identifier for a foreign name.
///
/// The name must have passed [`crate::names::check`].
pub(crate) fn ident(name: &str) -> Ident {
    if RESERVED.contains(&name) {
        format_ident!("{}_", name)
    } else if KEYWORDS.contains(&name) {
        Ident::new_raw(name, Span::call_site())
    } else {
        Ident::new(name, Span::call_site())
    }
}

/// An unsuffixed integer literal, negative values included.
pub(crate) fn int_literal(value: i64) -> TokenStream {
    let magnitude = Literal::u64_unsuffixed(value.unsigned_abs());
    if value < 0 {
        quote!(-#magnitude)
    } else {
        quote!(#magnitude)
    }
}

/// Renders layout types against one generation context.
pub(crate) struct Emitter<'c, 'idm> {
    ctx: &'c GenerationContext<'idm>,
    runtime: syn::Path,
}

impl<'c, 'idm> Emitter<'c, 'idm> {
    pub fn new(ctx: &'c GenerationContext<'idm>, runtime: syn::Path) -> Self {
        Self { ctx, runtime }
    }

    #[inline]
    pub fn ctx(&self) -> &'c GenerationContext<'idm> {
        self.ctx
    }

    /// Path to the runtime crate.
    #[inline]
    pub fn rt(&self) -> &syn::Path {
        &self.runtime
    }

    pub fn primitive(&self, kind: PrimitiveKind) -> TokenStream {
        match kind {
            PrimitiveKind::Void => quote!(::core::ffi::c_void),
            PrimitiveKind::Bool | PrimitiveKind::Uint8 => quote!(u8),
            PrimitiveKind::Char8 => quote!(::core::ffi::c_char),
            PrimitiveKind::Char16 | PrimitiveKind::Uint16 => quote!(u16),
            PrimitiveKind::Int8 => quote!(i8),
            PrimitiveKind::Int16 => quote!(i16),
            PrimitiveKind::Int32 => quote!(i32),
            PrimitiveKind::Uint32 => quote!(u32),
            PrimitiveKind::Int64 => quote!(i64),
            PrimitiveKind::Uint64 => quote!(u64),
            PrimitiveKind::Float => quote!(f32),
            PrimitiveKind::Double => quote!(f64),
            PrimitiveKind::Isize => quote!(isize),
            PrimitiveKind::Usize => quote!(usize),
        }
    }

    /// The Rust spelling of a layout type.
    pub fn ty(&self, ty: &LayoutType) -> TokenStream {
        match ty {
            LayoutType::Void => quote!(::core::ffi::c_void),
            LayoutType::Scalar(kind) => self.primitive(*kind),
            LayoutType::Pointer { pointee, is_const } => {
                let pointee = self.ty(pointee);
                if *is_const {
                    quote!(*const #pointee)
                } else {
                    quote!(*mut #pointee)
                }
            }
            LayoutType::Array { element, len } => {
                let element = self.ty(element);
                let len = Literal::usize_unsuffixed(*len);
                quote!([#element; #len])
            }
            LayoutType::Record(id) => {
                let name = self.ctx.record(*id).map(|r| r.name.as_str()).unwrap_or("c_void");
                let name = ident(name);
                quote!(#name)
            }
            LayoutType::Enum { name, .. } | LayoutType::Interface(name) => {
                let name = ident(name);
                quote!(#name)
            }
            LayoutType::ResultCode => {
                let rt = self.rt();
                quote!(#rt::ResultCode)
            }
        }
    }

    /// `-> R` for a return type, empty for `void`.
    pub fn ret(&self, ty: &LayoutType) -> TokenStream {
        if ty.is_void() {
            TokenStream::new()
        } else {
            let ty = self.ty(ty);
            quote!(-> #ty)
        }
    }

    /// The value an inbound call returns when the implementation panics.
    pub fn fallback(&self, ty: &LayoutType) -> TokenStream {
        match ty {
            LayoutType::Void => quote!(()),
            LayoutType::ResultCode => {
                let rt = self.rt();
                quote!(#rt::ResultCode::INTERNAL_ERROR)
            }
            LayoutType::Scalar(kind) if kind.is_float() => quote!(0.0),
            LayoutType::Scalar(_) | LayoutType::Enum { .. } => quote!(0),
            LayoutType::Pointer { is_const: true, .. } => quote!(::core::ptr::null()),
            LayoutType::Pointer { is_const: false, .. } => quote!(::core::ptr::null_mut()),
            LayoutType::Array { .. } | LayoutType::Record(_) | LayoutType::Interface(_) => {
                quote!(unsafe { ::core::mem::zeroed() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_become_raw() {
        assert_eq!(ident("type").to_string(), "r#type");
        assert_eq!(ident("self").to_string(), "self_");
        assert_eq!(ident("getValue").to_string(), "getValue");
    }

    #[test]
    fn negative_literals() {
        assert_eq!(int_literal(-1).to_string(), "- 1");
        assert_eq!(int_literal(i64::MIN).to_string(), "- 9223372036854775808");
        assert_eq!(int_literal(42).to_string(), "42");
    }
}
