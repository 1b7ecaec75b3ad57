//! Enums and `#define`-style constants.

use std::ffi::CString;

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

use combridge_core::{ConstantEntry, ConstantValue, EnumEntry, GenerationError};

use super::{Emitter, ident, int_literal};

impl Emitter<'_, '_> {
    /// A type alias of the underlying integer plus one constant per item.
    ///
    /// Values the foreign side sends outside the item set stay representable.
    pub fn enumeration(&self, entry: &EnumEntry) -> TokenStream {
        let name = ident(&entry.name);
        let underlying = self.primitive(entry.underlying);
        let items = entry.values.iter().map(|item| {
            let item_name = format_ident!("{}_{}", entry.name, item.name);
            let value = int_literal(item.value);
            quote! {
                #[allow(non_upper_case_globals)]
                pub const #item_name: #name = #value;
            }
        });

        quote! {
            #[allow(non_camel_case_types)]
            pub type #name = #underlying;
            #(#items)*
        }
    }

    /// A constant with its resolved type. Strings are emitted twice: as a
    /// nul-terminated C string and as a nul-terminated UTF-16 array with the
    /// `_UTF16` suffix.
    pub fn constant(&self, entry: &ConstantEntry) -> Result<TokenStream, GenerationError> {
        let name = ident(&entry.name);
        let tokens = match &entry.value {
            ConstantValue::Signed(value) => {
                let ty = if i32::try_from(*value).is_ok() {
                    quote!(i32)
                } else {
                    quote!(i64)
                };
                let value = int_literal(*value);
                quote!(pub const #name: #ty = #value;)
            }
            ConstantValue::Unsigned(value) => {
                let ty = if u32::try_from(*value).is_ok() {
                    quote!(u32)
                } else {
                    quote!(u64)
                };
                let value = Literal::u64_unsuffixed(*value);
                quote!(pub const #name: #ty = #value;)
            }
            ConstantValue::Float(value) => {
                if !value.is_finite() {
                    return Err(GenerationError::UnsupportedType {
                        declaration: entry.name.clone(),
                        spelling: value.to_string(),
                    });
                }
                let magnitude = Literal::f64_unsuffixed(value.abs());
                if value.is_sign_negative() {
                    quote!(pub const #name: f64 = -#magnitude;)
                } else {
                    quote!(pub const #name: f64 = #magnitude;)
                }
            }
            ConstantValue::Str(text) => {
                let c_string = CString::new(text.as_str()).map_err(|_| GenerationError::UnsupportedType {
                    declaration: entry.name.clone(),
                    spelling: "string with an embedded nul".to_string(),
                })?;
                let c_literal = Literal::c_string(&c_string);
                let units: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
                let len = Literal::usize_unsuffixed(units.len());
                let units = units.iter().map(|u| Literal::u16_unsuffixed(*u));
                let wide = format_ident!("{}_UTF16", entry.name);
                quote! {
                    #[allow(non_upper_case_globals)]
                    pub const #name: &::core::ffi::CStr = #c_literal;
                    #[allow(non_upper_case_globals)]
                    pub const #wide: &[u16; #len] = &[#(#units),*];
                }
            }
        };

        Ok(match entry.value {
            ConstantValue::Str(_) => tokens,
            _ => quote! {
                #[allow(non_upper_case_globals)]
                #tokens
            },
        })
    }
}
