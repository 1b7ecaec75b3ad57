//! Records, typedef aliases and layout assertions.

use proc_macro2::{Literal, TokenStream};
use quote::quote;

use crate::layout::{LayoutType, RecordKind, RecordLayout};

use super::{Emitter, ident};

impl Emitter<'_, '_> {
    /// A `#[repr(C)]` struct or union, or a synthesized typedef record.
    pub fn record(&self, layout: &RecordLayout) -> TokenStream {
        let name = ident(&layout.name);

        if layout.kind == RecordKind::Wrapper {
            let inner = layout.fields.first().map(|f| self.ty(&f.ty)).unwrap_or_default();
            return quote! {
                #[repr(transparent)]
                #[derive(Clone, Copy, Debug)]
                #[allow(non_camel_case_types)]
                pub struct #name(pub #inner);
            };
        }

        let fields = layout.fields.iter().map(|field| {
            let field_name = ident(&field.name);
            let ty = self.ty(&field.ty);
            quote!(pub #field_name: #ty)
        });
        let keyword = if layout.kind == RecordKind::Union {
            quote!(union)
        } else {
            quote!(struct)
        };

        quote! {
            #[repr(C)]
            #[derive(Clone, Copy)]
            #[allow(non_camel_case_types, non_snake_case)]
            pub #keyword #name {
                #(#fields,)*
            }
        }
    }

    /// `pub type Alias = Target;`
    pub fn alias(&self, name: &str, target: &LayoutType) -> TokenStream {
        let name = ident(name);
        let target = self.ty(target);
        quote! {
            #[allow(non_camel_case_types)]
            pub type #name = #target;
        }
    }

    /// Compile-time checks that every record and proxy has the computed
    /// layout, enabled only for the configured pointer width.
    pub fn layout_assertions<'r>(
        &self,
        records: impl IntoIterator<Item = &'r RecordLayout>,
        proxies: &[String],
    ) -> TokenStream {
        let mut checks = Vec::new();
        for record in records {
            let name = ident(&record.name);
            let size = Literal::usize_unsuffixed(record.size);
            let align = Literal::usize_unsuffixed(record.align);
            checks.push(quote!(assert!(::core::mem::size_of::<#name>() == #size);));
            checks.push(quote!(assert!(::core::mem::align_of::<#name>() == #align);));
            if record.kind == RecordKind::Struct {
                for field in &record.fields {
                    let field_name = ident(&field.name);
                    let offset = Literal::usize_unsuffixed(field.offset);
                    checks.push(quote!(
                        assert!(::core::mem::offset_of!(#name, #field_name) == #offset);
                    ));
                }
            }
        }

        let pointer = Literal::usize_unsuffixed(self.ctx().config().pointer_size());
        for proxy in proxies {
            let name = ident(proxy);
            checks.push(quote!(assert!(::core::mem::size_of::<#name>() == #pointer);));
        }

        let width = self.ctx().config().pointer_width.to_string();
        quote! {
            #[cfg(target_pointer_width = #width)]
            const _: () = {
                #(#checks)*
            };
        }
    }
}
