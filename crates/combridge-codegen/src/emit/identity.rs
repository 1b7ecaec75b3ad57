//! Proxy structs and identity impls.

use proc_macro2::{Literal, Span, TokenStream};
use quote::quote;

use crate::plan::{IdentityRole, InterfacePlan};

use super::{Emitter, ident};

impl Emitter<'_, '_> {
    /// The proxy struct, its `Interface` impl and the inheritance markers.
    pub fn proxy(&self, plan: &InterfacePlan) -> TokenStream {
        let rt = self.rt();
        let name = ident(plan.name());
        let name_str = plan.name();
        let doc = format!(
            " Foreign interface `{}` ({}), {} slots.",
            name_str,
            plan.entry.guid,
            plan.slots.total()
        );

        let words = plan
            .entry
            .guid
            .words()
            .map(|w| syn::LitInt::new(&format!("0x{w:08X}"), Span::call_site()));
        let base_slots = Literal::usize_unsuffixed(plan.slots.base_slot_count);
        let total_slots = Literal::usize_unsuffixed(plan.slots.total());

        let inherits = match plan.base() {
            Some(base) => {
                let base = ident(base);
                quote!(*iid == Self::IID || <#base as #rt::Interface>::inherits(iid))
            }
            None => quote!(*iid == Self::IID),
        };

        let ancestors = plan.ancestors.iter().map(|ancestor| {
            let ancestor = ident(ancestor);
            quote!(unsafe impl #rt::Inherits<#ancestor> for #name {})
        });

        let unknown = match plan.role {
            IdentityRole::Root | IdentityRole::Rooted => quote!(unsafe impl #rt::Unknown for #name {}),
            IdentityRole::Plain => TokenStream::new(),
        };

        quote! {
            #[doc = #doc]
            ///
            /// Only ever used behind a reference or raw pointer: the address of
            /// a proxy is the `this` pointer the foreign side sees.
            #[repr(C)]
            #[allow(dead_code, non_camel_case_types)]
            pub struct #name {
                vtbl: *const #rt::Slot,
                _pin: ::core::marker::PhantomPinned,
            }

            unsafe impl #rt::Interface for #name {
                const IID: #rt::Guid = #rt::Guid::from_words(#(#words),*);
                const NAME: &'static str = #name_str;
                const BASE_SLOT_COUNT: usize = #base_slots;
                const SLOT_COUNT: usize = #total_slots;

                #[inline]
                fn inherits(iid: &#rt::Guid) -> bool {
                    #inherits
                }
            }

            #(#ancestors)*
            #unknown
        }
    }
}
