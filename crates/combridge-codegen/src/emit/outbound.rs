//! Outbound proxies: calling foreign objects through their vtable.

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

use crate::plan::{InterfacePlan, MethodPlan};

use super::{Emitter, ident};

impl Emitter<'_, '_> {
    /// One `extern "system"` function-pointer alias per own method.
    pub fn method_aliases(&self, plan: &InterfacePlan) -> TokenStream {
        let aliases = plan.methods.iter().map(|method| {
            let alias = alias_ident(plan, method);
            let params = method.params.iter().map(|p| {
                let name = ident(&p.name);
                let ty = self.ty(&p.ty);
                quote!(#name: #ty)
            });
            let ret = self.ret(&method.ret);
            quote! {
                #[allow(non_camel_case_types, non_snake_case)]
                pub type #alias = unsafe extern "system" fn(this: *mut ::core::ffi::c_void #(, #params)*) #ret;
            }
        });
        quote!(#(#aliases)*)
    }

    /// The outbound trait, implemented for every proxy that inherits the
    /// interface.
    pub fn outbound(&self, plan: &InterfacePlan) -> TokenStream {
        let rt = self.rt();
        let name = ident(plan.name());
        let trait_name = format_ident!("{}Trait", plan.name());
        let doc = format!(" Calls into a foreign `{}`.", plan.name());

        let declarations = plan.methods.iter().map(|method| {
            let signature = self.outbound_signature(method);
            quote!(#signature;)
        });

        let definitions = plan.methods.iter().map(|method| {
            let signature = self.outbound_signature(method);
            let alias = alias_ident(plan, method);
            let slot = Literal::usize_unsuffixed(method.slot);
            let args = method.params.iter().map(|p| ident(&p.name));
            quote! {
                #[inline]
                #signature {
                    unsafe {
                        let this = self as *const Self as *mut ::core::ffi::c_void;
                        let f = ::core::mem::transmute::<*const (), #alias>(#rt::slot_of(this, #slot).as_ptr());
                        f(this #(, #args)*)
                    }
                }
            }
        });

        quote! {
            #[doc = #doc]
            ///
            /// # Safety
            ///
            /// Every method dispatches through the stored vtable pointer. The
            /// receiver must be a live foreign object, never a proxy value
            /// constructed or moved on the Rust side, and pointer arguments
            /// must satisfy the foreign contract.
            #[allow(non_snake_case, non_camel_case_types, clippy::too_many_arguments)]
            pub trait #trait_name {
                #(#declarations)*
            }

            #[allow(non_snake_case, clippy::too_many_arguments)]
            impl<T: #rt::Inherits<#name>> #trait_name for T {
                #(#definitions)*
            }
        }
    }

    fn outbound_signature(&self, method: &MethodPlan) -> TokenStream {
        let method_name = ident(&method.rust_name);
        let params = method.params.iter().map(|p| {
            let name = ident(&p.name);
            let ty = self.ty(&p.ty);
            quote!(#name: #ty)
        });
        let ret = self.ret(&method.ret);
        quote!(unsafe fn #method_name(&self #(, #params)*) #ret)
    }
}

/// `Interface_method_Fn`
pub(crate) fn alias_ident(plan: &InterfacePlan, method: &MethodPlan) -> proc_macro2::Ident {
    format_ident!("{}_{}_Fn", plan.name(), method.rust_name)
}
