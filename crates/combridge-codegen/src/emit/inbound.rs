//! Inbound proxies: trampolines, implementation traits and vtable
//! initializers for Rust objects handed to the foreign side.

use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};

use crate::plan::{IdentityRole, InterfacePlan, MethodPlan};

use super::outbound::alias_ident;
use super::{Emitter, ident};

impl Emitter<'_, '_> {
    /// The implementation trait, one trampoline per own method, and the
    /// `init_vtable` / `binding` associated functions.
    pub fn inbound(&self, plan: &InterfacePlan) -> TokenStream {
        let rt = self.rt();
        let name = ident(plan.name());
        let bound = self.impl_bound(plan);

        let implementation = match plan.role {
            IdentityRole::Root => TokenStream::new(),
            _ => self.impl_trait(plan),
        };
        let trampolines = plan.methods.iter().map(|method| match plan.role {
            IdentityRole::Root => self.identity_trampoline(plan, method),
            _ => self.trampoline(plan, method),
        });

        let base_init = plan.base().map(|base| {
            let base = ident(base);
            quote!(<#base>::init_vtable::<C>(slots);)
        });
        let writes = plan.methods.iter().map(|method| {
            let alias = alias_ident(plan, method);
            let trampoline = trampoline_ident(plan, method);
            let slot = Literal::usize_unsuffixed(method.slot);
            quote! {
                let f: #alias = #trampoline::<C>;
                slots[#slot] = #rt::Slot::new(f as *const ());
            }
        });

        quote! {
            #implementation
            #(#trampolines)*

            impl #name {
                /// Fill the first `SLOT_COUNT` entries of `slots` with `C`'s
                /// entry points, base chain first.
                pub fn init_vtable<C: #bound>(slots: &mut [#rt::Slot]) {
                    #base_init
                    #(#writes)*
                }

                /// Binding that exposes this interface on `C`'s objects.
                pub fn binding<C: #bound>() -> #rt::InterfaceBinding {
                    #rt::InterfaceBinding::new::<Self>(Self::init_vtable::<C>)
                }
            }
        }
    }

    /// The trait a Rust type implements to be called through this interface.
    fn impl_bound(&self, plan: &InterfacePlan) -> TokenStream {
        let rt = self.rt();
        match plan.role {
            IdentityRole::Root => quote!(#rt::Class),
            _ => {
                let trait_name = impl_trait_ident(plan.name());
                quote!(#trait_name)
            }
        }
    }

    fn impl_trait(&self, plan: &InterfacePlan) -> TokenStream {
        let rt = self.rt();
        let trait_name = impl_trait_ident(plan.name());
        let supertrait = match (plan.base(), plan.role) {
            (Some(base), IdentityRole::Plain) => {
                let base = impl_trait_ident(base);
                quote!(#base)
            }
            (Some(base), _) if plan.ancestors.len() > 1 => {
                let base = impl_trait_ident(base);
                quote!(#base)
            }
            _ => quote!(#rt::Class),
        };
        let doc = format!(" Rust implementation of `{}`.", plan.name());

        let methods = plan.methods.iter().map(|method| {
            let method_name = ident(&method.rust_name);
            let params = method.params.iter().map(|p| {
                let name = ident(&p.name);
                let ty = self.ty(&p.ty);
                quote!(#name: #ty)
            });
            let ret = self.ret(&method.ret);
            quote!(fn #method_name(&self #(, #params)*) #ret;)
        });

        quote! {
            #[doc = #doc]
            #[allow(non_snake_case, non_camel_case_types, clippy::too_many_arguments)]
            pub trait #trait_name: #supertrait {
                #(#methods)*
            }
        }
    }

    fn trampoline(&self, plan: &InterfacePlan, method: &MethodPlan) -> TokenStream {
        let rt = self.rt();
        let trait_name = impl_trait_ident(plan.name());
        let trampoline = trampoline_ident(plan, method);
        let method_name = ident(&method.rust_name);
        let label = format!("{}::{}", plan.name(), method.name);
        let fallback = self.fallback(&method.ret);
        let ret = self.ret(&method.ret);
        let params = method.params.iter().map(|p| {
            let name = ident(&p.name);
            let ty = self.ty(&p.ty);
            quote!(#name: #ty)
        });
        let args = method.params.iter().map(|p| ident(&p.name));

        quote! {
            #[allow(non_snake_case, clippy::missing_safety_doc, clippy::too_many_arguments)]
            pub unsafe extern "system" fn #trampoline<C: #trait_name>(
                this: *mut ::core::ffi::c_void #(, #params)*
            ) #ret {
                let object = unsafe { #rt::ComObject::<C>::from_this(this) };
                #rt::guard(#label, #fallback, || <C as #trait_name>::#method_name(object.get() #(, #args)*))
            }
        }
    }

    /// Root methods forward straight to the object's identity and lifetime.
    fn identity_trampoline(&self, plan: &InterfacePlan, method: &MethodPlan) -> TokenStream {
        let rt = self.rt();
        let names = &self.ctx().config().identity_methods;
        let trampoline = trampoline_ident(plan, method);
        let ret = self.ret(&method.ret);
        let params = method.params.iter().map(|p| {
            let name = ident(&p.name);
            let ty = self.ty(&p.ty);
            quote!(#name: #ty)
        });

        let body = if method.name == names.query_interface {
            let iid = ident(&method.params[0].name);
            let out = ident(&method.params[1].name);
            quote!(#rt::ComObject::<C>::query_interface_raw(this, #iid.cast(), #out.cast()))
        } else if method.name == names.add_ref {
            quote!(#rt::ComObject::<C>::add_ref_raw(this))
        } else {
            quote!(#rt::ComObject::<C>::release_raw(this))
        };

        quote! {
            #[allow(non_snake_case, clippy::missing_safety_doc)]
            pub unsafe extern "system" fn #trampoline<C: #rt::Class>(
                this: *mut ::core::ffi::c_void #(, #params)*
            ) #ret {
                unsafe { #body }
            }
        }
    }
}

/// `IFooImpl`
fn impl_trait_ident(interface: &str) -> Ident {
    format_ident!("{}Impl", interface)
}

/// `IFoo_getValue`
fn trampoline_ident(plan: &InterfacePlan, method: &MethodPlan) -> Ident {
    format_ident!("{}_{}", plan.name(), method.rust_name)
}
