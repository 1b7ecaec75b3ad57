//! The generation pipeline.
//!
//! Generation runs in three passes over the model, in declaration order:
//!
//! 1. classify every class; validate interfaces and allocate their slots;
//!    lay out records, enums and typedefs
//! 2. build one emission plan per interface
//! 3. emit items and render them
//!
//! Any error stops the run. Nothing is skipped.

use tracing::{debug, info};

use combridge_core::{GenerationError, TypeEntry};
use combridge_registry::Idm;

use crate::classify::ClassKind;
use crate::config::GeneratorConfig;
use crate::context::GenerationContext;
use crate::emit::Emitter;
use crate::layout::LayoutResolver;
use crate::names;
use crate::output::{GeneratedBindings, GeneratedItem, InterfaceSummary, ItemKind};
use crate::plan::{InterfacePlan, plan_interface};
use crate::slots::SlotAllocator;

/// Generates bindings for one model and configuration.
pub struct Generator<'idm> {
    idm: &'idm Idm,
    config: &'idm GeneratorConfig,
}

impl<'idm> Generator<'idm> {
    pub fn new(idm: &'idm Idm, config: &'idm GeneratorConfig) -> Self {
        Self { idm, config }
    }

    /// Run the pipeline.
    #[tracing::instrument(name = "generate", skip_all, fields(types = self.idm.type_count()))]
    pub fn generate(&self) -> Result<GeneratedBindings, GenerationError> {
        self.config.validate()?;
        let runtime: syn::Path =
            syn::parse_str(&self.config.runtime_path).map_err(|e| GenerationError::InvalidConfig {
                detail: format!("runtime path: {e}"),
            })?;

        let mut ctx = GenerationContext::new(self.idm, self.config);
        let interfaces = self.resolve(&mut ctx)?;
        debug!(
            interfaces = interfaces.len(),
            records = ctx.records().count(),
            "resolved model"
        );

        let plans = interfaces
            .iter()
            .map(|name| plan_interface(&mut ctx, name))
            .collect::<Result<Vec<_>, _>>()?;

        let emitter = Emitter::new(&ctx, runtime);
        let items = self.emit(&emitter, &plans)?;
        let summaries = plans
            .iter()
            .map(|plan| InterfaceSummary {
                name: plan.name().to_string(),
                guid: plan.entry.guid,
                base: plan.entry.base.clone(),
                slots: plan.slots,
                directions: plan.entry.directions,
            })
            .collect();

        let bindings = GeneratedBindings::new(items, summaries);
        info!(
            items = bindings.items().len(),
            fingerprint = bindings.fingerprint(),
            "generated bindings"
        );
        Ok(bindings)
    }

    /// Pass 1. Returns the interface names in declaration order.
    #[cfg_attr(feature = "profiling", profiling::function)]
    fn resolve(&self, ctx: &mut GenerationContext<'idm>) -> Result<Vec<String>, GenerationError> {
        let mut interfaces = Vec::new();
        for entry in self.idm.types() {
            names::check(entry.name(), entry.name())?;
            match entry {
                TypeEntry::Class(class) => match ctx.classify(&class.name)? {
                    ClassKind::Interface => {
                        ctx.interface(&class.name)?;
                        SlotAllocator::new(ctx).allocate(&class.name)?;
                        interfaces.push(class.name.clone());
                    }
                    ClassKind::Record => {
                        LayoutResolver::new(ctx).resolve_record(class)?;
                    }
                },
                TypeEntry::Enum(entry) => {
                    for item in &entry.values {
                        names::check(&entry.name, &format!("{}_{}", entry.name, item.name))?;
                    }
                    LayoutResolver::new(ctx).resolve_named(&entry.name, &entry.name, true)?;
                }
                TypeEntry::Typedef(entry) => {
                    LayoutResolver::new(ctx).resolve_named(&entry.name, &entry.name, false)?;
                }
            }
        }
        for constant in self.idm.constants() {
            names::check(&constant.name, &constant.name)?;
        }
        Ok(interfaces)
    }

    /// Pass 3.
    #[cfg_attr(feature = "profiling", profiling::function)]
    fn emit(&self, emitter: &Emitter<'_, '_>, plans: &[InterfacePlan]) -> Result<Vec<GeneratedItem>, GenerationError> {
        let ctx = emitter.ctx();
        let mut items = Vec::new();
        let mut push = |kind, name: &str, tokens| {
            items.push(GeneratedItem {
                kind,
                name: name.to_string(),
                tokens,
            })
        };

        for entry in self.idm.types() {
            let name = entry.name();
            match entry {
                TypeEntry::Class(_) => {
                    if let Some(plan) = plans.iter().find(|p| p.name() == name) {
                        push(ItemKind::Interface, name, self.interface(emitter, plan));
                    } else if let Some(record) = ctx.record_by_name(name) {
                        push(ItemKind::Record, name, emitter.record(record));
                    }
                }
                TypeEntry::Enum(entry) => push(ItemKind::Enum, name, emitter.enumeration(entry)),
                TypeEntry::Typedef(_) => {
                    if let Some(record) = ctx.record_by_name(name) {
                        push(ItemKind::Record, name, emitter.record(record));
                    } else if let Some((_, target)) = ctx.aliases().iter().find(|(alias, _)| alias == name) {
                        push(ItemKind::Alias, name, emitter.alias(name, target));
                    }
                }
            }
        }

        for constant in self.idm.constants() {
            push(ItemKind::Constant, &constant.name, emitter.constant(constant)?);
        }

        if self.config.layout_assertions {
            let proxies: Vec<String> = plans.iter().map(|p| p.name().to_string()).collect();
            let tokens = emitter.layout_assertions(ctx.records(), &proxies);
            push(ItemKind::LayoutAssertions, "layout", tokens);
        }
        Ok(items)
    }

    fn interface(&self, emitter: &Emitter<'_, '_>, plan: &InterfacePlan) -> proc_macro2::TokenStream {
        let directions = plan.entry.directions;
        let proxy = emitter.proxy(plan);
        let aliases = emitter.method_aliases(plan);
        let outbound = directions.outbound().then(|| emitter.outbound(plan));
        let inbound = directions.inbound().then(|| emitter.inbound(plan));
        debug!(
            interface = plan.name(),
            outbound = directions.outbound(),
            inbound = directions.inbound(),
            slots = plan.slots.total(),
            "emitting interface"
        );
        quote::quote! {
            #proxy
            #aliases
            #outbound
            #inbound
        }
    }
}

/// Generate bindings for `idm` with `config`.
pub fn generate(idm: &Idm, config: &GeneratorConfig) -> Result<GeneratedBindings, GenerationError> {
    Generator::new(idm, config).generate()
}
