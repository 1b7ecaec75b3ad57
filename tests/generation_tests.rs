//! Integration tests for binding generation using `BindingUnit` as the entry
//! point.
//!
//! These tests run the whole pipeline (scanning, model building, generation)
//! against the plug-in fixtures and inspect the generated source through
//! `syn`.

use std::path::PathBuf;

use combridge::prelude::*;
use combridge::codegen::IdentityRole;
use combridge::core::{GenerationError, ModelError};
use syn::{Item, ItemFn, ItemImpl, ItemStruct, ItemTrait, ItemType, ItemUnion};

/// Load a fixture from the tests/fixtures directory.
fn load_fixture(filename: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

/// Unit loaded with the plug-in model and header.
fn plugin_unit() -> BindingUnit {
    let mut unit = BindingUnit::new();
    unit.add_document(&load_fixture("plugin_model.json"))
        .expect("Failed to add document");
    unit.add_header("plugin_interfaces.h", load_fixture("plugin_interfaces.h"));
    unit
}

fn plugin_bindings() -> GeneratedBindings {
    plugin_unit().build().expect("Failed to generate").clone()
}

fn parse(bindings: &GeneratedBindings) -> syn::File {
    syn::parse_file(bindings.source()).unwrap_or_else(|e| panic!("generated source does not parse: {e}"))
}

fn find_fn<'f>(file: &'f syn::File, name: &str) -> &'f ItemFn {
    file.items
        .iter()
        .find_map(|item| match item {
            Item::Fn(f) if f.sig.ident == name => Some(f),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no fn {name}"))
}

fn find_struct<'f>(file: &'f syn::File, name: &str) -> &'f ItemStruct {
    file.items
        .iter()
        .find_map(|item| match item {
            Item::Struct(s) if s.ident == name => Some(s),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no struct {name}"))
}

fn find_trait<'f>(file: &'f syn::File, name: &str) -> Option<&'f ItemTrait> {
    file.items.iter().find_map(|item| match item {
        Item::Trait(t) if t.ident == name => Some(t),
        _ => None,
    })
}

fn find_type<'f>(file: &'f syn::File, name: &str) -> Option<&'f ItemType> {
    file.items.iter().find_map(|item| match item {
        Item::Type(t) if t.ident == name => Some(t),
        _ => None,
    })
}

fn find_union<'f>(file: &'f syn::File, name: &str) -> Option<&'f ItemUnion> {
    file.items.iter().find_map(|item| match item {
        Item::Union(u) if u.ident == name => Some(u),
        _ => None,
    })
}

/// Inherent `impl Name { ... }` blocks.
fn inherent_impls<'f>(file: &'f syn::File, name: &str) -> Vec<&'f ItemImpl> {
    file.items
        .iter()
        .filter_map(|item| match item {
            Item::Impl(i) if i.trait_.is_none() => Some(i),
            _ => None,
        })
        .filter(|i| tokens(&i.self_ty) == name)
        .collect()
}

/// Trait impls for `name`, as `(trait path, impl)`.
fn trait_impls<'f>(file: &'f syn::File, name: &str) -> Vec<(String, &'f ItemImpl)> {
    file.items
        .iter()
        .filter_map(|item| match item {
            Item::Impl(i) => i.trait_.as_ref().map(|(_, path, _)| (tokens(path), i)),
            _ => None,
        })
        .filter(|(_, i)| tokens(&i.self_ty) == name)
        .collect()
}

fn tokens(node: &impl quote::ToTokens) -> String {
    node.to_token_stream().to_string().replace(' ', "")
}

fn field_names(fields: &syn::Fields) -> Vec<String> {
    fields
        .iter()
        .map(|f| f.ident.as_ref().map(|i| i.to_string()).unwrap_or_default())
        .collect()
}

// =============================================================================
// Whole pipeline
// =============================================================================

#[test]
fn test_plugin_model_generates() {
    let bindings = plugin_bindings();
    assert!(bindings.source().starts_with(combridge::codegen::HEADER));

    let names: Vec<_> = bindings.interfaces().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        ["FUnknown", "IPluginBase", "IComponent", "IFoo", "IBar", "IPlugView"]
    );
}

#[test]
fn test_generated_source_parses() {
    let bindings = plugin_bindings();
    let file = parse(&bindings);
    assert!(file.items.len() > 20);
}

#[test]
fn test_generation_is_deterministic() {
    let first = plugin_bindings();
    let second = plugin_bindings();
    assert_eq!(first.source(), second.source());
    assert_eq!(first.fingerprint(), second.fingerprint());

    let mut changed = plugin_unit();
    changed.add_header("extra.h", "#define kExtra 1");
    let third = changed.build().unwrap();
    assert_ne!(first.fingerprint(), third.fingerprint());
}

// =============================================================================
// Slots
// =============================================================================

#[test]
fn test_slot_counts_sum_over_the_chain() {
    let bindings = plugin_bindings();
    let slots = |name: &str| bindings.interface(name).unwrap().slots;

    assert_eq!((slots("FUnknown").base_slot_count, slots("FUnknown").total()), (0, 3));
    assert_eq!((slots("IPluginBase").base_slot_count, slots("IPluginBase").total()), (3, 5));
    assert_eq!((slots("IComponent").base_slot_count, slots("IComponent").total()), (5, 8));
    assert_eq!((slots("IFoo").base_slot_count, slots("IFoo").total()), (3, 4));
    assert_eq!((slots("IBar").base_slot_count, slots("IBar").total()), (4, 5));
}

#[test]
fn test_vtable_initializer_writes_own_slots_after_base() {
    let bindings = plugin_bindings();
    let file = parse(&bindings);

    let impls = inherent_impls(&file, "IComponent");
    assert_eq!(impls.len(), 1);
    let init = impls[0]
        .items
        .iter()
        .find_map(|item| match item {
            syn::ImplItem::Fn(f) if f.sig.ident == "init_vtable" => Some(tokens(&f.block)),
            _ => None,
        })
        .unwrap();

    assert!(init.starts_with("{<IPluginBase>::init_vtable::<C>(slots);"));
    let pos = |needle: &str| init.find(needle).unwrap_or_else(|| panic!("{needle} missing"));
    assert!(pos("slots[5]") < pos("slots[6]"));
    assert!(pos("slots[6]") < pos("slots[7]"));
    assert!(!init.contains("slots[8]"));
    assert!(init.contains("IComponent_getBusCount::<C>"));
}

// =============================================================================
// Identity
// =============================================================================

#[test]
fn test_identifiers_come_from_the_header() {
    let bindings = plugin_bindings();
    assert_eq!(
        bindings.interface("IFoo").unwrap().guid,
        Guid::from_words(0x11111111, 0x22222222, 0x33333333, 0x44444444)
    );

    let file = parse(&bindings);
    let (_, interface) = trait_impls(&file, "IFoo")
        .into_iter()
        .find(|(path, _)| path.ends_with("Interface"))
        .unwrap();
    let text = tokens(interface);
    assert!(text.contains("Guid::from_words(0x11111111,0x22222222,0x33333333,0x44444444)"));
    assert!(text.contains("constSLOT_COUNT:usize=4;"));
    assert!(text.contains("<FUnknownas::combridge_runtime::Interface>::inherits(iid)"));
}

#[test]
fn test_rooted_interfaces_are_unknown() {
    let bindings = plugin_bindings();
    let file = parse(&bindings);

    for name in ["FUnknown", "IPluginBase", "IComponent", "IFoo", "IBar", "IPlugView"] {
        let impls = trait_impls(&file, name);
        assert!(
            impls.iter().any(|(path, _)| path.ends_with("Unknown")),
            "{name} should implement Unknown"
        );
    }

    let inherits: Vec<_> = trait_impls(&file, "IBar")
        .into_iter()
        .map(|(path, _)| path)
        .filter(|path| path.contains("Inherits"))
        .collect();
    assert_eq!(
        inherits,
        [
            "::combridge_runtime::Inherits<FUnknown>",
            "::combridge_runtime::Inherits<IFoo>"
        ]
    );
}

#[test]
fn test_identity_root_forwards_to_the_runtime() {
    let bindings = plugin_bindings();
    let file = parse(&bindings);

    // The root has no implementation trait of its own.
    assert!(find_trait(&file, "FUnknownImpl").is_none());
    assert!(find_trait(&file, "FUnknownTrait").is_some());

    let query = tokens(find_fn(&file, "FUnknown_queryInterface"));
    assert!(query.contains("<C:::combridge_runtime::Class>"));
    assert!(query.contains("_iid:*constTUID"));
    assert!(query.contains("ComObject::<C>::query_interface_raw"));

    let release = tokens(find_fn(&file, "FUnknown_release"));
    assert!(release.contains("ComObject::<C>::release_raw(this)"));
    assert!(release.ends_with("->u32{unsafe{::combridge_runtime::ComObject::<C>::release_raw(this)}}"));
}

// =============================================================================
// Outbound and inbound proxies
// =============================================================================

#[test]
fn test_outbound_trait_dispatches_by_slot() {
    let bindings = plugin_bindings();
    let file = parse(&bindings);

    let outbound = find_trait(&file, "IBarTrait").unwrap();
    assert_eq!(outbound.items.len(), 1);

    let alias = find_type(&file, "IBar_setValue_Fn").unwrap();
    assert_eq!(
        tokens(&alias.ty),
        "unsafeextern\"system\"fn(this:*mut::core::ffi::c_void,value:i32)->::combridge_runtime::ResultCode"
    );

    let blanket = file
        .items
        .iter()
        .find_map(|item| match item {
            Item::Impl(i) if i.trait_.as_ref().is_some_and(|(_, p, _)| tokens(p) == "IBarTrait") => Some(tokens(i)),
            _ => None,
        })
        .unwrap();
    assert!(blanket.contains("impl<T:::combridge_runtime::Inherits<IBar>>IBarTraitforT"));
    assert!(blanket.contains("slot_of(this,4)"));
}

#[test]
fn test_inbound_trampoline_guards_the_call() {
    let bindings = plugin_bindings();
    let file = parse(&bindings);

    let imp = find_trait(&file, "IBarImpl").unwrap();
    assert_eq!(tokens(&imp.supertraits), "IFooImpl");
    let foo = find_trait(&file, "IFooImpl").unwrap();
    assert_eq!(tokens(&foo.supertraits), "::combridge_runtime::Class");

    let trampoline = find_fn(&file, "IBar_setValue");
    assert!(trampoline.sig.unsafety.is_some());
    assert_eq!(tokens(&trampoline.sig.abi), "extern\"system\"");
    let body = tokens(&trampoline.block);
    assert!(body.contains("guard(\"IBar::setValue\",::combridge_runtime::ResultCode::INTERNAL_ERROR"));
    assert!(body.contains("<CasIBarImpl>::setValue(object.get(),value)"));

    let get_value = tokens(&find_fn(&file, "IFoo_getValue").block);
    assert!(get_value.contains("guard(\"IFoo::getValue\",0,"));
}

#[test]
fn test_parameter_shapes() {
    let bindings = plugin_bindings();
    let file = parse(&bindings);

    // Keyword parameter names stay usable; inline arrays travel by pointer.
    let alias = tokens(&find_type(&file, "IComponent_getBusCount_Fn").unwrap().ty);
    assert!(alias.contains("r#type:MediaTypes"));
    assert!(alias.contains("dir:BusDirections"));
    let alias = tokens(&find_type(&file, "IComponent_getName_Fn").unwrap().ty);
    assert!(alias.contains("name:*mutString128"));
    let alias = tokens(&find_type(&file, "IComponent_setActive_Fn").unwrap().ty);
    assert!(alias.contains("state:u8"));
    let alias = tokens(&find_type(&file, "IPlugView_getSize_Fn").unwrap().ty);
    assert!(alias.contains("size:*mutViewRect"));

    // Parameter names keep their header spelling without lint noise.
    let alias = find_type(&file, "IPlugView_onSize_Fn").unwrap();
    assert!(tokens(&alias.ty).contains("newSize:*mutViewRect"));
    let allowed: String = alias.attrs.iter().map(|a| tokens(a)).collect();
    assert!(allowed.contains("non_snake_case"));
}

#[test]
fn test_directions_limit_what_is_emitted() {
    let config = GeneratorConfig::new().with_direction(
        "IPlugView",
        BridgeDirections::OUTBOUND,
        "views are only ever created by the plug-in",
    );
    let mut unit = BindingUnit::with_config(config);
    unit.add_document(&load_fixture("plugin_model.json")).unwrap();
    unit.add_header("plugin_interfaces.h", load_fixture("plugin_interfaces.h"));
    let bindings = unit.build().unwrap().clone();
    let file = parse(&bindings);

    assert!(find_trait(&file, "IPlugViewTrait").is_some());
    assert!(find_trait(&file, "IPlugViewImpl").is_none());
    assert!(inherent_impls(&file, "IPlugView").is_empty());
    assert_eq!(
        bindings.interface("IPlugView").unwrap().directions,
        BridgeDirections::OUTBOUND
    );
    // Other interfaces are untouched.
    assert!(find_trait(&file, "IFooImpl").is_some());
}

#[test]
fn test_inbound_requires_inbound_ancestors() {
    let config = GeneratorConfig::new().with_direction("IFoo", BridgeDirections::OUTBOUND, "host only");
    let mut unit = BindingUnit::with_config(config);
    unit.add_document(&load_fixture("plugin_model.json")).unwrap();
    unit.add_header("plugin_interfaces.h", load_fixture("plugin_interfaces.h"));

    let err = unit.build().unwrap_err();
    assert_eq!(
        err,
        BridgeError::Generation(GenerationError::InboundAncestor {
            declaration: "IBar".into(),
            ancestor: "IFoo".into(),
        })
    );
}

// =============================================================================
// Records, enums, typedefs and constants
// =============================================================================

#[test]
fn test_records_keep_declared_field_order() {
    let bindings = plugin_bindings();
    let file = parse(&bindings);

    let rect = find_struct(&file, "ViewRect");
    assert_eq!(field_names(&rect.fields), ["left", "top", "right", "bottom"]);
    assert!(rect.attrs.iter().any(|a| tokens(a) == "#[repr(C)]"));

    let event = find_struct(&file, "Event");
    assert_eq!(
        field_names(&event.fields),
        ["busIndex", "sampleOffset", "ppqPosition", "flags", "r#type", "data"]
    );
}

#[test]
fn test_union_members_share_offset_zero() {
    let bindings = plugin_bindings();
    let file = parse(&bindings);

    let union = find_union(&file, "EventData").unwrap();
    assert_eq!(field_names(&syn::Fields::Named(union.fields.clone())), ["noteOn", "noteOff"]);

    // Unions are checked for size and alignment only: the larger member wins.
    let asserts = tokens(
        &file
            .items
            .iter()
            .find(|item| matches!(item, Item::Const(c) if c.ident == "_"))
            .unwrap(),
    );
    assert!(asserts.contains("size_of::<EventData>()==12"));
    assert!(asserts.contains("align_of::<EventData>()==4"));
    assert!(!asserts.contains("offset_of!(EventData"));
    assert!(asserts.contains("offset_of!(Event,data)==20"));
    assert!(asserts.contains("size_of::<Event>()==32"));
    assert!(asserts.contains("size_of::<IFoo>()==8"));
}

#[test]
fn test_typedef_shapes() {
    let bindings = plugin_bindings();
    let file = parse(&bindings);

    // Arrays become inline-array records, scalars become wrappers, named
    // targets become aliases, the result code disappears into the runtime.
    let tuid = find_struct(&file, "TUID");
    assert_eq!(field_names(&tuid.fields), ["data"]);
    assert_eq!(tokens(&tuid.fields.iter().next().unwrap().ty), "[::core::ffi::c_char;16]");

    let char_type = find_struct(&file, "TChar");
    assert!(char_type.attrs.iter().any(|a| tokens(a) == "#[repr(transparent)]"));
    assert_eq!(tokens(&char_type.fields.iter().next().unwrap().ty), "u16");

    let sample_rate = find_type(&file, "SampleRate").unwrap();
    assert_eq!(tokens(&sample_rate.ty), "ParamValue");

    assert!(bindings.item(ItemKind::Alias, "tresult").is_none());
    assert!(bindings.item(ItemKind::Record, "tresult").is_none());
}

#[test]
fn test_enums_and_constants() {
    let bindings = plugin_bindings();
    let file = parse(&bindings);

    assert_eq!(tokens(&find_type(&file, "MediaTypes").unwrap().ty), "i32");
    assert_eq!(tokens(&find_type(&file, "BusDirections").unwrap().ty), "u8");

    let consts: Vec<String> = file
        .items
        .iter()
        .filter_map(|item| match item {
            Item::Const(c) => Some(tokens(c)),
            _ => None,
        })
        .collect();
    let has = |needle: &str| consts.iter().any(|c| c.contains(needle));

    assert!(has("pubconstBusDirections_kOutput:BusDirections=1;"));
    assert!(has("pubconstkDefaultChannels:i32=2;"));
    assert!(has("pubconstkMaxBusCount:i32=64;"));
    assert!(has("pubconstkDefaultGain:f64=0.5;"));
    assert!(has("pubconstkVstAudioEffectClass:&::core::ffi::CStr=c\"AudioModuleClass\";"));
    assert!(has("pubconstkVstAudioEffectClass_UTF16:&[u16;19]"));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_missing_identifier_names_the_interface() {
    let mut unit = BindingUnit::new();
    unit.add_document(&load_fixture("plugin_model.json")).unwrap();
    // No header: nothing carries identifiers.
    let err = unit.build().unwrap_err();
    assert!(err.is_generation());
    assert!(err.to_string().contains("FUnknown"));
}

#[test]
fn test_unknown_base_is_a_model_error() {
    let mut unit = BindingUnit::new();
    unit.add_class(ClassEntry::new("IOrphan").with_base("IMissing"));
    let err = unit.build().unwrap_err();
    assert_eq!(
        err,
        BridgeError::Model(ModelError::UnknownBase {
            class: "IOrphan".into(),
            base: "IMissing".into(),
        })
    );
}

#[test]
fn test_circular_inheritance_is_a_model_error() {
    let mut unit = BindingUnit::new();
    unit.add_class(ClassEntry::new("IA").with_base("IB"));
    unit.add_class(ClassEntry::new("IB").with_base("IA"));
    assert!(matches!(
        unit.build().unwrap_err(),
        BridgeError::Model(ModelError::CircularInheritance { .. })
    ));
}

#[test]
fn test_unsupported_type_halts_generation() {
    let mut unit = plugin_unit();
    unit.add_class(
        ClassEntry::new("ICallback")
            .with_base("FUnknown")
            .with_method(
                MethodEntry::new("notify", TypeRef::named("tresult"))
                    .with_param("f", TypeRef::Unsupported("std::function<void()>".into())),
            ),
    );
    unit.add_identifier("ICallback", Guid::from_words(9, 9, 9, 9));

    let err = unit.build().unwrap_err();
    let BridgeError::Generation(err) = err else {
        panic!("expected a generation error, got {err:?}");
    };
    assert_eq!(err.declaration(), Some("ICallback::notify"));
    assert!(err.to_string().contains("std::function<void()>"));
}

#[test]
fn test_names_that_are_not_identifiers_halt_generation() {
    let mut unit = plugin_unit();
    unit.add_document(
        r#"{ "types": [
            { "entry": "class", "name": "Ev", "fields": [
                { "name": "", "ty": { "primitive": "int32" } } ] } ] }"#,
    )
    .unwrap();
    assert_eq!(
        unit.build().unwrap_err(),
        BridgeError::Generation(GenerationError::InvalidName {
            declaration: "Ev".into(),
            name: String::new(),
        })
    );

    let mut unit = plugin_unit();
    unit.add_class(ClassEntry::new("Bad Name").with_field("x", TypeRef::primitive(PrimitiveKind::Int32)));
    let err = unit.build().unwrap_err();
    assert!(err.is_generation());
    assert!(err.to_string().contains("'Bad Name'"));

    let mut unit = plugin_unit();
    unit.add_class(
        ClassEntry::new("ICallback")
            .with_base("FUnknown")
            .with_method(
                MethodEntry::new("notify", TypeRef::named("tresult"))
                    .with_param("two words", TypeRef::primitive(PrimitiveKind::Int32)),
            ),
    );
    unit.add_identifier("ICallback", Guid::from_words(9, 9, 9, 9));
    let BridgeError::Generation(err) = unit.build().unwrap_err() else {
        panic!("expected a generation error");
    };
    assert_eq!(err.declaration(), Some("ICallback::notify"));
}

#[test]
fn test_classification_roles() {
    let mut unit = plugin_unit();
    unit.add_class(
        ClassEntry::new("FObject")
            .with_base("FUnknown")
            .with_method(MethodEntry::new("isA", TypeRef::primitive(PrimitiveKind::Bool)).non_virtual()),
    );
    // A concrete implementation class is neither an interface nor a record.
    let err = unit.build().unwrap_err();
    assert!(err.is_generation());

    let idm = plugin_unit().model().unwrap();
    let config = GeneratorConfig::new();
    let mut ctx = combridge::codegen::GenerationContext::new(&idm, &config);
    let plan = combridge::codegen::plan_interface(&mut ctx, "FUnknown").unwrap();
    assert_eq!(plan.role, IdentityRole::Root);
    let plan = combridge::codegen::plan_interface(&mut ctx, "IComponent").unwrap();
    assert_eq!(plan.role, IdentityRole::Rooted);
    assert_eq!(plan.ancestors, ["FUnknown", "IPluginBase"]);
}
