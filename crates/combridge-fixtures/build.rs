use std::env;
use std::fs;
use std::path::PathBuf;

use combridge::BindingUnit;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let fixtures = manifest_dir.join("../../tests/fixtures");
    let model = fixtures.join("plugin_model.json");
    let header = fixtures.join("plugin_interfaces.h");
    println!("cargo:rerun-if-changed={}", model.display());
    println!("cargo:rerun-if-changed={}", header.display());

    let read = |path: &PathBuf| {
        fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
    };

    let mut unit = BindingUnit::new();
    unit.add_document(&read(&model))
        .unwrap_or_else(|e| panic!("invalid fixture model: {e}"));
    unit.add_header("plugin_interfaces.h", read(&header));
    let bindings = unit
        .build()
        .unwrap_or_else(|e| panic!("failed to generate fixture bindings: {e}"));

    let out_path = PathBuf::from(env::var("OUT_DIR").unwrap()).join("plugin.rs");
    fs::write(&out_path, bindings.source())
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", out_path.display()));
}
