//! Benchmarks for binding generation.
//!
//! - Fixture: the plug-in model and header from `tests/fixtures`
//! - Phases: scanning, model building and generation on their own
//! - Scaling: synthetic interface chains and record sets of growing size
//!
//! Run with the `profile-with-puffin` feature to get per-phase timings:
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use std::hint::black_box;

use combridge::BindingUnit;
use combridge::codegen::{GeneratorConfig, generate};
use combridge::core::{ClassEntry, Guid, MethodEntry, PrimitiveKind, TypeRef};
use combridge::parser::{DeclarationScanner, ScanConfig};
use combridge::registry::{Idm, IdmBuilder, IdmDocument};
use criterion::{Criterion, Throughput, criterion_group, criterion_main};

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

/// Print the number of recorded frames and the top-level scope totals.
#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    use std::collections::HashMap;

    use puffin::Reader;

    let Some(frame_view) = FRAME_VIEW.get() else {
        return;
    };
    let view = frame_view.lock();
    let scopes = view.scope_collection();

    let mut totals: HashMap<String, i64> = HashMap::new();
    let mut frames = 0i64;
    for frame in view.recent_frames() {
        frames += 1;
        let Ok(unpacked) = frame.unpacked() else {
            continue;
        };
        for (_, stream_info) in unpacked.thread_streams.iter() {
            let Ok(top) = Reader::from_start(&stream_info.stream).read_top_scopes() else {
                continue;
            };
            for scope in top {
                if let Some(details) = scopes.fetch_by_id(&scope.id) {
                    *totals.entry(details.name().to_string()).or_insert(0) += scope.record.duration_ns;
                }
            }
        }
    }

    println!("\n=== Generation profile ({frames} frames) ===");
    let mut entries: Vec<_> = totals.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, ns) in entries {
        let avg = if frames > 0 { ns / frames } else { ns };
        println!("  {:30} {:>10.2?} avg", name, std::time::Duration::from_nanos(avg as u64));
    }
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

const MODEL: &str = include_str!("../tests/fixtures/plugin_model.json");
const HEADER: &str = include_str!("../tests/fixtures/plugin_interfaces.h");

fn fixture_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("generation/fixture");
    group.throughput(Throughput::Bytes((MODEL.len() + HEADER.len()) as u64));

    group.bench_function("full_pipeline", |b| {
        b.iter(|| {
            let mut unit = BindingUnit::new();
            unit.add_document(black_box(MODEL)).unwrap();
            unit.add_header("plugin_interfaces.h", black_box(HEADER));
            let fingerprint = unit.build().unwrap().fingerprint();
            end_profiling_frame();
            black_box(fingerprint)
        });
    });

    group.finish();
    print_profiling_stats();
}

fn phase_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation/phases");

    let scanner = DeclarationScanner::new(ScanConfig::default());
    group.bench_function("scan_header", |b| {
        b.iter(|| black_box(scanner.scan(black_box(HEADER)).unwrap().identifiers.len()));
    });

    group.bench_function("read_document", |b| {
        b.iter(|| black_box(IdmDocument::from_json(black_box(MODEL)).unwrap().types.len()));
    });

    let mut unit = BindingUnit::new();
    unit.add_document(MODEL).unwrap();
    unit.add_header("plugin_interfaces.h", HEADER);
    let idm = unit.model().unwrap();
    let config = GeneratorConfig::new();
    group.bench_function("generate", |b| {
        b.iter(|| black_box(generate(black_box(&idm), &config).unwrap().fingerprint()));
    });

    group.finish();
}

/// `depth` interfaces, each deriving from the previous one, with
/// `methods` methods apiece.
fn interface_chain(depth: usize, methods: usize) -> Idm {
    let mut builder = IdmBuilder::new();
    for i in 0..depth {
        let mut class = ClassEntry::new(format!("IChain{i}"))
            .with_guid(Guid::from_words(i as u32, 0x1000_0000, 0x2000_0000, 0x3000_0000));
        if i > 0 {
            class = class.with_base(format!("IChain{}", i - 1));
        }
        for m in 0..methods {
            class = class.with_method(
                MethodEntry::new(format!("method{m}"), TypeRef::ResultCode)
                    .with_param("value", TypeRef::primitive(PrimitiveKind::Int32))
                    .with_output("out", TypeRef::ptr(TypeRef::primitive(PrimitiveKind::Double))),
            );
        }
        builder.add_type(class);
    }
    builder.build().unwrap()
}

/// `count` records, each embedding the previous one by value.
fn nested_records(count: usize) -> Idm {
    let mut builder = IdmBuilder::new();
    for i in 0..count {
        let mut class = ClassEntry::new(format!("Record{i}"))
            .with_field("id", TypeRef::primitive(PrimitiveKind::Uint16))
            .with_field("weight", TypeRef::primitive(PrimitiveKind::Double))
            .with_field("tag", TypeRef::array(TypeRef::primitive(PrimitiveKind::Char8), 8));
        if i > 0 {
            class = class.with_field("inner", TypeRef::named(format!("Record{}", i - 1)));
        }
        builder.add_type(class);
    }
    builder.build().unwrap()
}

fn scaling_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation/scaling");
    let config = GeneratorConfig::new().without_root_interface();

    for depth in [4, 16, 64] {
        let idm = interface_chain(depth, 8);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_function(format!("interface_chain_{depth}"), |b| {
            b.iter(|| black_box(generate(black_box(&idm), &config).unwrap().items().len()));
        });
    }

    for count in [16, 128] {
        let idm = nested_records(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("nested_records_{count}"), |b| {
            b.iter(|| black_box(generate(black_box(&idm), &config).unwrap().items().len()));
        });
    }

    group.finish();
}

criterion_group!(benches, fixture_benchmarks, phase_benchmarks, scaling_benchmarks);
criterion_main!(benches);
