//! Benchmarks for bound entry point dispatch.
//!
//! Measures the per-call cost of the generated entry points: argument
//! extraction, default filling, receiver lookup and return encoding.
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use scriptbind::{
    Bindings, CallContext, Finalizer, HostVm, InstanceTable, NativeClass, NativeFn, Params, Value,
};
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
use std::collections::HashMap;

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

/// Print the average time of each top-level scope.
#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    use puffin::Reader;

    let Some(frame_view) = FRAME_VIEW.get() else {
        return;
    };
    let view = frame_view.lock();
    let scope_collection = view.scope_collection();

    let mut scope_timings: HashMap<String, i64> = HashMap::new();
    let mut frame_count = 0i64;
    for frame in view.recent_frames() {
        frame_count += 1;
        let Ok(unpacked) = frame.unpacked() else {
            continue;
        };
        for (_thread_info, stream_info) in unpacked.thread_streams.iter() {
            let Ok(scopes) = Reader::from_start(&stream_info.stream).read_top_scopes() else {
                continue;
            };
            for scope in scopes {
                if let Some(details) = scope_collection.fetch_by_id(&scope.id) {
                    *scope_timings.entry(details.name().to_string()).or_insert(0) += scope.record.duration_ns;
                }
            }
        }
    }

    println!("\n=== Dispatch profile ({frame_count} frames) ===");
    let mut entries: Vec<_> = scope_timings.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    for (name, ns) in entries {
        let avg = ns / frame_count.max(1);
        println!("  {name:30} {:>10.2?}", std::time::Duration::from_nanos(avg as u64));
    }
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

/// A host that keeps nothing; entries are taken from the registry.
struct NullVm;

impl HostVm for NullVm {
    type Class = ();

    fn define_class(&mut self, _: &str, _: Option<()>) -> Self::Class {}

    fn set_lifecycle(&mut self, _: (), _: NativeFn, _: Finalizer) {}

    fn define_method(&mut self, _: (), _: &str, _: usize, _: NativeFn) {}

    fn set_instance_variable(&mut self, _: &Value, _: &str, _: (), _: Value) {}

    fn instance_variable(&self, _: &Value, _: &str) -> Value {
        Value::Nil
    }
}

#[derive(Default, Clone, NativeClass)]
#[script(value)]
struct Monster {
    #[script(get, set)]
    hp: u32,
    #[script(get)]
    atk: u32,
}

fn bindings() -> Bindings<()> {
    let mut vm = NullVm;
    let mut bindings = Bindings::new();
    bindings
        .register_class::<Monster, _>(&mut vm, "Monster", None)
        .unwrap()
        .constructor_with(Params::new().optional(0).optional(0), |hp: u32, atk: u32| Monster {
            hp,
            atk,
        })
        .unwrap()
        .method_mut("apply_damage", |m: &mut Monster, attacker: Monster| {
            m.hp = m.hp.saturating_sub(attacker.atk)
        })
        .unwrap()
        .method_with(
            "describe",
            Params::new().optional("monster"),
            |m: &Monster, label: String| format!("{label}:{}", m.hp),
        )
        .unwrap()
        .fields()
        .unwrap();
    bindings
}

fn member(bindings: &Bindings<()>, name: &str) -> NativeFn {
    let info = bindings.class_info::<Monster>().unwrap();
    match name {
        "new" => info.allocator().clone(),
        _ => info.member(name).unwrap().entry.clone(),
    }
}

fn run(entry: &NativeFn, slots: &[Value], offset: usize, instances: &mut InstanceTable) -> Value {
    let mut ret = Value::Nil;
    let mut ctx = CallContext::new(slots, offset, &mut ret, instances);
    entry.call(&mut ctx).unwrap();
    ret
}

fn construction_benchmarks(c: &mut Criterion) {
    setup_profiler();

    let bindings = bindings();
    let new = member(&bindings, "new");
    let mut group = c.benchmark_group("dispatch/construct");

    for (label, args) in [
        ("defaults", vec![]),
        ("one_arg", vec![Value::Int(10)]),
        ("all_args", vec![Value::Int(10), Value::Int(3)]),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(label), &args, |b, args| {
            let mut instances = InstanceTable::new();
            b.iter(|| {
                let object = run(&new, black_box(args), 0, &mut instances);
                if let Some(handle) = object.as_instance() {
                    instances.finalize(handle);
                }
                end_profiling_frame();
            });
        });
    }

    group.finish();
    print_profiling_stats();
}

fn method_benchmarks(c: &mut Criterion) {
    setup_profiler();

    let mut bindings = bindings();
    let new = member(&bindings, "new");
    let target = run(&new, &[Value::Int(1_000_000)], 0, bindings.instances_mut());
    let attacker = run(&new, &[Value::Int(1), Value::Int(1)], 0, bindings.instances_mut());

    let mut group = c.benchmark_group("dispatch/method");

    let getter = member(&bindings, "hp");
    group.bench_function("getter", |b| {
        let slots = [target.clone()];
        b.iter(|| {
            black_box(run(&getter, black_box(&slots), 1, bindings.instances_mut()));
            end_profiling_frame();
        });
    });

    let setter = member(&bindings, "hp=");
    group.bench_function("setter", |b| {
        let slots = [target.clone(), Value::Int(500)];
        b.iter(|| {
            run(&setter, black_box(&slots), 1, bindings.instances_mut());
            end_profiling_frame();
        });
    });

    let apply_damage = member(&bindings, "apply_damage");
    group.bench_function("instance_argument", |b| {
        let slots = [target.clone(), attacker.clone()];
        b.iter(|| {
            run(&apply_damage, black_box(&slots), 1, bindings.instances_mut());
            end_profiling_frame();
        });
    });

    let describe = member(&bindings, "describe");
    group.bench_function("string_default", |b| {
        let slots = [target.clone()];
        b.iter(|| {
            black_box(run(&describe, black_box(&slots), 1, bindings.instances_mut()));
            end_profiling_frame();
        });
    });

    group.finish();
    print_profiling_stats();
}

criterion_group!(benches, construction_benchmarks, method_benchmarks);
criterion_main!(benches);
