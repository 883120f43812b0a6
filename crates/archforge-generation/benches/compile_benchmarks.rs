use archforge_generation::{
    ArtifactKind, Compiler, Generator, LibraryOptions, TemplateKey, TemplateRegistry,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// ============================================================================
// Benchmark 1: Single Template Compilation
// ============================================================================

fn benchmark_compile_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile_template");
    let generator = Generator::new();
    let compiler = Compiler::shared();
    let registry = TemplateRegistry::global();

    for key in ["contract/errors", "contract/ports", "data-access/repository", "provider/service"] {
        let key: TemplateKey = match key.parse() {
            Ok(key) => key,
            Err(_) => continue,
        };
        let Some(entry) = registry.get(&key) else {
            continue;
        };
        let Ok(context) = generator.build_context(&LibraryOptions::new(
            "order-item",
            "@shop",
            key.artifact_kind,
        )) else {
            continue;
        };

        group.bench_with_input(
            BenchmarkId::from_parameter(key.to_string()),
            &context,
            |b, context| {
                b.iter(|| {
                    let _ = compiler.compile(black_box(&entry.definition), black_box(context));
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Benchmark 2: Whole Library Generation
// ============================================================================

fn benchmark_generate_library(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_library");
    let generator = Generator::new();

    for kind in ArtifactKind::ALL {
        let options = LibraryOptions::new("customer", "@shop", kind);
        group.bench_with_input(BenchmarkId::from_parameter(kind), &options, |b, options| {
            b.iter(|| {
                let _ = generator.generate_library(black_box(options));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_compile_template, benchmark_generate_library);

criterion_main!(benches);
