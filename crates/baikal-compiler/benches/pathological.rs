use baikal_compiler::{check_method_with_limits, SizeLimits};
use baikal_dex::{CodeItem, DexFile, MethodId};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn dex_with(registers: u16, insns: usize) -> DexFile {
    let mut builder = DexFile::builder("bench.dex");
    let cls = builder.add_class("Lcom/example/Bench;");
    builder
        .add_method(
            MethodId {
                class_idx: cls,
                name: "run".to_string(),
                return_type: "V".to_string(),
                parameters: vec!["I".to_string(), "[J".to_string()],
            },
            Some(CodeItem::zeroed(registers, insns)),
        )
        .unwrap();
    builder.build()
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathological_filter");

    for (label, registers, insns) in [
        ("accept", 32u16, 1024usize),
        ("reject_insns", 32, 16383),
        ("reject_regs", 16383, 1024),
    ] {
        let dex = dex_with(registers, insns);
        group.bench_with_input(BenchmarkId::new("default_limits", label), &dex, |b, dex| {
            let code = dex.code_item(0).unwrap();
            b.iter(|| check_method_with_limits(black_box(code), 0, dex, SizeLimits::DEFAULT));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
