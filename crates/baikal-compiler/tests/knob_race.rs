//! Concurrent factory calls publish a single knob value.
//!
//! Each thread reads its own store and half of them set the property, so the
//! racing threads see different raw values. Every compiler must still observe
//! the one value that was published.

use std::sync::Barrier;

use baikal_compiler::compiler::{try_create, Kind};
use baikal_compiler::knob::{self, INC_MAX_PROPERTY};
use baikal_compiler::{CompiledMethodStorage, CompilerOptions, MemoryProperties, SizeLimits};

const THREADS: usize = 8;

#[test]
fn test_concurrent_factories_agree_on_limits() {
    let options = CompilerOptions::default();
    let storage = CompiledMethodStorage::new();
    let barrier = Barrier::new(THREADS);

    let limits: Vec<SizeLimits> = std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(THREADS);
        for i in 0..THREADS {
            let (options, storage, barrier) = (&options, &storage, &barrier);
            handles.push(scope.spawn(move || {
                let (value, kind) = if i % 2 == 0 {
                    ("1", Kind::Optimizing)
                } else {
                    ("0", Kind::LegacyQuick)
                };
                let properties = MemoryProperties::with(INC_MAX_PROPERTY, value);
                barrier.wait();
                try_create(options, storage, kind.tag(), &properties)
                    .ok()
                    .unwrap()
                    .size_limits()
            }));
        }
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(knob::is_resolved());
    let published = SizeLimits::current();
    assert_eq!(published, SizeLimits::for_knob(knob::increase_max_method_size()));
    assert!(limits.iter().all(|&l| l == published), "limits: {:?}", limits);
}
