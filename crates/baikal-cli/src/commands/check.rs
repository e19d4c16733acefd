//! `baikal-aot check` — Run the pathological filter over a bytecode file.

use std::path::Path;

use baikal_compiler::compiler::Kind;
use baikal_compiler::{check_method, CompiledMethodStorage, CompilerOptions, PropertyStore, Verdict};

pub fn execute(manifest: &Path, properties: &dyn PropertyStore) -> anyhow::Result<()> {
    let dex = super::load_dex(manifest)?;

    // Constructing the compiler publishes the size knob for the process
    let options = CompilerOptions::default();
    let storage = CompiledMethodStorage::new();
    let compiler = super::build_compiler(&options, &storage, Kind::Optimizing.tag(), properties);
    let limits = compiler.size_limits();

    let (mut accepted, mut rejected, mut skipped) = (0usize, 0usize, 0usize);
    for (method_idx, _, code_item) in dex.methods() {
        let Some(code_item) = code_item else {
            println!("skip    {} (no code)", dex.pretty_method(method_idx));
            skipped += 1;
            continue;
        };
        match check_method(code_item, method_idx, &dex) {
            Verdict::Accept => {
                println!("accept  {}", dex.pretty_method(method_idx));
                accepted += 1;
            }
            Verdict::Reject(rejection) => {
                println!("reject  {}", rejection);
                rejected += 1;
            }
        }
    }

    println!(
        "{}: {} accepted, {} rejected, {} skipped (limits: {} insns, {} registers)",
        dex.location(),
        accepted,
        rejected,
        skipped,
        limits.max_insns,
        limits.max_regs
    );
    Ok(())
}
