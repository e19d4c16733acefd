//! `baikal-aot compile` — Filter and compile every method of a bytecode file.

use anyhow::Context;
use serde::Serialize;
use std::path::Path;

use baikal_compiler::{
    check_method_with_limits, CompiledMethodStorage, CompilerOptions, PropertyStore, StorageStats,
    Verdict,
};

/// Outcome of compiling one bytecode file
#[derive(Debug, Serialize)]
struct CompileSummary {
    location: String,
    kind_tag: u8,
    backend: String,
    compiled: usize,
    rejected: usize,
    skipped: usize,
    rejections: Vec<String>,
    storage: StorageStats,
}

pub fn execute(
    manifest: &Path,
    kind: &str,
    options_path: Option<&Path>,
    json: bool,
    properties: &dyn PropertyStore,
) -> anyhow::Result<()> {
    let kind_tag = super::parse_kind_tag(kind)?;
    let options = match options_path {
        Some(path) => CompilerOptions::from_file(path)
            .with_context(|| format!("loading compiler options from {}", path.display()))?,
        None => CompilerOptions::default(),
    };
    let dex = super::load_dex(manifest)?;

    let storage = CompiledMethodStorage::new();
    let compiler = super::build_compiler(&options, &storage, kind_tag, properties);
    let limits = compiler.size_limits();

    let mut summary = CompileSummary {
        location: dex.location().to_string(),
        kind_tag,
        backend: compiler.name().to_string(),
        compiled: 0,
        rejected: 0,
        skipped: 0,
        rejections: Vec::new(),
        storage: StorageStats::default(),
    };

    for (method_idx, _, code_item) in dex.methods() {
        if let Some(code) = code_item {
            if let Verdict::Reject(rejection) =
                check_method_with_limits(code, method_idx, &dex, limits)
            {
                summary.rejected += 1;
                summary.rejections.push(rejection.to_string());
                continue;
            }
        }
        if !compiler.can_compile_method(method_idx, &dex) {
            summary.skipped += 1;
            continue;
        }
        match compiler.compile(code_item, method_idx, &dex)? {
            Some(_) => summary.compiled += 1,
            None => summary.skipped += 1,
        }
    }
    summary.storage = storage.stats();
    tracing::info!(
        location = %summary.location,
        compiled = summary.compiled,
        rejected = summary.rejected,
        skipped = summary.skipped,
        "compilation finished"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &CompileSummary) {
    println!("Compiled {} with {} backend", summary.location, summary.backend);
    for rejection in &summary.rejections {
        println!("  rejected: {}", rejection);
    }
    println!(
        "  {} compiled, {} rejected, {} skipped",
        summary.compiled, summary.rejected, summary.skipped
    );
    println!(
        "  storage: {} methods, {} code bytes ({} unique)",
        summary.storage.methods, summary.storage.total_code_bytes, summary.storage.unique_code_bytes
    );
}
