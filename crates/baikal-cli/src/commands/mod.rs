//! Subcommand implementations and the helpers they share.

pub mod check;
pub mod compile;
pub mod limits;

use anyhow::Context;
use std::path::Path;

use baikal_compiler::compiler::{self, Compiler, Kind};
use baikal_compiler::{
    CompiledMethodStorage, CompilerOptions, PropertyFile, PropertyStore, SystemProperties,
};
use baikal_dex::DexFile;

/// Host properties from `path`, or the process environment when absent.
pub fn load_properties(path: Option<&Path>) -> anyhow::Result<Box<dyn PropertyStore>> {
    match path {
        Some(path) => {
            let file = PropertyFile::load(path)
                .with_context(|| format!("loading properties from {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(SystemProperties::new())),
    }
}

/// Resolve a `--kind` argument to a raw tag.
///
/// Numbers pass through unchecked so the factory sees out-of-range tags.
pub fn parse_kind_tag(arg: &str) -> anyhow::Result<u8> {
    if let Ok(tag) = arg.parse::<u8>() {
        return Ok(tag);
    }
    let kind: Kind = arg.parse()?;
    Ok(kind.tag())
}

/// Load a bytecode manifest.
pub fn load_dex(path: &Path) -> anyhow::Result<DexFile> {
    baikal_dex::load_dex_file(path)
        .with_context(|| format!("loading bytecode manifest {}", path.display()))
}

/// Construct a compiler through the factory. Aborts on version skew or an
/// unknown kind tag.
pub fn build_compiler<'a>(
    options: &'a CompilerOptions,
    storage: &'a CompiledMethodStorage,
    kind_tag: u8,
    properties: &dyn PropertyStore,
) -> Box<dyn Compiler + 'a> {
    compiler::create_with_properties(options, storage, kind_tag, properties)
}
