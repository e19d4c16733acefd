//! `baikal-aot limits` — Print the method size limits in effect.

use baikal_compiler::compiler::Kind;
use baikal_compiler::knob::INC_MAX_PROPERTY;
use baikal_compiler::{CompiledMethodStorage, CompilerOptions, PropertyStore};

pub fn execute(properties: &dyn PropertyStore) -> anyhow::Result<()> {
    let options = CompilerOptions::default();
    let storage = CompiledMethodStorage::new();
    let compiler = super::build_compiler(&options, &storage, Kind::Optimizing.tag(), properties);
    let limits = compiler.size_limits();

    println!(
        "{} = {}",
        INC_MAX_PROPERTY,
        properties.get(INC_MAX_PROPERTY).as_deref().unwrap_or("<unset>")
    );
    println!("max instructions: {}", limits.max_insns);
    println!("max registers:    {}", limits.max_regs);
    Ok(())
}
