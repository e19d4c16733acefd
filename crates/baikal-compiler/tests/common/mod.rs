//! Shared fixtures for the compiler gate tests

use baikal_dex::{CodeItem, DexFile, MethodId};

/// A file with one method per `(registers, insns)` pair, all declared on
/// `Lcom/example/Generated;` and named `m0`, `m1`, ...
pub fn dex_with_methods(methods: &[(u16, usize)]) -> DexFile {
    let mut builder = DexFile::builder("generated.dex");
    let cls = builder.add_class("Lcom/example/Generated;");
    for (i, &(registers, insns)) in methods.iter().enumerate() {
        builder
            .add_method(
                MethodId {
                    class_idx: cls,
                    name: format!("m{}", i),
                    return_type: "V".to_string(),
                    parameters: vec![],
                },
                Some(CodeItem::zeroed(registers, insns)),
            )
            .unwrap();
    }
    builder.build()
}
