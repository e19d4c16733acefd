//! Optimizing backend
//!
//! The real optimizer (IR construction, SSA, register allocation, emission)
//! lives outside this crate. This backend applies the size limits it captured
//! at construction, lays out the frame, and deposits a placeholder method in
//! storage.

pub mod stub;

use std::time::Instant;

use baikal_dex::{CodeItem, DexFile};

use crate::compiler::{CompileError, Compiler};
use crate::limits::SizeLimits;
use crate::options::CompilerOptions;
use crate::pathological::check_method_with_limits;
use crate::storage::{CompiledMethod, CompiledMethodHandle, CompiledMethodStorage};

/// The optimizing compiler backend
pub struct OptimizingCompiler<'a> {
    options: &'a CompilerOptions,
    storage: &'a CompiledMethodStorage,
    limits: SizeLimits,
}

impl<'a> OptimizingCompiler<'a> {
    /// Build the backend, capturing the current process-wide size limits
    pub fn new(options: &'a CompilerOptions, storage: &'a CompiledMethodStorage) -> Self {
        OptimizingCompiler {
            options,
            storage,
            limits: SizeLimits::current(),
        }
    }
}

/// Backend constructor used by the factory
pub fn create_optimizing_compiler<'a>(
    options: &'a CompilerOptions,
    storage: &'a CompiledMethodStorage,
) -> Box<dyn Compiler + 'a> {
    Box::new(OptimizingCompiler::new(options, storage))
}

impl Compiler for OptimizingCompiler<'_> {
    fn name(&self) -> &str {
        "optimizing"
    }

    fn can_compile_method(&self, _method_idx: u32, _dex_file: &DexFile) -> bool {
        true
    }

    fn compile(
        &self,
        code_item: Option<&CodeItem>,
        method_idx: u32,
        dex_file: &DexFile,
    ) -> Result<Option<CompiledMethodHandle>, CompileError> {
        if method_idx >= dex_file.num_method_ids() {
            return Err(CompileError::InvalidMethodIndex {
                method_idx,
                num_methods: dex_file.num_method_ids(),
                location: dex_file.location().to_string(),
            });
        }

        // Abstract and native methods have nothing to compile
        let Some(code_item) = code_item else {
            return Ok(None);
        };

        let start = Instant::now();

        if check_method_with_limits(code_item, method_idx, dex_file, self.limits).is_reject() {
            return Ok(None);
        }

        let isa = self.options.instruction_set;
        let accessor = dex_file.accessor(code_item);
        let code = self.storage.intern_code(stub::trap_code(isa));
        let handle = self.storage.insert(CompiledMethod {
            method_idx,
            dex_location: dex_file.location().to_string(),
            instruction_set: isa,
            code,
            frame_size_in_bytes: stub::frame_size(isa, accessor.registers_size()),
            core_spill_mask: 0,
            fp_spill_mask: 0,
        });

        let elapsed = start.elapsed();
        let slow = elapsed > self.options.max_compile_time();
        if self.options.verbose_methods.is_empty() && !slow {
            return Ok(Some(handle));
        }

        let method = dex_file.pretty_method(method_idx);
        if self.options.is_verbose_method(&method) {
            tracing::debug!(
                method = %method,
                insns = accessor.insns_size_in_code_units(),
                registers = accessor.registers_size(),
                ?elapsed,
                "compiled method"
            );
        }
        if slow {
            tracing::warn!(
                method = %method,
                ?elapsed,
                "compilation took longer than {:?}",
                self.options.max_compile_time()
            );
        }

        Ok(Some(handle))
    }

    fn compiler_options(&self) -> &CompilerOptions {
        self.options
    }

    fn compiled_method_storage(&self) -> &CompiledMethodStorage {
        self.storage
    }

    fn size_limits(&self) -> SizeLimits {
        self.limits
    }
}
