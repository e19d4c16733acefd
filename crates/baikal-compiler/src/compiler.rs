//! Compiler handle, kinds and the factory
//!
//! Every compiler is constructed through [`create`] (or one of its variants),
//! which:
//! 1. checks the image version the compiler was built against,
//! 2. publishes the method size knob for the process,
//! 3. dispatches on the compiler kind.
//!
//! Version skew and unknown kinds abort the process. The `try_create` variant
//! reports them as [`FactoryError`] instead, for hosts that embed the compiler.

use std::fmt;
use std::str::FromStr;

use baikal_dex::{CodeItem, DexFile};
use thiserror::Error;

use crate::diagnostics::fatal;
use crate::knob;
use crate::limits::SizeLimits;
use crate::oat::{check_oat_version, OatError, OatHeader};
use crate::optimizing::create_optimizing_compiler;
use crate::options::CompilerOptions;
use crate::properties::{PropertyStore, SystemProperties};
use crate::storage::{CompiledMethodHandle, CompiledMethodStorage};

/// Image version this compiler emits
const COMPILER_OAT_VERSION: [u8; 4] = OatHeader::VERSION;

/// Compiler backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    /// Former quick backend; compiles with the optimizing backend
    LegacyQuick = 0,
    /// Optimizing backend
    Optimizing = 1,
}

impl Kind {
    /// Raw tag
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Canonical name
    pub fn name(self) -> &'static str {
        match self {
            Kind::LegacyQuick => "quick",
            Kind::Optimizing => "optimizing",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Kind> for u8 {
    fn from(kind: Kind) -> u8 {
        kind.tag()
    }
}

/// Invalid compiler kind
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KindError {
    /// Raw tag outside the enumeration
    #[error("Unknown compiler kind tag: {0}")]
    UnknownTag(u8),
    /// Name that matches no kind
    #[error("Unknown compiler kind: {0}")]
    UnknownName(String),
}

impl TryFrom<u8> for Kind {
    type Error = KindError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Kind::LegacyQuick),
            1 => Ok(Kind::Optimizing),
            other => Err(KindError::UnknownTag(other)),
        }
    }
}

impl FromStr for Kind {
    type Err = KindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quick" | "legacy-quick" => Ok(Kind::LegacyQuick),
            "optimizing" => Ok(Kind::Optimizing),
            other => Err(KindError::UnknownName(other.to_string())),
        }
    }
}

/// Errors raised by a backend while compiling one method
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    /// Method index outside the bytecode file
    #[error("Method index {method_idx} out of range ({num_methods} methods in {location})")]
    InvalidMethodIndex {
        /// Requested index
        method_idx: u32,
        /// Methods in the file
        num_methods: u32,
        /// File location
        location: String,
    },
}

/// Errors the factory reports instead of aborting (see [`try_create`])
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FactoryError {
    /// Image version skew
    #[error(transparent)]
    VersionMismatch(#[from] OatError),
    /// Kind tag outside the enumeration
    #[error("UNREACHABLE: unknown compiler kind tag {0}")]
    UnknownKind(u8),
}

/// A compiler backend
///
/// Handles are created by the factory and owned by the caller. Options and
/// storage are borrowed from the caller for the handle's lifetime.
pub trait Compiler: Send + Sync {
    /// Backend name (for diagnostics)
    fn name(&self) -> &str;

    /// Whether the backend is willing to compile a method
    fn can_compile_method(&self, method_idx: u32, dex_file: &DexFile) -> bool;

    /// Compile one method.
    ///
    /// Returns `Ok(None)` when the method is skipped (no code item, or refused
    /// by the pathological filter); otherwise the method is deposited in
    /// storage.
    fn compile(
        &self,
        code_item: Option<&CodeItem>,
        method_idx: u32,
        dex_file: &DexFile,
    ) -> Result<Option<CompiledMethodHandle>, CompileError>;

    /// Options this compiler was built with
    fn compiler_options(&self) -> &CompilerOptions;

    /// Storage receiving compiled methods
    fn compiled_method_storage(&self) -> &CompiledMethodStorage;

    /// Size limits captured at construction
    fn size_limits(&self) -> SizeLimits;
}

/// Create a compiler, reading host properties from [`SystemProperties`].
///
/// Aborts the process on image version skew.
pub fn create<'a>(
    options: &'a CompilerOptions,
    storage: &'a CompiledMethodStorage,
    kind: Kind,
) -> Box<dyn Compiler + 'a> {
    create_with_properties(options, storage, kind.tag(), &SystemProperties::new())
}

/// Create a compiler from a raw kind tag and an explicit property store.
///
/// Aborts the process on image version skew or an unknown kind tag.
pub fn create_with_properties<'a>(
    options: &'a CompilerOptions,
    storage: &'a CompiledMethodStorage,
    kind_tag: u8,
    properties: &dyn PropertyStore,
) -> Box<dyn Compiler + 'a> {
    match try_create(options, storage, kind_tag, properties) {
        Ok(compiler) => compiler,
        Err(e) => fatal(e),
    }
}

/// Create a compiler, reporting version skew and unknown kinds as errors
pub fn try_create<'a>(
    options: &'a CompilerOptions,
    storage: &'a CompiledMethodStorage,
    kind_tag: u8,
    properties: &dyn PropertyStore,
) -> Result<Box<dyn Compiler + 'a>, FactoryError> {
    check_oat_version(COMPILER_OAT_VERSION)?;

    let increase_max_method_size =
        knob::resolve_with_override(options.increase_max_method_size, properties);

    match Kind::try_from(kind_tag) {
        // TODO: drop LegacyQuick once no caller names it
        Ok(kind @ (Kind::LegacyQuick | Kind::Optimizing)) => {
            tracing::debug!(%kind, increase_max_method_size, "creating compiler");
            Ok(create_optimizing_compiler(options, storage))
        }
        Err(_) => Err(FactoryError::UnknownKind(kind_tag)),
    }
}
