//! Entry gate of the baikal AOT compiler
//!
//! Decides whether a bytecode method may enter the optimizing compiler and
//! constructs the compiler backend:
//! - **Factory** (`compiler`): version handshake, knob resolution, backend dispatch by [`Kind`]
//! - **Pathological filter** (`pathological`): refuses methods whose instruction or
//!   register counts would overflow the optimizer's 16-bit name spaces
//! - **Size limits** (`limits`, `knob`): the limits and the process-wide knob tuning them
//! - **Host configuration** (`properties`): where the knob is read from
//!
//! # Example
//!
//! ```rust,ignore
//! use baikal_compiler::{compiler, CompiledMethodStorage, CompilerOptions, Kind};
//!
//! let options = CompilerOptions::default();
//! let storage = CompiledMethodStorage::new();
//! let compiler = compiler::create(&options, &storage, Kind::Optimizing);
//!
//! for (idx, _, code) in dex.methods() {
//!     if let Some(code) = code {
//!         if baikal_compiler::is_pathological_case(code, idx, &dex) {
//!             continue;
//!         }
//!     }
//!     compiler.compile(code, idx, &dex)?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Compiler handle, kinds and the factory
pub mod compiler;

/// Fatal diagnostics
pub mod diagnostics;

/// Process-wide method size knob
pub mod knob;

/// Method size limits
pub mod limits;

/// Image format version handshake
pub mod oat;

/// Optimizing backend
pub mod optimizing;

/// Compiler options
pub mod options;

/// Pathological method filter
pub mod pathological;

/// Host configuration store
pub mod properties;

/// Compiled method storage
pub mod storage;

pub use compiler::{Compiler, CompileError, FactoryError, Kind, KindError};
pub use limits::SizeLimits;
pub use oat::{check_oat_version, OatError, OatHeader};
pub use options::{CompilerOptions, InstructionSet, OptionsError};
pub use pathological::{
    check_method, check_method_with_limits, is_pathological_case, RejectReason, Rejection,
    Verdict,
};
pub use properties::{MemoryProperties, PropertyError, PropertyFile, PropertyStore, SystemProperties};
pub use storage::{CompiledMethod, CompiledMethodHandle, CompiledMethodStorage, StorageStats};
