//! Bytecode file model for the baikal AOT compiler
//!
//! This crate provides the small slice of the packaged bytecode format the
//! compiler gate needs:
//! - **DexFile**: method identifiers, class descriptors and code items
//! - **CodeItem**: one method's instruction stream and frame metadata
//! - **CodeItemDataAccessor**: the read-only view the compiler queries
//! - **Manifest**: a TOML description of a bytecode file, used by tooling and tests
//!
//! Instructions are opaque 16-bit code units; decoding them is not this crate's job.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Code items and their accessor
pub mod code_item;

/// Type descriptor pretty-printing
pub mod descriptor;

/// The bytecode file container
pub mod dex_file;

/// TOML manifests describing bytecode files
pub mod manifest;

pub use code_item::{CodeItem, CodeItemDataAccessor};
pub use dex_file::{DexFile, DexFileBuilder, DexFileError, MethodId};
pub use manifest::{load_dex_file, parse_dex_file, Manifest, ManifestError};
