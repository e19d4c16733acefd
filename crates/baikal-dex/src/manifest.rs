//! Bytecode manifests (TOML)
//!
//! A manifest describes a bytecode file by its classes and methods. Method
//! bodies are given either as explicit code units or by size alone:
//!
//! ```toml
//! location = "classes.dex"
//!
//! [[classes]]
//! descriptor = "Lcom/example/Foo;"
//!
//! [[classes.methods]]
//! name = "bar"
//! return_type = "V"
//! parameters = ["I"]
//! registers = 10
//! ins = 1
//! insns_size = 16383
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::code_item::CodeItem;
use crate::dex_file::{DexFile, DexFileError, MethodId, MAX_INSNS_SIZE};

/// Errors that can occur while loading a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to read manifest file
    #[error("Failed to read manifest file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse manifest: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid manifest: {0}")]
    ValidationError(String),

    /// The described file violates the bytecode format
    #[error("Invalid bytecode file: {0}")]
    DexFile(#[from] DexFileError),
}

/// Manifest root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    /// Location reported for the bytecode file
    pub location: String,

    /// Classes, in index order
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
}

/// One class and the methods it declares
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassEntry {
    /// Type descriptor, e.g. `Lcom/example/Foo;`
    pub descriptor: String,

    /// Declared methods
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
}

/// One method
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodEntry {
    /// Method name
    pub name: String,

    /// Return type descriptor (default: `V`)
    #[serde(default = "default_return_type")]
    pub return_type: String,

    /// Parameter type descriptors
    #[serde(default)]
    pub parameters: Vec<String>,

    /// Frame size in virtual registers
    #[serde(default)]
    pub registers: u16,

    /// Incoming argument registers
    #[serde(default)]
    pub ins: u16,

    /// Outgoing argument registers
    #[serde(default)]
    pub outs: u16,

    /// Explicit instruction stream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insns: Option<Vec<u16>>,

    /// Instruction stream length, zero-filled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insns_size: Option<u32>,

    /// Abstract or native: no code item
    #[serde(default)]
    pub native: bool,
}

fn default_return_type() -> String {
    "V".to_string()
}

impl MethodEntry {
    fn code_item(&self) -> Result<Option<CodeItem>, ManifestError> {
        if self.native {
            if self.insns.is_some() || self.insns_size.is_some() {
                return Err(ManifestError::ValidationError(format!(
                    "native method {} cannot carry instructions",
                    self.name
                )));
            }
            return Ok(None);
        }

        let insns = match (&self.insns, self.insns_size) {
            (Some(_), Some(_)) => {
                return Err(ManifestError::ValidationError(format!(
                    "method {} sets both insns and insns_size",
                    self.name
                )));
            }
            (Some(insns), None) => insns.clone(),
            (None, Some(size)) => {
                let size = size as usize;
                if size > MAX_INSNS_SIZE {
                    return Err(DexFileError::CodeItemTooLarge {
                        method: self.name.clone(),
                        insns: size,
                        limit: MAX_INSNS_SIZE,
                    }
                    .into());
                }
                vec![0; size]
            }
            (None, None) => Vec::new(),
        };

        Ok(Some(CodeItem {
            registers_size: self.registers,
            ins_size: self.ins,
            outs_size: self.outs,
            tries_size: 0,
            insns,
        }))
    }
}

impl Manifest {
    /// Parse a manifest from TOML text
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a manifest from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Assemble the described bytecode file.
    ///
    /// Methods are numbered in declaration order across all classes.
    pub fn into_dex_file(self) -> Result<DexFile, ManifestError> {
        let mut builder = DexFile::builder(self.location);
        for class in self.classes {
            let class_idx = builder.add_class(class.descriptor);
            for method in class.methods {
                let code_item = method.code_item()?;
                builder.add_method(
                    MethodId {
                        class_idx,
                        name: method.name,
                        return_type: method.return_type,
                        parameters: method.parameters,
                    },
                    code_item,
                )?;
            }
        }
        Ok(builder.build())
    }
}

/// Parse TOML text straight into a [`DexFile`]
pub fn parse_dex_file(content: &str) -> Result<DexFile, ManifestError> {
    Manifest::parse(content)?.into_dex_file()
}

/// Load a manifest file straight into a [`DexFile`]
pub fn load_dex_file(path: impl AsRef<Path>) -> Result<DexFile, ManifestError> {
    Manifest::from_file(path)?.into_dex_file()
}
