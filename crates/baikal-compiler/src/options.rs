//! Compiler options
//!
//! Options are owned by the caller and borrowed by the compiler for its whole
//! lifetime. They can be written by hand or loaded from TOML:
//!
//! ```toml
//! instruction_set = "arm64"
//! max_compile_time_ms = 250
//! verbose_methods = ["com.example.Hot"]
//! increase_max_method_size = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading options
#[derive(Debug, Error)]
pub enum OptionsError {
    /// Failed to read options file
    #[error("Failed to read options file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse options: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Target instruction set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionSet {
    /// 32-bit ARM (Thumb-2)
    Arm,
    /// 64-bit ARM
    #[default]
    Arm64,
    /// 32-bit x86
    X86,
    /// 64-bit x86
    #[serde(rename = "x86_64")]
    X86_64,
    /// 64-bit RISC-V
    Riscv64,
}

impl InstructionSet {
    /// Pointer size in bytes
    pub fn pointer_size(self) -> u32 {
        match self {
            InstructionSet::Arm | InstructionSet::X86 => 4,
            InstructionSet::Arm64 | InstructionSet::X86_64 | InstructionSet::Riscv64 => 8,
        }
    }

    /// Required stack alignment in bytes
    pub fn stack_alignment(self) -> u32 {
        16
    }
}

/// Backend tuning passed through the gate to the compiler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Target instruction set
    pub instruction_set: InstructionSet,
    /// Compile time after which a method is reported as slow, in ms (default: 100)
    pub max_compile_time_ms: u64,
    /// Substrings of pretty method names to trace at debug level
    pub verbose_methods: Vec<String>,
    /// Explicit size-limit knob; when unset the host property decides
    pub increase_max_method_size: Option<bool>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            instruction_set: InstructionSet::default(),
            max_compile_time_ms: 100,
            verbose_methods: Vec::new(),
            increase_max_method_size: None,
        }
    }
}

impl CompilerOptions {
    /// Parse options from TOML text
    pub fn parse(content: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load options from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Compile time budget per method
    pub fn max_compile_time(&self) -> Duration {
        Duration::from_millis(self.max_compile_time_ms)
    }

    /// Whether compilation of `pretty_method` should be traced
    pub fn is_verbose_method(&self, pretty_method: &str) -> bool {
        self.verbose_methods
            .iter()
            .any(|pattern| pretty_method.contains(pattern.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CompilerOptions::default();
        assert_eq!(options.instruction_set, InstructionSet::Arm64);
        assert_eq!(options.max_compile_time(), Duration::from_millis(100));
        assert_eq!(options.increase_max_method_size, None);
        assert!(!options.is_verbose_method("void A.b()"));
    }

    #[test]
    fn test_parse_partial() {
        let options = CompilerOptions::parse(
            r#"
instruction_set = "x86_64"
verbose_methods = ["Foo.bar"]
"#,
        )
        .unwrap();
        assert_eq!(options.instruction_set, InstructionSet::X86_64);
        assert_eq!(options.max_compile_time_ms, 100);
        assert!(options.is_verbose_method("void com.example.Foo.bar(int)"));
        assert!(!options.is_verbose_method("void com.example.Foo.baz()"));
    }

    #[test]
    fn test_parse_knob_override() {
        let options = CompilerOptions::parse("increase_max_method_size = true").unwrap();
        assert_eq!(options.increase_max_method_size, Some(true));
    }

    #[test]
    fn test_parse_unknown_isa() {
        assert!(matches!(
            CompilerOptions::parse(r#"instruction_set = "mips""#),
            Err(OptionsError::ParseError(_))
        ));
    }

    #[test]
    fn test_pointer_sizes() {
        assert_eq!(InstructionSet::Arm.pointer_size(), 4);
        assert_eq!(InstructionSet::Riscv64.pointer_size(), 8);
    }
}
