//! Pathological method filter
//!
//! Skips compilation of methods that are too large, either by instruction
//! count or by virtual register count. The instruction check runs first; a
//! method over both limits is reported for its instructions only.

use std::fmt;

use baikal_dex::{CodeItem, CodeItemDataAccessor, DexFile};

use crate::limits::SizeLimits;

/// Why a method was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Instruction count reached the limit
    InstructionLimit,
    /// Virtual register count reached the limit
    RegisterLimit,
}

impl RejectReason {
    fn describe(self) -> &'static str {
        match self {
            RejectReason::InstructionLimit => "instruction limit",
            RejectReason::RegisterLimit => "virtual register limit",
        }
    }
}

/// A refused method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Which limit was hit
    pub reason: RejectReason,
    /// Observed instruction or register count
    pub count: u32,
    /// Pretty-printed method name
    pub method: String,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Method exceeds compiler {}: {} in {}",
            self.reason.describe(),
            self.count,
            self.method
        )
    }
}

/// Filter outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The method may be compiled
    Accept,
    /// The method is too large
    Reject(Rejection),
}

impl Verdict {
    /// Whether the method was accepted
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }

    /// Whether the method was refused
    pub fn is_reject(&self) -> bool {
        !self.is_accept()
    }

    /// Rejection details, if refused
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Accept => None,
            Verdict::Reject(rejection) => Some(rejection),
        }
    }
}

/// Check a method against explicit limits.
///
/// Logs the rejection at info level.
pub fn check_method_with_limits(
    code_item: &CodeItem,
    method_idx: u32,
    dex_file: &DexFile,
    limits: SizeLimits,
) -> Verdict {
    let accessor = CodeItemDataAccessor::new(dex_file, code_item);

    let insns = accessor.insns_size_in_code_units();
    if insns >= limits.max_insns {
        return reject(RejectReason::InstructionLimit, insns, method_idx, dex_file);
    }

    let registers = u32::from(accessor.registers_size());
    if registers >= limits.max_regs {
        return reject(RejectReason::RegisterLimit, registers, method_idx, dex_file);
    }

    Verdict::Accept
}

fn reject(reason: RejectReason, count: u32, method_idx: u32, dex_file: &DexFile) -> Verdict {
    let rejection = Rejection {
        reason,
        count,
        method: dex_file.pretty_method(method_idx),
    };
    tracing::info!(method_idx, "{}", rejection);
    Verdict::Reject(rejection)
}

/// Check a method against the limits of the process-wide knob
pub fn check_method(code_item: &CodeItem, method_idx: u32, dex_file: &DexFile) -> Verdict {
    check_method_with_limits(code_item, method_idx, dex_file, SizeLimits::current())
}

/// Whether a method is too large to compile under the process-wide knob
pub fn is_pathological_case(code_item: &CodeItem, method_idx: u32, dex_file: &DexFile) -> bool {
    check_method(code_item, method_idx, dex_file).is_reject()
}

#[cfg(test)]
mod tests {
    use super::*;
    use baikal_dex::MethodId;

    fn dex_with(registers: u16, insns: usize) -> DexFile {
        let mut builder = DexFile::builder("classes.dex");
        let cls = builder.add_class("Lcom/example/Big;");
        builder
            .add_method(
                MethodId {
                    class_idx: cls,
                    name: "generated".to_string(),
                    return_type: "V".to_string(),
                    parameters: vec![],
                },
                Some(CodeItem::zeroed(registers, insns)),
            )
            .unwrap();
        builder.build()
    }

    fn check(registers: u16, insns: usize, limits: SizeLimits) -> Verdict {
        let dex = dex_with(registers, insns);
        let code = dex.code_item(0).unwrap();
        check_method_with_limits(code, 0, &dex, limits)
    }

    #[test]
    fn test_just_below_instruction_limit() {
        assert_eq!(check(10, 16382, SizeLimits::DEFAULT), Verdict::Accept);
    }

    #[test]
    fn test_instruction_limit_is_inclusive() {
        let verdict = check(10, 16383, SizeLimits::DEFAULT);
        let rejection = verdict.rejection().unwrap();
        assert_eq!(rejection.reason, RejectReason::InstructionLimit);
        assert_eq!(rejection.count, 16383);
        assert_eq!(
            rejection.to_string(),
            "Method exceeds compiler instruction limit: 16383 in void com.example.Big.generated()"
        );
    }

    #[test]
    fn test_register_limit() {
        let verdict = check(16383, 100, SizeLimits::DEFAULT);
        let rejection = verdict.rejection().unwrap();
        assert_eq!(rejection.reason, RejectReason::RegisterLimit);
        let msg = rejection.to_string();
        assert!(msg.contains("exceeds compiler virtual register limit: 16383"));
        assert!(msg.contains("com.example.Big.generated"));
    }

    #[test]
    fn test_instruction_check_precedes_register_check() {
        let verdict = check(16383, 16383, SizeLimits::DEFAULT);
        let msg = verdict.rejection().unwrap().to_string();
        assert!(msg.contains("exceeds compiler instruction limit"));
        assert!(!msg.contains("virtual register limit"));
    }

    #[test]
    fn test_increased_limits_accept() {
        assert!(check(16383, 16383, SizeLimits::INCREASED).is_accept());
    }

    #[test]
    fn test_increased_limits_reject_at_boundary() {
        let verdict = check(0, 32767, SizeLimits::INCREASED);
        let rejection = verdict.rejection().unwrap();
        assert_eq!(rejection.reason, RejectReason::InstructionLimit);
        assert!(rejection.to_string().contains("exceeds compiler instruction limit: 32767"));

        let verdict = check(32767, 1, SizeLimits::INCREASED);
        assert_eq!(verdict.rejection().unwrap().reason, RejectReason::RegisterLimit);
    }

    #[test]
    fn test_empty_method_accepted() {
        assert!(check(0, 0, SizeLimits::DEFAULT).is_accept());
    }

    #[test]
    fn test_invalid_method_index_in_diagnostic() {
        let dex = dex_with(1, 16383);
        let code = dex.code_item(0).unwrap().clone();
        let verdict = check_method_with_limits(&code, 9, &dex, SizeLimits::DEFAULT);
        assert!(verdict
            .rejection()
            .unwrap()
            .to_string()
            .ends_with("in <<invalid-method-idx-9>>"));
    }
}
