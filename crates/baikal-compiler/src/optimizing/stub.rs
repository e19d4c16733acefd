//! Placeholder code for the optimizing backend
//!
//! The backend does not generate machine code. Each compiled method gets a
//! single trap instruction for the target, which is enough for storage and
//! packaging to run end to end.

use crate::options::InstructionSet;

/// A single trap instruction for `isa`, little-endian
pub fn trap_code(isa: InstructionSet) -> &'static [u8] {
    match isa {
        InstructionSet::Arm => &[0x00, 0xbe], // BKPT #0 (Thumb)
        InstructionSet::Arm64 => &[0x00, 0x00, 0x20, 0xd4], // BRK #0
        InstructionSet::X86 | InstructionSet::X86_64 => &[0xcc], // INT3
        InstructionSet::Riscv64 => &[0x73, 0x00, 0x10, 0x00], // EBREAK
    }
}

/// Frame size for a method with `registers_size` virtual registers: one
/// 32-bit slot per register plus the method pointer, aligned to the stack
/// alignment.
pub fn frame_size(isa: InstructionSet, registers_size: u16) -> u32 {
    let raw = u32::from(registers_size) * 4 + isa.pointer_size();
    let align = isa.stack_alignment();
    (raw + align - 1) & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trap_code() {
        assert_eq!(trap_code(InstructionSet::X86_64), &[0xcc]);
        assert_eq!(trap_code(InstructionSet::Arm64).len(), 4);
        assert_eq!(trap_code(InstructionSet::Arm).len(), 2);
    }

    #[test]
    fn test_frame_size() {
        assert_eq!(frame_size(InstructionSet::Arm64, 0), 16);
        assert_eq!(frame_size(InstructionSet::Arm64, 2), 16);
        assert_eq!(frame_size(InstructionSet::Arm64, 3), 32);
        assert_eq!(frame_size(InstructionSet::Arm, 3), 16);
        assert_eq!(frame_size(InstructionSet::X86_64, 16383), 65552);
    }
}
