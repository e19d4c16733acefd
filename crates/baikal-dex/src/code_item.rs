//! Code items: a method's instruction stream plus frame metadata.

use crate::dex_file::DexFile;

/// One method's bytecode record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeItem {
    /// Number of virtual registers in the method's frame
    pub registers_size: u16,
    /// Number of registers holding incoming arguments
    pub ins_size: u16,
    /// Number of registers needed for outgoing call arguments
    pub outs_size: u16,
    /// Number of try blocks
    pub tries_size: u16,
    /// Instruction stream in 16-bit code units
    pub insns: Vec<u16>,
}

impl CodeItem {
    /// Create a code item with the given frame size and instructions
    pub fn new(registers_size: u16, insns: Vec<u16>) -> Self {
        CodeItem {
            registers_size,
            insns,
            ..Default::default()
        }
    }

    /// Create a code item with `insns_size` zero code units.
    ///
    /// Useful for describing methods by size alone.
    pub fn zeroed(registers_size: u16, insns_size: usize) -> Self {
        Self::new(registers_size, vec![0; insns_size])
    }
}

/// Read-only view over a [`CodeItem`] inside a [`DexFile`]
#[derive(Debug, Clone, Copy)]
pub struct CodeItemDataAccessor<'a> {
    dex_file: &'a DexFile,
    code_item: &'a CodeItem,
}

impl<'a> CodeItemDataAccessor<'a> {
    /// Build an accessor for `code_item`, which must belong to `dex_file`
    pub fn new(dex_file: &'a DexFile, code_item: &'a CodeItem) -> Self {
        CodeItemDataAccessor { dex_file, code_item }
    }

    /// Instruction stream length in 16-bit code units
    pub fn insns_size_in_code_units(&self) -> u32 {
        u32::try_from(self.code_item.insns.len()).unwrap_or(u32::MAX)
    }

    /// Number of virtual registers
    pub fn registers_size(&self) -> u16 {
        self.code_item.registers_size
    }

    /// Number of incoming argument registers
    pub fn ins_size(&self) -> u16 {
        self.code_item.ins_size
    }

    /// Number of outgoing argument registers
    pub fn outs_size(&self) -> u16 {
        self.code_item.outs_size
    }

    /// Number of try blocks
    pub fn tries_size(&self) -> u16 {
        self.code_item.tries_size
    }

    /// Raw instruction stream
    pub fn insns(&self) -> &'a [u16] {
        &self.code_item.insns
    }

    /// The file the code item belongs to
    pub fn dex_file(&self) -> &'a DexFile {
        self.dex_file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessor_sizes() {
        let dex = DexFile::builder("test.dex").build();
        let item = CodeItem {
            registers_size: 7,
            ins_size: 2,
            outs_size: 1,
            tries_size: 0,
            insns: vec![0x0012, 0x000f, 0x0000],
        };
        let accessor = CodeItemDataAccessor::new(&dex, &item);
        assert_eq!(accessor.insns_size_in_code_units(), 3);
        assert_eq!(accessor.registers_size(), 7);
        assert_eq!(accessor.ins_size(), 2);
        assert_eq!(accessor.outs_size(), 1);
        assert_eq!(accessor.insns()[1], 0x000f);
        assert_eq!(accessor.dex_file().location(), "test.dex");
    }

    #[test]
    fn test_zeroed_code_item() {
        let item = CodeItem::zeroed(3, 16383);
        assert_eq!(item.insns.len(), 16383);
        assert!(item.insns.iter().all(|&unit| unit == 0));
        assert_eq!(item.registers_size, 3);
    }
}
