//! The bytecode file container

use thiserror::Error;

use crate::code_item::{CodeItem, CodeItemDataAccessor};
use crate::descriptor::pretty_descriptor;

/// Errors raised while assembling a [`DexFile`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DexFileError {
    /// A method refers to a class index that was never added
    #[error("Method {method} refers to unknown class index {class_idx}")]
    UnknownClass {
        /// Method name
        method: String,
        /// Offending class index
        class_idx: u32,
    },

    /// Code item does not fit the bytecode encoding limits
    #[error("Method {method} has {insns} code units (limit: {limit})")]
    CodeItemTooLarge {
        /// Method name
        method: String,
        /// Instruction count in code units
        insns: usize,
        /// Encoding limit
        limit: usize,
    },

    /// Incoming argument registers exceed the frame
    #[error("Method {method} has ins_size {ins} larger than registers_size {registers}")]
    InsExceedRegisters {
        /// Method name
        method: String,
        /// Incoming argument registers
        ins: u16,
        /// Frame size
        registers: u16,
    },
}

/// Largest instruction stream a compliant file can encode, in code units
pub const MAX_INSNS_SIZE: usize = u16::MAX as usize;

/// A method identifier: declaring class, name and prototype
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodId {
    /// Index of the declaring class descriptor
    pub class_idx: u32,
    /// Method name
    pub name: String,
    /// Return type descriptor
    pub return_type: String,
    /// Parameter type descriptors
    pub parameters: Vec<String>,
}

/// A packaged bytecode file
#[derive(Debug, Clone)]
pub struct DexFile {
    location: String,
    class_descriptors: Vec<String>,
    method_ids: Vec<MethodId>,
    /// Parallel to `method_ids`; `None` for abstract and native methods
    code_items: Vec<Option<CodeItem>>,
}

impl DexFile {
    /// Start building a file with the given location
    pub fn builder(location: impl Into<String>) -> DexFileBuilder {
        DexFileBuilder {
            file: DexFile {
                location: location.into(),
                class_descriptors: Vec::new(),
                method_ids: Vec::new(),
                code_items: Vec::new(),
            },
        }
    }

    /// Location the file was loaded from
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Number of method identifiers
    pub fn num_method_ids(&self) -> u32 {
        self.method_ids.len() as u32
    }

    /// Look up a method identifier
    pub fn method_id(&self, method_idx: u32) -> Option<&MethodId> {
        self.method_ids.get(method_idx as usize)
    }

    /// Look up a class descriptor
    pub fn class_descriptor(&self, class_idx: u32) -> Option<&str> {
        self.class_descriptors.get(class_idx as usize).map(String::as_str)
    }

    /// Code item for a method, if it has one
    pub fn code_item(&self, method_idx: u32) -> Option<&CodeItem> {
        self.code_items.get(method_idx as usize)?.as_ref()
    }

    /// Build an accessor over one of this file's code items
    pub fn accessor<'a>(&'a self, code_item: &'a CodeItem) -> CodeItemDataAccessor<'a> {
        CodeItemDataAccessor::new(self, code_item)
    }

    /// Iterate over `(method_idx, method_id, code_item)` in index order
    pub fn methods(&self) -> impl Iterator<Item = (u32, &MethodId, Option<&CodeItem>)> + '_ {
        self.method_ids
            .iter()
            .zip(self.code_items.iter())
            .enumerate()
            .map(|(idx, (id, code))| (idx as u32, id, code.as_ref()))
    }

    /// Human-readable method name with signature, e.g.
    /// `void com.example.Foo.bar(int, java.lang.String)`.
    pub fn pretty_method(&self, method_idx: u32) -> String {
        self.pretty_method_with_signature(method_idx, true)
    }

    /// Human-readable method name, optionally with return and parameter types
    pub fn pretty_method_with_signature(&self, method_idx: u32, with_signature: bool) -> String {
        let Some(method) = self.method_id(method_idx) else {
            return format!("<<invalid-method-idx-{}>>", method_idx);
        };

        let class_name = match self.class_descriptor(method.class_idx) {
            Some(descriptor) => pretty_descriptor(descriptor),
            None => format!("<<invalid-type-idx-{}>>", method.class_idx),
        };

        if !with_signature {
            return format!("{}.{}", class_name, method.name);
        }

        let params: Vec<String> = method.parameters.iter().map(|p| pretty_descriptor(p)).collect();
        format!(
            "{} {}.{}({})",
            pretty_descriptor(&method.return_type),
            class_name,
            method.name,
            params.join(", ")
        )
    }
}

/// Incremental builder for [`DexFile`]
#[derive(Debug)]
pub struct DexFileBuilder {
    file: DexFile,
}

impl DexFileBuilder {
    /// Add a class descriptor, returning its index
    pub fn add_class(&mut self, descriptor: impl Into<String>) -> u32 {
        self.file.class_descriptors.push(descriptor.into());
        (self.file.class_descriptors.len() - 1) as u32
    }

    /// Add a method, returning its index.
    ///
    /// Rejects code items that a compliant bytecode file could not encode.
    pub fn add_method(
        &mut self,
        method: MethodId,
        code_item: Option<CodeItem>,
    ) -> Result<u32, DexFileError> {
        if method.class_idx as usize >= self.file.class_descriptors.len() {
            return Err(DexFileError::UnknownClass {
                method: method.name,
                class_idx: method.class_idx,
            });
        }

        if let Some(code) = &code_item {
            if code.insns.len() > MAX_INSNS_SIZE {
                return Err(DexFileError::CodeItemTooLarge {
                    method: method.name,
                    insns: code.insns.len(),
                    limit: MAX_INSNS_SIZE,
                });
            }
            if code.ins_size > code.registers_size {
                return Err(DexFileError::InsExceedRegisters {
                    method: method.name,
                    ins: code.ins_size,
                    registers: code.registers_size,
                });
            }
        }

        self.file.method_ids.push(method);
        self.file.code_items.push(code_item);
        Ok((self.file.method_ids.len() - 1) as u32)
    }

    /// Finish building
    pub fn build(self) -> DexFile {
        self.file
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(class_idx: u32, name: &str, ret: &str, params: &[&str]) -> MethodId {
        MethodId {
            class_idx,
            name: name.to_string(),
            return_type: ret.to_string(),
            parameters: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_pretty_method() {
        let mut builder = DexFile::builder("classes.dex");
        let foo = builder.add_class("Lcom/example/Foo;");
        let idx = builder
            .add_method(
                method(foo, "bar", "V", &["I", "Ljava/lang/String;"]),
                Some(CodeItem::zeroed(4, 2)),
            )
            .unwrap();
        let dex = builder.build();

        assert_eq!(dex.pretty_method(idx), "void com.example.Foo.bar(int, java.lang.String)");
        assert_eq!(dex.pretty_method_with_signature(idx, false), "com.example.Foo.bar");
    }

    #[test]
    fn test_pretty_method_invalid_index() {
        let dex = DexFile::builder("classes.dex").build();
        assert_eq!(dex.pretty_method(42), "<<invalid-method-idx-42>>");
    }

    #[test]
    fn test_unknown_class_rejected() {
        let mut builder = DexFile::builder("classes.dex");
        let err = builder.add_method(method(3, "f", "V", &[]), None).unwrap_err();
        assert_eq!(
            err,
            DexFileError::UnknownClass { method: "f".to_string(), class_idx: 3 }
        );
    }

    #[test]
    fn test_code_item_limits() {
        let mut builder = DexFile::builder("classes.dex");
        let cls = builder.add_class("LA;");

        assert!(builder
            .add_method(method(cls, "max", "V", &[]), Some(CodeItem::zeroed(1, MAX_INSNS_SIZE)))
            .is_ok());
        assert!(matches!(
            builder.add_method(
                method(cls, "huge", "V", &[]),
                Some(CodeItem::zeroed(1, MAX_INSNS_SIZE + 1))
            ),
            Err(DexFileError::CodeItemTooLarge { .. })
        ));

        let mut bad_frame = CodeItem::zeroed(1, 1);
        bad_frame.ins_size = 2;
        assert!(matches!(
            builder.add_method(method(cls, "frame", "V", &[]), Some(bad_frame)),
            Err(DexFileError::InsExceedRegisters { .. })
        ));
    }

    #[test]
    fn test_methods_iteration() {
        let mut builder = DexFile::builder("classes.dex");
        let cls = builder.add_class("LA;");
        builder.add_method(method(cls, "a", "V", &[]), Some(CodeItem::zeroed(1, 1))).unwrap();
        builder.add_method(method(cls, "b", "V", &[]), None).unwrap();
        let dex = builder.build();

        let collected: Vec<_> = dex
            .methods()
            .map(|(idx, id, code)| (idx, id.name.clone(), code.is_some()))
            .collect();
        assert_eq!(
            collected,
            vec![(0, "a".to_string(), true), (1, "b".to_string(), false)]
        );
        assert!(dex.code_item(1).is_none());
        assert!(dex.code_item(7).is_none());
    }
}
