//! Type descriptor pretty-printing
//!
//! Converts field/return descriptors (`I`, `[J`, `Ljava/lang/String;`) to
//! the source-level spelling used in diagnostics (`int`, `long[]`,
//! `java.lang.String`).

/// Render a type descriptor in source-level form.
///
/// Malformed descriptors are returned unchanged.
pub fn pretty_descriptor(descriptor: &str) -> String {
    let dims = descriptor.bytes().take_while(|&b| b == b'[').count();
    let element = &descriptor[dims..];

    let base = match element {
        "V" => "void".to_string(),
        "Z" => "boolean".to_string(),
        "B" => "byte".to_string(),
        "S" => "short".to_string(),
        "C" => "char".to_string(),
        "I" => "int".to_string(),
        "J" => "long".to_string(),
        "F" => "float".to_string(),
        "D" => "double".to_string(),
        _ => match element.strip_prefix('L').and_then(|s| s.strip_suffix(';')) {
            Some(class_name) if !class_name.is_empty() => class_name.replace('/', "."),
            _ => return descriptor.to_string(),
        },
    };

    let mut out = base;
    for _ in 0..dims {
        out.push_str("[]");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives() {
        assert_eq!(pretty_descriptor("V"), "void");
        assert_eq!(pretty_descriptor("I"), "int");
        assert_eq!(pretty_descriptor("J"), "long");
        assert_eq!(pretty_descriptor("Z"), "boolean");
    }

    #[test]
    fn test_class_and_arrays() {
        assert_eq!(pretty_descriptor("Ljava/lang/String;"), "java.lang.String");
        assert_eq!(pretty_descriptor("[I"), "int[]");
        assert_eq!(pretty_descriptor("[[Lcom/example/Foo;"), "com.example.Foo[][]");
    }

    #[test]
    fn test_malformed_passthrough() {
        assert_eq!(pretty_descriptor("Lcom/example/Foo"), "Lcom/example/Foo");
        assert_eq!(pretty_descriptor("Q"), "Q");
        assert_eq!(pretty_descriptor("L;"), "L;");
    }
}
