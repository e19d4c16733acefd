//! Image format version handshake
//!
//! The compiler and the image consumer must agree on the artifact format.
//! The tag is three ASCII digits followed by a NUL.

use thiserror::Error;

/// Image header constants
pub struct OatHeader;

impl OatHeader {
    /// Magic number at the start of every image: "oat\n"
    pub const MAGIC: [u8; 4] = *b"oat\n";

    /// Current image format version
    pub const VERSION: [u8; 4] = *b"230\0";

    /// Check a version tag against [`OatHeader::VERSION`]
    pub fn check_version(version: [u8; 4]) -> Result<(), OatError> {
        check_oat_version(version)
    }
}

/// Image version errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OatError {
    /// Compiled-in tag differs from the canonical one
    #[error(
        "Oat version mismatch: compiler built with {}, expected {}",
        format_version(.found),
        format_version(.expected)
    )]
    VersionMismatch {
        /// Tag the caller was built against
        found: [u8; 4],
        /// Canonical tag
        expected: [u8; 4],
    },
}

/// Compare `version` with the canonical image version
pub fn check_oat_version(version: [u8; 4]) -> Result<(), OatError> {
    if version != OatHeader::VERSION {
        return Err(OatError::VersionMismatch {
            found: version,
            expected: OatHeader::VERSION,
        });
    }
    Ok(())
}

/// Render a version tag: as text when it is printable ASCII (ignoring the
/// trailing NUL), otherwise as bytes.
pub fn format_version(version: &[u8; 4]) -> String {
    let text = match version.iter().position(|&b| b == 0) {
        Some(nul) if version[nul..].iter().all(|&b| b == 0) => &version[..nul],
        Some(_) => return format!("{:?}", version),
        None => &version[..],
    };

    if text.iter().all(|b| b.is_ascii_graphic()) {
        String::from_utf8_lossy(text).into_owned()
    } else {
        format!("{:?}", version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_version_accepted() {
        assert!(check_oat_version(OatHeader::VERSION).is_ok());
        assert!(OatHeader::check_version(*b"230\0").is_ok());
    }

    #[test]
    fn test_mismatch_names_both_tags() {
        let err = check_oat_version(*b"229\0").unwrap_err();
        assert_eq!(
            err,
            OatError::VersionMismatch { found: *b"229\0", expected: OatHeader::VERSION }
        );
        let msg = err.to_string();
        assert!(msg.contains("229"));
        assert!(msg.contains("230"));
    }

    #[test]
    fn test_format_version() {
        assert_eq!(format_version(b"230\0"), "230");
        assert_eq!(format_version(b"1234"), "1234");
        assert_eq!(format_version(&[0x32, 0x00, 0x33, 0x00]), "[50, 0, 51, 0]");
        assert_eq!(format_version(&[0x01, 0x02, 0x03, 0x00]), "[1, 2, 3, 0]");
    }
}
