//! Host configuration store
//!
//! The compiler reads a handful of host properties (`persist.*` style keys).
//! [`SystemProperties`] is the default store: environment variables first,
//! then the TOML file named by `BAIKAL_PROPERTIES`. [`PropertyFile`] and
//! [`MemoryProperties`] let tools and tests supply properties explicitly.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::path::Path;
use thiserror::Error;

/// Environment variable naming the default property file
pub const PROPERTIES_FILE_ENV: &str = "BAIKAL_PROPERTIES";

/// Errors that can occur while loading a property file
#[derive(Debug, Error)]
pub enum PropertyError {
    /// Failed to read property file
    #[error("Failed to read property file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse property file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Value is not a string, boolean or number
    #[error("Unsupported value for property {0}")]
    UnsupportedValue(String),
}

/// A source of host properties
pub trait PropertyStore {
    /// Raw value of `key`, if set
    fn get(&self, key: &str) -> Option<String>;

    /// Value of `key` interpreted as a boolean.
    ///
    /// `1`, `true` and `yes` read as true; `0`, `false` and `no` as false.
    /// Anything else, or a missing key, yields `default`.
    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(value) => parse_bool(&value).unwrap_or(default),
            None => default,
        }
    }
}

/// Parse a property value as a boolean
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Environment variable consulted for `key`: uppercased, `.` and `-` replaced by `_`.
///
/// `persist.baikal.art.inc_max` → `PERSIST_BAIKAL_ART_INC_MAX`
pub fn env_var_name(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '.' | '-' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// Properties from the process environment, falling back to the file named
/// by [`PROPERTIES_FILE_ENV`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProperties;

impl SystemProperties {
    /// Create the default store
    pub fn new() -> Self {
        SystemProperties
    }
}

impl PropertyStore for SystemProperties {
    fn get(&self, key: &str) -> Option<String> {
        if let Ok(value) = std::env::var(env_var_name(key)) {
            return Some(value);
        }

        let path = std::env::var_os(PROPERTIES_FILE_ENV)?;
        match PropertyFile::load(&path) {
            Ok(file) => file.get(key),
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "ignoring unreadable property file");
                None
            }
        }
    }
}

/// Properties loaded from a TOML file.
///
/// Dotted keys and nested tables are flattened, so both
/// `persist.baikal.art.inc_max = true` and `"persist.baikal.art.inc_max" = "1"`
/// define the same property.
#[derive(Debug, Clone, Default)]
pub struct PropertyFile {
    values: FxHashMap<String, String>,
}

impl PropertyFile {
    /// Load a property file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PropertyError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse property file contents
    pub fn parse(content: &str) -> Result<Self, PropertyError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut values = FxHashMap::default();
        flatten_into(&mut values, None, &table)?;
        Ok(PropertyFile { values })
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the file defines no properties
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn flatten_into(
    out: &mut FxHashMap<String, String>,
    prefix: Option<&str>,
    table: &toml::Table,
) -> Result<(), PropertyError> {
    for (key, value) in table {
        let full_key = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };
        let text = match value {
            toml::Value::String(s) => s.clone(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Table(nested) => {
                flatten_into(out, Some(&full_key), nested)?;
                continue;
            }
            _ => return Err(PropertyError::UnsupportedValue(full_key)),
        };
        out.insert(full_key, text);
    }
    Ok(())
}

impl PropertyStore for PropertyFile {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Mutable in-memory properties
#[derive(Debug, Default)]
pub struct MemoryProperties {
    values: RwLock<FxHashMap<String, String>>,
}

impl MemoryProperties {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding a single property
    pub fn with(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(key, value);
        store
    }

    /// Set a property
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    /// Remove a property
    pub fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}

impl PropertyStore for MemoryProperties {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}
