//! Process-wide method size knob
//!
//! Resolved once, on the first compiler construction, from the host property
//! [`INC_MAX_PROPERTY`]. The pathological filter is a free function, so the
//! value lives in process-wide state rather than on the compiler.
//!
//! Later resolutions return the first value even if the property changed.

use once_cell::sync::OnceCell;

use crate::properties::PropertyStore;

/// Host property that raises the method size limits
pub const INC_MAX_PROPERTY: &str = "persist.baikal.art.inc_max";

static INCREASE_MAX_METHOD_SIZE: OnceCell<bool> = OnceCell::new();

/// Read the knob from `properties` without touching process state
pub fn read(properties: &dyn PropertyStore) -> bool {
    properties.get_bool(INC_MAX_PROPERTY, false)
}

/// Resolve the knob, reading `properties` only if no value is published yet.
///
/// Returns the published value.
pub fn resolve(properties: &dyn PropertyStore) -> bool {
    resolve_with_override(None, properties)
}

/// Resolve the knob, preferring `override_value` over `properties` when the
/// value is first published.
pub fn resolve_with_override(override_value: Option<bool>, properties: &dyn PropertyStore) -> bool {
    *INCREASE_MAX_METHOD_SIZE.get_or_init(|| {
        let value = override_value.unwrap_or_else(|| read(properties));
        tracing::debug!(
            property = INC_MAX_PROPERTY,
            value,
            overridden = override_value.is_some(),
            "resolved method size knob"
        );
        value
    })
}

/// Current knob value; false until resolved
pub fn increase_max_method_size() -> bool {
    INCREASE_MAX_METHOD_SIZE.get().copied().unwrap_or(false)
}

/// Whether a compiler construction has published the knob yet
pub fn is_resolved() -> bool {
    INCREASE_MAX_METHOD_SIZE.get().is_some()
}
