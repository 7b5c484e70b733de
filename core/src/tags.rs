//! Free-form tag mappings attached to entities.
//!
//! Tags follow the key/value convention of map data: both sides are plain
//! strings and keys are kept sorted so that serialized output is stable.

use std::collections::BTreeMap;

/// Tag mapping of an entity.
pub type Tags = BTreeMap<String, String>;

/// Check that no tag key is blank. Returns the offending field name.
pub(crate) fn check_tags(tags: &Tags) -> Result<(), &'static str> {
    if tags.keys().any(|k| k.trim().is_empty()) {
        return Err("tags");
    }
    Ok(())
}

/// Build a [`Tags`] map from `key => value` pairs.
#[macro_export]
macro_rules! tags {
    () => {
        $crate::Tags::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        {
            let mut map = $crate::Tags::new();
            $(
                map.insert($key.to_string(), $value.to_string());
            )+
            map
        }
    };
}
