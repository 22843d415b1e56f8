use serde_json::{Map, Value};

/// Deep-merge `overlay` on top of `base`.
/// If both sides have an object for the same key, recurse.
/// Otherwise, `overlay`'s value wins. Sequences are replaced, not appended.
pub fn deep_merge(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, overlay_val) in overlay {
        match (base.remove(&key), overlay_val) {
            (Some(Value::Object(base_obj)), Value::Object(overlay_obj)) => {
                base.insert(key, Value::Object(deep_merge(base_obj, overlay_obj)));
            }
            (_, overlay_val) => {
                base.insert(key, overlay_val);
            }
        }
    }
    base
}
