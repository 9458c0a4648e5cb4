use crate::selection::Selection;

/// Serialize a selection to a pretty-printed JSON array of segment arrays.
pub fn to_pretty_json(selection: &Selection) -> String {
    serde_json::to_string_pretty(selection).expect("Selection serialization cannot fail")
}
