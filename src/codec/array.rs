use serde_json::Value;

use crate::DecodeError;

/// Decodes every element of `values` in order.
///
/// The first failing element aborts the whole decode; its error is prefixed
/// with the element index.
pub fn decode_array<T>(
    values: &[Value],
    mut element: impl FnMut(&Value) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| element(value).map_err(|e| e.at_index(index)))
        .collect()
}

pub(crate) fn encode_array<T>(values: &[T], element: impl Fn(&T) -> Value) -> Value {
    Value::Array(values.iter().map(element).collect())
}
