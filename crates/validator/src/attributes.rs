//! The attribute set under validation.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde_json::Value;

/// Field name → value, in insertion order. Read-only to the engine.
pub type Attributes = IndexMap<String, Value>;

/// Renders an attribute value the way it appears inside a directive.
///
/// Strings are used as-is and numbers in decimal form. `true` renders as
/// `"1"`, `false` and `null` as the empty string. Arrays and objects render
/// as compact JSON.
#[must_use]
pub fn attribute_string(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Bool(true) => Cow::Borrowed("1"),
        Value::Bool(false) | Value::Null => Cow::Borrowed(""),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("bar"), "bar")]
    #[case(json!(5), "5")]
    #[case(json!(2.5), "2.5")]
    #[case(json!(-3), "-3")]
    #[case(json!(true), "1")]
    #[case(json!(false), "")]
    #[case(json!(null), "")]
    #[case(json!([1, 2]), "[1,2]")]
    fn renders_values(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(attribute_string(&value), expected);
    }
}
