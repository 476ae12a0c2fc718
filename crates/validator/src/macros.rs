//! Macros for writing rule maps and attribute sets inline.
//!
//! # Available Macros
//!
//! - [`rule_map!`]: build a [`RuleMap`](crate::RuleMap) from `field => [rules]` pairs
//! - [`attributes!`]: build an [`Attributes`](crate::Attributes) map from `field => value` pairs
//!
//! # Examples
//!
//! ```rust,ignore
//! use rulebook_validator::{Rule, attributes, rule_map};
//!
//! let rules = rule_map! {
//!     "title" => ["required", "max:200"],
//!     "goal" => ["between:[min],[max]"],
//!     "tags" => [Rule::group(["array", "max:5"])],
//! };
//!
//! let input = attributes! {
//!     "title" => "Launch",
//!     "min" => 5,
//!     "max" => 10,
//! };
//! ```

/// Builds a [`RuleMap`](crate::RuleMap).
///
/// Each rule is anything convertible into a [`Rule`](crate::Rule): a string
/// directive or a `Rule::group(...)`. A field listed with `[]` is kept with
/// no rules.
#[macro_export]
macro_rules! rule_map {
    () => {
        $crate::RuleMap::new()
    };
    ( $( $field:expr => [ $( $rule:expr ),* $(,)? ] ),+ $(,)? ) => {{
        let mut map = $crate::RuleMap::new();
        $(
            map.extend_field($field, [ $( $crate::Rule::from($rule) ),* ]);
        )+
        map
    }};
}

/// Builds an [`Attributes`](crate::Attributes) map.
///
/// Values go through `serde_json::json!`, so any JSON-like literal works.
#[macro_export]
macro_rules! attributes {
    () => {
        $crate::Attributes::new()
    };
    ( $( $field:expr => $value:tt ),+ $(,)? ) => {{
        let mut attributes = $crate::Attributes::new();
        $(
            attributes.insert(::std::string::String::from($field), $crate::__private::serde_json::json!($value));
        )+
        attributes
    }};
}
