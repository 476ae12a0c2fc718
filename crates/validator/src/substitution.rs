//! Placeholder substitution inside rule directives.
//!
//! Two placeholder forms are recognised:
//!
//! - `<name>`: a *binding*, registered explicitly on the validator
//!   (e.g. `exists:<table>,<key>`);
//! - `[name]`: an *input variable*, taken from the attributes being
//!   validated (e.g. `between:[min],[max]`).
//!
//! Directives starting with `regex:` are never touched, since a pattern can
//! legitimately contain `<...>` or `[...]`.
//!
//! The directive is scanned once from left to right. Text produced by a
//! substitution is never scanned again, so a bound value that happens to
//! contain `[x]` is not substituted a second time. Unknown names stay in the
//! directive verbatim.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attributes::{Attributes, attribute_string};
use crate::rules::{Rule, RuleMap};

// ============================================================================
// BINDINGS
// ============================================================================

/// Explicit `<name>` substitutions held by a validator across calls.
///
/// The default set binds `key` to the literal `NULL`, so a rule such as
/// `unique:users,email,<key>` stays meaningful before an entity has an
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings {
    values: IndexMap<String, String>,
}

impl Bindings {
    /// Name of the entity identity binding.
    pub const KEY: &'static str = "key";
    /// Name of the storage table binding.
    pub const TABLE: &'static str = "table";
    /// Value of [`KEY`](Self::KEY) until one is bound.
    pub const NULL_KEY: &'static str = "NULL";

    /// Default bindings (`key = "NULL"`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings with nothing bound.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    /// Sets `name` to `value`, or removes it when `value` is `None`.
    pub fn replace(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match value {
            Some(value) => {
                self.values.insert(name, value);
            }
            None => {
                self.values.shift_remove(&name);
            }
        }
    }

    /// Sets `name` to `value`.
    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        self.replace(name, Some(value.to_string()));
    }

    /// Removes `name`, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.shift_remove(name)
    }

    /// Value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns true if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// `(name, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for Bindings {
    fn default() -> Self {
        let mut values = IndexMap::new();
        values.insert(Self::KEY.to_owned(), Self::NULL_KEY.to_owned());
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Bindings {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.values.insert(name.into(), value.into());
        }
    }
}

// ============================================================================
// SUBSTITUTION
// ============================================================================

/// Resolves placeholders in every directive of `rules`, at any depth.
#[must_use]
pub fn substitute(rules: RuleMap, bindings: &Bindings, attributes: &Attributes) -> RuleMap {
    rules.map_directives(|directive| {
        let resolved = substitute_directive(&directive, bindings, attributes);
        if resolved != directive {
            tracing::trace!(from = %directive, to = %resolved, "substituted directive");
        }
        resolved
    })
}

/// Resolves placeholders in one directive.
#[must_use]
pub fn substitute_directive(directive: &str, bindings: &Bindings, attributes: &Attributes) -> String {
    if directive.starts_with(Rule::REGEX_PREFIX) {
        return directive.to_owned();
    }

    let mut out = String::with_capacity(directive.len());
    let mut rest = directive;
    while let Some(pos) = rest.find(['<', '[']) {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);
        match resolve_token(tail, bindings, attributes) {
            Some((value, consumed)) => {
                out.push_str(&value);
                rest = &tail[consumed..];
            }
            None => {
                // Opening bracket without a known name: keep it, rescan after it.
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Resolves the token at the start of `tail` (which begins with `<` or `[`).
///
/// Returns the replacement and the number of bytes the token spans.
fn resolve_token<'a>(
    tail: &str,
    bindings: &'a Bindings,
    attributes: &'a Attributes,
) -> Option<(Cow<'a, str>, usize)> {
    let close = match tail.as_bytes().first()? {
        b'<' => '>',
        b'[' => ']',
        _ => return None,
    };
    let len = tail[1..].find(close)?;
    let name = &tail[1..=len];
    let consumed = len + 2;

    if close == '>' {
        bindings.get(name).map(|v| (Cow::Borrowed(v), consumed))
    } else {
        attributes
            .get(name)
            .map(|v| (attribute_string(v), consumed))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn attrs(pairs: &[(&str, serde_json::Value)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    fn bound(pairs: &[(&str, &str)]) -> Bindings {
        let mut bindings = Bindings::new();
        bindings.extend(pairs.iter().copied());
        bindings
    }

    #[test]
    fn default_bindings_hold_null_key() {
        let bindings = Bindings::default();
        assert_eq!(bindings.get("key"), Some("NULL"));
        assert_eq!(bindings.len(), 1);
        assert!(Bindings::empty().is_empty());
    }

    #[test]
    fn replace_none_removes_binding() {
        let mut bindings = Bindings::new();
        bindings.replace("table", Some("users".into()));
        assert_eq!(bindings.get("table"), Some("users"));

        bindings.replace("table", None);
        assert!(!bindings.contains("table"));

        bindings.replace("key", None);
        assert!(bindings.is_empty());
    }

    #[rstest]
    #[case("required", "required")]
    #[case("exists:<table>,<key>", "exists:users,42")]
    #[case("between:[min],[max]", "between:5,10")]
    #[case("<key>:<key>", "42:42")]
    #[case("in:<unknown>,[missing]", "in:<unknown>,[missing]")]
    #[case("<<key>", "<42")]
    #[case("[[min]]", "[5]")]
    #[case("dangling:<key", "dangling:<key")]
    #[case("regex:^[min]<key>$", "regex:^[min]<key>$")]
    fn substitutes_directive(#[case] directive: &str, #[case] expected: &str) {
        let bindings = bound(&[("table", "users"), ("key", "42")]);
        let attributes = attrs(&[("min", json!(5)), ("max", json!(10))]);
        assert_eq!(substitute_directive(directive, &bindings, &attributes), expected);
    }

    #[test]
    fn regex_directive_is_never_modified() {
        let bindings = bound(&[("a-z", "oops")]);
        let attributes = attrs(&[("a-z", json!("oops"))]);
        let directive = "regex:^\\[a-z\\]$";
        assert_eq!(substitute_directive(directive, &bindings, &attributes), directive);
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let bindings = bound(&[("column", "[name]")]);
        let attributes = attrs(&[("name", json!("alice"))]);
        assert_eq!(
            substitute_directive("unique:<column>,[name]", &bindings, &attributes),
            "unique:[name],alice"
        );
    }

    #[test]
    fn substitutes_nested_groups() {
        let rules = RuleMap::new()
            .with("owner", [Rule::group([Rule::from("exists:<table>"), Rule::group(["max:[max]"])])]);
        let bindings = bound(&[("table", "users")]);
        let attributes = attrs(&[("max", json!(3))]);

        let resolved = substitute(rules, &bindings, &attributes);

        assert_eq!(
            resolved.get("owner"),
            Some(&[Rule::group([Rule::from("exists:users"), Rule::group(["max:3"])])][..])
        );
    }
}
