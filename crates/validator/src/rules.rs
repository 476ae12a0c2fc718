//! Rule directives and per-field rule maps.
//!
//! A [`Rule`] is an opaque directive string such as `required` or
//! `between:1,10`, or a nested group of rules. The engine never interprets a
//! directive beyond the `regex:` prefix and its placeholder tokens; meaning is
//! left to the [`Backend`](crate::Backend).
//!
//! A [`RuleMap`] maps field names to ordered rule lists. Field order is the
//! order of first insertion.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// RULE
// ============================================================================

/// A single rule attached to a field.
///
/// Serializes untagged: a directive is a JSON string, a group is a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rule {
    /// A directive of the form `name` or `name:arg1,arg2`.
    Directive(String),
    /// A nested group of rules, e.g. a conditional rule group.
    Group(Vec<Rule>),
}

impl Rule {
    /// Prefix marking a regex directive. Regex directives are never
    /// substituted.
    pub const REGEX_PREFIX: &'static str = "regex:";

    /// Creates a directive rule.
    pub fn directive(directive: impl Into<String>) -> Self {
        Self::Directive(directive.into())
    }

    /// Creates a group from anything convertible into rules.
    pub fn group<I, R>(rules: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Rule>,
    {
        Self::Group(rules.into_iter().map(Into::into).collect())
    }

    /// Returns the directive string, or `None` for a group.
    #[must_use]
    pub fn as_directive(&self) -> Option<&str> {
        match self {
            Self::Directive(directive) => Some(directive),
            Self::Group(_) => None,
        }
    }

    /// Returns true if this is a `regex:` directive.
    #[must_use]
    pub fn is_regex(&self) -> bool {
        self.as_directive()
            .is_some_and(|d| d.starts_with(Self::REGEX_PREFIX))
    }

    /// Directive name: the part before the first `:`.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.as_directive()
            .map(|d| d.split_once(':').map_or(d, |(name, _)| name))
    }

    /// Comma-separated directive arguments.
    ///
    /// Regex directives yield their whole pattern as a single argument, since
    /// commas inside a pattern are not separators.
    #[must_use]
    pub fn arguments(&self) -> Vec<&str> {
        let Some((_, args)) = self.as_directive().and_then(|d| d.split_once(':')) else {
            return Vec::new();
        };
        if self.is_regex() {
            vec![args]
        } else {
            args.split(',').collect()
        }
    }

    /// All directives of this rule, depth-first.
    #[must_use]
    pub fn directives(&self) -> Vec<&str> {
        match self {
            Self::Directive(directive) => vec![directive.as_str()],
            Self::Group(rules) => rules.iter().flat_map(Rule::directives).collect(),
        }
    }

    /// Rewrites every directive at any depth, keeping the group structure.
    pub(crate) fn map_directives<F>(self, f: &mut F) -> Self
    where
        F: FnMut(String) -> String,
    {
        match self {
            Self::Directive(directive) => Self::Directive(f(directive)),
            Self::Group(rules) => {
                Self::Group(rules.into_iter().map(|r| r.map_directives(&mut *f)).collect())
            }
        }
    }
}

impl From<&str> for Rule {
    fn from(directive: &str) -> Self {
        Self::Directive(directive.to_owned())
    }
}

impl From<String> for Rule {
    fn from(directive: String) -> Self {
        Self::Directive(directive)
    }
}

impl From<Vec<Rule>> for Rule {
    fn from(rules: Vec<Rule>) -> Self {
        Self::Group(rules)
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directive(directive) => f.write_str(directive),
            Self::Group(rules) => {
                f.write_str("[")?;
                for (i, rule) in rules.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{rule}")?;
                }
                f.write_str("]")
            }
        }
    }
}

// ============================================================================
// RULE MAP
// ============================================================================

/// Field name → ordered rules.
///
/// Built fresh for each validation call. Note that `==` compares the
/// field-to-rules mapping and ignores field order; compare
/// [`iter`](Self::iter) output when order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleMap {
    fields: IndexMap<String, Vec<Rule>>,
}

impl RuleMap {
    /// Creates an empty rule map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`extend_field`](Self::extend_field).
    #[must_use = "builder methods must be chained or built"]
    pub fn with(mut self, field: impl Into<String>, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.extend_field(field, rules);
        self
    }

    /// Appends one rule to a field, creating the field if needed.
    pub fn push(&mut self, field: impl Into<String>, rule: impl Into<Rule>) {
        self.fields.entry(field.into()).or_default().push(rule.into());
    }

    /// Appends rules to a field, creating the field if needed.
    ///
    /// An empty `rules` still creates the field.
    pub fn extend_field(&mut self, field: impl Into<String>, rules: impl IntoIterator<Item = Rule>) {
        self.fields.entry(field.into()).or_default().extend(rules);
    }

    /// Removes a field and returns its rules.
    pub fn remove(&mut self, field: &str) -> Option<Vec<Rule>> {
        self.fields.shift_remove(field)
    }

    /// Rules for `field`, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[Rule]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Returns true if `field` has an entry.
    #[must_use]
    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field names in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// `(field, rules)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Appends every field of `other` after this map's rules.
    pub fn merge_from(&mut self, other: RuleMap) {
        for (field, rules) in other.fields {
            self.fields.entry(field).or_default().extend(rules);
        }
    }

    /// Merges action-specific rules over common rules.
    ///
    /// Every field of either input is kept. For a field present in both,
    /// common rules come first, then specific ones. Fields keep the order of
    /// `common`, followed by fields only present in `specific`.
    #[must_use]
    pub fn merge(common: RuleMap, specific: RuleMap) -> RuleMap {
        let mut merged = common;
        merged.merge_from(specific);
        merged
    }

    /// Applies `f` to every directive at any depth.
    #[must_use]
    pub(crate) fn map_directives<F>(self, mut f: F) -> Self
    where
        F: FnMut(String) -> String,
    {
        let fields = self
            .fields
            .into_iter()
            .map(|(field, rules)| {
                let rules = rules.into_iter().map(|r| r.map_directives(&mut f)).collect();
                (field, rules)
            })
            .collect();
        Self { fields }
    }
}

impl<K, I> FromIterator<(K, I)> for RuleMap
where
    K: Into<String>,
    I: IntoIterator,
    I::Item: Into<Rule>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (field, rules) in iter {
            map.extend_field(field, rules.into_iter().map(Into::into));
        }
        map
    }
}

impl IntoIterator for RuleMap {
    type Item = (String, Vec<Rule>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<Rule>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn order(map: &RuleMap) -> Vec<(String, Vec<String>)> {
        map.iter()
            .map(|(f, rules)| (f.to_owned(), rules.iter().map(ToString::to_string).collect()))
            .collect()
    }

    #[test]
    fn directive_name_and_arguments() {
        let rule = Rule::from("between:1,10");
        assert_eq!(rule.name(), Some("between"));
        assert_eq!(rule.arguments(), vec!["1", "10"]);

        let bare = Rule::from("required");
        assert_eq!(bare.name(), Some("required"));
        assert!(bare.arguments().is_empty());
    }

    #[test]
    fn regex_arguments_are_not_split() {
        let rule = Rule::from("regex:^[a-z]{1,3}$");
        assert!(rule.is_regex());
        assert_eq!(rule.arguments(), vec!["^[a-z]{1,3}$"]);
    }

    #[test]
    fn group_flattens_directives() {
        let rule = Rule::group([Rule::from("a"), Rule::group(["b", "c"])]);
        assert_eq!(rule.directives(), vec!["a", "b", "c"]);
        assert_eq!(rule.name(), None);
        assert_eq!(rule.to_string(), "[a, [b, c]]");
    }

    #[test]
    fn merge_keeps_every_field_with_common_first() {
        let common: RuleMap = [("foo", vec!["bar"]), ("only_common", vec!["x"])]
            .into_iter()
            .collect();
        let specific: RuleMap = [("foo", vec!["foo"]), ("bar", vec!["baz"])]
            .into_iter()
            .collect();

        let merged = RuleMap::merge(common, specific);

        assert_eq!(
            order(&merged),
            vec![
                ("foo".to_owned(), vec!["bar".to_owned(), "foo".to_owned()]),
                ("only_common".to_owned(), vec!["x".to_owned()]),
                ("bar".to_owned(), vec!["baz".to_owned()]),
            ]
        );
    }

    #[test]
    fn merge_does_not_deduplicate() {
        let common = RuleMap::new().with("a", [Rule::from("required")]);
        let specific = RuleMap::new().with("a", [Rule::from("required")]);
        let merged = RuleMap::merge(common, specific);
        assert_eq!(merged.get("a").map(<[Rule]>::len), Some(2));
    }

    #[test]
    fn empty_field_is_kept() {
        let map = RuleMap::new().with("a", []);
        assert!(map.contains_field("a"));
        assert_eq!(map.get("a"), Some(&[][..]));
    }

    #[test]
    fn serializes_as_plain_json() {
        let map = RuleMap::new()
            .with("a", [Rule::from("required")])
            .with("b", [Rule::group(["x", "y"])]);
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json, serde_json::json!({"a": ["required"], "b": [["x", "y"]]}));

        let back: RuleMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);
    }
}
