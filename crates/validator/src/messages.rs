//! Field-keyed validation messages.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// MESSAGE BAG
// ============================================================================

/// Field name → messages reported by a backend.
///
/// A message already recorded for a field is not recorded twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageBag {
    messages: IndexMap<String, Vec<String>>,
}

impl MessageBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`.
    ///
    /// Returns false if the field already carried this exact message.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) -> bool {
        let message = message.into();
        let entry = self.messages.entry(field.into()).or_default();
        if entry.contains(&message) {
            return false;
        }
        entry.push(message);
        true
    }

    /// Records every message of `other`, keeping this bag's order first.
    pub fn merge(&mut self, other: &impl MessageProvider) {
        for (field, messages) in other.message_bag().messages {
            for message in messages {
                self.add(field.clone(), message);
            }
        }
    }

    /// Messages for `field`; empty if the field has none.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.messages.get(field).map_or(&[][..], Vec::as_slice)
    }

    /// First message for `field`.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    /// Returns true if `field` has at least one message.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    /// Every message, flattened in field order.
    #[must_use]
    pub fn all(&self) -> Vec<&str> {
        self.messages
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Fields carrying messages.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }

    /// `(field, messages)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.messages
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Total number of messages across all fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    /// Returns true if no message is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a bag from raw JSON error input.
    ///
    /// Accepts an object whose values are a message string or an array of
    /// message strings. Anything else is [`Error::MalformedErrors`]. Fields
    /// keep the order of the input object.
    pub fn from_json(errors: &Value) -> Result<Self> {
        let Value::Object(fields) = errors else {
            return Err(Error::MalformedErrors {
                kind: json_kind(errors),
            });
        };

        let mut bag = Self::new();
        for (field, messages) in fields {
            match messages {
                Value::String(message) => {
                    bag.add(field.as_str(), message.as_str());
                }
                Value::Array(items) => {
                    for item in items {
                        let Value::String(message) = item else {
                            return Err(Error::MalformedErrors {
                                kind: json_kind(item),
                            });
                        };
                        bag.add(field.as_str(), message.as_str());
                    }
                }
                other => {
                    return Err(Error::MalformedErrors {
                        kind: json_kind(other),
                    });
                }
            }
        }
        Ok(bag)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<K, I> FromIterator<(K, I)> for MessageBag
where
    K: Into<String>,
    I: IntoIterator,
    I::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut bag = Self::new();
        for (field, messages) in iter {
            let field = field.into();
            for message in messages {
                bag.add(field.clone(), message);
            }
        }
        bag
    }
}

impl From<IndexMap<String, Vec<String>>> for MessageBag {
    fn from(messages: IndexMap<String, Vec<String>>) -> Self {
        messages.into_iter().collect()
    }
}

impl std::fmt::Display for MessageBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, message) in self.all().into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(message)?;
        }
        Ok(())
    }
}

// ============================================================================
// MESSAGE PROVIDER
// ============================================================================

/// Anything that can hand out a [`MessageBag`].
pub trait MessageProvider {
    /// Returns the messages this value carries.
    fn message_bag(&self) -> MessageBag;
}

impl MessageProvider for MessageBag {
    fn message_bag(&self) -> MessageBag {
        self.clone()
    }
}

// ============================================================================
// TESTS
// ============================================================================
