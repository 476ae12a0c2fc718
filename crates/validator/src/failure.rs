//! Structured validation failure.
//!
//! A [`ValidationFailure`] carries everything needed to explain a rejected
//! attribute set: the backend's messages, the fully resolved rules, the
//! attributes and the action name. It is immutable once built.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::{Value, json};

use crate::attributes::Attributes;
use crate::error::Result;
use crate::messages::{MessageBag, MessageProvider};
use crate::rules::RuleMap;

/// A rejected validation call.
///
/// Serializes as `{"errors": [...]}`; rules, attributes and action are
/// available through accessors.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    messages: MessageBag,
    rules: RuleMap,
    attributes: Attributes,
    action: String,
}

impl ValidationFailure {
    /// Builds a failure from raw messages.
    pub fn new(
        errors: impl Into<MessageBag>,
        rules: RuleMap,
        attributes: Attributes,
        action: impl Into<String>,
    ) -> Self {
        Self {
            messages: errors.into(),
            rules,
            attributes,
            action: action.into(),
        }
    }

    /// Builds a failure from anything exposing a message bag.
    pub fn from_provider<P>(
        provider: &P,
        rules: RuleMap,
        attributes: Attributes,
        action: impl Into<String>,
    ) -> Self
    where
        P: MessageProvider + ?Sized,
    {
        Self::new(provider.message_bag(), rules, attributes, action)
    }

    /// Builds a failure from untyped JSON error input.
    ///
    /// See [`MessageBag::from_json`] for the accepted shape.
    pub fn from_json(
        errors: &Value,
        rules: RuleMap,
        attributes: Attributes,
        action: impl Into<String>,
    ) -> Result<Self> {
        let messages = MessageBag::from_json(errors)?;
        Ok(Self::new(messages, rules, attributes, action))
    }

    /// All messages, flattened in field order.
    #[must_use]
    pub fn errors(&self) -> Vec<&str> {
        self.messages.all()
    }

    /// The messages keyed by field.
    #[must_use]
    pub fn messages(&self) -> &MessageBag {
        &self.messages
    }

    /// The resolved rules the attributes were checked against.
    #[must_use]
    pub fn rules(&self) -> &RuleMap {
        &self.rules
    }

    /// The attributes that were checked.
    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// The action being validated; empty if none was given.
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// One-line summary naming the action.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.action.is_empty() {
            "Validation errors".to_owned()
        } else {
            format!("Validation errors on action [{}]", self.action)
        }
    }

    /// Serialized form as a JSON value.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        json!({ "errors": self.errors() })
    }

    /// Serialized form as a JSON string.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_json_value().to_string()
    }
}

impl MessageProvider for ValidationFailure {
    fn message_bag(&self) -> MessageBag {
        self.messages.clone()
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())?;
        for message in self.errors() {
            write!(f, "\n{message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

impl Serialize for ValidationFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationFailure", 1)?;
        state.serialize_field("errors", &self.errors())?;
        state.end()
    }
}
