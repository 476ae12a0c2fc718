//! Contract with the attribute-validation backend.
//!
//! The engine never evaluates a directive itself. A [`Backend`] receives the
//! attributes and the fully resolved [`RuleMap`] and returns a
//! [`BackendCheck`] that decides pass/fail and reports messages.
//!
//! Any `Fn(&Attributes, &RuleMap) -> C` closure is a backend, which keeps
//! test doubles and adapters small:
//!
//! ```rust,ignore
//! let backend = |_: &Attributes, rules: &RuleMap| {
//!     if rules.is_empty() { Verdict::pass() } else { Verdict::fail(messages) }
//! };
//! ```

use crate::attributes::Attributes;
use crate::messages::{MessageBag, MessageProvider};
use crate::rules::RuleMap;

/// Creates a check for one attribute set against one rule map.
pub trait Backend {
    /// The check handle produced for each validation call.
    type Check: BackendCheck;

    /// Prepares a check. Evaluation may happen here or lazily in
    /// [`BackendCheck::passes`].
    fn make(&self, attributes: &Attributes, rules: &RuleMap) -> Self::Check;
}

impl<F, C> Backend for F
where
    F: Fn(&Attributes, &RuleMap) -> C,
    C: BackendCheck,
{
    type Check = C;

    fn make(&self, attributes: &Attributes, rules: &RuleMap) -> C {
        self(attributes, rules)
    }
}

/// Handle for a single backend evaluation.
pub trait BackendCheck {
    /// Runs (or returns) the verdict.
    fn passes(&mut self) -> bool;

    /// Inverse of [`passes`](Self::passes).
    fn fails(&mut self) -> bool {
        !self.passes()
    }

    /// Messages explaining the failure; empty after a pass.
    fn messages(&self) -> MessageBag;
}

/// A precomputed verdict, for backends that evaluate eagerly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    passed: bool,
    messages: MessageBag,
}

impl Verdict {
    /// A passing verdict.
    #[must_use]
    pub fn pass() -> Self {
        Self {
            passed: true,
            messages: MessageBag::new(),
        }
    }

    /// A failing verdict carrying `messages`.
    pub fn fail(messages: impl Into<MessageBag>) -> Self {
        Self {
            passed: false,
            messages: messages.into(),
        }
    }

    /// Passes when `messages` is empty, fails otherwise.
    pub fn from_messages(messages: impl Into<MessageBag>) -> Self {
        let messages = messages.into();
        Self {
            passed: messages.is_empty(),
            messages,
        }
    }
}

impl BackendCheck for Verdict {
    fn passes(&mut self) -> bool {
        self.passed
    }

    fn messages(&self) -> MessageBag {
        self.messages.clone()
    }
}

impl MessageProvider for Verdict {
    fn message_bag(&self) -> MessageBag {
        self.messages.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_backends() {
        let backend = |attributes: &Attributes, _: &RuleMap| {
            if attributes.contains_key("name") {
                Verdict::pass()
            } else {
                Verdict::fail(MessageBag::from_iter([("name", ["required"])]))
            }
        };

        let mut check = backend.make(&Attributes::new(), &RuleMap::new());
        assert!(check.fails());
        assert_eq!(check.messages().first("name"), Some("required"));
    }

    #[test]
    fn verdict_from_messages() {
        assert!(Verdict::from_messages(MessageBag::new()).passes());
        let mut failed = Verdict::from_messages(MessageBag::from_iter([("a", ["x"])]));
        assert!(!failed.passes());
    }
}
