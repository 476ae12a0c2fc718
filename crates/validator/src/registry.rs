//! Action registry: action name → rule provider function.
//!
//! Rules for an action are looked up by name instead of being discovered on
//! the provider at runtime. Names are matched case-insensitively, so
//! `"Create"` and `"create"` resolve to the same function. An action with no
//! entry resolves to an empty [`RuleMap`].

use std::fmt;

use indexmap::IndexMap;

use crate::rules::RuleMap;

/// Produces the action-specific rules of provider `P`.
pub type RuleFn<P> = fn(&P) -> RuleMap;

/// Action name → rule function, for one provider type.
pub struct ActionRegistry<P: ?Sized> {
    actions: IndexMap<String, RuleFn<P>>,
}

impl<P: ?Sized> ActionRegistry<P> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: IndexMap::new(),
        }
    }

    /// Registers `rules` for `action`, replacing any previous entry in place.
    pub fn register(&mut self, action: &str, rules: RuleFn<P>) -> &mut Self {
        self.actions.insert(normalize(action), rules);
        self
    }

    /// Returns true if `action` has a rule function.
    #[must_use]
    pub fn contains(&self, action: &str) -> bool {
        self.actions.contains_key(&normalize(action))
    }

    /// Rules `provider` declares for `action`; empty if none are registered.
    #[must_use]
    pub fn resolve(&self, provider: &P, action: &str) -> RuleMap {
        match self.actions.get(&normalize(action)) {
            Some(rules) => rules(provider),
            None => {
                tracing::trace!(action, "no rules registered for action");
                RuleMap::new()
            }
        }
    }

    /// Registered action names (normalized), in registration order.
    #[must_use]
    pub fn actions(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }

    /// Number of registered actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if no action is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

fn normalize(action: &str) -> String {
    action.to_ascii_lowercase()
}

impl<P: ?Sized> Default for ActionRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> fmt::Debug for ActionRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.actions())
            .finish()
    }
}
