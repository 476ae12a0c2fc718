//! The rule pipeline.
//!
//! [`Validator`] ties a [`RuleProvider`] to a [`Backend`] and runs every
//! validation call through the same steps:
//!
//! 1. resolve the action's rules from the [`ActionRegistry`];
//! 2. merge them with the common rules (unless merging is off);
//! 3. let the provider adjust them ([`RuleProvider::prepare_rules`]);
//! 4. substitute `<binding>` and `[attribute]` placeholders;
//! 5. build a backend check and let the provider adjust it
//!    ([`RuleProvider::prepare_backend`]);
//! 6. ask the check for a verdict.
//!
//! # Examples
//!
//! ```rust,ignore
//! struct ProjectRules;
//!
//! impl RuleProvider for ProjectRules {
//!     fn common_rules(&self) -> RuleMap {
//!         rule_map! {
//!             "title" => ["required", "max:200"],
//!             "goal" => ["between:[min],[max]"],
//!         }
//!     }
//!
//!     fn register_actions(actions: &mut ActionRegistry<Self>) {
//!         actions.register("create", |_| rule_map! { "owner" => ["exists:<usertable>,<userkey>"] });
//!     }
//! }
//!
//! let mut validator = Validator::new(ProjectRules, backend);
//! validator.replace("usertable", Some("users".into()));
//! let ok = validator.validate("create", &attributes)?;
//! ```

use tracing::debug;

use crate::attributes::Attributes;
use crate::backend::{Backend, BackendCheck};
use crate::config::ValidatorConfig;
use crate::error::{Error, Result};
use crate::failure::ValidationFailure;
use crate::messages::MessageBag;
use crate::registry::ActionRegistry;
use crate::rules::RuleMap;
use crate::substitution::{Bindings, substitute};

// ============================================================================
// RULE PROVIDER
// ============================================================================

/// Declares the rules of one kind of attribute set.
pub trait RuleProvider {
    /// Rules applied on every action.
    fn common_rules(&self) -> RuleMap;

    /// Registers the action-specific rule functions.
    ///
    /// Called once when the validator is built. Actions left unregistered
    /// validate against the common rules only.
    fn register_actions(actions: &mut ActionRegistry<Self>)
    where
        Self: Sized,
    {
        let _ = actions;
    }

    /// Adjusts the merged rules before placeholders are substituted, e.g. to
    /// add a rule only when certain attributes are present.
    fn prepare_rules(&self, rules: RuleMap, attributes: &Attributes) -> RuleMap {
        let _ = attributes;
        rules
    }

    /// Last-mile configuration of the backend check before it runs.
    fn prepare_backend(&self, check: &mut dyn BackendCheck) {
        let _ = check;
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Result of one validation call, before exception mode is applied.
#[derive(Debug, Clone)]
pub enum ValidationOutcome {
    /// The backend accepted the attributes.
    Passed,
    /// The backend rejected the attributes.
    Failed(Box<ValidationFailure>),
}

impl ValidationOutcome {
    /// Returns true if the attributes passed.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// The failure, if any.
    #[must_use]
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Passed => None,
            Self::Failed(failure) => Some(&**failure),
        }
    }

    /// Collapses to a boolean, or to an error when `throw` is set and the
    /// attributes failed.
    pub fn into_result(self, throw: bool) -> Result<bool> {
        match self {
            Self::Passed => Ok(true),
            Self::Failed(failure) if throw => Err(Error::Validation(failure)),
            Self::Failed(_) => Ok(false),
        }
    }
}

/// Value returned by [`Validator::call`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Result of a `validate<Action>` call.
    Validated(bool),
    /// Messages of the last backend check.
    Messages(MessageBag),
    /// Verdict of the last backend check (`passes` / `fails`).
    Verdict(bool),
}

// ============================================================================
// VALIDATOR
// ============================================================================

/// Runs attribute sets through the rule pipeline.
///
/// Holds instance-scoped state (bindings, merge default, exception mode and
/// the last backend check), so a validator must not be shared between
/// concurrent workflows without external locking.
pub struct Validator<P, B: Backend> {
    provider: P,
    backend: B,
    actions: ActionRegistry<P>,
    bindings: Bindings,
    throw_exceptions: bool,
    merge: bool,
    last_check: Option<B::Check>,
}

impl<P, B> Validator<P, B>
where
    P: RuleProvider,
    B: Backend,
{
    /// Creates a validator with the default configuration.
    pub fn new(provider: P, backend: B) -> Self {
        Self::with_config(provider, backend, ValidatorConfig::default())
    }

    /// Creates a validator from `config`.
    pub fn with_config(provider: P, backend: B, config: ValidatorConfig) -> Self {
        let mut actions = ActionRegistry::new();
        P::register_actions(&mut actions);
        debug!(actions = ?actions.actions(), "validator created");

        Self {
            provider,
            backend,
            actions,
            bindings: config.initial_bindings(),
            throw_exceptions: config.throw_exceptions,
            merge: config.merge,
            last_check: None,
        }
    }

    /// The rule provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The action registry built from the provider.
    pub fn actions(&self) -> &ActionRegistry<P> {
        &self.actions
    }

    /// Current placeholder bindings.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Turns exception mode on or off.
    pub fn toggle_exceptions(&mut self, toggle: bool) -> &mut Self {
        self.throw_exceptions = toggle;
        self
    }

    /// Returns true if failures are reported as errors.
    pub fn throws_exceptions(&self) -> bool {
        self.throw_exceptions
    }

    /// Sets the default merge behaviour.
    pub fn set_merge(&mut self, merge: bool) -> &mut Self {
        self.merge = merge;
        self
    }

    /// Binds `<name>` to `value`, or unbinds it when `value` is `None`.
    pub fn replace(&mut self, name: impl Into<String>, value: Option<String>) -> &mut Self {
        self.bindings.replace(name, value);
        self
    }

    /// Binds `<key>`.
    pub fn set_key(&mut self, key: impl ToString) -> &mut Self {
        self.bindings.set(Bindings::KEY, key);
        self
    }

    /// Binds `<table>`.
    pub fn set_table(&mut self, table: impl ToString) -> &mut Self {
        self.bindings.set(Bindings::TABLE, table);
        self
    }

    /// Rules for `action` merged with the common rules, before any
    /// preparation or substitution.
    pub fn rules_for(&self, action: &str, merge: Option<bool>) -> RuleMap {
        let specific = self.actions.resolve(&self.provider, action);
        if merge.unwrap_or(self.merge) {
            RuleMap::merge(self.provider.common_rules(), specific)
        } else {
            specific
        }
    }

    /// Fully resolved rules for `action` against `attributes`: merged,
    /// prepared and substituted.
    pub fn resolve_rules(&self, action: &str, attributes: &Attributes, merge: Option<bool>) -> RuleMap {
        let rules = self.rules_for(action, merge);
        let rules = self.provider.prepare_rules(rules, attributes);
        substitute(rules, &self.bindings, attributes)
    }

    /// Runs the pipeline and returns the outcome, ignoring exception mode.
    pub fn evaluate(&mut self, action: &str, attributes: &Attributes, merge: Option<bool>) -> ValidationOutcome {
        let rules = self.resolve_rules(action, attributes, merge);
        debug!(action, fields = rules.len(), "validating attributes");

        let mut check = self.backend.make(attributes, &rules);
        self.provider.prepare_backend(&mut check);

        let outcome = if check.passes() {
            ValidationOutcome::Passed
        } else {
            let failure = ValidationFailure::new(check.messages(), rules, attributes.clone(), action);
            debug!(action, errors = failure.messages().len(), "validation failed");
            ValidationOutcome::Failed(Box::new(failure))
        };

        self.last_check = Some(check);
        outcome
    }

    /// Validates `attributes` for `action` with the default merge behaviour.
    ///
    /// Returns `Ok(true)` on pass. On failure returns `Ok(false)`, or
    /// [`Error::Validation`] when exception mode is on.
    pub fn validate(&mut self, action: &str, attributes: &Attributes) -> Result<bool> {
        self.validate_with(action, attributes, None)
    }

    /// Like [`validate`](Self::validate), with an optional merge override.
    pub fn validate_with(&mut self, action: &str, attributes: &Attributes, merge: Option<bool>) -> Result<bool> {
        let throw = self.throw_exceptions;
        self.evaluate(action, attributes, merge).into_result(throw)
    }

    /// Messages of the last backend check, if a validation has run.
    pub fn errors(&self) -> Option<MessageBag> {
        self.last_check.as_ref().map(BackendCheck::messages)
    }

    /// Dispatches an operation by name.
    ///
    /// `validate<Action>`, `validate-<action>` and `validate_<action>` run
    /// [`validate`](Self::validate) for that action and need `attributes`.
    /// `errors`, `messages`, `passes` and `fails` are forwarded to the last
    /// backend check. Anything else is [`Error::UnknownOperation`].
    pub fn call(&mut self, operation: &str, attributes: Option<&Attributes>) -> Result<Dispatch> {
        if let Some(action) = action_from_operation(operation) {
            let attributes = attributes.ok_or_else(|| Error::MissingAttributes {
                operation: operation.to_owned(),
            })?;
            return self.validate(action, attributes).map(Dispatch::Validated);
        }

        let unknown = || Error::UnknownOperation {
            operation: operation.to_owned(),
        };
        let check = self.last_check.as_mut().ok_or_else(unknown)?;
        match operation {
            "errors" | "messages" => Ok(Dispatch::Messages(check.messages())),
            "passes" => Ok(Dispatch::Verdict(check.passes())),
            "fails" => Ok(Dispatch::Verdict(check.fails())),
            _ => Err(unknown()),
        }
    }
}

/// Extracts the action from `validateCreate`, `validate-create` or
/// `validate_create`.
fn action_from_operation(operation: &str) -> Option<&str> {
    let action = operation
        .strip_prefix("validate")?
        .trim_start_matches(['-', '_']);
    (!action.is_empty()).then_some(action)
}

impl<P, B> std::fmt::Debug for Validator<P, B>
where
    B: Backend,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("actions", &self.actions)
            .field("bindings", &self.bindings)
            .field("throw_exceptions", &self.throw_exceptions)
            .field("merge", &self.merge)
            .field("has_last_check", &self.last_check.is_some())
            .finish()
    }
}
