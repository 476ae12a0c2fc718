//! Prelude module for convenient imports.
//!
//! Provides a single `use rulebook_validator::prelude::*;` import that brings
//! in the validator, its traits, the rule and message types, and the macros.

pub use crate::{
    ActionRegistry, Attributes, Backend, BackendCheck, Bindings, Dispatch, Error, MessageBag,
    MessageProvider, Rule, RuleMap, RuleProvider, ValidationFailure, ValidationOutcome, Validator,
    ValidatorConfig, Verdict,
};
pub use crate::{attributes, rule_map};
