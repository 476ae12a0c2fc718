//! # rulebook-validator
//!
//! Declarative rule composition for validating attribute sets before they are
//! persisted.
//!
//! A [`RuleProvider`] declares common rules and per-action rules. A
//! [`Validator`] merges them, lets the provider adjust them, substitutes
//! `<binding>` and `[attribute]` placeholders, and hands the result to an
//! opaque [`Backend`] that decides pass/fail. Failures are reported as a
//! [`ValidationFailure`] carrying messages, rules, attributes and action.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rulebook_validator::prelude::*;
//!
//! struct UserRules;
//!
//! impl RuleProvider for UserRules {
//!     fn common_rules(&self) -> RuleMap {
//!         rule_map! { "email" => ["required", "unique:<table>,email,<key>"] }
//!     }
//! }
//!
//! let mut validator = Validator::new(UserRules, backend);
//! validator.set_table("users").toggle_exceptions(true);
//! validator.validate("create", &attributes! { "email" => "a@b.c" })?;
//! ```
//!
//! Directives themselves (`required`, `numeric`, ...) are opaque strings;
//! their meaning belongs to the backend.

// ValidationFailure carries the resolved rules and attributes; it is boxed
// inside `Error`, not on every `Result`.
#![allow(clippy::result_large_err)]

#[macro_use]
mod macros;

pub mod attributes;
pub mod backend;
pub mod config;
pub mod error;
pub mod failure;
pub mod messages;
pub mod prelude;
pub mod registry;
pub mod rules;
pub mod substitution;
pub mod validator;

pub use attributes::{Attributes, attribute_string};
pub use backend::{Backend, BackendCheck, Verdict};
pub use config::ValidatorConfig;
pub use error::{Error, Result};
pub use failure::ValidationFailure;
pub use messages::{MessageBag, MessageProvider};
pub use registry::{ActionRegistry, RuleFn};
pub use rules::{Rule, RuleMap};
pub use substitution::{Bindings, substitute, substitute_directive};
pub use validator::{Dispatch, RuleProvider, ValidationOutcome, Validator};

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
