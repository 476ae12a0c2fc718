//! # rulebook-lifecycle
//!
//! Hooks a [`Validator`](rulebook_validator::Validator) into the lifecycle of
//! persisted entities.
//!
//! A persistence layer announces `creating`, `updating` and `deleting` events
//! through a [`Notifier`]. [`ModelValidator::register`] subscribes one
//! validator to all three for an [`Entity`] type, binding `<table>` and
//! `<key>` from the entity before validating its attributes. A failing
//! listener aborts the dispatch, so the write never happens.
//!
//! ```rust,ignore
//! let dispatcher = EventDispatcher::<Project>::new();
//! let shared = ModelValidator::register(Validator::new(ProjectRules, backend), &dispatcher);
//!
//! // persistence layer, before inserting:
//! dispatcher.dispatch("creating: project", &project)?;
//! ```

#![allow(clippy::result_large_err)]

pub mod bridge;
pub mod dispatcher;
pub mod entity;
pub mod error;

pub use bridge::{LifecycleEvent, ModelValidator, SharedValidator};
pub use dispatcher::{EventDispatcher, Listener, Notifier};
pub use entity::Entity;
pub use error::{Error, Result};
