//! Subscribes a validator to entity lifecycle events.
//!
//! | event      | binds             | action   |
//! |------------|-------------------|----------|
//! | `creating` | `table`           | `create` |
//! | `updating` | `key`, `table`    | `update` |
//! | `deleting` | `key`, `table`    | `delete` |
//!
//! An entity without a key binds `key` to the `NULL` literal, the same as a
//! fresh validator.
//!
//! Exception mode is switched on at registration, so a rejected entity
//! always surfaces as an error that aborts the dispatch.

use std::sync::Arc;

use parking_lot::Mutex;
use rulebook_validator::{Backend, Bindings, RuleProvider, Validator};
use tracing::debug;

use crate::dispatcher::{Listener, Notifier};
use crate::entity::Entity;
use crate::error::{Error, Result};

/// A validator shared by the bridge's listeners.
pub type SharedValidator<P, B> = Arc<Mutex<Validator<P, B>>>;

// ---------------------------------------------------------------------------
// LifecycleEvent
// ---------------------------------------------------------------------------

/// Persistence events that trigger validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Before the first insert of an entity.
    Creating,
    /// Before an existing entity is written.
    Updating,
    /// Before an entity is removed.
    Deleting,
}

impl LifecycleEvent {
    /// Every event the bridge subscribes to.
    pub const ALL: [Self; 3] = [Self::Creating, Self::Updating, Self::Deleting];

    /// Event verb, e.g. `"creating"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Creating => "creating",
            Self::Updating => "updating",
            Self::Deleting => "deleting",
        }
    }

    /// Validator action run for this event.
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::Creating => "create",
            Self::Updating => "update",
            Self::Deleting => "delete",
        }
    }

    /// Full event name for an entity type: `"updating: project"`.
    #[must_use]
    pub fn event_name(self, entity_type: &str) -> String {
        format!("{}: {entity_type}", self.as_str())
    }

    fn binds_key(self) -> bool {
        matches!(self, Self::Updating | Self::Deleting)
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ModelValidator
// ---------------------------------------------------------------------------

/// Registers validators against entity lifecycle events.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelValidator;

impl ModelValidator {
    /// Subscribes `validator` to the `creating`, `updating` and `deleting`
    /// events of `E` on `notifier`.
    ///
    /// Turns exception mode on. Returns the shared validator so callers can
    /// inspect bindings or the last check after a dispatch.
    pub fn register<E, P, B, N>(mut validator: Validator<P, B>, notifier: &N) -> SharedValidator<P, B>
    where
        E: Entity + 'static,
        P: RuleProvider + Send + 'static,
        B: Backend + Send + 'static,
        B::Check: Send,
        N: Notifier<E> + ?Sized,
    {
        validator.toggle_exceptions(true);
        let shared = Arc::new(Mutex::new(validator));

        for event in LifecycleEvent::ALL {
            let name = event.event_name(E::ENTITY_TYPE);
            notifier.listen(&name, listener(event, name.clone(), Arc::clone(&shared)));
            debug!(event = %name, action = event.action(), "validator subscribed");
        }

        shared
    }
}

fn listener<E, P, B>(event: LifecycleEvent, name: String, shared: SharedValidator<P, B>) -> Listener<E>
where
    E: Entity + 'static,
    P: RuleProvider + Send + 'static,
    B: Backend + Send + 'static,
    B::Check: Send,
{
    Arc::new(move |entity: &E| -> Result<()> {
        let mut validator = shared.lock();
        if event.binds_key() {
            let key = entity.key().unwrap_or_else(|| Bindings::NULL_KEY.to_owned());
            validator.replace(Bindings::KEY, Some(key));
        }
        validator.set_table(entity.table());

        let attributes = entity.attributes();
        match validator.validate(event.action(), &attributes) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Error::rejected(name.as_str(), "validation failed")),
            Err(err) => {
                debug!(event = %name, error = %err, "entity rejected");
                Err(err.into())
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LifecycleEvent::Creating, "creating: project", "create")]
    #[case(LifecycleEvent::Updating, "updating: project", "update")]
    #[case(LifecycleEvent::Deleting, "deleting: project", "delete")]
    fn event_names_and_actions(#[case] event: LifecycleEvent, #[case] name: &str, #[case] action: &str) {
        assert_eq!(event.event_name("project"), name);
        assert_eq!(event.action(), action);
    }

    #[test]
    fn only_writes_to_existing_rows_bind_the_key() {
        assert!(!LifecycleEvent::Creating.binds_key());
        assert!(LifecycleEvent::Updating.binds_key());
        assert!(LifecycleEvent::Deleting.binds_key());
    }
}
