//! The contract persisted entities expose to the bridge.

use rulebook_validator::Attributes;

/// A record whose writes are guarded by a validator.
pub trait Entity {
    /// Type name used in lifecycle event names (`"creating: <type>"`).
    const ENTITY_TYPE: &'static str;

    /// Identity of the stored record, or `None` before its first insert.
    fn key(&self) -> Option<String>;

    /// Storage table of the record.
    fn table(&self) -> &str;

    /// Attribute values about to be written.
    fn attributes(&self) -> Attributes;
}
