//! Validator configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::substitution::Bindings;

/// Instance-level settings of a [`Validator`](crate::Validator).
///
/// Every field has a default, so a partial document is enough:
///
/// ```rust,ignore
/// let config = ValidatorConfig::from_json(r#"{ "throw_exceptions": true }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Report failures as `Err` instead of `Ok(false)`.
    pub throw_exceptions: bool,
    /// Merge action rules with the common rules unless a call says otherwise.
    pub merge: bool,
    /// Bindings applied on top of the defaults (`key = "NULL"`).
    pub bindings: IndexMap<String, String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            throw_exceptions: false,
            merge: true,
            bindings: IndexMap::new(),
        }
    }
}

impl ValidatorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON.
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Sets [`throw_exceptions`](Self::throw_exceptions).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_exceptions(mut self, throw: bool) -> Self {
        self.throw_exceptions = throw;
        self
    }

    /// Sets [`merge`](Self::merge).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    /// Adds a default binding.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_binding(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    /// The initial bindings: the defaults overlaid with [`bindings`](Self::bindings).
    #[must_use]
    pub fn initial_bindings(&self) -> Bindings {
        let mut bindings = Bindings::default();
        bindings.extend(self.bindings.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        bindings
    }
}
