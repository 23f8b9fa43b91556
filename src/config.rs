//! Reader configuration
//!
//! The only tunable part of the reader is its table of composed keys:
//! multi-word keys such as `interface type=` that must be taken as one token
//! before the generic `name=` rule gets a chance to split them.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Composed keys recognized when no table is configured
pub const DEFAULT_COMPOSED_KEYS: &[&str] = &["interface type="];

/// Serializable reader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Composed key prefixes, each ending in `=`, tried in order
    pub composed_keys: Vec<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            composed_keys: DEFAULT_COMPOSED_KEYS
                .iter()
                .map(|key| key.to_string())
                .collect(),
        }
    }
}

impl ReaderConfig {
    /// Parse a configuration from JSON, e.g. `{"composed_keys": ["interface type="]}`
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ReaderConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every composed key without building a table
    pub fn validate(&self) -> Result<()> {
        self.composed_keys
            .iter()
            .map(String::as_str)
            .try_for_each(validate_key)
    }

    /// Build the immutable key table shared by readers
    pub fn composed_keys_table(&self) -> Result<ComposedKeys> {
        ComposedKeys::new(self.composed_keys.iter().cloned())
    }
}

/// Ordered, immutable table of composed keys
///
/// Cloning is cheap, so one table can back every reader created for a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedKeys {
    keys: Arc<[String]>,
}

impl ComposedKeys {
    /// Build a table, rejecting malformed keys
    pub fn new<I, S>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        for key in &keys {
            validate_key(key)?;
        }
        Ok(Self { keys: keys.into() })
    }

    /// A table that recognizes no composed keys
    pub fn empty() -> Self {
        Self {
            keys: Arc::from(Vec::new()),
        }
    }

    /// First key in table order that `text` starts with
    pub fn match_prefix(&self, text: &str) -> Option<&str> {
        self.keys
            .iter()
            .map(String::as_str)
            .find(|key| text.starts_with(key))
    }

    /// Number of keys in the table
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the table has no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate over the keys in lookup order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl Default for ComposedKeys {
    fn default() -> Self {
        Self {
            keys: DEFAULT_COMPOSED_KEYS
                .iter()
                .map(|key| key.to_string())
                .collect(),
        }
    }
}

fn validate_key(key: &str) -> Result<()> {
    let reason = if key.is_empty() {
        "key is empty"
    } else if !key.ends_with('=') {
        "key must end with '='"
    } else if key.len() == 1 {
        "key has no name before '='"
    } else {
        return Ok(());
    };

    Err(Error::InvalidComposedKey {
        key: key.to_string(),
        reason: reason.to_string(),
    })
}
