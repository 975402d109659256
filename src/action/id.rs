//! Action identities.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Immutable key naming a user-triggerable operation, independent of any UI
/// element.
///
/// Two identities are equal iff `(qualifier, name)` match. The qualifier is
/// a human-readable namespace (usually the screen or component name) and the
/// name is the operation within it. Identities are cheap to clone and usable
/// as map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId {
    qualifier: String,
    name: String,
}

impl ActionId {
    /// Create an identity namespaced under `qualifier`.
    pub fn new(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: qualifier.into(),
            name: name.into(),
        }
    }

    /// Create an unqualified identity (empty qualifier), used for the
    /// standard actions shared across presenters.
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self::new("", name)
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qualifier.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.qualifier, self.name)
        }
    }
}

/// The string form did not look like `Qualifier.Name` or `Name`.
#[derive(Debug, Error)]
#[error("invalid action path '{0}': expected 'Qualifier.Name'")]
pub struct InvalidActionPath(pub String);

impl FromStr for ActionId {
    type Err = InvalidActionPath;

    /// Parse `"OrderSummary.RemoveItem"` into a qualified identity, or a bare
    /// `"Close"` into an unqualified one. The qualifier is everything before
    /// the first dot.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        match path.split_once('.') {
            Some((qualifier, name)) => {
                if qualifier.is_empty() || name.is_empty() {
                    return Err(InvalidActionPath(path.to_string()));
                }
                Ok(Self::new(qualifier, name))
            }
            None => {
                if path.is_empty() {
                    return Err(InvalidActionPath(path.to_string()));
                }
                Ok(Self::unqualified(path))
            }
        }
    }
}
