//! Validation errors collected by validator chains.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One validation problem found on a record.
///
/// Totally ordered so validator chains can collect results into a
/// `BTreeSet`: set semantics with deterministic iteration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
