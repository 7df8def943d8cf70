//! Strongly-typed identifiers for stockbook

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a registered product.
///
/// Ids are compared by their canonical string form: surrounding whitespace
/// is trimmed on construction, and numeric ids convert through their decimal
/// representation, so `ProductId::from(1u64) == ProductId::new("1")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(normalize(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_string()
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<u64> for ProductId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl From<i64> for ProductId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}
