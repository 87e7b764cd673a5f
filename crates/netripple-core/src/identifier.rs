//! Identifiers for nodes and edges

use serde::{Deserialize, Serialize};

/// Caller-facing identifier of a node or edge
///
/// Node ids and edge ids are independent namespaces: a node and an edge may
/// share the same identifier. Numeric identifiers hash and compare cheaper
/// than strings and should be preferred for large networks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Num(i64),
    Str(String),
}

impl Identifier {
    pub fn as_num(&self) -> Option<i64> {
        match self {
            Self::Num(n) => Some(*n),
            Self::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Num(_) => None,
            Self::Str(s) => Some(s),
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{}", n),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Self::Num(n)
    }
}

impl From<i32> for Identifier {
    fn from(n: i32) -> Self {
        Self::Num(n as i64)
    }
}

impl From<u32> for Identifier {
    fn from(n: u32) -> Self {
        Self::Num(n as i64)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&String> for Identifier {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}
