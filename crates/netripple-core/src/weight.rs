//! Weight values carried by nodes and edges

use serde::{Deserialize, Serialize};

/// A single metric or an ordered list of metrics named by position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Weight {
    Single(f64),
    Multi(Vec<f64>),
}

impl Default for Weight {
    fn default() -> Self {
        Self::Single(0.0)
    }
}

impl Weight {
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    /// View the weight as a list of metrics
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multi(vs) => vs,
        }
    }

    /// Number of metrics carried
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<f64> for Weight {
    fn from(v: f64) -> Self {
        Self::Single(v)
    }
}

impl From<Vec<f64>> for Weight {
    fn from(vs: Vec<f64>) -> Self {
        Self::Multi(vs)
    }
}

impl From<&[f64]> for Weight {
    fn from(vs: &[f64]) -> Self {
        Self::Multi(vs.to_vec())
    }
}
