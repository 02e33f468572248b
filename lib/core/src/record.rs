// Topology records handed to the graph one at a time by a loader
use serde::{Deserialize, Serialize};

/// A node as described by topology data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub key: String,
    /// Capacity as text. Anything that does not parse as an integer is
    /// treated as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
}

impl NodeRecord {
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            budget: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = Some(budget.into());
        self
    }

    /// The budget if present and a valid integer
    pub fn parsed_budget(&self) -> Option<i64> {
        self.budget.as_deref().and_then(|b| b.trim().parse::<i64>().ok())
    }
}

/// A directed edge as described by topology data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub name: String,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<Vec<f64>>,
}

impl EdgeRecord {
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
            distance: None,
            pdf: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_pdf(mut self, pdf: Vec<f64>) -> Self {
        self.pdf = Some(pdf);
        self
    }
}
