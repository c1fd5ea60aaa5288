//! Task input types.
//!
//! Tasks arrive already validated and are never mutated by the engine.

use serde::{Deserialize, Serialize};

/// Priority class of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: high=0, medium=1, low=2.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

/// Rank of an optional priority. Missing ranks with medium.
pub fn priority_rank(priority: Option<Priority>) -> u8 {
    priority.unwrap_or(Priority::Medium).rank()
}

/// A unit of work to place on the day's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Estimated effort in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            priority: None,
            estimated_minutes: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_estimate(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Estimated minutes, falling back to `default` when absent.
    pub fn duration_minutes(&self, default: u32) -> u32 {
        self.estimated_minutes.unwrap_or(default)
    }

    pub fn rank(&self) -> u8 {
        priority_rank(self.priority)
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == Some(Priority::High)
    }
}
