//! Day plan scheduling engine.
//!
//! Turns an unordered task list into one day's timeline in a single
//! deterministic pass:
//! - [`prioritizer`] orders tasks by priority class (stable)
//! - [`allocator`] lays focus blocks from the workday start, inserting short
//!   breaks and stopping at the workday boundary
//! - [`assembler`] wraps the result with the routine anchors and writes the
//!   summary
//!
//! All state lives in call-local variables, so [`generate_day_plan`] is safe
//! to call concurrently without locks.

pub mod allocator;
pub mod assembler;
pub mod clock;
pub mod prioritizer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::task::Task;

pub use allocator::allocate;
pub use assembler::{assemble, summarize};
pub use clock::{minutes_to_time, parse_clock};
pub use prioritizer::prioritize;

/// Semantic type of a time block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Fixed daily anchor
    Routine,
    /// Work on one task
    Focus,
    /// Rest between focus stretches
    Break,
    Meeting,
    Buffer,
}

/// A contiguous interval on the day's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    /// `block-<n>`, assigned in emission order.
    pub id: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    /// Set only on focus blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TimeBlock {
    /// Start as minutes since midnight.
    pub fn start_minutes(&self) -> Option<u32> {
        parse_clock(&self.start_time)
    }

    /// End as minutes since midnight.
    pub fn end_minutes(&self) -> Option<u32> {
        parse_clock(&self.end_time)
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        Some(self.end_minutes()?.saturating_sub(self.start_minutes()?))
    }
}

/// Format a block id from its position in the plan.
pub fn block_id(index: usize) -> String {
    format!("block-{index}")
}

/// A fixed, always-present block such as the morning routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineAnchor {
    pub title: String,
    /// Minutes since midnight.
    pub start: u32,
    /// Minutes since midnight.
    pub end: u32,
}

impl RoutineAnchor {
    pub fn new(title: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            title: title.into(),
            start,
            end,
        }
    }

    pub fn morning_routine() -> Self {
        Self::new("Morning Routine", 8 * 60, 9 * 60)
    }

    pub fn evening_review() -> Self {
        Self::new("Evening Review", 20 * 60, 20 * 60 + 30)
    }

    /// Render as a routine block with the given id.
    pub fn to_block(&self, id: String) -> TimeBlock {
        TimeBlock {
            id,
            start_time: minutes_to_time(self.start),
            end_time: minutes_to_time(self.end),
            block_type: BlockType::Routine,
            task_id: None,
            title: self.title.clone(),
            description: None,
        }
    }
}

/// Constants that drive one planning pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRules {
    /// First focus block starts here (minutes since midnight).
    pub workday_start: u32,
    /// No focus or break block ends after this.
    pub workday_end: u32,
    /// Work minutes that trigger a break before the next task.
    pub break_after_minutes: u32,
    pub break_minutes: u32,
    /// Duration for tasks without an estimate.
    pub default_task_minutes: u32,
    pub morning: RoutineAnchor,
    pub evening: RoutineAnchor,
}

impl Default for PlanRules {
    fn default() -> Self {
        Self {
            workday_start: 9 * 60,
            workday_end: 18 * 60,
            break_after_minutes: 120,
            break_minutes: 15,
            default_task_minutes: 60,
            morning: RoutineAnchor::morning_routine(),
            evening: RoutineAnchor::evening_review(),
        }
    }
}

/// One day's generated timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// `YYYY-MM-DD`, passed through from the request.
    pub date: String,
    pub blocks: Vec<TimeBlock>,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl DayPlan {
    pub fn focus_blocks(&self) -> impl Iterator<Item = &TimeBlock> {
        self.blocks
            .iter()
            .filter(|b| b.block_type == BlockType::Focus)
    }

    pub fn scheduled_task_ids(&self) -> HashSet<&str> {
        self.focus_blocks()
            .filter_map(|b| b.task_id.as_deref())
            .collect()
    }

    /// Ids of input tasks that did not fit before the workday boundary,
    /// in input order.
    pub fn unscheduled_task_ids<'a>(&self, tasks: &'a [Task]) -> Vec<&'a str> {
        let scheduled = self.scheduled_task_ids();
        tasks
            .iter()
            .map(|t| t.id.as_str())
            .filter(|id| !scheduled.contains(id))
            .collect()
    }
}

/// Generate a day plan with the default rules.
pub fn generate_day_plan(date: &str, tasks: &[Task]) -> DayPlan {
    generate_day_plan_with(&PlanRules::default(), date, tasks)
}

/// Generate a day plan with explicit rules.
pub fn generate_day_plan_with(rules: &PlanRules, date: &str, tasks: &[Task]) -> DayPlan {
    let ordered = prioritize(tasks);
    let work_blocks = allocate(&ordered, rules);
    let plan = assemble(date, tasks, work_blocks, rules);

    tracing::debug!(
        date,
        requested = tasks.len(),
        scheduled = plan.focus_blocks().count(),
        blocks = plan.blocks.len(),
        "day plan generated"
    );
    plan
}
