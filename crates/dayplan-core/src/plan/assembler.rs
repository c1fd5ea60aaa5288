//! Plan assembly: routine anchors around the work blocks, plus the summary.

use chrono::Utc;

use super::{block_id, DayPlan, PlanRules, TimeBlock};
use crate::task::Task;

const CLOSING_SENTENCE: &str =
    "Focus on completing your most important work during morning hours.";

/// Wrap `work_blocks` with the morning and evening anchors and renumber ids.
///
/// `tasks` is the full input list; the summary counts requested tasks, not
/// the ones that fit.
pub fn assemble(
    date: &str,
    tasks: &[Task],
    work_blocks: Vec<TimeBlock>,
    rules: &PlanRules,
) -> DayPlan {
    let mut blocks = Vec::with_capacity(work_blocks.len() + 2);
    blocks.push(rules.morning.to_block(block_id(0)));
    blocks.extend(work_blocks);
    blocks.push(rules.evening.to_block(String::new()));

    for (index, block) in blocks.iter_mut().enumerate() {
        block.id = block_id(index);
    }

    DayPlan {
        date: date.to_string(),
        blocks,
        summary: summarize(date, tasks, rules.default_task_minutes),
        created_at: Utc::now(),
    }
}

/// Build the one-paragraph plan summary.
///
/// Example: `Day plan for 2024-01-15: 3 tasks scheduled, 1 high priority
/// (~2.5h work). Focus on completing your most important work during
/// morning hours.`
pub fn summarize(date: &str, tasks: &[Task], default_minutes: u32) -> String {
    let count = tasks.len();
    let mut summary = format!(
        "Day plan for {date}: {count} task{} scheduled",
        if count == 1 { "" } else { "s" }
    );

    let high = tasks.iter().filter(|t| t.is_high_priority()).count();
    if high > 0 {
        summary.push_str(&format!(", {high} high priority"));
    }

    let total: u64 = tasks
        .iter()
        .map(|t| u64::from(t.duration_minutes(default_minutes)))
        .sum();
    summary.push_str(&format!(" (~{}h work). ", format_hours(total)));
    summary.push_str(CLOSING_SENTENCE);
    summary
}

/// Minutes as hours rounded half-up to one decimal, without a trailing `.0`.
fn format_hours(total_minutes: u64) -> String {
    let tenths = (total_minutes * 10 + 30) / 60;
    if tenths % 10 == 0 {
        format!("{}", tenths / 10)
    } else {
        format!("{}.{}", tenths / 10, tenths % 10)
    }
}
