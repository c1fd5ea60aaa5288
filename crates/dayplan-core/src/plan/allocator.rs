//! Time-block allocation.
//!
//! Walks priority-ordered tasks and lays them end to end from the workday
//! start. Two accumulators are threaded through the walk: the clock position
//! and the work minutes since the last break.

use super::clock::minutes_to_time;
use super::{block_id, BlockType, PlanRules, TimeBlock};
use crate::task::Task;

/// Break block title.
pub const BREAK_TITLE: &str = "Short Break";

/// Emit focus and break blocks for `tasks` in the given order.
///
/// Once the clock reaches the workday boundary the walk stops for good:
/// later tasks are never pulled forward, even if they would fit. The last
/// task that starts before the boundary is cut off at the boundary. Ids are
/// numbered from `block-0` here and renumbered by the assembler.
pub fn allocate(tasks: &[&Task], rules: &PlanRules) -> Vec<TimeBlock> {
    let mut blocks = Vec::new();
    let mut current = rules.workday_start;
    let mut work_since_break: u32 = 0;

    for (position, task) in tasks.iter().enumerate() {
        if current >= rules.workday_end {
            tracing::debug!(
                dropped = tasks.len() - position,
                "workday boundary reached, remaining tasks not scheduled"
            );
            break;
        }

        if work_since_break >= rules.break_after_minutes {
            let start = current;
            current = current.saturating_add(rules.break_minutes);
            blocks.push(TimeBlock {
                id: block_id(blocks.len()),
                start_time: minutes_to_time(start),
                end_time: minutes_to_time(current.min(rules.workday_end)),
                block_type: BlockType::Break,
                task_id: None,
                title: BREAK_TITLE.to_string(),
                description: None,
            });
            work_since_break = 0;
            tracing::debug!(at = %minutes_to_time(start), "break inserted");

            // A break cut short by the boundary leaves no room for focus.
            if current > rules.workday_end {
                tracing::debug!(
                    dropped = tasks.len() - position,
                    "workday boundary reached after break, remaining tasks not scheduled"
                );
                break;
            }
        }

        let duration = task.duration_minutes(rules.default_task_minutes);
        let start = current;
        current = current.saturating_add(duration);
        blocks.push(TimeBlock {
            id: block_id(blocks.len()),
            start_time: minutes_to_time(start),
            end_time: minutes_to_time(current.min(rules.workday_end)),
            block_type: BlockType::Focus,
            task_id: Some(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone(),
        });
        // Counted before clamping: a truncated task still counts in full.
        work_since_break = work_since_break.saturating_add(duration);
    }

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour_tasks(n: usize) -> Vec<Task> {
        (0..n)
            .map(|i| Task::new(format!("t{i}"), format!("Task {i}")).with_estimate(60))
            .collect()
    }

    fn run(tasks: &[Task]) -> Vec<TimeBlock> {
        let refs: Vec<&Task> = tasks.iter().collect();
        allocate(&refs, &PlanRules::default())
    }

    #[test]
    fn first_focus_block_starts_at_nine() {
        let blocks = run(&hour_tasks(1));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_time, "09:00");
        assert_eq!(blocks[0].end_time, "10:00");
        assert_eq!(blocks[0].task_id.as_deref(), Some("t0"));
    }

    #[test]
    fn break_follows_two_hours_of_work() {
        let blocks = run(&hour_tasks(3));
        let types: Vec<BlockType> = blocks.iter().map(|b| b.block_type).collect();
        assert_eq!(
            types,
            vec![BlockType::Focus, BlockType::Focus, BlockType::Break, BlockType::Focus]
        );
        let brk = &blocks[2];
        assert_eq!(brk.title, BREAK_TITLE);
        assert_eq!(brk.start_time, "11:00");
        assert_eq!(brk.end_time, "11:15");
        assert_eq!(blocks[3].start_time, "11:15");
    }

    #[test]
    fn no_break_after_the_last_task() {
        let blocks = run(&hour_tasks(2));
        assert!(blocks.iter().all(|b| b.block_type == BlockType::Focus));
    }

    #[test]
    fn missing_estimate_defaults_to_an_hour() {
        let tasks = vec![Task::new("a", "A")];
        let blocks = run(&tasks);
        assert_eq!(blocks[0].duration_minutes(), Some(60));
    }

    #[test]
    fn overrunning_task_is_truncated_at_boundary() {
        let tasks = vec![Task::new("long", "Long").with_estimate(600)];
        let blocks = run(&tasks);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_time, "09:00");
        assert_eq!(blocks[0].end_time, "18:00");
    }

    #[test]
    fn stops_hard_at_boundary_without_backfilling() {
        let tasks = vec![
            Task::new("big", "Big").with_estimate(540),
            Task::new("tiny", "Tiny").with_estimate(5),
        ];
        let blocks = run(&tasks);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].task_id.as_deref(), Some("big"));
    }

    #[test]
    fn break_threshold_accumulates_across_tasks() {
        let tasks = vec![
            Task::new("a", "A").with_estimate(100),
            Task::new("b", "B").with_estimate(10),
            Task::new("c", "C").with_estimate(10),
            Task::new("d", "D").with_estimate(10),
        ];
        let blocks = run(&tasks);
        let types: Vec<BlockType> = blocks.iter().map(|b| b.block_type).collect();
        assert_eq!(
            types,
            vec![
                BlockType::Focus,
                BlockType::Focus,
                BlockType::Focus,
                BlockType::Break,
                BlockType::Focus,
            ]
        );
        assert_eq!(blocks[3].start_time, "11:00");
    }

    #[test]
    fn break_ending_on_boundary_still_schedules_the_task() {
        let blocks = run(&hour_tasks(20));
        let n = blocks.len();
        let brk = &blocks[n - 2];
        assert_eq!(brk.block_type, BlockType::Break);
        assert_eq!((brk.start_time.as_str(), brk.end_time.as_str()), ("17:45", "18:00"));

        let last = &blocks[n - 1];
        assert_eq!(last.block_type, BlockType::Focus);
        assert_eq!(last.task_id.as_deref(), Some("t8"));
        assert_eq!((last.start_time.as_str(), last.end_time.as_str()), ("18:00", "18:00"));

        let focus = blocks.iter().filter(|b| b.block_type == BlockType::Focus).count();
        assert_eq!(focus, 9);
    }

    #[test]
    fn break_is_clamped_to_boundary() {
        let tasks = vec![
            Task::new("a", "A").with_estimate(535),
            Task::new("b", "B").with_estimate(30),
        ];
        let blocks = run(&tasks);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].block_type, BlockType::Break);
        assert_eq!(blocks[1].start_time, "17:55");
        assert_eq!(blocks[1].end_time, "18:00");
    }

    #[test]
    fn ids_follow_emission_order() {
        let blocks = run(&hour_tasks(3));
        let ids: Vec<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["block-0", "block-1", "block-2", "block-3"]);
    }
}
