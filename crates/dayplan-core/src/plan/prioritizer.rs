//! Priority ordering of input tasks.

use crate::task::Task;

/// Order tasks high, then medium, then low, keeping input order within a class.
///
/// Tasks without a priority rank with medium. Nothing is dropped or copied;
/// the result borrows from `tasks`.
pub fn prioritize(tasks: &[Task]) -> Vec<&Task> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    // sort_by_key is stable
    ordered.sort_by_key(|t| t.rank());
    ordered
}
