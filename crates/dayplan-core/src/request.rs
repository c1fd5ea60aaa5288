//! Plan request validation.
//!
//! The engine trusts its input; this is the layer in front of it that
//! checks a `{date, tasks}` body and reports every offending field at once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ValidationReport;
use crate::plan::{generate_day_plan_with, DayPlan, PlanRules};
use crate::task::Task;

/// Body of a plan generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratePlanRequest {
    pub date: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl GeneratePlanRequest {
    pub fn new(date: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            date: date.into(),
            tasks,
        }
    }

    /// Check the request, collecting every field error.
    pub fn validate(&self) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::default();

        if !is_iso_date(&self.date) {
            report.push("date", "must be a calendar date in YYYY-MM-DD format");
        }

        let mut seen = HashSet::new();
        for (i, task) in self.tasks.iter().enumerate() {
            if task.id.trim().is_empty() {
                report.push(format!("tasks[{i}].id"), "must not be empty");
            } else if !seen.insert(task.id.as_str()) {
                report.push(format!("tasks[{i}].id"), format!("duplicate id '{}'", task.id));
            }
            if task.title.trim().is_empty() {
                report.push(format!("tasks[{i}].title"), "must not be empty");
            }
        }

        if report.is_empty() {
            Ok(())
        } else {
            tracing::debug!(errors = report.len(), "plan request rejected");
            Err(report)
        }
    }

    /// Validate, then generate the plan.
    pub fn into_plan(self, rules: &PlanRules) -> Result<DayPlan, ValidationReport> {
        self.validate()?;
        Ok(generate_day_plan_with(rules, &self.date, &self.tasks))
    }
}

/// Strict `YYYY-MM-DD` that also names a real day.
fn is_iso_date(value: &str) -> bool {
    let shape_ok = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    shape_ok && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
