//! Day plan commands for CLI.

use std::io::Read;

use chrono::Local;
use clap::{Args, Subcommand};
use dayplan_core::{Config, CoreError, DayPlan, GeneratePlanRequest, PlanRules, Task, ValidationError};

/// Where the rules come from.
#[derive(Args)]
pub struct RulesArgs {
    /// Ignore the config file and use built-in rules
    #[arg(long)]
    default_rules: bool,
}

impl RulesArgs {
    fn rules(&self) -> Result<PlanRules, Box<dyn std::error::Error>> {
        if self.default_rules {
            return Ok(PlanRules::default());
        }
        Ok(Config::load_or_default().plan_rules()?)
    }
}

#[derive(Subcommand)]
pub enum PlanAction {
    /// Generate a day plan from a JSON array of tasks
    Generate {
        /// Plan date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Task list file, "-" for stdin
        #[arg(long, default_value = "-")]
        tasks: String,
        /// Print JSON on one line
        #[arg(long)]
        compact: bool,
        #[command(flatten)]
        rules: RulesArgs,
    },
    /// Generate a day plan from a full {"date", "tasks"} request body
    Request {
        /// Request file, "-" for stdin
        #[arg(default_value = "-")]
        input: String,
        /// Print JSON on one line
        #[arg(long)]
        compact: bool,
        #[command(flatten)]
        rules: RulesArgs,
    },
    /// List ids of tasks that do not fit in the day
    Unscheduled {
        /// Plan date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Task list file, "-" for stdin
        #[arg(long, default_value = "-")]
        tasks: String,
        #[command(flatten)]
        rules: RulesArgs,
    },
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Generate {
            date,
            tasks,
            compact,
            rules,
        } => {
            let request = GeneratePlanRequest::new(resolve_date(date), read_tasks(&tasks)?);
            let plan = generate(request, &rules.rules()?)?;
            print_plan(&plan, compact)?;
        }
        PlanAction::Request {
            input,
            compact,
            rules,
        } => {
            let request: GeneratePlanRequest = serde_json::from_str(&read_input(&input)?)?;
            let plan = generate(request, &rules.rules()?)?;
            print_plan(&plan, compact)?;
        }
        PlanAction::Unscheduled { date, tasks, rules } => {
            let request = GeneratePlanRequest::new(resolve_date(date), read_tasks(&tasks)?);
            let tasks = request.tasks.clone();
            let plan = generate(request, &rules.rules()?)?;
            for id in plan.unscheduled_task_ids(&tasks) {
                println!("{id}");
            }
        }
    }
    Ok(())
}

fn generate(request: GeneratePlanRequest, rules: &PlanRules) -> Result<DayPlan, CoreError> {
    request
        .into_plan(rules)
        .map_err(|report| CoreError::Validation(ValidationError::from(report)))
}

fn resolve_date(date: Option<String>) -> String {
    date.unwrap_or_else(|| Local::now().format("%Y-%m-%d").to_string())
}

fn read_input(source: &str) -> std::io::Result<String> {
    tracing::debug!(source, "reading plan input");
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source)
    }
}

fn read_tasks(source: &str) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
    let content = read_input(source)?;
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(&content)?)
}

fn print_plan(plan: &DayPlan, compact: bool) -> Result<(), serde_json::Error> {
    let json = if compact {
        serde_json::to_string(plan)?
    } else {
        serde_json::to_string_pretty(plan)?
    };
    println!("{json}");
    Ok(())
}
