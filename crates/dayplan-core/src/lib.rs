//! # Dayplan Core Library
//!
//! This library turns a list of tasks into a single day's itinerary. It
//! follows a CLI-first philosophy: every operation is available through the
//! standalone `dayplan-cli` binary, and any HTTP front end is a thin caller
//! over the same functions.
//!
//! ## Architecture
//!
//! - **Plan Engine**: a pure, deterministic pass that prioritizes tasks,
//!   lays them out as focus blocks with rest breaks up to the workday
//!   boundary, and wraps them with fixed routine anchors
//! - **Request Validation**: field-level checks on a `{date, tasks}` body
//!   before it reaches the engine
//! - **Storage**: TOML-based planner configuration
//!
//! ## Key Components
//!
//! - [`generate_day_plan`]: the engine entry point
//! - [`DayPlan`] / [`TimeBlock`]: the generated timeline
//! - [`GeneratePlanRequest`]: validated request wrapper
//! - [`Config`]: planner configuration management

pub mod error;
pub mod plan;
pub mod request;
pub mod storage;
pub mod task;

pub use error::{ConfigError, CoreError, FieldError, ValidationError, ValidationReport};
pub use plan::{
    generate_day_plan, generate_day_plan_with, BlockType, DayPlan, PlanRules, RoutineAnchor,
    TimeBlock,
};
pub use request::GeneratePlanRequest;
pub use storage::Config;
pub use task::{Priority, Task};
