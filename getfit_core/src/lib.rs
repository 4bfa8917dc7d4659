#![forbid(unsafe_code)]

//! Core domain model and business logic for the GetFit tracker.
//!
//! This crate provides:
//! - Domain types (profiles, exercises, menus, goal ranges)
//! - Calorie goal calculation
//! - Daily stats with lazy day rollover, points and check-ins
//! - Workout matching
//! - Persistence (per-user JSON documents, CSV exercise catalog)
//! - Session context and the user-facing tracker flows

pub mod types;
pub mod error;
pub mod clock;
pub mod config;
pub mod logging;
pub mod goal;
pub mod state;
pub mod stats;
pub mod matcher;
pub mod catalog;
pub mod menu;
pub mod profile;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, RewardsConfig};
pub use goal::{activity_factor, activity_factor_for_label, compute_goal_range};
pub use state::{JsonStatsStore, MemoryStatsStore, StatsStore};
pub use stats::{CheckIn, DailyStats, DailyStatsRecord};
pub use matcher::filter_workouts;
pub use catalog::{default_exercises, CsvExerciseCatalog, ExerciseCatalog};
pub use menu::{JsonMenuSource, MenuSource};
pub use profile::{JsonProfileStore, ProfileStore, Session};
pub use tracker::{DailySummary, DiningVisit, NewWorkout, Tracker};
