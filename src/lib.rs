//! Seeding-round generator for tournaments of two-player teams competing
//! head-to-head at four-player tables. Players switch partners every round
//! under a hard no-repeat-partner rule and a soft no-repeat-opponent
//! preference; byes rotate fairly when the player count is not a multiple of
//! four. Candidate schedules are generated by constrained random assignment,
//! scored on interaction diversity, and the best of many draws wins.

pub mod display;
pub mod error;
pub mod persist;
pub mod schedule;
pub mod search;
pub mod stats;

pub use error::ScheduleError;
pub use schedule::{build_schedule, build_schedule_seeded, Schedule};
pub use search::{search_best, search_best_with, default_scorer, ScoreKey};
pub use stats::{evaluate, Metric, StatisticsRecord};
