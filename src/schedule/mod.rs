pub mod builder;
pub mod ledger;
pub mod round;
pub mod types;

pub use builder::{build_schedule, build_schedule_seeded, build_schedule_with_rng, pick_byes};
pub use ledger::{Interaction, InteractionLedger, PairCounts};
pub use round::build_round;
pub use types::{Matchup, Player, Round, RoundShape, Schedule, Team, TABLE_SIZE};
