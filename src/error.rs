use std::error::Error;
use std::fmt;

/// Errors arising while constructing, searching for, or loading a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The (nplayers, nrounds) combination is structurally invalid. Fatal,
    /// never retried.
    Configuration(String),
    /// No valid team partition exists for the given bye remainder. Fatal,
    /// detected before any construction is attempted.
    Infeasible(String),
    /// The randomized greedy assignment dead-ended and exhausted its retry
    /// bound for one round.
    RoundConstruction { round: usize, retries: u32 },
    /// A whole candidate schedule failed because one of its rounds could not
    /// be built. Recoverable by discarding the candidate and starting fresh.
    ScheduleConstruction { round: usize, retries: u32 },
    /// An attempt to record a second partnership for an already-partnered
    /// pair. Indicates a logic defect; never retried.
    InvariantViolation(String),
    /// The search spent its whole attempt budget without producing a single
    /// conforming schedule.
    SearchExhausted { attempts: u32 },
    /// A persisted schedule file could not be parsed.
    Persist(String),
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::Configuration(msg) => write!(f, "invalid configuration: {}", msg),
            ScheduleError::Infeasible(msg) => write!(f, "infeasible configuration: {}", msg),
            ScheduleError::RoundConstruction { round, retries } => {
                write!(f, "unable to build round {} after {} retries", round, retries)
            }
            ScheduleError::ScheduleConstruction { round, retries } => {
                write!(
                    f,
                    "schedule construction failed at round {} after {} retries",
                    round, retries
                )
            }
            ScheduleError::InvariantViolation(msg) => write!(f, "invariant violation: {}", msg),
            ScheduleError::SearchExhausted { attempts } => {
                write!(f, "no conforming schedule found in {} attempts", attempts)
            }
            ScheduleError::Persist(msg) => write!(f, "malformed schedule file: {}", msg),
        }
    }
}

impl Error for ScheduleError {}
