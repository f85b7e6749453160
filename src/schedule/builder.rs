use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ScheduleError;
use super::ledger::InteractionLedger;
use super::round::build_round;
use super::types::{Player, RoundShape, Schedule, TABLE_SIZE};

/// Byes for one round, assigned sequentially wrapping around the player
/// list. Sequential assignment guarantees an even spread: nobody sits out
/// twice before everyone has sat out once.
pub fn pick_byes(nplayers: usize, nbyes: usize, rnd: usize) -> Vec<Player> {
    let start = rnd * nbyes;
    let mut byes: Vec<Player> = (start..start + nbyes).map(|x| x % nplayers).collect();
    byes.sort_unstable();
    byes
}

fn validate(nplayers: usize, nrounds: usize) -> Result<(), ScheduleError> {
    if nplayers < TABLE_SIZE {
        return Err(ScheduleError::Configuration(format!(
            "need at least {} players, got {}",
            TABLE_SIZE, nplayers
        )));
    }
    if nrounds == 0 {
        return Err(ScheduleError::Configuration(
            "need at least one round".to_string(),
        ));
    }
    // A seated player needs a fresh partner every round, so the pool of
    // other players must cover the round count.
    if nrounds >= nplayers {
        return Err(ScheduleError::Configuration(format!(
            "{} rounds cannot be played with only {} players without repeating a partner",
            nrounds, nplayers
        )));
    }
    Ok(())
}

/// Builds one candidate schedule with the given randomness source. One fresh
/// ledger is threaded through all rounds; a round that exhausts its retry
/// bound fails the whole candidate (callers restart from scratch, so no
/// history from a failed attempt leaks into the next one).
pub fn build_schedule_with_rng(
    nplayers: usize,
    nrounds: usize,
    rng: &mut impl Rng,
) -> Result<Schedule, ScheduleError> {
    validate(nplayers, nrounds)?;
    let shape = RoundShape::for_players(nplayers);
    let mut ledger = InteractionLedger::new();
    let mut rounds = Vec::with_capacity(nrounds);
    for rnd in 0..nrounds {
        let byes = pick_byes(nplayers, shape.nbyes, rnd);
        let round = build_round(rnd, nplayers, &byes, &mut ledger, rng).map_err(|e| match e {
            ScheduleError::RoundConstruction { round, retries } => {
                ScheduleError::ScheduleConstruction { round, retries }
            }
            other => other,
        })?;
        rounds.push(round);
    }
    Ok(Schedule {
        nplayers,
        nrounds,
        rounds,
        ledger,
    })
}

/// Builds one candidate schedule using thread-local randomness.
pub fn build_schedule(nplayers: usize, nrounds: usize) -> Result<Schedule, ScheduleError> {
    build_schedule_with_rng(nplayers, nrounds, &mut rand::thread_rng())
}

/// Builds one candidate schedule from a fixed seed. The same seed always
/// produces the same schedule.
pub fn build_schedule_seeded(
    nplayers: usize,
    nrounds: usize,
    seed: u64,
) -> Result<Schedule, ScheduleError> {
    build_schedule_with_rng(nplayers, nrounds, &mut StdRng::seed_from_u64(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a schedule from the first of a handful of seeds that yields a
    /// conforming candidate (individual seeds may legitimately dead-end).
    fn build_some(nplayers: usize, nrounds: usize) -> Schedule {
        for seed in 0..50 {
            if let Ok(schedule) = build_schedule_seeded(nplayers, nrounds, seed) {
                return schedule;
            }
        }
        panic!("no seed in 0..50 built a {}x{} schedule", nplayers, nrounds);
    }

    #[test]
    fn sequential_byes_wrap_around_the_player_list() {
        assert_eq!(pick_byes(5, 1, 0), vec![0]);
        assert_eq!(pick_byes(5, 1, 1), vec![1]);
        assert_eq!(pick_byes(5, 1, 4), vec![4]);
        assert_eq!(pick_byes(5, 1, 5), vec![0]);
        assert_eq!(pick_byes(7, 3, 2), vec![0, 1, 6]);
    }

    #[test]
    fn schedule_has_the_requested_number_of_rounds() {
        let schedule = build_some(8, 3);
        assert_eq!(schedule.nplayers, 8);
        assert_eq!(schedule.rounds.len(), 3);
        for round in &schedule.rounds {
            assert!(round.byes.is_empty());
            assert_eq!(round.teams.len(), 4);
            assert_eq!(round.matchups.len(), 2);
        }
    }

    #[test]
    fn no_pair_ever_partners_twice() {
        let schedule = build_some(9, 5);
        for ((a, b), counts) in schedule.ledger.pairs() {
            assert!(
                counts.partner <= 1,
                "players {} and {} partnered {} times",
                a,
                b,
                counts.partner
            );
        }
    }

    #[test]
    fn bye_tally_is_fair() {
        // 5 players, 1 bye per round: after 2 rounds exactly two players
        // have sat out once and three not at all.
        let schedule = build_some(5, 2);
        let tally = schedule.bye_tally();
        assert_eq!(tally.iter().filter(|&&t| t == 1).count(), 2);
        assert_eq!(tally.iter().filter(|&&t| t == 0).count(), 3);

        // Once total byes reach the player count, the spread stays <= 1.
        let schedule = build_some(6, 5);
        let tally = schedule.bye_tally();
        let max = tally.iter().max().unwrap();
        let min = tally.iter().min().unwrap();
        assert!(max - min <= 1, "bye tally {:?} is uneven", tally);
    }

    #[test]
    fn same_seed_builds_the_same_schedule() {
        for seed in 0..10 {
            let a = build_schedule_seeded(8, 3, seed);
            let b = build_schedule_seeded(8, 3, seed);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn distinct_partners_bounded_by_played_rounds() {
        let schedule = build_some(9, 4);
        let tally = schedule.bye_tally();
        for p in 0..schedule.nplayers {
            let partners = (0..schedule.nplayers)
                .filter(|&q| q != p && schedule.ledger.partner_count(p, q) > 0)
                .count();
            let played = schedule.nrounds - tally[p] as usize;
            assert!(partners <= played);
        }
    }

    #[test]
    fn too_few_players_is_a_configuration_error() {
        let err = build_schedule_seeded(3, 1, 0).unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)));
    }

    #[test]
    fn zero_rounds_is_a_configuration_error() {
        let err = build_schedule_seeded(8, 0, 0).unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)));
    }

    #[test]
    fn more_rounds_than_partners_is_a_configuration_error() {
        let err = build_schedule_seeded(8, 8, 0).unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)));
    }

    #[test]
    fn candidate_failures_surface_as_schedule_construction() {
        // 6 players x 5 rounds is tight (each player has exactly 5 possible
        // partners), so some seeds dead-end. Whatever happens, the builder
        // must hand back either a conforming schedule or a whole-candidate
        // failure, never a bare round failure.
        for seed in 0..100u64 {
            match build_schedule_seeded(6, 5, seed) {
                Ok(schedule) => {
                    for (_, counts) in schedule.ledger.pairs() {
                        assert!(counts.partner <= 1);
                    }
                }
                Err(e) => assert!(matches!(e, ScheduleError::ScheduleConstruction { .. })),
            }
        }
    }
}
