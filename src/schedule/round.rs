use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ScheduleError;
use super::ledger::{Interaction, InteractionLedger};
use super::types::{Matchup, Player, Round, RoundShape, Team, TABLE_SIZE};

/// How many times team formation may restart from a fresh shuffle before the
/// round is declared unbuildable.
pub const MAX_ROUND_RETRIES: u32 = 100;

/// Builds one round for the given bye set: teams first, then matchups, then
/// records everything into the ledger.
///
/// Team formation never pairs previous partners (hard rule); matchup
/// formation prefers tables with no previously-seen opposing pair, falling
/// back to the fewest such pairs. Dead ends in team formation restart from a
/// fresh shuffle, up to `MAX_ROUND_RETRIES`.
pub fn build_round(
    rnd: usize,
    nplayers: usize,
    byes: &[Player],
    ledger: &mut InteractionLedger,
    rng: &mut impl Rng,
) -> Result<Round, ScheduleError> {
    let shape = RoundShape::for_players(nplayers);
    if byes.len() != shape.nbyes {
        return Err(ScheduleError::Configuration(format!(
            "round {} has {} byes, expected {} for {} players",
            rnd,
            byes.len(),
            shape.nbyes,
            nplayers
        )));
    }
    let nseats = nplayers - byes.len();
    if nseats % TABLE_SIZE != 0 {
        return Err(ScheduleError::Infeasible(format!(
            "{} seated players cannot fill tables of {}",
            nseats, TABLE_SIZE
        )));
    }

    let active: Vec<Player> = (0..nplayers).filter(|p| !byes.contains(p)).collect();
    let teams = pick_teams(rnd, &active, ledger, rng)?;
    let matchups = pick_matchups(&teams, ledger, rng)?;

    for team in &teams {
        ledger.record(team.0, team.1, Interaction::Partner)?;
    }
    for matchup in &matchups {
        for (a, b) in matchup.cross_pairs() {
            ledger.record(a, b, Interaction::Opponent)?;
        }
    }

    let mut byes = byes.to_vec();
    byes.sort_unstable();
    Ok(Round {
        byes,
        teams,
        matchups,
    })
}

/// Randomized greedy team formation: pop a player from a shuffled pool and
/// partner it with a uniformly random never-partnered pool member. A pool
/// with no eligible partner abandons the partial round and reshuffles.
fn pick_teams(
    rnd: usize,
    active: &[Player],
    ledger: &InteractionLedger,
    rng: &mut impl Rng,
) -> Result<Vec<Team>, ScheduleError> {
    let mut retries = 0;
    loop {
        let mut pool = active.to_vec();
        pool.shuffle(rng);
        let mut teams = Vec::with_capacity(pool.len() / 2);
        let mut dead_end = false;
        while let Some(player) = pool.pop() {
            let candidates: Vec<usize> = (0..pool.len())
                .filter(|&i| ledger.partner_count(player, pool[i]) == 0)
                .collect();
            match candidates.as_slice().choose(rng) {
                Some(&i) => {
                    let partner = pool.swap_remove(i);
                    teams.push(Team::new(player, partner));
                }
                None => {
                    dead_end = true;
                    break;
                }
            }
        }
        if !dead_end {
            return Ok(teams);
        }
        retries += 1;
        if retries >= MAX_ROUND_RETRIES {
            return Err(ScheduleError::RoundConstruction {
                round: rnd,
                retries,
            });
        }
    }
}

/// Greedy matchup formation over a shuffled team list: each unpaired team
/// takes the opposing team with the fewest already-seen cross pairs, ties
/// broken at random. Local minimization only; no backtracking across tables.
fn pick_matchups(
    teams: &[Team],
    ledger: &InteractionLedger,
    rng: &mut impl Rng,
) -> Result<Vec<Matchup>, ScheduleError> {
    let mut remaining = teams.to_vec();
    remaining.shuffle(rng);
    let mut matchups = Vec::with_capacity(remaining.len() / 2);
    while let Some(team) = remaining.pop() {
        let mut best_repeats = usize::MAX;
        let mut best: Vec<usize> = Vec::new();
        for (i, opp) in remaining.iter().enumerate() {
            let repeats = repeat_cross_pairs(ledger, team, *opp);
            if repeats < best_repeats {
                best_repeats = repeats;
                best.clear();
                best.push(i);
            } else if repeats == best_repeats {
                best.push(i);
            }
        }
        match best.as_slice().choose(rng) {
            Some(&i) => {
                let opp = remaining.swap_remove(i);
                matchups.push(Matchup(team, opp));
            }
            None => {
                return Err(ScheduleError::InvariantViolation(
                    "odd number of teams left while pairing matchups".to_string(),
                ));
            }
        }
    }
    Ok(matchups)
}

/// Number of cross-team pairs that have already opposed each other.
fn repeat_cross_pairs(ledger: &InteractionLedger, a: Team, b: Team) -> usize {
    Matchup(a, b)
        .cross_pairs()
        .iter()
        .filter(|&&(x, y)| ledger.opponent_count(x, y) > 0)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_round_shape(round: &Round, nplayers: usize) {
        let shape = RoundShape::for_players(nplayers);
        assert_eq!(round.byes.len(), shape.nbyes);
        assert_eq!(round.teams.len(), shape.nteams);
        assert_eq!(round.matchups.len(), shape.nmatchups);

        // Every player appears exactly once across teams and byes.
        let mut seen = vec![0u32; nplayers];
        for &p in &round.byes {
            seen[p] += 1;
        }
        for team in &round.teams {
            assert_ne!(team.0, team.1);
            seen[team.0] += 1;
            seen[team.1] += 1;
        }
        assert!(seen.iter().all(|&c| c == 1));

        // Every team sits at exactly one table.
        let mut team_uses = vec![0u32; round.teams.len()];
        for matchup in &round.matchups {
            assert_ne!(matchup.0, matchup.1);
            for team in [matchup.0, matchup.1] {
                let idx = round.teams.iter().position(|&t| t == team).unwrap();
                team_uses[idx] += 1;
            }
        }
        assert!(team_uses.iter().all(|&c| c == 1));
    }

    #[test]
    fn eight_players_fill_two_tables_with_no_byes() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut ledger = InteractionLedger::new();
        let round = build_round(0, 8, &[], &mut ledger, &mut rng).unwrap();
        assert_round_shape(&round, 8);
    }

    #[test]
    fn five_players_leave_one_bye() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut ledger = InteractionLedger::new();
        let round = build_round(0, 5, &[2], &mut ledger, &mut rng).unwrap();
        assert_round_shape(&round, 5);
        assert_eq!(round.byes, vec![2]);
    }

    #[test]
    fn round_records_interactions_into_the_ledger() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ledger = InteractionLedger::new();
        let round = build_round(0, 8, &[], &mut ledger, &mut rng).unwrap();
        for team in &round.teams {
            assert_eq!(ledger.partner_count(team.0, team.1), 1);
        }
        for matchup in &round.matchups {
            for (a, b) in matchup.cross_pairs() {
                assert_eq!(ledger.opponent_count(a, b), 1);
            }
        }
    }

    #[test]
    fn teams_never_repeat_a_partnership() {
        let mut rng = StdRng::seed_from_u64(19);
        let mut ledger = InteractionLedger::new();
        // Seed a partnership and check it is never picked again.
        ledger.record(0, 1, Interaction::Partner).unwrap();
        for rnd in 0..3 {
            let round = build_round(rnd, 8, &[], &mut ledger, &mut rng);
            if let Ok(round) = round {
                assert!(!round.teams.contains(&Team::new(0, 1)));
            }
        }
    }

    #[test]
    fn wrong_bye_count_is_a_configuration_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ledger = InteractionLedger::new();
        let err = build_round(0, 8, &[0], &mut ledger, &mut rng).unwrap_err();
        assert!(matches!(err, ScheduleError::Configuration(_)));
    }

    #[test]
    fn exhausted_partner_pool_fails_after_bounded_retries() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ledger = InteractionLedger::new();
        // All pairs among four players have partnered; no round is possible.
        for a in 0..4usize {
            for b in (a + 1)..4 {
                ledger.record(a, b, Interaction::Partner).unwrap();
            }
        }
        let err = build_round(2, 4, &[], &mut ledger, &mut rng).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::RoundConstruction {
                round: 2,
                retries: MAX_ROUND_RETRIES
            }
        );
    }

    #[test]
    fn matchups_avoid_seen_opponents_when_alternatives_exist() {
        let mut ledger = InteractionLedger::new();
        // Tables (0,1) vs (2,3) and (4,5) vs (6,7) have already been played.
        // Whichever team the greedy step pops first, a zero-repeat opponent
        // is available and the leftover pair is also zero-repeat, so no seen
        // table may ever be rebuilt.
        for &a in &[0usize, 1] {
            for &b in &[2usize, 3] {
                ledger.record(a, b, Interaction::Opponent).unwrap();
            }
        }
        for &a in &[4usize, 5] {
            for &b in &[6usize, 7] {
                ledger.record(a, b, Interaction::Opponent).unwrap();
            }
        }
        let teams = vec![
            Team::new(0, 1),
            Team::new(2, 3),
            Team::new(4, 5),
            Team::new(6, 7),
        ];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let matchups = pick_matchups(&teams, &ledger, &mut rng).unwrap();
            assert_eq!(matchups.len(), 2);
            for matchup in &matchups {
                let table = [matchup.0, matchup.1];
                assert!(!(table.contains(&Team::new(0, 1)) && table.contains(&Team::new(2, 3))));
                assert!(!(table.contains(&Team::new(4, 5)) && table.contains(&Team::new(6, 7))));
            }
        }
    }
}
