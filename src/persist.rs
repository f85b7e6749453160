use std::error::Error;
use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::ScheduleError;
use crate::schedule::{Interaction, InteractionLedger, Matchup, Round, Schedule, Team};
use crate::stats::StatisticsRecord;

/// Writes a schedule as one CSV row per round: each matchup flattened to
/// four 1-based player numbers (p1,p2 vs p3,p4), byes trailing at the end of
/// the row.
pub fn write_schedule_csv(schedule: &Schedule, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    for round in &schedule.rounds {
        let mut row: Vec<String> = Vec::new();
        for matchup in &round.matchups {
            for p in [matchup.0 .0, matchup.0 .1, matchup.1 .0, matchup.1 .1] {
                row.push((p + 1).to_string());
            }
        }
        for &p in &round.byes {
            row.push((p + 1).to_string());
        }
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Loads a schedule previously written by [`write_schedule_csv`] (or an
/// externally produced file in the same layout), rebuilding teams, matchups,
/// byes, and the interaction ledger for evaluation.
pub fn read_schedule_csv(
    path: &Path,
    nplayers: usize,
    nrounds: usize,
) -> Result<Schedule, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut ledger = InteractionLedger::new();
    let mut rounds = Vec::new();
    for (rnd, result) in rdr.records().enumerate() {
        let record = result?;
        let mut fields: Vec<usize> = Vec::with_capacity(record.len());
        for field in record.iter() {
            let value: usize = field.trim().parse().map_err(|_| {
                ScheduleError::Persist(format!("round {}: non-numeric field {:?}", rnd + 1, field))
            })?;
            if value == 0 || value > nplayers {
                return Err(ScheduleError::Persist(format!(
                    "round {}: player {} out of range 1..={}",
                    rnd + 1,
                    value,
                    nplayers
                ))
                .into());
            }
            fields.push(value - 1);
        }
        if fields.len() != nplayers {
            return Err(ScheduleError::Persist(format!(
                "round {}: {} entries for {} players",
                rnd + 1,
                fields.len(),
                nplayers
            ))
            .into());
        }

        let mut teams = Vec::new();
        let mut matchups = Vec::new();
        let mut rest = fields.as_slice();
        while rest.len() >= 4 {
            let (p1, p2, p3, p4) = (rest[0], rest[1], rest[2], rest[3]);
            let team1 = Team::new(p1, p2);
            let team2 = Team::new(p3, p4);
            for &(a, b) in &[(p1, p2), (p3, p4)] {
                if a == b {
                    return Err(ScheduleError::Persist(format!(
                        "round {}: player {} partnered with itself",
                        rnd + 1,
                        a + 1
                    ))
                    .into());
                }
                if ledger.partner_count(a, b) > 0 {
                    return Err(ScheduleError::Persist(format!(
                        "round {}: players {} and {} partnered twice",
                        rnd + 1,
                        a + 1,
                        b + 1
                    ))
                    .into());
                }
                ledger.record(a, b, Interaction::Partner)?;
            }
            let matchup = Matchup(team1, team2);
            for (a, b) in matchup.cross_pairs() {
                ledger.record(a, b, Interaction::Opponent)?;
            }
            teams.push(team1);
            teams.push(team2);
            matchups.push(matchup);
            rest = &rest[4..];
        }
        let mut byes = rest.to_vec();
        byes.sort_unstable();

        let mut seen = vec![false; nplayers];
        for &p in fields.iter() {
            if seen[p] {
                return Err(ScheduleError::Persist(format!(
                    "round {}: player {} appears twice",
                    rnd + 1,
                    p + 1
                ))
                .into());
            }
            seen[p] = true;
        }

        rounds.push(Round {
            byes,
            teams,
            matchups,
        });
    }

    if rounds.len() != nrounds {
        return Err(ScheduleError::Persist(format!(
            "expected {} rounds, file has {}",
            nrounds,
            rounds.len()
        ))
        .into());
    }

    Ok(Schedule {
        nplayers,
        nrounds,
        rounds,
        ledger,
    })
}

/// Dumps an evaluation as pretty-printed JSON for later comparison between
/// candidate schedules.
pub fn write_stats_json(record: &StatisticsRecord, path: &Path) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, record)?;
    Ok(())
}
