use crate::schedule::Schedule;
use crate::stats::StatisticsRecord;

/// Formats a player for display. Stored identities are 0-based; people read
/// 1-based numbers.
pub fn format_player(player: usize) -> String {
    format!("{}", player + 1)
}

/// Prints byes, teams, and matchups round by round.
pub fn print_schedule(schedule: &Schedule) {
    for (rnd, round) in schedule.rounds.iter().enumerate() {
        println!("\nRound {}:", rnd + 1);
        if !round.byes.is_empty() {
            let byes: Vec<String> = round.byes.iter().map(|&p| format_player(p)).collect();
            println!("  Byes: {}", byes.join(", "));
        }
        println!("  Teams:");
        for (idx, team) in round.teams.iter().enumerate() {
            println!(
                "    {:2}: ({}, {})",
                idx + 1,
                format_player(team.0),
                format_player(team.1)
            );
        }
        println!("  Matchups:");
        for (idx, matchup) in round.matchups.iter().enumerate() {
            println!(
                "    {:2}: ({}, {}) vs. ({}, {})",
                idx + 1,
                format_player(matchup.0 .0),
                format_player(matchup.0 .1),
                format_player(matchup.1 .0),
                format_player(matchup.1 .1)
            );
        }
    }
}

/// Prints the evaluation table: one row per metric with aggregates across
/// players and, where a closed-form baseline exists, the optimum and the
/// mean divergence from it.
pub fn print_stats(record: &StatisticsRecord) {
    println!(
        "\n{:<38}\t{:>6}\t{:>6}\t{:>6}\t{:>6}\t{:>7}\t{:>7}",
        "Stat", "Min", "Max", "Mean", "Stddev", "Optimal", "Diverg"
    );
    println!(
        "{:<38}\t{:>6}\t{:>6}\t{:>6}\t{:>6}\t{:>7}\t{:>7}",
        "----", "---", "---", "----", "------", "-------", "------"
    );
    for summary in &record.summaries {
        let agg = summary.aggregate;
        let optimal = match summary.optimum {
            Some(v) => format!("{:.2}", v),
            None => "-".to_string(),
        };
        let diverg = match summary.divergence {
            Some(d) => format!("{:.2}", d.mean),
            None => "-".to_string(),
        };
        println!(
            "{:<38}\t{:>6.2}\t{:>6.2}\t{:>6.2}\t{:>6.2}\t{:>7}\t{:>7}",
            summary.metric.label(),
            agg.min,
            agg.max,
            agg.mean,
            agg.stddev,
            optimal,
            diverg
        );
    }
}
