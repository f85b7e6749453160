use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::schedule::{Player, Schedule};

/// Per-player metrics evaluated over a completed schedule. Declaration order
/// is the reporting order; the discriminant indexes value tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    DistinctPartners,
    DistinctOpponents,
    DistinctInteractions,
    RepeatPartners,
    RepeatOpponents,
    Distinct2ndPartners,
    Distinct2ndOpponents,
    Distinct2ndInteractions,
    Mean2ndPartnerships,
    Mean2ndOppositions,
    Mean2ndInteractions,
    Spread2ndPartnerships,
    Spread2ndOppositions,
    Spread2ndInteractions,
}

impl Metric {
    pub const ALL: [Metric; 14] = [
        Metric::DistinctPartners,
        Metric::DistinctOpponents,
        Metric::DistinctInteractions,
        Metric::RepeatPartners,
        Metric::RepeatOpponents,
        Metric::Distinct2ndPartners,
        Metric::Distinct2ndOpponents,
        Metric::Distinct2ndInteractions,
        Metric::Mean2ndPartnerships,
        Metric::Mean2ndOppositions,
        Metric::Mean2ndInteractions,
        Metric::Spread2ndPartnerships,
        Metric::Spread2ndOppositions,
        Metric::Spread2ndInteractions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::DistinctPartners => "Distinct Partners",
            Metric::DistinctOpponents => "Distinct Opponents",
            Metric::DistinctInteractions => "Distinct Players (any role)",
            Metric::RepeatPartners => "Repeat Partnerships",
            Metric::RepeatOpponents => "Repeat Oppositions",
            Metric::Distinct2ndPartners => "Distinct 2nd-level Partners",
            Metric::Distinct2ndOpponents => "Distinct 2nd-level Opponents",
            Metric::Distinct2ndInteractions => "Distinct 2nd-level Players (any role)",
            Metric::Mean2ndPartnerships => "Mean 2nd-level Partnerships",
            Metric::Mean2ndOppositions => "Mean 2nd-level Oppositions",
            Metric::Mean2ndInteractions => "Mean 2nd-level Interactions (any)",
            Metric::Spread2ndPartnerships => "Spread of 2nd-level Partnerships",
            Metric::Spread2ndOppositions => "Spread of 2nd-level Oppositions",
            Metric::Spread2ndInteractions => "Spread of 2nd-level Interactions (any)",
        }
    }
}

/// Min/max/mean/stddev of one metric across all players.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub stddev: f64,
}

impl Aggregate {
    fn over(values: &[f64]) -> Aggregate {
        let n = values.len() as f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        let mean = sum / n;
        let stddev = if values.len() > 1 {
            let var: f64 = values.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
            var.sqrt()
        } else {
            0.0
        };
        Aggregate {
            min,
            max,
            mean,
            stddev,
        }
    }
}

/// One metric's aggregate plus, where a closed-form baseline exists, the
/// analytic optimum and the per-player divergence (observed minus optimum).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub metric: Metric,
    pub aggregate: Aggregate,
    pub optimum: Option<f64>,
    pub divergence: Option<Aggregate>,
}

/// Full evaluation of one candidate schedule: per-player metric values and
/// their schedule-wide summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    pub nplayers: usize,
    pub nrounds: usize,
    pub bye_tally: Vec<u32>,
    /// Indexed `[player][metric as usize]`.
    pub per_player: Vec<Vec<f64>>,
    /// In `Metric::ALL` order.
    pub summaries: Vec<MetricSummary>,
}

impl StatisticsRecord {
    pub fn summary(&self, metric: Metric) -> &MetricSummary {
        &self.summaries[metric as usize]
    }
}

/// First-order interaction history unpacked from the ledger into per-player
/// lookup form.
struct History {
    partners: Vec<HashSet<Player>>,
    opponents: Vec<Vec<u32>>,
    repeat_partners: Vec<u32>,
}

impl History {
    fn from_schedule(schedule: &Schedule) -> History {
        let n = schedule.nplayers;
        let mut partners = vec![HashSet::new(); n];
        let mut opponents = vec![vec![0u32; n]; n];
        let mut repeat_partners = vec![0u32; n];
        for ((a, b), counts) in schedule.ledger.pairs() {
            if counts.partner > 0 {
                partners[a].insert(b);
                partners[b].insert(a);
            }
            // Structurally zero under the hard rule; still tallied so a
            // violation would show up in the report.
            repeat_partners[a] += counts.partner.saturating_sub(1);
            repeat_partners[b] += counts.partner.saturating_sub(1);
            opponents[a][b] = counts.opponent;
            opponents[b][a] = counts.opponent;
        }
        History {
            partners,
            opponents,
            repeat_partners,
        }
    }
}

/// Evaluates a completed schedule. Pure function of the schedule: calling it
/// twice yields identical records.
pub fn evaluate(schedule: &Schedule) -> StatisticsRecord {
    let n = schedule.nplayers;
    let hist = History::from_schedule(schedule);
    let bye_tally = schedule.bye_tally();

    let mut per_player: Vec<Vec<f64>> = Vec::with_capacity(n);
    for p in 0..n {
        per_player.push(player_metrics(p, n, &hist));
    }

    let mut summaries = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let observed: Vec<f64> = (0..n).map(|p| per_player[p][metric as usize]).collect();
        let optima = optimum_per_player(metric, n, schedule.nrounds, &bye_tally);
        let (optimum, divergence) = match optima {
            Some(optima) => {
                let diffs: Vec<f64> = observed
                    .iter()
                    .zip(&optima)
                    .map(|(obs, opt)| obs - opt)
                    .collect();
                (
                    Some(optima.iter().sum::<f64>() / n as f64),
                    Some(Aggregate::over(&diffs)),
                )
            }
            None => (None, None),
        };
        summaries.push(MetricSummary {
            metric,
            aggregate: Aggregate::over(&observed),
            optimum,
            divergence,
        });
    }

    StatisticsRecord {
        nplayers: n,
        nrounds: schedule.nrounds,
        bye_tally,
        per_player,
        summaries,
    }
}

/// All metric values for one player, in `Metric::ALL` order.
fn player_metrics(p: Player, n: usize, hist: &History) -> Vec<f64> {
    let dist_parts = hist.partners[p].len();
    let dist_opps = (0..n).filter(|&q| hist.opponents[p][q] > 0).count();
    let dist_ints = (0..n)
        .filter(|&q| q != p && (hist.opponents[p][q] > 0 || hist.partners[p].contains(&q)))
        .count();
    let repeat_parts = hist.repeat_partners[p];
    let repeat_opps: u32 = (0..n)
        .map(|q| hist.opponents[p][q].saturating_sub(1))
        .sum();

    // Second-level tallies: for each first-order neighbor, add up what that
    // neighbor's own history contributes toward every third player. Counts
    // are summed, not deduplicated, so a third player reached through two
    // neighbors counts twice.
    let mut l2_part = vec![0u32; n];
    let mut l2_opp = vec![0u32; n];
    let mut l2_int = vec![0u32; n];
    for other in 0..n {
        if other == p {
            continue;
        }
        if hist.partners[p].contains(&other) {
            for t in 0..n {
                if t == p || t == other {
                    continue;
                }
                if hist.partners[other].contains(&t) {
                    l2_part[t] += 1;
                    l2_int[t] += 1;
                }
                l2_int[t] += hist.opponents[other][t];
            }
        }
        if hist.opponents[p][other] > 0 {
            for t in 0..n {
                if t == p || t == other {
                    continue;
                }
                if hist.partners[other].contains(&t) {
                    l2_int[t] += 1;
                }
                l2_opp[t] += hist.opponents[other][t];
                l2_int[t] += hist.opponents[other][t];
            }
        }
    }
    l2_part.remove(p);
    l2_opp.remove(p);
    l2_int.remove(p);

    let mut values = vec![0.0; Metric::ALL.len()];
    values[Metric::DistinctPartners as usize] = dist_parts as f64;
    values[Metric::DistinctOpponents as usize] = dist_opps as f64;
    values[Metric::DistinctInteractions as usize] = dist_ints as f64;
    values[Metric::RepeatPartners as usize] = repeat_parts as f64;
    values[Metric::RepeatOpponents as usize] = repeat_opps as f64;
    for (tallies, distinct, mean, spread) in [
        (
            &l2_part,
            Metric::Distinct2ndPartners,
            Metric::Mean2ndPartnerships,
            Metric::Spread2ndPartnerships,
        ),
        (
            &l2_opp,
            Metric::Distinct2ndOpponents,
            Metric::Mean2ndOppositions,
            Metric::Spread2ndOppositions,
        ),
        (
            &l2_int,
            Metric::Distinct2ndInteractions,
            Metric::Mean2ndInteractions,
            Metric::Spread2ndInteractions,
        ),
    ] {
        let nonzero = tallies.iter().filter(|&&v| v > 0).count();
        let sum: u32 = tallies.iter().sum();
        let max = tallies.iter().max().copied().unwrap_or(0);
        let min = tallies.iter().min().copied().unwrap_or(0);
        values[distinct as usize] = nonzero as f64;
        values[mean as usize] = sum as f64 / tallies.len() as f64;
        values[spread as usize] = (max - min) as f64;
    }
    values
}

/// Closed-form per-player optimum for metrics that have one; derived from
/// the round count and each player's byes, never simulated.
///
/// A player seated in `r = K - b` rounds meets at most `r` distinct
/// partners, `2r` distinct opponents, and `3r` distinct players. For the
/// second-level means: a player whose first-order optimum is `I` has
/// interactees carrying `I - 1` further interactions each, giving an
/// expected `I * (I - 1)` second-level total, or `I * (I - 1) / (N - 1)`
/// against any single other player.
fn optimum_per_player(
    metric: Metric,
    nplayers: usize,
    nrounds: usize,
    bye_tally: &[u32],
) -> Option<Vec<f64>> {
    let played = |p: usize| (nrounds as f64) - bye_tally[p] as f64;
    let second_level = |first_order: f64| first_order * (first_order - 1.0) / (nplayers as f64 - 1.0);
    let per_player: fn(f64) -> f64 = match metric {
        Metric::DistinctPartners => |r| r,
        Metric::DistinctOpponents => |r| 2.0 * r,
        Metric::DistinctInteractions => |r| 3.0 * r,
        Metric::Mean2ndPartnerships => |r| r,
        Metric::Mean2ndOppositions => |r| 2.0 * r,
        Metric::Mean2ndInteractions => |r| 3.0 * r,
        _ => return None,
    };
    let values = (0..nplayers)
        .map(|p| {
            let first_order = per_player(played(p));
            match metric {
                Metric::Mean2ndPartnerships
                | Metric::Mean2ndOppositions
                | Metric::Mean2ndInteractions => second_level(first_order),
                _ => first_order,
            }
        })
        .collect();
    Some(values)
}
