use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use super::types::Player;

/// The two kinds of relation two players can have in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Partner,
    Opponent,
}

/// Cumulative interaction counts for one unordered player pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCounts {
    pub partner: u32,
    pub opponent: u32,
}

/// Cumulative pairwise history for one candidate schedule. Flat across
/// rounds; every assignment decision queries it afresh. Each candidate gets
/// its own ledger, so parallel search never shares state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionLedger {
    counts: HashMap<(Player, Player), PairCounts>,
}

fn key(a: Player, b: Player) -> (Player, Player) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl InteractionLedger {
    pub fn new() -> InteractionLedger {
        InteractionLedger::default()
    }

    /// Records one interaction between `a` and `b`. A pair may partner at
    /// most once, ever; callers are expected to pre-check `partner_count`,
    /// so a second partnership here is a logic defect.
    pub fn record(&mut self, a: Player, b: Player, kind: Interaction) -> Result<(), ScheduleError> {
        let entry = self.counts.entry(key(a, b)).or_default();
        match kind {
            Interaction::Partner => {
                if entry.partner >= 1 {
                    return Err(ScheduleError::InvariantViolation(format!(
                        "players {} and {} have already partnered",
                        a, b
                    )));
                }
                entry.partner += 1;
            }
            Interaction::Opponent => entry.opponent += 1,
        }
        Ok(())
    }

    /// Times `a` and `b` have been teammates (0 or 1).
    pub fn partner_count(&self, a: Player, b: Player) -> u32 {
        self.counts.get(&key(a, b)).map_or(0, |c| c.partner)
    }

    /// Times `a` and `b` have opposed each other across a table.
    pub fn opponent_count(&self, a: Player, b: Player) -> u32 {
        self.counts.get(&key(a, b)).map_or(0, |c| c.opponent)
    }

    /// All pairs with at least one recorded interaction.
    pub fn pairs(&self) -> impl Iterator<Item = ((Player, Player), PairCounts)> + '_ {
        self.counts.iter().map(|(&pair, &counts)| (pair, counts))
    }
}
