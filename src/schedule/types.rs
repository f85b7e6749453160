use serde::{Deserialize, Serialize};

use super::ledger::InteractionLedger;

/// Player identity, contiguous integers in [0, nplayers).
pub type Player = usize;

/// Players seated at one table (two teams of two).
pub const TABLE_SIZE: usize = 4;

/// A two-player partnership for one round. Stored normalized (lower player
/// first) so that equal teams compare equal regardless of pick order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Team(pub Player, pub Player);

impl Team {
    pub fn new(a: Player, b: Player) -> Team {
        if a <= b {
            Team(a, b)
        } else {
            Team(b, a)
        }
    }

    pub fn contains(&self, p: Player) -> bool {
        self.0 == p || self.1 == p
    }
}

/// Two teams seated at the same table, opposing each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matchup(pub Team, pub Team);

impl Matchup {
    /// The four cross-team player pairs of this table.
    pub fn cross_pairs(&self) -> [(Player, Player); 4] {
        let Matchup(Team(p1, p2), Team(p3, p4)) = *self;
        [(p1, p3), (p1, p4), (p2, p3), (p2, p4)]
    }
}

/// One round of the bracket: byes, teams, and table assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub byes: Vec<Player>,
    pub teams: Vec<Team>,
    pub matchups: Vec<Matchup>,
}

/// A complete candidate schedule: all rounds plus the final interaction
/// history they produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub nplayers: usize,
    pub nrounds: usize,
    pub rounds: Vec<Round>,
    pub ledger: InteractionLedger,
}

impl Schedule {
    /// Number of rounds each player sat out.
    pub fn bye_tally(&self) -> Vec<u32> {
        let mut tally = vec![0u32; self.nplayers];
        for round in &self.rounds {
            for &p in &round.byes {
                tally[p] += 1;
            }
        }
        tally
    }
}

/// Per-round counts derived from the player count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundShape {
    pub nbyes: usize,
    pub nseats: usize,
    pub nteams: usize,
    pub nmatchups: usize,
}

impl RoundShape {
    pub fn for_players(nplayers: usize) -> RoundShape {
        let nbyes = nplayers % TABLE_SIZE;
        let nseats = nplayers - nbyes;
        RoundShape {
            nbyes,
            nseats,
            nteams: nseats / 2,
            nmatchups: nseats / TABLE_SIZE,
        }
    }
}
