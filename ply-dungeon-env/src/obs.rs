//! Observation of [`DungeonEnv`](crate::DungeonEnv).
use ply_core::Obs;
use std::fmt;

/// Bottom-line statistics of the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blstats {
    /// Column of the player.
    pub x: usize,
    /// Row of the player.
    pub y: usize,
    /// Gold carried.
    pub gold: u32,
    /// Dungeon level, starting at 1.
    pub depth: u32,
    /// Turns taken on the current episode.
    pub turn: u32,
}

impl fmt::Display for Blstats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dlvl:{} $:{} T:{} Pos:({}, {})",
            self.depth, self.gold, self.turn, self.x, self.y
        )
    }
}

/// Observation of [`DungeonEnv`](crate::DungeonEnv).
#[derive(Clone, Debug)]
pub struct DungeonObs {
    /// The map as seen by the player, one row per element, `@` included.
    pub chars: Vec<Vec<u8>>,

    /// Bottom-line statistics.
    pub blstats: Blstats,

    /// Message of the last turn, possibly empty.
    pub message: String,
}

impl Obs for DungeonObs {
    fn status(&self) -> Option<String> {
        Some(self.blstats.to_string())
    }
}
