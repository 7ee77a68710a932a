#![warn(missing_docs)]
//! A small turn-based dungeon for `ply`.
//!
//! The player (`@`) walks a walled map, picks up gold (`$`) and looks for the
//! stairs (`>`). Keys follow the usual roguelike layout:
//!
//! ```text
//! y k u      Y K U   run
//!  \|/
//! h-@-l      H @ L
//!  /|\
//! b j n      B J N
//! ```
//!
//! `Enter` dismisses the message line.
//!
//! Three environments are registered by id:
//!
//! | id                | environment      | reward             | done              |
//! |-------------------|------------------|--------------------|-------------------|
//! | `Dungeon-v0`      | [`DungeonEnv`]   | gold               | stairs, step cap  |
//! | `DungeonScore-v0` | [`DungeonEnv`]   | gold, descending   | last stairs, cap  |
//! | `raw`             | [`RawDungeon`]   | none               | stairs            |
//!
//! ```no_run
//! # use anyhow::Result;
//! use ply_core::Env as _;
//! use ply_dungeon_env::{DungeonConfig, DungeonEnv, DungeonTask};
//!
//! # fn main() -> Result<()> {
//! let task = DungeonTask::from_id("Dungeon-v0")?;
//! let config = DungeonConfig::default().task(task).max_steps(Some(100));
//! let mut env = DungeonEnv::build(&config, None)?;
//! let _obs = env.reset()?;
//! # Ok(())
//! # }
//! ```
pub mod act;
mod dungeon;
mod env;
mod obs;
pub use dungeon::EndStatus;
pub use env::{DungeonConfig, DungeonEnv, DungeonInfo, RawDungeon};
pub use obs::{Blstats, DungeonObs};

use ply_core::error::PlyError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Tasks of the dungeon, one per registered id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DungeonTask {
    /// `Dungeon-v0`: collect gold and find the stairs.
    Gold,

    /// `DungeonScore-v0`: collect gold and go as deep as possible.
    Score,

    /// `raw`: the stairs without rewards.
    Raw,
}

impl DungeonTask {
    /// Ids of all tasks.
    pub const IDS: [&'static str; 3] = ["Dungeon-v0", "DungeonScore-v0", "raw"];

    /// Looks up a task by its id.
    pub fn from_id(id: &str) -> Result<Self, PlyError> {
        match id {
            "Dungeon-v0" => Ok(Self::Gold),
            "DungeonScore-v0" => Ok(Self::Score),
            "raw" => Ok(Self::Raw),
            _ => Err(PlyError::UnknownEnv(id.to_string())),
        }
    }

    /// Returns the id of the task.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Gold => Self::IDS[0],
            Self::Score => Self::IDS[1],
            Self::Raw => Self::IDS[2],
        }
    }
}

impl fmt::Display for DungeonTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for DungeonTask {
    type Err = PlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry() {
        for id in DungeonTask::IDS {
            assert_eq!(DungeonTask::from_id(id).unwrap().id(), id);
        }
        assert!(matches!(
            "NetHack-v0".parse::<DungeonTask>(),
            Err(PlyError::UnknownEnv(id)) if id == "NetHack-v0"
        ));
    }
}
