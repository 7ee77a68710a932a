//! Configuration of [`DungeonEnv`](super::DungeonEnv) and
//! [`RawDungeon`](super::RawDungeon).
use crate::DungeonTask;
use anyhow::Result;
use ply_core::error::PlyError;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// Configurations of [`DungeonEnv`](super::DungeonEnv).
pub struct DungeonConfig {
    pub(super) task: DungeonTask,
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) n_gold: usize,
    pub(super) max_steps: Option<usize>,
    pub(super) max_depth: u32,
    pub(super) descend_bonus: f32,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            task: DungeonTask::Gold,
            width: 40,
            height: 12,
            n_gold: 8,
            max_steps: None,
            max_depth: 5,
            descend_bonus: 50.0,
        }
    }
}

impl DungeonConfig {
    /// Sets the task.
    pub fn task(mut self, task: DungeonTask) -> Self {
        self.task = task;
        self
    }

    /// Sets the size of the map, walls included.
    pub fn size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the number of gold piles on each level.
    pub fn n_gold(mut self, n_gold: usize) -> Self {
        self.n_gold = n_gold;
        self
    }

    /// Sets the number of steps after which an episode is truncated.
    ///
    /// Ignored by [`RawDungeon`](super::RawDungeon), which never truncates.
    pub fn max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the level whose stairs finish an episode of
    /// [`DungeonTask::Score`].
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the reward for going down the stairs in [`DungeonTask::Score`].
    pub fn descend_bonus(mut self, descend_bonus: f32) -> Self {
        self.descend_bonus = descend_bonus;
        self
    }

    pub(super) fn check(&self) -> Result<(), PlyError> {
        if self.width < 3 || self.height < 3 {
            return Err(PlyError::InvalidConfig(format!(
                "map must be at least 3x3, got {}x{}",
                self.width, self.height
            )));
        }
        // Interior cells with two even coordinates may hold a pillar. The
        // player and the stairs need one cell each.
        let (w, h) = (self.width - 2, self.height - 2);
        if w * h - (w / 2) * (h / 2) < 2 + self.n_gold {
            return Err(PlyError::InvalidConfig(format!(
                "a {}x{} map has no room for {} gold piles",
                self.width, self.height, self.n_gold
            )));
        }
        if self.max_steps == Some(0) {
            return Err(PlyError::InvalidConfig(
                "max_steps must be positive".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(PlyError::InvalidConfig(
                "max_depth must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check() {
        assert!(DungeonConfig::default().check().is_ok());
        assert!(DungeonConfig::default().size(2, 10).check().is_err());
        assert!(DungeonConfig::default()
            .size(4, 4)
            .n_gold(3)
            .check()
            .is_err());
        assert!(DungeonConfig::default()
            .max_steps(Some(0))
            .check()
            .is_err());
    }
}
