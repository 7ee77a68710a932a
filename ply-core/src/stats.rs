//! Running statistics over the episodes of a session.
use crate::{error::PlyError, EpisodeStats};
use std::time::Duration;

/// Statistics of a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    /// Number of completed episodes.
    pub episodes: usize,

    /// Mean of the steps per second of the completed episodes.
    pub mean_sps: f64,

    /// Mean of the per-episode mean rewards.
    ///
    /// This is a mean of means: every episode weighs the same regardless of
    /// its length. `None` until an episode of a rich environment completes.
    pub mean_reward: Option<f64>,

    /// Wall-clock time of the whole session. Set when the session ends.
    pub elapsed: Duration,
}

/// Folds completed episodes into [`SessionStats`] with incremental means.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    stats: SessionStats,
}

impl StatsAggregator {
    /// Constructs an aggregator with no episodes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of episodes recorded so far.
    pub fn episodes(&self) -> usize {
        self.stats.episodes
    }

    /// Returns the statistics so far.
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Folds an episode into the running means and returns its steps per second.
    ///
    /// An episode whose duration is too short to divide by leaves the
    /// statistics untouched and returns [`PlyError::DegenerateDuration`].
    pub fn record_episode(&mut self, episode: &EpisodeStats) -> Result<f64, PlyError> {
        let secs = episode.duration.as_secs_f64();
        if secs < f64::EPSILON {
            return Err(PlyError::DegenerateDuration {
                steps: episode.steps,
                secs,
            });
        }
        let sps = episode.steps as f64 / secs;

        self.stats.episodes += 1;
        let n = self.stats.episodes as f64;
        self.stats.mean_sps += (sps - self.stats.mean_sps) / n;

        if let Some(r) = episode.mean_reward {
            let mean = self.stats.mean_reward.get_or_insert(0.0);
            *mean += (r - *mean) / n;
        }

        Ok(sps)
    }

    /// Returns the statistics, consuming the aggregator.
    pub fn into_stats(self) -> SessionStats {
        self.stats
    }
}
