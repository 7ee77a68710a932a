//! Play a session of episodes.
mod config;
use crate::{
    error::{EnvOp, PlyError},
    record::{Record, RecordValue, Recorder},
    resolver::ActionResolver,
    Env, EpisodeRunner, EpisodeStats, SessionStats, StatsAggregator, Termination,
};
use anyhow::Result;
use chrono::Local;
pub use config::{Mode, Seeds, SessionConfig};
use log::{info, warn};
use std::{io::Write, time::Instant};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Plays episodes of an environment until a target count is reached or the
/// operator exits.
///
/// # Session loop
///
/// 0. Given an environment implementing [`Env`], an [`ActionResolver`] and a
///    [`Recorder`].
/// 1. Reset the environment.
/// 2. Play an episode with [`EpisodeRunner`].
///     * If the operator exited, finish the loop. Exiting supersedes the
///       target count and the interrupted episode is not recorded.
/// 3. Fold the episode into [`StatsAggregator`] and write an episode record.
/// 4. If `episodes` episodes are completed, finish the loop.
/// 5. Reset the environment and go back to 2.
///
/// Whatever ends the loop, including a failure of the environment, the
/// environment is closed exactly once afterwards. A summary record is
/// written when the loop ends without failure.
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> Running: reset
///     Running --> Running: step
///     Running --> DoneByEnv: done
///     Running --> DoneByTruncation: step cap
///     Running --> Aborted: exit code
///     DoneByEnv --> Running: reset
///     DoneByTruncation --> Running: reset
///     DoneByEnv --> [*]: target reached
///     DoneByTruncation --> [*]: target reached
///     Aborted --> [*]
/// ```
///
/// # Records
///
/// Episode records have the keys `event` (`"episode"`), `episode` (0-based
/// index), `steps`, `sps` and `termination`; rich environments add
/// `mean_reward`, `final_reward` and, if reported, `end_status`.
/// The summary record has the keys `event` (`"summary"`), `episodes`,
/// `elapsed` (seconds), `mean_sps`, `finished_at` and, for rich
/// environments, `mean_reward`.
pub struct Session<W> {
    config: SessionConfig,
    out: W,
}

impl<W: Write> Session<W> {
    /// Constructs a session, writing frames to `out`.
    pub fn new(config: SessionConfig, out: W) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, out })
    }

    /// Plays the session and closes the environment.
    pub fn run<E, R, C>(
        &mut self,
        mut env: E,
        resolver: &mut R,
        recorder: &mut C,
    ) -> Result<SessionStats>
    where
        E: Env,
        R: ActionResolver + ?Sized,
        C: Recorder + ?Sized,
    {
        let start = Instant::now();
        let played = self.play(&mut env, resolver, recorder);
        let closed: Result<()> = env
            .close()
            .map_err(|e| PlyError::env_operation(EnvOp::Close)(e).into());

        let mut stats = match (played, closed) {
            (Ok(stats), Ok(())) => stats,
            (Err(e), Ok(())) | (Ok(_), Err(e)) => return Err(e),
            (Err(e), Err(e_close)) => {
                warn!("{:#}", e_close);
                return Err(e);
            }
        };
        stats.elapsed = start.elapsed();

        info!(
            "Finished after {} episodes and {:.3} seconds",
            stats.episodes,
            stats.elapsed.as_secs_f64()
        );
        recorder.write(summary_record(&stats));
        Ok(stats)
    }

    fn play<E, R, C>(
        &mut self,
        env: &mut E,
        resolver: &mut R,
        recorder: &mut C,
    ) -> Result<SessionStats>
    where
        E: Env,
        R: ActionResolver + ?Sized,
        C: Recorder + ?Sized,
    {
        let mut aggregator = StatsAggregator::new();
        let mut runner = EpisodeRunner::new(self.config.max_steps, &mut self.out)
            .render(self.config.render.then(|| self.config.render_mode))
            .print_frames_separately(self.config.print_frames_separately);

        let mut obs = env.reset().map_err(PlyError::env_operation(EnvOp::Reset))?;
        loop {
            let (episode, termination) = runner.run_episode(env, resolver, obs)?;
            if termination == Termination::Aborted {
                info!(
                    "Session aborted by the operator after {} episodes",
                    aggregator.episodes()
                );
                break;
            }

            let ix = aggregator.episodes();
            let sps = aggregator.record_episode(&episode)?;
            recorder.write(episode_record(ix, &episode, termination, sps));

            if aggregator.episodes() == self.config.episodes {
                break;
            }
            obs = env.reset().map_err(PlyError::env_operation(EnvOp::Reset))?;
        }

        Ok(aggregator.into_stats())
    }
}

fn episode_record(
    ix: usize,
    episode: &EpisodeStats,
    termination: Termination,
    sps: f64,
) -> Record {
    let mut record = Record::from_slice(&[
        ("event", RecordValue::String("episode".to_string())),
        ("episode", RecordValue::Count(ix)),
        ("steps", RecordValue::Count(episode.steps)),
        ("sps", RecordValue::Scalar(sps)),
        (
            "termination",
            RecordValue::String(format!("{:?}", termination)),
        ),
    ]);
    if let Some(mean_reward) = episode.mean_reward {
        record.insert("mean_reward", RecordValue::Scalar(mean_reward));
    }
    if let Some(reward) = episode.last_reward {
        record.insert("final_reward", RecordValue::Scalar(reward as f64));
    }
    if let Some(end_status) = &episode.end_status {
        record.insert("end_status", RecordValue::String(end_status.clone()));
    }
    record
}

fn summary_record(stats: &SessionStats) -> Record {
    let mut record = Record::from_slice(&[
        ("event", RecordValue::String("summary".to_string())),
        ("episodes", RecordValue::Count(stats.episodes)),
        ("elapsed", RecordValue::Scalar(stats.elapsed.as_secs_f64())),
        ("mean_sps", RecordValue::Scalar(stats.mean_sps)),
        ("finished_at", RecordValue::DateTime(Local::now())),
    ]);
    if let Some(mean_reward) = stats.mean_reward {
        record.insert("mean_reward", RecordValue::Scalar(mean_reward));
    }
    record
}
