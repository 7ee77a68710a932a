//! Playing a single episode.
use crate::{
    error::{EnvOp, PlyError},
    resolver::{ActionResolver, Resolution},
    Action, Env, EnvVariant, Info, Obs, RenderMode,
};
use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use log::debug;
use std::{
    io::Write,
    time::{Duration, Instant},
};

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The environment signalled the end of the episode.
    DoneByEnv,

    /// The episode reached the step cap.
    DoneByTruncation,

    /// The operator asked to end the session.
    Aborted,
}

/// Statistics of one episode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeStats {
    /// Number of steps applied to the environment.
    pub steps: usize,

    /// Mean of the rewards of the episode. `None` for minimal environments.
    pub mean_reward: Option<f64>,

    /// Reward of the last step. `None` for minimal environments.
    pub last_reward: Option<f32>,

    /// End status reported by a rich environment at the last step.
    pub end_status: Option<String>,

    /// Wall-clock time from the start of the episode to its end.
    pub duration: Duration,
}

/// Drives episodes of an environment, one at a time.
///
/// Each tick optionally renders the environment, asks an [`ActionResolver`]
/// for an action, and applies it. Rich environments truncate episodes by
/// themselves; for minimal environments the runner ends the episode once
/// `max_steps` steps have been applied.
pub struct EpisodeRunner<W> {
    max_steps: usize,
    render: Option<RenderMode>,
    print_frames_separately: bool,
    out: W,
}

impl<W: Write> EpisodeRunner<W> {
    /// Constructs a runner that does not render.
    pub fn new(max_steps: usize, out: W) -> Self {
        Self {
            max_steps,
            render: None,
            print_frames_separately: false,
            out,
        }
    }

    /// Renders the environment in the given mode before every action request.
    pub fn render(mut self, mode: Option<RenderMode>) -> Self {
        self.render = mode;
        self
    }

    /// If `false` (default), every frame is drawn over the previous one.
    pub fn print_frames_separately(mut self, v: bool) -> Self {
        self.print_frames_separately = v;
        self
    }

    /// Plays one episode starting from `obs`, the observation after a reset.
    ///
    /// Returns [`Termination::Aborted`] as soon as the resolver asks to exit;
    /// the statistics then cover the steps applied so far. Failures of the
    /// environment are returned with the name of the failed operation.
    pub fn run_episode<E, R>(
        &mut self,
        env: &mut E,
        resolver: &mut R,
        obs: E::Obs,
    ) -> Result<(EpisodeStats, Termination)>
    where
        E: Env,
        R: ActionResolver + ?Sized,
    {
        let start = Instant::now();
        let variant = env.variant();
        let mut stats = EpisodeStats {
            mean_reward: match variant {
                EnvVariant::Rich => Some(0.0),
                EnvVariant::Minimal => None,
            },
            ..Default::default()
        };
        let mut obs = obs;
        let mut prev_act = None;

        loop {
            if let Some(mode) = self.render {
                self.render_frame(env, &obs, prev_act, &stats, mode)?;
            }

            let act = match resolver.resolve(env.action_space())? {
                Resolution::Action(act) => act,
                Resolution::Exit => {
                    stats.duration = start.elapsed();
                    return Ok((stats, Termination::Aborted));
                }
            };
            debug_assert!(env.action_space().contains(&act));

            let step = env.step(&act).map_err(PlyError::env_operation(EnvOp::Step))?;
            stats.steps += 1;
            prev_act = Some(act);

            let termination = match variant {
                EnvVariant::Rich => {
                    let reward = step.reward.ok_or(PlyError::MissingReward)?;
                    if let Some(mean) = stats.mean_reward.as_mut() {
                        *mean += (reward as f64 - *mean) / stats.steps as f64;
                    }
                    stats.last_reward = Some(reward);
                    if step.is_terminated {
                        Some(Termination::DoneByEnv)
                    } else if step.is_truncated {
                        Some(Termination::DoneByTruncation)
                    } else {
                        None
                    }
                }
                EnvVariant::Minimal => {
                    if step.is_done() {
                        Some(Termination::DoneByEnv)
                    } else if stats.steps >= self.max_steps {
                        Some(Termination::DoneByTruncation)
                    } else {
                        None
                    }
                }
            };

            if let Some(termination) = termination {
                stats.duration = start.elapsed();
                stats.end_status = step.info.as_ref().and_then(Info::end_status);
                debug!(
                    "Episode ended after {} steps: {:?}",
                    stats.steps, termination
                );
                return Ok((stats, termination));
            }

            obs = step.obs;
        }
    }

    fn render_frame<E: Env>(
        &mut self,
        env: &mut E,
        obs: &E::Obs,
        prev_act: Option<Action>,
        stats: &EpisodeStats,
        mode: RenderMode,
    ) -> Result<()> {
        if !self.print_frames_separately {
            queue!(self.out, MoveTo(0, 0), Clear(ClearType::FromCursorDown))?;
        }

        let act_str = match prev_act {
            Some(act) => match env.action_space().code_of(&act) {
                Some(code) => format!("{} ({:?})", act, char::from(code)),
                None => act.to_string(),
            },
            None => String::new(),
        };
        writeln!(self.out, "{}", "-".repeat(8))?;
        if stats.mean_reward.is_some() {
            let reward_str = stats
                .last_reward
                .map(|r| r.to_string())
                .unwrap_or_else(|| "0.0".to_string());
            writeln!(self.out, "Previous reward: {:64}", reward_str)?;
        }
        writeln!(self.out, "Previous action: {:64}", act_str)?;
        writeln!(self.out, "{}", "-".repeat(8))?;
        self.out.flush()?;

        env.render(mode).map_err(PlyError::env_operation(EnvOp::Render))?;

        writeln!(self.out, "{}", "-".repeat(8))?;
        if let Some(status) = obs.status() {
            writeln!(self.out, "{}", status)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{ScriptedEnv, ScriptedEnvConfig, ScriptedInput},
        resolver::{HumanResolver, RandomResolver},
    };
    use std::io::sink;

    fn build(config: ScriptedEnvConfig) -> ScriptedEnv {
        ScriptedEnv::build(&config, None).unwrap()
    }

    #[test]
    fn test_minimal_truncated_by_runner() {
        let mut env = build(ScriptedEnvConfig::minimal());
        let mut resolver = RandomResolver::new(Some(0));
        let mut runner = EpisodeRunner::new(5, sink());
        let obs = env.reset().unwrap();
        let (stats, termination) = runner.run_episode(&mut env, &mut resolver, obs).unwrap();
        assert_eq!(termination, Termination::DoneByTruncation);
        assert_eq!(stats.steps, 5);
        assert_eq!(stats.mean_reward, None);
        assert_eq!(env.calls().steps, 5);
    }

    #[test]
    fn test_minimal_done_by_env_before_cap() {
        let mut env = build(ScriptedEnvConfig::minimal().done_at(Some(3)));
        let mut resolver = RandomResolver::new(Some(0));
        let mut runner = EpisodeRunner::new(5, sink());
        let obs = env.reset().unwrap();
        let (stats, termination) = runner.run_episode(&mut env, &mut resolver, obs).unwrap();
        assert_eq!(termination, Termination::DoneByEnv);
        assert_eq!(stats.steps, 3);
    }

    #[test]
    fn test_rich_ignores_runner_cap() {
        let config = ScriptedEnvConfig::rich(vec![1.0; 8]).truncate_at(Some(8));
        let mut env = build(config);
        let mut resolver = RandomResolver::new(Some(0));
        let mut runner = EpisodeRunner::new(2, sink());
        let obs = env.reset().unwrap();
        let (stats, termination) = runner.run_episode(&mut env, &mut resolver, obs).unwrap();
        assert_eq!(termination, Termination::DoneByTruncation);
        assert_eq!(stats.steps, 8);
    }

    #[test]
    fn test_rich_mean_reward() {
        let config = ScriptedEnvConfig::rich(vec![1.0, 2.0, 3.0]).done_at(Some(3));
        let mut env = build(config);
        let mut resolver = RandomResolver::new(Some(0));
        let mut runner = EpisodeRunner::new(100, sink());
        let obs = env.reset().unwrap();
        let (stats, termination) = runner.run_episode(&mut env, &mut resolver, obs).unwrap();
        assert_eq!(termination, Termination::DoneByEnv);
        assert_eq!(stats.mean_reward, Some(2.0));
        assert_eq!(stats.last_reward, Some(3.0));
        assert_eq!(stats.end_status.as_deref(), Some("DONE"));
    }

    #[test]
    fn test_abort_before_any_step() {
        let mut env = build(ScriptedEnvConfig::minimal());
        let input = ScriptedInput::new([crate::terminal::INTERRUPT]);
        let mut resolver = HumanResolver::new(input, Vec::new());
        let mut runner = EpisodeRunner::new(5, sink());
        let obs = env.reset().unwrap();
        let (stats, termination) = runner.run_episode(&mut env, &mut resolver, obs).unwrap();
        assert_eq!(termination, Termination::Aborted);
        assert_eq!(stats.steps, 0);
        assert_eq!(env.calls().steps, 0);
        assert!(!resolver.device().is_raw());
    }

    #[test]
    fn test_rejected_input_is_not_a_step() {
        let mut env = build(ScriptedEnvConfig::minimal());
        let input = ScriptedInput::new(*b"?k?!j");
        let mut resolver = HumanResolver::new(input, Vec::new());
        let mut runner = EpisodeRunner::new(2, sink());
        let obs = env.reset().unwrap();
        let (stats, termination) = runner.run_episode(&mut env, &mut resolver, obs).unwrap();
        assert_eq!(termination, Termination::DoneByTruncation);
        assert_eq!(stats.steps, 2);
        assert_eq!(env.calls().steps, 2);
        assert_eq!(env.calls().actions, vec![Action::Code(b'k'), Action::Code(b'j')]);
    }

    #[test]
    fn test_step_failure_propagates() {
        let mut env = build(ScriptedEnvConfig::minimal().fail_step_at(Some(2)));
        let mut resolver = RandomResolver::new(Some(0));
        let mut runner = EpisodeRunner::new(5, sink());
        let obs = env.reset().unwrap();
        let err = runner
            .run_episode(&mut env, &mut resolver, obs)
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to step the environment");
    }

    #[test]
    fn test_render_before_each_request() {
        let mut env = build(ScriptedEnvConfig::rich(vec![0.5; 3]).done_at(Some(3)));
        let mut resolver = RandomResolver::new(Some(0));
        let mut runner = EpisodeRunner::new(100, Vec::new())
            .render(Some(RenderMode::Full))
            .print_frames_separately(true);
        let obs = env.reset().unwrap();
        runner.run_episode(&mut env, &mut resolver, obs).unwrap();
        assert_eq!(env.calls().renders, 3);
        let out = String::from_utf8(runner.out).unwrap();
        assert_eq!(out.matches("Previous action:").count(), 3);
        assert!(out.contains("Previous reward: 0.5"));
        assert!(out.contains("t=2"));
    }
}
