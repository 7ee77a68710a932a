//! Dungeon environments.
mod config;
use crate::{
    act::{action_codes, Command},
    dungeon::{Dungeon, EndStatus},
    obs::DungeonObs,
    DungeonTask,
};
use anyhow::{anyhow, bail, Result};
pub use config::DungeonConfig;
use log::{debug, info};
use ply_core::{
    error::PlyError, Action, ActionSpace, Env, EnvVariant, Info, RenderMode, Seeds, Step,
};
use std::io::{self, Write};

/// Information in the [`Step`] object of [`DungeonEnv`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DungeonInfo {
    /// State of the episode after the step.
    pub end_status: EndStatus,
}

impl Info for DungeonInfo {
    fn end_status(&self) -> Option<String> {
        Some(self.end_status.to_string())
    }
}

fn build_dungeon(config: &DungeonConfig, seeds: Option<&Seeds>) -> Result<Dungeon> {
    config.check()?;
    let layout_seed = seeds.and_then(Seeds::core);
    let gold_seed = seeds.and_then(|s| s.get("disp"));
    debug!("Seeds: core={:?}, disp={:?}", layout_seed, gold_seed);
    Ok(Dungeon::new(
        config.width,
        config.height,
        config.n_gold,
        layout_seed,
        gold_seed,
    ))
}

fn decode(space: &ActionSpace, act: &Action) -> Result<Command> {
    space
        .code_of(act)
        .and_then(Command::from_code)
        .ok_or_else(|| anyhow!("Action {} is not in the action space", act))
}

fn draw(dungeon: &Dungeon, mode: RenderMode) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    dungeon.draw(&mut out, mode)?;
    out.flush()?;
    Ok(())
}

/// The dungeon with rewards.
///
/// Actions are indices into [`action_codes`]. The reward of a step is the
/// gold picked up. An episode terminates when the task is completed and is
/// truncated after `max_steps` steps, if set.
///
/// * [`DungeonTask::Gold`]: the episode ends on the stairs of the first level.
/// * [`DungeonTask::Score`]: going down the stairs also pays a bonus and leads
///   to a fresh level. The episode ends on the stairs of level `max_depth`.
pub struct DungeonEnv {
    config: DungeonConfig,
    dungeon: Dungeon,
    action_space: ActionSpace,
    steps: usize,
    closed: bool,
}

impl DungeonEnv {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            bail!("{} is closed", self.config.task.id());
        }
        Ok(())
    }
}

impl Env for DungeonEnv {
    type Config = DungeonConfig;
    type Obs = DungeonObs;
    type Info = DungeonInfo;

    fn build(config: &Self::Config, seeds: Option<&Seeds>) -> Result<Self> {
        if config.task == DungeonTask::Raw {
            return Err(PlyError::InvalidConfig(format!(
                "task {} is served by RawDungeon",
                config.task.id()
            ))
            .into());
        }
        let dungeon = build_dungeon(config, seeds)?;
        info!(
            "Built {} on a {}x{} map",
            config.task.id(),
            config.width,
            config.height
        );

        Ok(Self {
            config: config.clone(),
            dungeon,
            action_space: ActionSpace::indexed(action_codes()),
            steps: 0,
            closed: false,
        })
    }

    fn variant(&self) -> EnvVariant {
        EnvVariant::Rich
    }

    fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }

    fn reset(&mut self) -> Result<DungeonObs> {
        self.ensure_open()?;
        self.dungeon.restart();
        self.steps = 0;
        Ok(self.dungeon.obs())
    }

    fn step(&mut self, act: &Action) -> Result<Step<Self>> {
        self.ensure_open()?;
        let command = decode(&self.action_space, act)?;
        let outcome = self.dungeon.apply(command);
        self.steps += 1;

        let mut reward = outcome.gold as f32;
        let mut is_terminated = false;
        if outcome.descended {
            match self.config.task {
                DungeonTask::Score => {
                    reward += self.config.descend_bonus;
                    if self.dungeon.depth() >= self.config.max_depth {
                        is_terminated = true;
                    } else {
                        self.dungeon.descend();
                    }
                }
                _ => is_terminated = true,
            }
        }
        let is_truncated =
            !is_terminated && self.config.max_steps.map_or(false, |m| self.steps >= m);

        let end_status = if is_terminated {
            EndStatus::TaskSuccessful
        } else if is_truncated {
            EndStatus::Aborted
        } else {
            EndStatus::Running
        };

        Ok(Step::rich(
            *act,
            self.dungeon.obs(),
            reward,
            is_terminated,
            is_truncated,
            DungeonInfo { end_status },
        ))
    }

    fn render(&mut self, mode: RenderMode) -> Result<()> {
        self.ensure_open()?;
        draw(&self.dungeon, mode)
    }

    fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.closed = true;
        debug!("Closed {}", self.config.task.id());
        Ok(())
    }
}

/// The dungeon with bare steps.
///
/// Actions are key codes of [`action_codes`]. Steps carry no reward and the
/// episode is done only on the stairs of the first level; truncation is up to
/// the caller.
pub struct RawDungeon {
    dungeon: Dungeon,
    action_space: ActionSpace,
    closed: bool,
}

impl RawDungeon {
    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            bail!("{} is closed", DungeonTask::Raw.id());
        }
        Ok(())
    }
}

impl Env for RawDungeon {
    type Config = DungeonConfig;
    type Obs = DungeonObs;
    type Info = ();

    fn build(config: &Self::Config, seeds: Option<&Seeds>) -> Result<Self> {
        if config.task != DungeonTask::Raw {
            return Err(PlyError::InvalidConfig(format!(
                "task {} is served by DungeonEnv",
                config.task.id()
            ))
            .into());
        }
        let dungeon = build_dungeon(config, seeds)?;
        info!(
            "Built {} on a {}x{} map",
            config.task.id(),
            config.width,
            config.height
        );

        Ok(Self {
            dungeon,
            action_space: ActionSpace::raw_code(action_codes()),
            closed: false,
        })
    }

    fn variant(&self) -> EnvVariant {
        EnvVariant::Minimal
    }

    fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }

    fn reset(&mut self) -> Result<DungeonObs> {
        self.ensure_open()?;
        self.dungeon.restart();
        Ok(self.dungeon.obs())
    }

    fn step(&mut self, act: &Action) -> Result<Step<Self>> {
        self.ensure_open()?;
        let command = decode(&self.action_space, act)?;
        let outcome = self.dungeon.apply(command);
        Ok(Step::minimal(*act, self.dungeon.obs(), outcome.descended))
    }

    fn render(&mut self, mode: RenderMode) -> Result<()> {
        self.ensure_open()?;
        draw(&self.dungeon, mode)
    }

    fn close(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.closed = true;
        debug!("Closed {}", DungeonTask::Raw.id());
        Ok(())
    }
}
