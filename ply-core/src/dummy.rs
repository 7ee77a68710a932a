//! Scripted environments and input devices, used for tests.
use crate::{
    terminal::InputDevice, Action, ActionSpace, Env, EnvVariant, Info, Obs, RenderMode, Seeds,
    Step,
};
use anyhow::{bail, Result};
use std::{cell::RefCell, collections::VecDeque, io, rc::Rc, time::Duration};

/// Key codes accepted by [`ScriptedEnv`].
pub const SCRIPTED_CODES: [u8; 5] = [13, b'k', b'j', b'h', b'l'];

/// Observation of [`ScriptedEnv`]: the step number within the episode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptedObs(pub usize);

impl Obs for ScriptedObs {
    fn status(&self) -> Option<String> {
        Some(format!("t={}", self.0))
    }
}

/// Info of [`ScriptedEnv`].
#[derive(Clone, Debug)]
pub struct ScriptedInfo {
    /// `"RUNNING"`, or `"DONE"` on the last step of an episode.
    pub end_status: String,
}

impl Info for ScriptedInfo {
    fn end_status(&self) -> Option<String> {
        Some(self.end_status.clone())
    }
}

/// Calls made on a [`ScriptedEnv`].
#[derive(Clone, Debug, Default)]
pub struct EnvCalls {
    /// Number of `reset` calls.
    pub resets: usize,
    /// Number of `step` calls.
    pub steps: usize,
    /// Number of `render` calls.
    pub renders: usize,
    /// Number of `close` calls.
    pub closes: usize,
    /// Actions passed to `step`, in order.
    pub actions: Vec<Action>,
}

/// Configuration of [`ScriptedEnv`].
#[derive(Clone, Debug)]
pub struct ScriptedEnvConfig {
    variant: EnvVariant,
    rewards: Vec<f32>,
    done_at: Option<usize>,
    truncate_at: Option<usize>,
    fail_step_at: Option<usize>,
    fail_close: bool,
    step_delay: Duration,
}

impl ScriptedEnvConfig {
    /// A minimal environment that never ends episodes by itself.
    pub fn minimal() -> Self {
        Self {
            variant: EnvVariant::Minimal,
            rewards: Vec::new(),
            done_at: None,
            truncate_at: None,
            fail_step_at: None,
            fail_close: false,
            step_delay: Duration::from_micros(100),
        }
    }

    /// A rich environment whose `t`-th step (1-based) yields `rewards[t - 1]`,
    /// or zero past the end of `rewards`.
    pub fn rich(rewards: Vec<f32>) -> Self {
        Self {
            variant: EnvVariant::Rich,
            rewards,
            ..Self::minimal()
        }
    }

    /// Terminates the episode at the given step.
    pub fn done_at(mut self, v: Option<usize>) -> Self {
        self.done_at = v;
        self
    }

    /// Truncates the episode at the given step. Only rich environments truncate.
    pub fn truncate_at(mut self, v: Option<usize>) -> Self {
        self.truncate_at = v;
        self
    }

    /// Fails the given step of the session (1-based, counted across episodes).
    pub fn fail_step_at(mut self, v: Option<usize>) -> Self {
        self.fail_step_at = v;
        self
    }

    /// Fails `close`.
    pub fn fail_close(mut self, v: bool) -> Self {
        self.fail_close = v;
        self
    }
}

/// An environment replaying a fixed script, recording the calls made on it.
pub struct ScriptedEnv {
    config: ScriptedEnvConfig,
    space: ActionSpace,
    t: usize,
    calls: Rc<RefCell<EnvCalls>>,
}

impl ScriptedEnv {
    /// Returns a snapshot of the calls made so far.
    pub fn calls(&self) -> EnvCalls {
        self.calls.borrow().clone()
    }

    /// Returns a handle to the call log that outlives the environment.
    pub fn calls_handle(&self) -> Rc<RefCell<EnvCalls>> {
        Rc::clone(&self.calls)
    }
}

impl Env for ScriptedEnv {
    type Config = ScriptedEnvConfig;
    type Obs = ScriptedObs;
    type Info = ScriptedInfo;

    fn build(config: &Self::Config, _seeds: Option<&Seeds>) -> Result<Self> {
        let space = match config.variant {
            EnvVariant::Rich => ActionSpace::indexed(SCRIPTED_CODES),
            EnvVariant::Minimal => ActionSpace::raw_code(SCRIPTED_CODES),
        };
        Ok(Self {
            config: config.clone(),
            space,
            t: 0,
            calls: Rc::new(RefCell::new(EnvCalls::default())),
        })
    }

    fn variant(&self) -> EnvVariant {
        self.config.variant
    }

    fn action_space(&self) -> &ActionSpace {
        &self.space
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.calls.borrow_mut().resets += 1;
        self.t = 0;
        Ok(ScriptedObs(0))
    }

    fn step(&mut self, act: &Action) -> Result<Step<Self>> {
        let total = {
            let mut calls = self.calls.borrow_mut();
            calls.steps += 1;
            calls.actions.push(*act);
            calls.steps
        };
        if self.config.fail_step_at == Some(total) {
            bail!("scripted failure at step {}", total);
        }
        if !self.config.step_delay.is_zero() {
            std::thread::sleep(self.config.step_delay);
        }

        self.t += 1;
        let obs = ScriptedObs(self.t);
        let is_terminated = self.config.done_at == Some(self.t);

        Ok(match self.config.variant {
            EnvVariant::Minimal => Step::minimal(*act, obs, is_terminated),
            EnvVariant::Rich => {
                let reward = self.config.rewards.get(self.t - 1).copied().unwrap_or(0.0);
                let is_truncated = self.config.truncate_at == Some(self.t);
                let end_status = if is_terminated || is_truncated {
                    "DONE"
                } else {
                    "RUNNING"
                };
                let info = ScriptedInfo {
                    end_status: end_status.to_string(),
                };
                Step::rich(*act, obs, reward, is_terminated, is_truncated, info)
            }
        })
    }

    fn render(&mut self, _mode: RenderMode) -> Result<()> {
        self.calls.borrow_mut().renders += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.calls.borrow_mut().closes += 1;
        if self.config.fail_close {
            bail!("scripted failure on close");
        }
        Ok(())
    }
}

/// An input device replaying a fixed sequence of bytes.
///
/// Tracks whether it is in raw mode, so tests can check that the mode is
/// restored. Reading past the end of the script fails like a closed stdin.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    bursts: VecDeque<Vec<u8>>,
    pending: VecDeque<u8>,
    raw: bool,
    acquisitions: usize,
    discarded: usize,
}

impl ScriptedInput {
    /// Constructs a device that will yield `bytes` in order, one key press
    /// per byte.
    pub fn new(bytes: impl IntoIterator<Item = u8>) -> Self {
        Self::bursts(bytes.into_iter().map(|b| vec![b]))
    }

    /// Constructs a device on which each burst of bytes arrives at once, like
    /// the escape sequence of an arrow key. Bytes of a burst left unread when
    /// raw mode is entered or restored are discarded.
    pub fn bursts(bursts: impl IntoIterator<Item = Vec<u8>>) -> Self {
        Self {
            bursts: bursts.into_iter().collect(),
            pending: VecDeque::new(),
            raw: false,
            acquisitions: 0,
            discarded: 0,
        }
    }

    fn discard_pending(&mut self) {
        self.discarded += self.pending.len();
        self.pending.clear();
    }

    /// Returns `true` while the device is in raw mode.
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    /// Returns how many times raw mode was entered.
    pub fn acquisitions(&self) -> usize {
        self.acquisitions
    }

    /// Returns the number of bytes neither read nor discarded yet.
    pub fn remaining(&self) -> usize {
        self.pending.len() + self.bursts.iter().map(Vec::len).sum::<usize>()
    }

    /// Returns the number of bytes discarded as pending input.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

impl InputDevice for ScriptedInput {
    fn enter_raw(&mut self) -> io::Result<()> {
        if self.raw {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "raw mode is already held",
            ));
        }
        self.raw = true;
        self.acquisitions += 1;
        self.discard_pending();
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        self.discard_pending();
        self.raw = false;
        Ok(())
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        if !self.raw {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "read outside of raw mode",
            ));
        }
        if self.pending.is_empty() {
            if let Some(burst) = self.bursts.pop_front() {
                self.pending.extend(burst);
            }
        }
        self.pending
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input exhausted"))
    }
}
