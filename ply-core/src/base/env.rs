//! Environment.
use super::{Action, ActionSpace, Info, Obs, Step};
use crate::{error::PlyError, Seeds};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The shape of the values returned by [`Env::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvVariant {
    /// Steps carry a reward and an info object.
    /// The environment truncates episodes by itself.
    Rich,

    /// Steps carry only the observation and a done flag.
    /// The environment never truncates, the caller enforces the step cap.
    Minimal,
}

/// How an environment draws its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Just the game screen.
    Human,

    /// The game screen with status lines.
    Full,

    /// The game screen with ANSI colours.
    Ansi,
}

impl Default for RenderMode {
    fn default() -> Self {
        Self::Human
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Full => write!(f, "full"),
            Self::Ansi => write!(f, "ansi"),
        }
    }
}

impl FromStr for RenderMode {
    type Err = PlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(Self::Human),
            "full" => Ok(Self::Full),
            "ansi" => Ok(Self::Ansi),
            _ => Err(PlyError::InvalidConfig(format!(
                "render mode must be one of human, full or ansi, got {:?}",
                s
            ))),
        }
    }
}

/// Represents a turn-based environment.
///
/// All methods are blocking and are never called concurrently on the same
/// handle. Failures are returned to the caller as they are; the session loop
/// does not retry any of them.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Observation of the environment.
    type Obs: Obs;

    /// Information in the [`Step`] object of rich environments.
    type Info: Info;

    /// Builds an environment, optionally seeded.
    fn build(config: &Self::Config, seeds: Option<&Seeds>) -> Result<Self>
    where
        Self: Sized;

    /// Returns whether steps of this environment are rich or minimal.
    fn variant(&self) -> EnvVariant;

    /// Returns the actions accepted by [`Env::step`].
    fn action_space(&self) -> &ActionSpace;

    /// Starts a new episode and returns its first observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Applies an action.
    ///
    /// The action is always a member of [`Env::action_space`].
    fn step(&mut self, act: &Action) -> Result<Step<Self>>
    where
        Self: Sized;

    /// Draws the current state.
    fn render(&mut self, mode: RenderMode) -> Result<()>;

    /// Releases the environment. Called exactly once, at the end of a session.
    fn close(&mut self) -> Result<()>;
}
