//! Configuration of [`Session`](super::Session).
use crate::{error::PlyError, RenderMode};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt,
    fs::File,
    io::{BufReader, Write},
    path::Path,
    str::FromStr,
};

/// Who chooses the actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// An operator typing keys.
    Human,

    /// A uniform random policy.
    Random,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Random => write!(f, "random"),
        }
    }
}

impl FromStr for Mode {
    type Err = PlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(Self::Human),
            "random" => Ok(Self::Random),
            _ => Err(PlyError::InvalidConfig(format!(
                "mode must be either human or random, got {:?}",
                s
            ))),
        }
    }
}

/// Seeds handed to the environment: a single integer, or named integers
/// (for example `core`, `disp` and `reseed`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seeds {
    /// One seed for everything.
    Single(u64),

    /// Seeds by name.
    Named(BTreeMap<String, u64>),
}

impl Seeds {
    /// Parses seeds written in YAML flow syntax, like `42` or `{core: 1, disp: 2}`.
    pub fn parse(s: &str) -> Result<Self, PlyError> {
        serde_yaml::from_str(s).map_err(|e| PlyError::InvalidSeeds {
            value: s.to_string(),
            reason: e.to_string(),
        })
    }

    /// Returns the seed of the given name.
    ///
    /// A single seed answers to every name.
    pub fn get(&self, name: &str) -> Option<u64> {
        match self {
            Self::Single(seed) => Some(*seed),
            Self::Named(seeds) => seeds.get(name).copied(),
        }
    }

    /// Returns the main seed: the single seed, or the one named `core`.
    pub fn core(&self) -> Option<u64> {
        self.get("core")
    }
}

/// Configuration of [`Session`](super::Session).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct SessionConfig {
    /// Who chooses the actions.
    pub mode: Mode,

    /// Identifier of the environment.
    pub env: String,

    /// Number of episodes to play before the session ends.
    pub episodes: usize,

    /// Step cap of an episode.
    pub max_steps: usize,

    /// Seeds of the environment and the random policy.
    pub seeds: Option<Seeds>,

    /// Whether the environment is rendered before every action request.
    pub render: bool,

    /// How the environment is rendered.
    pub render_mode: RenderMode,

    /// Print frames one after another instead of drawing over the last one.
    pub print_frames_separately: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Human,
            env: "Dungeon-v0".to_string(),
            episodes: 1,
            max_steps: 1_000_000,
            seeds: None,
            render: true,
            render_mode: RenderMode::Human,
            print_frames_separately: false,
        }
    }
}

impl SessionConfig {
    /// Sets who chooses the actions.
    pub fn mode(mut self, v: Mode) -> Self {
        self.mode = v;
        self
    }

    /// Sets the identifier of the environment.
    pub fn env(mut self, v: impl Into<String>) -> Self {
        self.env = v.into();
        self
    }

    /// Sets the number of episodes.
    pub fn episodes(mut self, v: usize) -> Self {
        self.episodes = v;
        self
    }

    /// Sets the step cap of an episode.
    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the seeds.
    pub fn seeds(mut self, v: Option<Seeds>) -> Self {
        self.seeds = v;
        self
    }

    /// Enables or disables rendering.
    pub fn render(mut self, v: bool) -> Self {
        self.render = v;
        self
    }

    /// Sets the render mode.
    pub fn render_mode(mut self, v: RenderMode) -> Self {
        self.render_mode = v;
        self
    }

    /// Sets whether frames are printed one after another.
    pub fn print_frames_separately(mut self, v: bool) -> Self {
        self.print_frames_separately = v;
        self
    }

    /// Checks the values that have a valid range.
    pub fn validate(&self) -> Result<(), PlyError> {
        if self.episodes == 0 {
            return Err(PlyError::InvalidConfig(
                "episodes must be at least 1".to_string(),
            ));
        }
        if self.max_steps == 0 {
            return Err(PlyError::InvalidConfig(
                "max_steps must be at least 1".to_string(),
            ));
        }
        if self.env.is_empty() {
            return Err(PlyError::InvalidConfig(
                "env must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`SessionConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`SessionConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
