//! Errors in the library.
use std::{error::Error as StdError, fmt};
use thiserror::Error;

/// Operations of [`Env`](crate::Env) that can fail during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvOp {
    /// [`Env::reset`](crate::Env::reset).
    Reset,
    /// [`Env::step`](crate::Env::step).
    Step,
    /// [`Env::render`](crate::Env::render).
    Render,
    /// [`Env::close`](crate::Env::close).
    Close,
}

impl fmt::Display for EnvOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reset => write!(f, "reset"),
            Self::Step => write!(f, "step"),
            Self::Render => write!(f, "render"),
            Self::Close => write!(f, "close"),
        }
    }
}

/// Errors in the library.
#[derive(Error, Debug)]
pub enum PlyError {
    /// An operation of the environment failed.
    #[error("Failed to {op} the environment")]
    EnvOperation {
        /// The failed operation.
        op: EnvOp,
        /// The error returned by the environment.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The environment identifier does not name a known environment.
    #[error("Unknown environment id: {0:?}")]
    UnknownEnv(String),

    /// The seed string could not be parsed as an integer or a mapping of integers.
    #[error("Invalid seeds {value:?}: {reason}")]
    InvalidSeeds {
        /// The offending seed string.
        value: String,
        /// Why parsing failed.
        reason: String,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The action space has no actions to sample from.
    #[error("Action space is empty")]
    EmptyActionSpace,

    /// A rich environment returned a step without a reward.
    #[error("Rich environment returned a step without reward")]
    MissingReward,

    /// An episode finished in a duration too short to compute steps per second.
    #[error("Episode of {steps} steps finished in a degenerate duration ({secs:e} s)")]
    DegenerateDuration {
        /// Steps taken in the episode.
        steps: usize,
        /// Measured duration in seconds.
        secs: f64,
    },

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}

impl PlyError {
    /// Wraps an error returned by the environment.
    pub fn env_operation(op: EnvOp) -> impl FnOnce(anyhow::Error) -> Self {
        move |e| Self::EnvOperation {
            op,
            source: e.into(),
        }
    }
}
