#![warn(missing_docs)]
//! Core of `ply`, a driver for playing episodes of turn-based environments.
//!
//! An episode is played either by a human operator typing keys in a raw-mode
//! terminal, or by a uniform random policy. The crate provides:
//!
//! * [`Env`], the reset/step/render/close interface of an environment, in a
//!   *rich* variant (reward and info per step) and a *minimal* variant
//!   (observation and done flag only).
//! * [`ActionSpace`], either indexed or a set of raw key codes.
//! * [`terminal`], the scoped raw-mode acquisition of the input device.
//! * [`resolver`], turning key presses or random draws into valid actions.
//! * [`EpisodeRunner`], [`StatsAggregator`] and [`Session`], which drive
//!   episodes and aggregate steps-per-second and reward statistics.
pub mod dummy;
pub mod error;
pub mod record;
pub mod resolver;
pub mod terminal;

mod base;
pub use base::{Action, ActionSpace, Env, EnvVariant, Info, Obs, RenderMode, Step};

mod episode;
pub use episode::{EpisodeRunner, EpisodeStats, Termination};

mod stats;
pub use stats::{SessionStats, StatsAggregator};

mod session;
pub use session::{Mode, Seeds, Session, SessionConfig};
