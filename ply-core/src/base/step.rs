//! Environment step.
use super::{Action, Env};

/// Additional information returned by rich environments.
pub trait Info {
    /// Returns how the episode ended, if the environment reports it.
    fn end_status(&self) -> Option<String> {
        None
    }
}

impl Info for () {}

/// Represents the result of applying an action `a_t`: the observation
/// `o_t+1` and, for rich environments, the reward `r_t` and an info object.
///
/// Minimal environments fill only `obs` and `is_terminated`.
pub struct Step<E: Env> {
    /// Action.
    pub act: Action,

    /// Observation.
    pub obs: E::Obs,

    /// Reward. `None` in minimal environments.
    pub reward: Option<f32>,

    /// Flag denoting if the episode is terminated by the environment.
    pub is_terminated: bool,

    /// Flag denoting if the episode is truncated by the environment.
    pub is_truncated: bool,

    /// Information defined by the environment. `None` in minimal environments.
    pub info: Option<E::Info>,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] of a rich environment.
    pub fn rich(
        act: Action,
        obs: E::Obs,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
        info: E::Info,
    ) -> Self {
        Step {
            act,
            obs,
            reward: Some(reward),
            is_terminated,
            is_truncated,
            info: Some(info),
        }
    }

    /// Constructs a [`Step`] of a minimal environment.
    pub fn minimal(act: Action, obs: E::Obs, done: bool) -> Self {
        Step {
            act,
            obs,
            reward: None,
            is_terminated: done,
            is_truncated: false,
            info: None,
        }
    }

    #[inline]
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
