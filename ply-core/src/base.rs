//! Core functionalities.
mod action;
mod env;
mod step;
pub use action::{Action, ActionSpace};
pub use env::{Env, EnvVariant, RenderMode};
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
///
/// Observations are opaque to the session loop. They are only handed back
/// to the caller and, when rendering, asked for a one-line status summary.
pub trait Obs: Clone + Debug {
    /// Returns a status line shown below the rendered frame.
    ///
    /// The default implementation shows nothing.
    fn status(&self) -> Option<String> {
        None
    }
}
