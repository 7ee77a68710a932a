//! Turning operator input or random draws into environment actions.
use crate::{
    error::PlyError,
    terminal::{InputDevice, RawScope, INTERRUPT},
    Action, ActionSpace,
};
use anyhow::Result;
use crossterm::{cursor::MoveUp, queue};
use fastrand::Rng;
use log::info;
use std::io::Write;

/// Outcome of an action request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A member of the action space.
    Action(Action),

    /// The operator asked to end the session.
    Exit,
}

/// Produces the next action for an environment.
pub trait ActionResolver {
    /// Returns a member of `space`, or [`Resolution::Exit`].
    ///
    /// Input that does not map to an action is handled inside this call and
    /// never reaches the caller.
    fn resolve(&mut self, space: &ActionSpace) -> Result<Resolution>;
}

impl<R: ActionResolver + ?Sized> ActionResolver for Box<R> {
    fn resolve(&mut self, space: &ActionSpace) -> Result<Resolution> {
        (**self).resolve(space)
    }
}

/// Draws actions uniformly at random. Never exits.
pub struct RandomResolver {
    rng: Rng,
}

impl RandomResolver {
    /// Constructs a resolver, seeded if `seed` is given.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        Self { rng }
    }
}

impl ActionResolver for RandomResolver {
    fn resolve(&mut self, space: &ActionSpace) -> Result<Resolution> {
        let act = space
            .sample(&mut self.rng)
            .ok_or(PlyError::EmptyActionSpace)?;
        if let Action::Code(code) = act {
            info!("Random action: {}", code);
        }
        Ok(Resolution::Action(act))
    }
}

/// Reads actions typed by an operator.
///
/// Each request reads single bytes from `device` in raw mode until one maps
/// to an action. Rejected bytes produce a retry prompt on `out`. The
/// [`INTERRUPT`] code ends the session.
pub struct HumanResolver<D, W> {
    device: D,
    out: W,
    print_frames_separately: bool,
}

impl<D: InputDevice, W: Write> HumanResolver<D, W> {
    /// Constructs a resolver reading from `device` and prompting on `out`.
    pub fn new(device: D, out: W) -> Self {
        Self {
            device,
            out,
            print_frames_separately: false,
        }
    }

    /// If `false` (default), the retry prompt moves the cursor back up so the
    /// next frame overwrites it.
    pub fn print_frames_separately(mut self, v: bool) -> Self {
        self.print_frames_separately = v;
        self
    }

    /// Returns the input device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Returns the prompt output.
    pub fn out(&self) -> &W {
        &self.out
    }

    fn read_code(&mut self) -> Result<u8> {
        let mut scope = RawScope::acquire(&mut self.device)?;
        Ok(scope.read_one()?)
    }

    fn prompt_retry(&mut self, code: u8) -> Result<()> {
        writeln!(
            self.out,
            "Selected action '{}' is not in action list. Please try again.",
            char::from(code).escape_default()
        )?;
        if !self.print_frames_separately {
            queue!(self.out, MoveUp(2))?;
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<D: InputDevice, W: Write> ActionResolver for HumanResolver<D, W> {
    fn resolve(&mut self, space: &ActionSpace) -> Result<Resolution> {
        loop {
            let code = self.read_code()?;

            if code == INTERRUPT {
                writeln!(self.out, "Received exit code {}. Aborting.", code)?;
                self.out.flush()?;
                return Ok(Resolution::Exit);
            }

            match space.resolve(code) {
                Some(act) => return Ok(Resolution::Action(act)),
                None => self.prompt_retry(code)?,
            }
        }
    }
}
