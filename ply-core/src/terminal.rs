//! Scoped raw-mode access to the input device.
//!
//! A human operator's key presses are read one byte at a time with the
//! terminal in raw mode: no line buffering, no echo, and control characters
//! such as Ctrl-C delivered as bytes instead of signals. Raw mode is entered
//! by [`RawScope::acquire`] and left when the scope is dropped, so the
//! terminal is restored on every exit path, including `?` propagation and
//! unwinding panics. Input pending when a scope starts or ends is
//! discarded, so a scope yields one byte even for keys that send an escape
//! sequence.
//!
//! ```no_run
//! use ply_core::terminal::{RawScope, Tty};
//!
//! # fn main() -> std::io::Result<()> {
//! let mut tty = Tty::new();
//! let code = {
//!     let mut scope = RawScope::acquire(&mut tty)?;
//!     scope.read_one()?
//! };
//! println!("read {}", code);
//! # Ok(())
//! # }
//! ```
use crossterm::terminal;
use log::warn;
use nix::{
    errno::Errno,
    sys::termios::{self, FlushArg},
    unistd,
};
use std::{
    io::{self, IsTerminal},
    os::fd::AsRawFd,
};

/// Returns the code produced by pressing Ctrl together with `c`.
pub const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

/// The code that ends a session when typed by the operator (Ctrl-C).
pub const INTERRUPT: u8 = ctrl(b'c');

/// A device from which an operator's key presses are read.
pub trait InputDevice {
    /// Switches the device to raw mode, remembering the current mode, and
    /// discards pending input.
    fn enter_raw(&mut self) -> io::Result<()>;

    /// Discards pending input and restores the mode active before
    /// [`InputDevice::enter_raw`].
    fn restore(&mut self) -> io::Result<()>;

    /// Blocks until one byte is available and returns it.
    fn read_byte(&mut self) -> io::Result<u8>;
}

/// Raw mode held on an [`InputDevice`] for as long as the scope lives.
///
/// The scope borrows the device exclusively, so nothing else can read from
/// it or change its mode until the scope is dropped.
pub struct RawScope<'a, D: InputDevice + ?Sized> {
    device: &'a mut D,
}

impl<'a, D: InputDevice + ?Sized> RawScope<'a, D> {
    /// Puts the device in raw mode.
    ///
    /// If entering raw mode fails, the device is restored before the error
    /// is returned.
    pub fn acquire(device: &'a mut D) -> io::Result<Self> {
        if let Err(e) = device.enter_raw() {
            if let Err(e_restore) = device.restore() {
                warn!("Failed to restore the terminal mode: {}", e_restore);
            }
            return Err(e);
        }
        Ok(Self { device })
    }

    /// Reads one input unit.
    pub fn read_one(&mut self) -> io::Result<u8> {
        self.device.read_byte()
    }
}

impl<'a, D: InputDevice + ?Sized> Drop for RawScope<'a, D> {
    fn drop(&mut self) {
        if let Err(e) = self.device.restore() {
            warn!("Failed to restore the terminal mode: {}", e);
        }
    }
}

/// The controlling terminal, read through standard input.
///
/// Bytes are read straight from the file descriptor, bypassing the buffer of
/// [`io::Stdin`].
pub struct Tty {
    stdin: io::Stdin,
}

impl Tty {
    /// Constructs a handle to the terminal on standard input.
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }

    fn discard_pending(&self) -> io::Result<()> {
        if self.stdin.is_terminal() {
            termios::tcflush(&self.stdin, FlushArg::TCIFLUSH)?;
        }
        Ok(())
    }
}

impl Default for Tty {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDevice for Tty {
    fn enter_raw(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.discard_pending()
    }

    fn restore(&mut self) -> io::Result<()> {
        let discarded = self.discard_pending();
        terminal::disable_raw_mode()?;
        discarded
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        loop {
            match unistd::read(self.stdin.as_raw_fd(), &mut buf) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "end of input",
                    ))
                }
                Ok(_) => return Ok(buf[0]),
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::ScriptedInput;

    #[test]
    fn test_interrupt_is_ctrl_c() {
        assert_eq!(INTERRUPT, 3);
        assert_eq!(ctrl(b'C'), 3);
    }

    #[test]
    fn test_scope_restores_on_drop() {
        let mut input = ScriptedInput::new(*b"k");
        {
            let mut scope = RawScope::acquire(&mut input).unwrap();
            assert_eq!(scope.read_one().unwrap(), b'k');
        }
        assert!(!input.is_raw());
        assert_eq!(input.acquisitions(), 1);
    }

    #[test]
    fn test_scope_restores_on_read_error() {
        let mut input = ScriptedInput::new(Vec::new());
        let res = {
            let mut scope = RawScope::acquire(&mut input).unwrap();
            scope.read_one()
        };
        assert!(res.is_err());
        assert!(!input.is_raw());
    }

    #[test]
    fn test_scope_yields_one_byte_per_key() {
        // An arrow key arrives as one burst of three bytes.
        let mut input = ScriptedInput::bursts([b"\x1b[A".to_vec(), b"k".to_vec()]);
        let first = {
            let mut scope = RawScope::acquire(&mut input).unwrap();
            scope.read_one().unwrap()
        };
        assert_eq!(first, 0x1b);
        assert_eq!(input.discarded(), 2);

        let second = {
            let mut scope = RawScope::acquire(&mut input).unwrap();
            scope.read_one().unwrap()
        };
        assert_eq!(second, b'k');
        assert_eq!(input.remaining(), 0);
        assert_eq!(input.discarded(), 2);
    }

    #[derive(Default)]
    struct NoRawMode {
        restores: usize,
    }

    impl InputDevice for NoRawMode {
        fn enter_raw(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "not a terminal"))
        }

        fn restore(&mut self) -> io::Result<()> {
            self.restores += 1;
            Err(io::Error::new(io::ErrorKind::Other, "not a terminal"))
        }

        fn read_byte(&mut self) -> io::Result<u8> {
            unreachable!()
        }
    }

    #[test]
    fn test_failed_acquire_returns_enter_error() {
        let mut device = NoRawMode::default();
        let err = RawScope::acquire(&mut device).err().unwrap();
        assert_eq!(err.to_string(), "not a terminal");
        assert_eq!(device.restores, 1);
    }

    #[test]
    fn test_scope_restores_on_panic() {
        let mut input = ScriptedInput::new(*b"k");
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = RawScope::acquire(&mut input).unwrap();
            panic!("failure while holding raw mode");
        }));
        assert!(res.is_err());
        assert!(!input.is_raw());
    }
}
