//! Commands of [`DungeonEnv`](crate::DungeonEnv) and their key codes.
use std::iter;

/// Dismisses the current message (`Enter`).
pub const MORE: u8 = b'\r';

/// Moves one square: north, east, south, west, north-east, south-east,
/// south-west, north-west.
pub const COMPASS: [u8; 8] = [b'k', b'l', b'j', b'h', b'u', b'n', b'b', b'y'];

/// Runs in a direction until something interesting is reached. Same order as
/// [`COMPASS`].
pub const COMPASS_LONGER: [u8; 8] = [b'K', b'L', b'J', b'H', b'U', b'N', b'B', b'Y'];

const DELTAS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Returns the key codes of all commands. The position of a code is its
/// action index.
pub fn action_codes() -> Vec<u8> {
    iter::once(MORE)
        .chain(COMPASS)
        .chain(COMPASS_LONGER)
        .collect()
}

/// A command of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Dismiss the message.
    More,

    /// Move by `(dx, dy)`, once or repeatedly.
    Move {
        /// Column offset.
        dx: i32,
        /// Row offset.
        dy: i32,
        /// Keep moving until blocked or something is picked up.
        run: bool,
    },
}

impl Command {
    /// Decodes a key code.
    pub fn from_code(code: u8) -> Option<Self> {
        if code == MORE {
            return Some(Self::More);
        }
        let (ix, run) = match COMPASS.iter().position(|&c| c == code) {
            Some(ix) => (ix, false),
            None => (COMPASS_LONGER.iter().position(|&c| c == code)?, true),
        };
        let (dx, dy) = DELTAS[ix];
        Some(Self::Move { dx, dy, run })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_decodes() {
        let codes = action_codes();
        assert_eq!(codes.len(), 17);
        assert_eq!(codes[0], MORE);
        assert!(codes.iter().all(|&c| Command::from_code(c).is_some()));
    }

    #[test]
    fn test_decode() {
        assert_eq!(
            Command::from_code(b'y'),
            Some(Command::Move {
                dx: -1,
                dy: -1,
                run: false
            })
        );
        assert_eq!(
            Command::from_code(b'L'),
            Some(Command::Move {
                dx: 1,
                dy: 0,
                run: true
            })
        );
        assert_eq!(Command::from_code(b'x'), None);
    }
}
