//! Actions and action spaces.
use fastrand::Rng;
use std::fmt;

/// An action accepted by an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Position of the action in an [`ActionSpace::Indexed`] space.
    Index(usize),

    /// A key code of an [`ActionSpace::RawCode`] space.
    Code(u8),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(ix) => write!(f, "{}", ix),
            Self::Code(code) => write!(f, "{}", code),
        }
    }
}

/// The set of actions of an environment.
///
/// Both variants are backed by a fixed ordered list of key codes, which is
/// what a human operator types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSpace {
    /// Actions are indices; `codes[i]` is the key of action `i`.
    Indexed {
        /// Key codes, one per action index.
        codes: Vec<u8>,
    },

    /// Actions are the key codes themselves.
    RawCode {
        /// Accepted key codes.
        codes: Vec<u8>,
    },
}

impl ActionSpace {
    /// Constructs an indexed action space.
    pub fn indexed(codes: impl Into<Vec<u8>>) -> Self {
        Self::Indexed {
            codes: codes.into(),
        }
    }

    /// Constructs a raw-code action space.
    pub fn raw_code(codes: impl Into<Vec<u8>>) -> Self {
        Self::RawCode {
            codes: codes.into(),
        }
    }

    /// Returns the key codes of the space.
    pub fn codes(&self) -> &[u8] {
        match self {
            Self::Indexed { codes } | Self::RawCode { codes } => codes,
        }
    }

    /// Returns the number of actions.
    pub fn len(&self) -> usize {
        self.codes().len()
    }

    /// Returns `true` if the space has no actions.
    pub fn is_empty(&self) -> bool {
        self.codes().is_empty()
    }

    /// Draws an action uniformly at random. Returns `None` for an empty space.
    pub fn sample(&self, rng: &mut Rng) -> Option<Action> {
        if self.is_empty() {
            return None;
        }
        let ix = rng.usize(..self.len());
        Some(match self {
            Self::Indexed { .. } => Action::Index(ix),
            Self::RawCode { codes } => Action::Code(codes[ix]),
        })
    }

    /// Maps a key code to an action, or `None` if the code is not in the space.
    pub fn resolve(&self, code: u8) -> Option<Action> {
        match self {
            Self::Indexed { codes } => codes.iter().position(|&c| c == code).map(Action::Index),
            Self::RawCode { codes } => codes.contains(&code).then(|| Action::Code(code)),
        }
    }

    /// Returns `true` if the action belongs to the space.
    pub fn contains(&self, act: &Action) -> bool {
        self.code_of(act).is_some()
    }

    /// Returns the key code of an action, or `None` if it is not in the space.
    pub fn code_of(&self, act: &Action) -> Option<u8> {
        match (self, act) {
            (Self::Indexed { codes }, Action::Index(ix)) => codes.get(*ix).copied(),
            (Self::RawCode { codes }, Action::Code(code)) => {
                codes.contains(code).then(|| *code)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CODES: [u8; 4] = [13, b'k', b'l', b'j'];

    #[test]
    fn test_indexed_resolve_every_member() {
        let space = ActionSpace::indexed(CODES);
        for (ix, &code) in CODES.iter().enumerate() {
            assert_eq!(space.resolve(code), Some(Action::Index(ix)));
        }
    }

    #[test]
    fn test_indexed_resolve_rejects_outsiders() {
        let space = ActionSpace::indexed(CODES);
        for code in (0..=255u8).filter(|c| !CODES.contains(c)) {
            assert_eq!(space.resolve(code), None);
        }
    }

    #[test]
    fn test_raw_code_resolve() {
        let space = ActionSpace::raw_code(CODES);
        assert_eq!(space.resolve(b'k'), Some(Action::Code(b'k')));
        assert_eq!(space.resolve(b'x'), None);
    }

    #[test]
    fn test_sample_is_member() {
        let mut rng = Rng::with_seed(42);
        for space in [ActionSpace::indexed(CODES), ActionSpace::raw_code(CODES)] {
            for _ in 0..100 {
                let act = space.sample(&mut rng).unwrap();
                assert!(space.contains(&act));
            }
        }
    }

    #[test]
    fn test_sample_covers_all_codes() {
        let mut rng = Rng::with_seed(7);
        let space = ActionSpace::raw_code(CODES);
        let mut seen = [false; 4];
        for _ in 0..1000 {
            if let Some(Action::Code(code)) = space.sample(&mut rng) {
                let ix = CODES.iter().position(|&c| c == code).unwrap();
                seen[ix] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_empty_space() {
        let mut rng = Rng::with_seed(0);
        let space = ActionSpace::indexed(Vec::new());
        assert!(space.is_empty());
        assert_eq!(space.sample(&mut rng), None);
    }

    #[test]
    fn test_code_of_mismatched_variant() {
        let space = ActionSpace::indexed(CODES);
        assert_eq!(space.code_of(&Action::Index(1)), Some(b'k'));
        assert_eq!(space.code_of(&Action::Code(b'k')), None);
        assert_eq!(space.code_of(&Action::Index(4)), None);
    }
}
