//! Game rules of the dungeon.
use crate::{
    act::Command,
    obs::{Blstats, DungeonObs},
};
use crossterm::style::{style, Color, Stylize};
use fastrand::Rng;
use ply_core::RenderMode;
use std::{fmt, io::Write};

pub(crate) const WALL: u8 = b'#';
pub(crate) const FLOOR: u8 = b'.';
pub(crate) const GOLD: u8 = b'$';
pub(crate) const STAIRS: u8 = b'>';
pub(crate) const PLAYER: u8 = b'@';

/// Reported state of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndStatus {
    /// The episode is going on.
    Running,

    /// The goal of the task was reached.
    TaskSuccessful,

    /// The episode was cut by the step limit.
    Aborted,
}

impl fmt::Display for EndStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "RUNNING"),
            Self::TaskSuccessful => write!(f, "TASK_SUCCESSFUL"),
            Self::Aborted => write!(f, "ABORTED"),
        }
    }
}

/// What happened on a turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Outcome {
    /// Gold picked up.
    pub gold: u32,

    /// The player went down the stairs.
    pub descended: bool,
}

/// A level of the dungeon with the player in it.
///
/// Pillars are only ever placed on cells with even coordinates, so every
/// floor cell of a level is reachable from every other one.
pub(crate) struct Dungeon {
    width: usize,
    height: usize,
    n_gold: usize,
    tiles: Vec<u8>,
    gold: Vec<u32>,
    player: (usize, usize),
    depth: u32,
    turn: u32,
    purse: u32,
    message: String,
    layout_rng: Rng,
    gold_rng: Rng,
}

impl Dungeon {
    /// Creates a dungeon at depth 1.
    ///
    /// `layout_seed` drives the maps, `gold_seed` the size of gold piles.
    pub fn new(
        width: usize,
        height: usize,
        n_gold: usize,
        layout_seed: Option<u64>,
        gold_seed: Option<u64>,
    ) -> Self {
        let rng = |seed: Option<u64>| match seed {
            Some(seed) => Rng::with_seed(seed),
            None => Rng::new(),
        };
        let mut dungeon = Self {
            width,
            height,
            n_gold,
            tiles: vec![],
            gold: vec![],
            player: (1, 1),
            depth: 1,
            turn: 0,
            purse: 0,
            message: String::new(),
            layout_rng: rng(layout_seed),
            gold_rng: rng(gold_seed),
        };
        dungeon.generate();
        dungeon
    }

    /// Starts over at depth 1 on a fresh level.
    pub fn restart(&mut self) {
        self.depth = 1;
        self.turn = 0;
        self.purse = 0;
        self.generate();
        self.message = "Welcome to the dungeon.".to_string();
    }

    /// Goes down to a fresh level.
    pub fn descend(&mut self) {
        self.depth += 1;
        self.generate();
        self.message = format!("You reach level {}.", self.depth);
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn generate(&mut self) {
        let (w, h) = (self.width, self.height);
        self.tiles = vec![FLOOR; w * h];
        self.gold = vec![0; w * h];
        for y in 0..h {
            for x in 0..w {
                let border = x == 0 || y == 0 || x == w - 1 || y == h - 1;
                let pillar = x % 2 == 0 && y % 2 == 0 && self.layout_rng.bool();
                if border || pillar {
                    self.tiles[y * w + x] = WALL;
                }
            }
        }

        let mut free: Vec<usize> = (0..w * h).filter(|&i| self.tiles[i] == FLOOR).collect();
        self.layout_rng.shuffle(&mut free);
        let mut free = free.into_iter();

        // Sizes are validated by the config, so there are at least two cells.
        if let Some(i) = free.next() {
            self.player = (i % w, i / w);
        }
        if let Some(i) = free.next() {
            self.tiles[i] = STAIRS;
        }
        for i in free.take(self.n_gold) {
            self.tiles[i] = GOLD;
            self.gold[i] = self.gold_rng.u32(1..=20);
        }
    }

    fn tile(&self, x: i64, y: i64) -> Option<u8> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.tiles[y as usize * self.width + x as usize])
    }

    /// Plays one turn.
    pub fn apply(&mut self, command: Command) -> Outcome {
        self.turn += 1;
        self.message.clear();

        let (dx, dy, run) = match command {
            Command::More => return Outcome::default(),
            Command::Move { dx, dy, run } => (dx as i64, dy as i64, run),
        };

        let mut outcome = Outcome::default();
        let mut moved = false;
        loop {
            let (x, y) = (self.player.0 as i64 + dx, self.player.1 as i64 + dy);
            match self.tile(x, y) {
                None | Some(WALL) => {
                    if !moved {
                        self.message = "You can't move there.".to_string();
                    }
                    break;
                }
                Some(tile) => {
                    moved = true;
                    self.player = (x as usize, y as usize);
                    let i = y as usize * self.width + x as usize;
                    if tile == GOLD {
                        outcome.gold = self.gold[i];
                        self.purse += self.gold[i];
                        self.message = format!("{} gold pieces.", self.gold[i]);
                        self.tiles[i] = FLOOR;
                        self.gold[i] = 0;
                        break;
                    }
                    if tile == STAIRS {
                        outcome.descended = true;
                        break;
                    }
                }
            }
            if !run {
                break;
            }
        }
        outcome
    }

    fn chars(&self) -> Vec<Vec<u8>> {
        let mut rows: Vec<Vec<u8>> = self.tiles.chunks(self.width).map(<[u8]>::to_vec).collect();
        rows[self.player.1][self.player.0] = PLAYER;
        rows
    }

    fn blstats(&self) -> Blstats {
        Blstats {
            x: self.player.0,
            y: self.player.1,
            gold: self.purse,
            depth: self.depth,
            turn: self.turn,
        }
    }

    pub fn obs(&self) -> DungeonObs {
        DungeonObs {
            chars: self.chars(),
            blstats: self.blstats(),
            message: self.message.clone(),
        }
    }

    /// Draws the message line and the map, plus the status line in
    /// [`RenderMode::Full`].
    pub fn draw<W: Write>(&self, out: &mut W, mode: RenderMode) -> std::io::Result<()> {
        writeln!(out, "{:1$}", self.message, self.width)?;
        for row in self.chars() {
            for ch in row {
                match mode {
                    RenderMode::Ansi => write!(out, "{}", colored(ch))?,
                    _ => write!(out, "{}", ch as char)?,
                }
            }
            writeln!(out)?;
        }
        if mode == RenderMode::Full {
            writeln!(out, "{}", self.blstats())?;
        }
        Ok(())
    }
}

fn colored(ch: u8) -> impl fmt::Display {
    let ch = ch as char;
    match ch as u8 {
        PLAYER => style(ch).with(Color::White).bold(),
        GOLD => style(ch).with(Color::Yellow),
        STAIRS => style(ch).with(Color::Cyan),
        WALL => style(ch).with(Color::DarkGrey),
        _ => style(ch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dungeon() -> Dungeon {
        Dungeon::new(20, 8, 4, Some(7), Some(11))
    }

    fn count(d: &Dungeon, tile: u8) -> usize {
        d.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Flood fill from the player over everything that is not a wall.
    fn reachable(d: &Dungeon) -> usize {
        let mut seen = vec![false; d.width * d.height];
        let mut stack = vec![d.player];
        while let Some((x, y)) = stack.pop() {
            let i = y * d.width + x;
            if seen[i] || d.tiles[i] == WALL {
                continue;
            }
            seen[i] = true;
            stack.extend([(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]);
        }
        seen.iter().filter(|&&s| s).count()
    }

    #[test]
    fn test_level_layout() {
        let d = dungeon();
        assert_eq!(count(&d, STAIRS), 1);
        assert_eq!(count(&d, GOLD), 4);
        assert!(d.gold.iter().all(|&g| g <= 20));
        assert_ne!(d.tiles[d.player.1 * d.width + d.player.0], WALL);
        assert_eq!(reachable(&d), d.tiles.len() - count(&d, WALL));
    }

    #[test]
    fn test_same_seeds_same_level() {
        let (a, b) = (dungeon(), dungeon());
        assert_eq!(a.tiles, b.tiles);
        assert_eq!(a.gold, b.gold);
        assert_eq!(a.player, b.player);
    }

    #[test]
    fn test_blocked_move_keeps_position() {
        let mut d = dungeon();
        d.player = (1, 1);
        let outcome = d.apply(Command::Move {
            dx: -1,
            dy: 0,
            run: false,
        });
        assert_eq!(outcome, Outcome::default());
        assert_eq!(d.player, (1, 1));
        assert_eq!(d.message, "You can't move there.");
        assert_eq!(d.turn, 1);
    }

    #[test]
    fn test_pick_up_gold() {
        let mut d = dungeon();
        d.player = (1, 1);
        let i = d.width + 2;
        d.tiles[i] = GOLD;
        d.gold[i] = 5;

        let outcome = d.apply(Command::Move {
            dx: 1,
            dy: 0,
            run: true,
        });
        assert_eq!(outcome.gold, 5);
        assert_eq!(d.player, (2, 1));
        assert_eq!(d.tiles[i], FLOOR);
        assert_eq!(d.obs().blstats.gold, 5);
    }

    #[test]
    fn test_run_stops_at_wall() {
        let mut d = dungeon();
        // Row 1 has odd y and therefore no pillars.
        for x in 1..d.width - 1 {
            d.tiles[d.width + x] = FLOOR;
        }
        d.player = (1, 1);
        d.apply(Command::Move {
            dx: 1,
            dy: 0,
            run: true,
        });
        assert_eq!(d.player, (d.width - 2, 1));
    }

    #[test]
    fn test_stairs_and_descend() {
        let mut d = dungeon();
        d.player = (1, 1);
        d.tiles[d.width + 2] = STAIRS;
        let outcome = d.apply(Command::Move {
            dx: 1,
            dy: 0,
            run: false,
        });
        assert!(outcome.descended);

        d.descend();
        assert_eq!(d.depth(), 2);
        d.restart();
        assert_eq!(d.depth(), 1);
        assert_eq!(d.obs().blstats.turn, 0);
    }

    #[test]
    fn test_draw() {
        let d = dungeon();
        let mut out = Vec::new();
        d.draw(&mut out, RenderMode::Human).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1 + d.height);
        assert_eq!(text.matches('@').count(), 1);

        let mut out = Vec::new();
        d.draw(&mut out, RenderMode::Full).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.lines().last().unwrap().starts_with("Dlvl:1"));
    }
}
