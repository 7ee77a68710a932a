use clap::Parser;
use ply_core::{error::PlyError, Mode, RenderMode, Seeds, SessionConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Play episodes of a dungeon environment, by hand or with random actions
#[derive(Clone, Parser, Debug, Serialize, Deserialize)]
#[command(version, about)]
pub struct Args {
    /// On a fatal failure, dump the error chain and the configuration to
    /// stderr.
    #[arg(short, long)]
    pub debug: bool,

    /// "human" to type the actions, "random" to sample them.
    #[arg(short, long, default_value = "human")]
    pub mode: Mode,

    /// Id of the environment: "Dungeon-v0", "DungeonScore-v0" or "raw".
    #[arg(short, long, default_value = "Dungeon-v0")]
    pub env: String,

    /// Number of episodes to play.
    #[arg(short, long, default_value_t = 1)]
    pub ngames: usize,

    /// Number of steps after which an episode is truncated.
    #[arg(long, default_value_t = 1_000_000)]
    pub max_steps: usize,

    /// Seeds of the environment, like `42` or `{core: 1, disp: 2}`.
    #[arg(long)]
    pub seeds: Option<String>,

    /// Do not draw the environment before each action.
    #[arg(long)]
    pub no_render: bool,

    /// "human", "full" or "ansi".
    #[arg(long, default_value = "human")]
    pub render_mode: RenderMode,

    /// Print each frame below the previous one instead of over it.
    #[arg(short, long)]
    pub print_frames_separately: bool,

    /// Session configuration in YAML.
    /// When given, the session options above are ignored.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl TryFrom<&Args> for SessionConfig {
    type Error = PlyError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        let seeds = args.seeds.as_deref().map(Seeds::parse).transpose()?;
        Ok(SessionConfig::default()
            .mode(args.mode)
            .env(args.env.as_str())
            .episodes(args.ngames)
            .max_steps(args.max_steps)
            .seeds(seeds)
            .render(!args.no_render)
            .render_mode(args.render_mode)
            .print_frames_separately(args.print_frames_separately))
    }
}
