use anyhow::Result;
use ply_core::{
    record::BufferedRecorder, resolver::RandomResolver, Env as _, Mode, Seeds, Session,
    SessionConfig,
};
use ply_dungeon_env::{DungeonConfig, DungeonEnv, DungeonTask};
use std::io;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seeds = Seeds::parse("42")?;
    let config = SessionConfig::default()
        .mode(Mode::Random)
        .env(DungeonTask::Gold.id())
        .episodes(5)
        .max_steps(200)
        .seeds(Some(seeds.clone()))
        .print_frames_separately(true);
    let env_config = DungeonConfig::default()
        .task(DungeonTask::Gold)
        .max_steps(Some(config.max_steps));

    let env = DungeonEnv::build(&env_config, Some(&seeds))?;
    let mut resolver = RandomResolver::new(seeds.core());
    let mut recorder = BufferedRecorder::new();
    let stats = Session::new(config, io::stdout())?.run(env, &mut resolver, &mut recorder)?;
    println!("{:?}", stats);

    Ok(())
}
