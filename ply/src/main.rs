mod args;
mod console;
use anyhow::Result;
use args::Args;
use clap::Parser;
use console::ConsoleRecorder;
use log::info;
use ply_core::{
    resolver::{ActionResolver, HumanResolver, RandomResolver},
    terminal::Tty,
    Env, Mode, Seeds, Session, SessionConfig, SessionStats,
};
use ply_dungeon_env::{DungeonConfig, DungeonEnv, DungeonTask, RawDungeon};
use std::io;

fn session_config(args: &Args) -> Result<SessionConfig> {
    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::try_from(args)?,
    };
    config.validate()?;
    Ok(config)
}

fn create_resolver(config: &SessionConfig) -> Box<dyn ActionResolver> {
    match config.mode {
        Mode::Random => {
            let seed = config.seeds.as_ref().and_then(Seeds::core);
            Box::new(RandomResolver::new(seed))
        }
        Mode::Human => Box::new(
            HumanResolver::new(Tty::new(), io::stdout())
                .print_frames_separately(config.print_frames_separately),
        ),
    }
}

fn play<E>(config: &SessionConfig, env_config: &E::Config) -> Result<SessionStats>
where
    E: Env,
{
    let env = E::build(env_config, config.seeds.as_ref())?;
    let mut resolver = create_resolver(config);
    let mut recorder = ConsoleRecorder::default();
    let mut session = Session::new(config.clone(), io::stdout())?;
    session.run(env, &mut resolver, &mut recorder)
}

fn run(args: &Args) -> Result<()> {
    let config = session_config(args)?;
    let task = DungeonTask::from_id(&config.env)?;
    let env_config = DungeonConfig::default()
        .task(task)
        .max_steps(Some(config.max_steps));
    info!(
        "Playing {} episodes of {} in {} mode",
        config.episodes, task, config.mode
    );

    match task {
        DungeonTask::Raw => play::<RawDungeon>(&config, &env_config)?,
        DungeonTask::Gold | DungeonTask::Score => play::<DungeonEnv>(&config, &env_config)?,
    };
    Ok(())
}

/// Prints what is needed to inspect a fatal failure.
fn dump(e: &anyhow::Error, args: &Args) {
    eprintln!("{:?}", e);
    match serde_yaml::to_string(args) {
        Ok(args) => eprintln!("Arguments:\n{}", args),
        Err(e) => eprintln!("Failed to serialize the arguments: {}", e),
    }
    if let Some(path) = &args.config {
        match SessionConfig::load(path) {
            Ok(config) => eprintln!("{:#?}", config),
            Err(e) => eprintln!("{:#}", e),
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let result = run(&args);
    if let Err(e) = &result {
        if args.debug {
            dump(e, &args);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ply_core::error::PlyError;
    use tempdir::TempDir;

    #[test]
    fn test_config_file_replaces_options() -> Result<()> {
        let dir = TempDir::new("ply")?;
        let path = dir.path().join("session.yaml");
        SessionConfig::default()
            .mode(Mode::Random)
            .episodes(3)
            .save(&path)?;

        let path = path.to_str().unwrap();
        let args = Args::parse_from(["ply", "-n", "7", "--config", path]);
        let config = session_config(&args)?;
        assert_eq!(config.episodes, 3);
        assert_eq!(config.mode, Mode::Random);
        Ok(())
    }

    #[test]
    fn test_startup_errors() {
        let args = Args::parse_from(["ply", "-n", "0"]);
        let err = run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlyError>(),
            Some(PlyError::InvalidConfig(_))
        ));

        let args = Args::parse_from(["ply", "-m", "random", "-e", "NetHack-v0"]);
        let err = run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PlyError>(),
            Some(PlyError::UnknownEnv(_))
        ));
    }

    #[test]
    fn test_random_sessions() -> Result<()> {
        for env in DungeonTask::IDS {
            let args = Args::parse_from([
                "ply",
                "-m",
                "random",
                "-e",
                env,
                "-n",
                "2",
                "--max-steps",
                "20",
                "--no-render",
                "--seeds",
                "5",
            ]);
            run(&args)?;
        }
        Ok(())
    }
}
