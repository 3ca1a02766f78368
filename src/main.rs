use anyhow::Context;
use clap::Parser;
use rfplayer::session::parse_script;
use rfplayer::PlayerConfig;
use std::path::PathBuf;

/// Drive a simulated player with a list of actions and print what it shows.
///
/// Actions: toggle, video, skip:<index>, volume:<v>, rate:<v>, scrub:<x>,
/// drag:<from>:<to>, tick:<seconds>, metadata:<seconds>
#[derive(Parser, Debug)]
#[command(name = "rfplayer", version, about)]
struct Cli {
    /// JSON player configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Media duration in seconds (overrides the config)
    #[arg(long)]
    duration: Option<f64>,

    /// Refuse play() as a browser autoplay policy would
    #[arg(long)]
    autoplay_blocked: bool,

    /// Print a snapshot after every action instead of only the last
    #[arg(long)]
    trace: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Actions to perform, in order
    actions: Vec<String>,
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PlayerConfig::from_path(path).with_context(|| format!("loading {}", path.display()))?,
        None => PlayerConfig::default(),
    };
    if cli.duration.is_some() {
        config.media.duration = cli.duration;
    }
    if cli.autoplay_blocked {
        config.media.autoplay_blocked = true;
    }

    let actions = parse_script(&cli.actions)?;
    let player = rfplayer::new_player(config)?;
    let snapshots = player.run(&actions)?;

    if cli.trace {
        for (action, snap) in actions.iter().zip(&snapshots) {
            log::info!("after {:?}", action);
            println!("{}", to_json(snap, cli.pretty)?);
        }
    } else {
        println!("{}", to_json(&player.snapshot(), cli.pretty)?);
    }
    Ok(())
}
