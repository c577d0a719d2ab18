use std::io::Read;

use anyhow::{Context, Result};
use blocktree::canvas::{Canvas, CanvasEvent, Effect};
use blocktree::config::Config;
use blocktree::logging;
use blocktree::model::Viewport;
use camino::Utf8PathBuf;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay block tree events and print the resulting scene as JSON", long_about = None)]
struct Cli {
    /// JSON array of events; reads stdin when omitted or "-"
    #[arg(value_name = "EVENTS_FILE")]
    events: Option<Utf8PathBuf>,

    /// JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<Utf8PathBuf>,

    /// Viewport width used for placing new blocks
    #[arg(long)]
    width: Option<f32>,

    /// Viewport height used for placing new blocks
    #[arg(long)]
    height: Option<f32>,

    /// Seed for reproducible block placement
    #[arg(long)]
    seed: Option<u64>,

    /// Apply all events as a single batch (removal wins over drag moves)
    #[arg(long)]
    batch: bool,

    /// Pretty-print the scene
    #[arg(long)]
    pretty: bool,

    /// Verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count)]
    debug: u8,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("Load {}", path))?,
        None => Config::default(),
    };
    if cli.width.is_some() || cli.height.is_some() {
        config.viewport = Viewport::new(
            cli.width.unwrap_or(config.viewport.width),
            cli.height.unwrap_or(config.viewport.height),
        );
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.debug > 0 {
        config.log_filter = logging::verbosity_filter(cli.debug).to_string();
    }
    config.validate()?;
    Ok(config)
}

fn read_events(path: Option<&Utf8PathBuf>) -> Result<Vec<CanvasEvent>> {
    let text = match path {
        Some(p) if p.as_str() != "-" => {
            std::fs::read_to_string(p).with_context(|| format!("Open {}", p))?
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Read events from stdin")?;
            buf
        }
    };
    serde_json::from_str(&text).context("Parse event list")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init(&config.log_filter);

    let events = read_events(cli.events.as_ref())?;
    let mut canvas = Canvas::from_config(&config);

    let effects: Vec<Effect> = if cli.batch {
        canvas.apply_batch(events)
    } else {
        events.into_iter().map(|e| canvas.handle(e)).collect()
    };
    let ignored = effects.iter().filter(|e| matches!(e, Effect::Ignored)).count();
    info!(events = effects.len(), ignored, blocks = canvas.store().len(), "replay finished");

    let scene = canvas.scene();
    let json = if cli.pretty {
        serde_json::to_string_pretty(&scene)?
    } else {
        serde_json::to_string(&scene)?
    };
    println!("{}", json);
    Ok(())
}
