//! Interactive block tree window (requires `--features egui`).
//!
//! Usage:
//!   cargo run --features egui --example egui_tree -- [-c config.json] [--seed N]

#[cfg(feature = "egui")]
use anyhow::{Context, Result};
#[cfg(feature = "egui")]
use camino::Utf8PathBuf;
#[cfg(feature = "egui")]
use clap::Parser;
#[cfg(feature = "egui")]
use eframe::egui;
#[cfg(feature = "egui")]
use blocktree::{config::Config, egui_app::TreeApp, logging};

#[cfg(feature = "egui")]
#[derive(Parser, Debug)]
#[command(author, version, about = "Drag, spawn and remove blocks in a tree diagram", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<Utf8PathBuf>,

    /// Seed for reproducible block placement
    #[arg(long)]
    seed: Option<u64>,

    /// Verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count)]
    debug: u8,
}

#[cfg(feature = "egui")]
fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("Load {}", path))?,
        None => Config::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.debug > 0 {
        config.log_filter = logging::verbosity_filter(args.debug).to_string();
    }
    logging::init(&config.log_filter);

    let app = TreeApp::from_config(&config);

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([config.viewport.width, config.viewport.height]);
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "blocktree",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}

#[cfg(not(feature = "egui"))]
fn main() {
    eprintln!("This example requires the 'egui' feature. Try: cargo run --features egui --example egui_tree");
}
