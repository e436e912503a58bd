mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use wayline_core::model::LaneSet;
use wayline_core::session::Session;

/// Terminal viewer for a personal travel log.
#[derive(Debug, Parser)]
#[command(name = "wayline", version, about)]
struct Args {
    /// Trip data file (CSV or JSON export).
    data: PathBuf,

    /// Optional lane configuration (TOML). Defaults to the five travel
    /// lanes.
    #[arg(long)]
    lanes: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let data = std::fs::read(&args.data)
        .with_context(|| format!("reading {}", args.data.display()))?;
    let records = wayline_core::ingest::parse_auto(&data)
        .with_context(|| format!("parsing {}", args.data.display()))?;
    log::info!("loaded {} trips from {}", records.len(), args.data.display());

    let lanes = match &args.lanes {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            LaneSet::from_toml(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => LaneSet::travel_default(),
    };

    // The renderer resizes the track to the terminal on its first draw.
    let session = Session::new(records, lanes, 800.0);
    renderer::render_tui(session)?;
    Ok(())
}
