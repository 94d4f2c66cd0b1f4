use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use keygrid::board::{DryRun, MemoryBoard};
use keygrid::{Layout, PlacerConfig};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Layout description file (JSON rows of key labels and spacing directives)
    #[arg(value_name = "LAYOUT")]
    layout: PathBuf,

    /// Board model file; a full matrix template is synthesized when omitted
    #[arg(short, long, value_name = "BOARD")]
    board: Option<PathBuf>,

    /// Placer configuration file overriding the built-in board constants
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Where to write the mutated board model
    #[arg(short, long, value_name = "OUT", default_value = "board.out.json")]
    output: PathBuf,

    /// Apply the changes to the board model instead of previewing them
    #[arg(long)]
    commit: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {path:?}"))?;
            PlacerConfig::from_json_str(&content)
                .with_context(|| "Failed to parse placer configuration")?
        }
        None => PlacerConfig::default(),
    };

    let content = std::fs::read_to_string(&cli.layout)
        .with_context(|| format!("Failed to read layout file: {:?}", cli.layout))?;
    let layout = Layout::from_json_str(&content)?;

    let plan = keygrid::plan(&layout, &config)?;

    // Index-to-label mapping, for use in firmware code.
    for key in plan.keys() {
        println!("{} = {}", key.index, key.label);
    }
    for key in plan.keys().filter(|k| k.lit) {
        println!(
            "{}: ({:.4}, {:.4}) w={}",
            config.refs.switch(key.index),
            key.center.x,
            key.center.y,
            key.width
        );
    }

    let mut board = match &cli.board {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read board file: {path:?}"))?;
            MemoryBoard::from_json_str(&content)
                .with_context(|| "Failed to parse board model")?
        }
        None => MemoryBoard::matrix_template(&config),
    };

    if cli.commit {
        keygrid::apply(&mut board, &plan, &config)?;
        std::fs::write(&cli.output, board.to_json_string()?)
            .with_context(|| format!("Failed to write board file: {:?}", cli.output))?;
        println!(
            "Placed {} keys, {} tracks, {} vias -> {:?}",
            plan.used.len(),
            board.tracks.len(),
            board.vias.len(),
            cli.output
        );
    } else {
        let mut preview = DryRun::new(&board);
        keygrid::apply(&mut preview, &plan, &config)?;
        println!("Dry run; board left untouched (pass --commit to apply).");
    }

    Ok(())
}
