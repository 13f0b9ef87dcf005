//! room-planner: inspect and export room designs without a browser.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use room_core::RoomShape;
use room_planner::{load_config, load_design, render_blueprint, report, starter_design};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "room-planner")]
#[command(about = "Room planner geometry tools", long_about = None)]
struct Cli {
    /// Planner config JSON (shape proportions, wall and view settings)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a JSON geometry report for a design file
    Info {
        /// Design JSON file
        design: PathBuf,
    },
    /// Write the 2D blueprint of a design as SVG
    Blueprint {
        /// Design JSON file
        design: PathBuf,
        /// Output .svg file
        output: PathBuf,
        #[arg(long, default_value_t = 800.0)]
        width: f32,
        #[arg(long, default_value_t = 600.0)]
        height: f32,
    },
    /// Write an empty design for a new room
    New {
        /// Output design JSON file
        output: PathBuf,
        #[arg(short, long, default_value = "Untitled")]
        name: String,
        /// rectangle, square, l-shape, t-shape, u-shape or open
        #[arg(long, default_value = "rectangle")]
        shape: String,
        #[arg(long, default_value_t = 15.0)]
        width: f32,
        #[arg(long, default_value_t = 15.0)]
        depth: f32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Info { design } => {
            let design = load_design(&design)?;
            let report = report(&design, &config);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Blueprint {
            design,
            output,
            width,
            height,
        } => {
            let svg = render_blueprint(load_design(&design)?, &config, width, height)?;
            std::fs::write(&output, svg)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(output = %output.display(), "blueprint written");
        }
        Commands::New {
            output,
            name,
            shape,
            width,
            depth,
        } => {
            let design = starter_design(&name, RoomShape::from_tag(&shape), width, depth);
            let json = serde_json::to_string_pretty(&design)?;
            std::fs::write(&output, json)
                .with_context(|| format!("failed to write {}", output.display()))?;
            info!(output = %output.display(), "design written");
        }
    }

    Ok(())
}
