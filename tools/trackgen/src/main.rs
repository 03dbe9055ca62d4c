//! trackgen - procedural race track generator
//!
//! Builds a track from a TOML config and exports it as OBJ pieces plus a
//! track_data.json placement record.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use trackgen_core::{TrackConfig, generate};
use trackgen_export::{config_to_toml, export_track, load_config};

#[derive(Parser)]
#[command(name = "trackgen")]
#[command(about = "Procedural race track generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a track and export it
    Generate {
        /// Path to track.toml (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "track_out")]
        output: PathBuf,

        /// Random seed (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of path blocks (overrides config)
        #[arg(short, long)]
        blocks: Option<u32>,

        /// Map name used for piece names (overrides config)
        #[arg(long)]
        map_name: Option<String>,

        /// Vertex budget per piece (overrides config)
        #[arg(long)]
        vertex_limit: Option<u32>,

        /// LOD radius per piece (overrides config)
        #[arg(long)]
        lod_limit: Option<f32>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a config without generating
    Check {
        /// Path to track.toml
        #[arg(short, long, default_value = "track.toml")]
        config: PathBuf,
    },

    /// Write a config file with every default filled in
    InitConfig {
        /// Destination file
        #[arg(default_value = "track.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

struct Overrides {
    seed: Option<u64>,
    blocks: Option<u32>,
    map_name: Option<String>,
    vertex_limit: Option<u32>,
    lod_limit: Option<f32>,
}

impl Overrides {
    fn apply(self, config: &mut TrackConfig) {
        if let Some(seed) = self.seed {
            config.track.seed = seed;
        }
        if let Some(blocks) = self.blocks {
            config.track.blocks = blocks;
        }
        if let Some(map_name) = self.map_name {
            config.track.map_name = map_name;
        }
        if let Some(limit) = self.vertex_limit {
            config.export.vertex_limit = limit;
        }
        if let Some(limit) = self.lod_limit {
            config.export.lod_limit = limit;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Generate { verbose: true, .. });
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    match cli.command {
        Commands::Generate {
            config,
            output,
            seed,
            blocks,
            map_name,
            vertex_limit,
            lod_limit,
            verbose: _,
        } => {
            let mut track_config = load_config(config.as_deref())?;
            Overrides {
                seed,
                blocks,
                map_name,
                vertex_limit,
                lod_limit,
            }
            .apply(&mut track_config);

            let track = generate(&track_config).context("Invalid track config")?;
            tracing::info!("Exporting to {:?}", output);
            let summary = export_track(&track, &output)?;

            let stats = &track.stats;
            println!("Track '{}'", track.map_name);
            println!("  steps:        {}", stats.steps);
            println!("  length:       {:.1} m", stats.track_length);
            println!("  vertices:     {}", stats.merged_vertices);
            println!("  faces:        {}", stats.merged_faces);
            println!("  pieces:       {}", summary.report.exported.len());
            println!("  spawns:       {}", summary.metadata.spawn_points.len());
            println!("  checkpoints:  {}", summary.metadata.checkpoints.len());

            if !summary.report.failed.is_empty() {
                tracing::warn!("{} pieces failed to export", summary.report.failed.len());
            }
            if let Some(e) = summary.report.finish_error {
                bail!("Failed to write material library: {}", e);
            }
            tracing::info!("Done!");
        }

        Commands::Check { config } => {
            tracing::info!("Checking config {:?}", config);
            TrackConfig::load(&config).with_context(|| format!("Invalid config: {:?}", config))?;
            tracing::info!("Config is valid!");
        }

        Commands::InitConfig { output, force } => {
            if output.exists() && !force {
                bail!("{:?} already exists (use --force to overwrite)", output);
            }
            let text = config_to_toml(&TrackConfig::default())?;
            std::fs::write(&output, text).with_context(|| format!("Failed to write config: {:?}", output))?;
            tracing::info!("Wrote default config to {:?}", output);
        }
    }

    Ok(())
}
