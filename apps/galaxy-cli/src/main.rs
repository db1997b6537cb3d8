use anyhow::Context;
use clap::{Parser, Subcommand};
use galaxy_author::{CONTROLS, Command, Session};
use galaxy_kernel::{GalaxyEvent, GalaxyParameters, load_preset};
use galaxy_render::{DebugTextRenderer, HeadlessScene, RenderView, Renderer, SceneBackend, present};
use galaxy_tools::CloudInspector;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "galaxy-cli", about = "CLI tool for galaxy operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, default parameters and control ranges
    Info,
    /// Generate one galaxy and print the text frame
    Generate {
        /// JSON parameter preset
        #[arg(long)]
        preset: Option<PathBuf>,
        /// RNG seed for a reproducible cloud
        #[arg(short, long)]
        seed: Option<u64>,
        /// Override the point count
        #[arg(short, long)]
        count: Option<u32>,
        /// Override the number of arms
        #[arg(short, long)]
        branches: Option<u32>,
        /// Points listed in the text frame
        #[arg(short, long, default_value = "5")]
        points: usize,
    },
    /// Regenerate repeatedly and report what was disposed
    Regenerate {
        /// Number of regenerations
        #[arg(short, long, default_value = "10")]
        times: u32,
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("galaxy-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", galaxy_render::crate_info());
            let defaults = GalaxyParameters::default();
            println!("defaults:\n{}", defaults.to_json_pretty()?);
            println!("controls:");
            for spec in CONTROLS {
                println!(
                    "  {:<17} {} .. {} step {}",
                    spec.field.name(),
                    spec.min,
                    spec.max,
                    spec.step
                );
            }
        }
        Commands::Generate {
            preset,
            seed,
            count,
            branches,
            points,
        } => {
            let mut params = match &preset {
                Some(path) => load_preset(path)
                    .with_context(|| format!("loading preset {}", path.display()))?,
                None => GalaxyParameters::default(),
            };
            if let Some(count) = count {
                params.count = count;
            }
            if let Some(branches) = branches {
                params.branches = branches;
            }
            params.validate()?;

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };
            let mut session = Session::new(params);
            let replacement = session.start(&mut rng)?;

            let mut scene = HeadlessScene::new();
            present(&mut scene, &replacement);

            let frame =
                DebugTextRenderer::with_preview(points).render(&scene, &RenderView::default());
            print!("{frame}");
            println!("{}", CloudInspector::summary(&replacement.cloud));
        }
        Commands::Regenerate { times, seed } => {
            println!("Regeneration demo: seed={seed}, times={times}");

            let mut rng = StdRng::seed_from_u64(seed);
            let mut session = Session::new(GalaxyParameters::default());
            let mut scene = HeadlessScene::new();
            present(&mut scene, &session.start(&mut rng)?);

            for _ in 1..times {
                if let Some(replacement) = session.handle(Command::Regenerate, &mut rng)? {
                    present(&mut scene, &replacement);
                }
            }

            let retired = session
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GalaxyEvent::Retired { .. }))
                .count();

            println!(
                "Scene: attached={}, disposed={}, retired={}, generation={}",
                scene.cloud_count(),
                scene.disposed(),
                retired,
                session.displayed().generation()
            );
            let consistent = scene.cloud_count() == 1
                && scene.disposed() == retired
                && scene.disposed() + 1 == times.max(1) as usize;
            println!(
                "Invariant: {}",
                if consistent { "OK" } else { "MISMATCH" }
            );
        }
    }

    Ok(())
}
