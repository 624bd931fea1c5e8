//! declutter: runs the annoyance engine over a JSON page fixture.
//!
//! Loads an engine config and a page, asks the site gate whether to run,
//! sweeps the initial tree, replays the page's script turn by turn with a
//! reactor pump after each, and prints what happened.

mod fixture;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use engine::{ConfigLoader, Engine, EngineConfig, NoopOverride, RunMode, Startup};
use fixture::PageFixture;

/// declutter CLI.
#[derive(Parser)]
#[command(name = "declutter")]
#[command(about = "Remove scroll locks, blur veils and floating overlays from a page")]
#[command(version)]
struct Cli {
    /// Engine configuration file (TOML); built-in defaults when absent
    #[arg(short, long, env = "DECLUTTER_CONFIG")]
    config: Option<PathBuf>,

    /// Host the page was loaded from; overrides the fixture's `host`
    #[arg(long)]
    host: Option<String>,

    /// Behave as if the user switched the engine off
    #[arg(long)]
    disabled: bool,

    /// Log every correction, removal and veto
    #[arg(short, long)]
    verbose: bool,

    /// Page fixture (JSON)
    page: PathBuf,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => ConfigLoader::load(path)
            .with_context(|| format!("failed to load engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mode = if cli.disabled {
        RunMode::Disabled
    } else {
        config.mode
    };

    let page = PageFixture::load(&cli.page)?;
    let host = cli
        .host
        .clone()
        .or_else(|| page.host.clone())
        .unwrap_or_else(|| "localhost".to_string());

    let engine = Engine::new(config).context("failed to build engine")?;
    let (mut dom, resolver) = page.build();

    println!("── Site gate ──");
    let startup = engine.start(mode, &host, &mut dom, resolver, &NoopOverride);
    println!("   host:     {host}");
    println!("   decision: {}", startup.label());

    match startup {
        Startup::Running(mut running) => {
            let sweep = running.sweep_stats();
            println!("\n── Initial sweep ──");
            println!(
                "   visited {}, corrected {}, removed {}, skipped {}",
                sweep.visited, sweep.corrected, sweep.removed, sweep.skipped
            );

            for (turn, mutations) in page.script.iter().enumerate() {
                let applied = fixture::apply_turn(&mut dom, mutations);
                let pumped = running.pump(&mut dom);
                tracing::debug!(turn, applied, pumped, "script turn");
            }

            let stats = running.reactor_stats();
            println!("\n── Mutation reactor ──");
            println!(
                "   batches {}, records {}, ignored {}",
                stats.batches, stats.records, stats.ignored
            );
            println!(
                "   visited {}, corrected {}, removed {}, skipped {}",
                stats.outcomes.visited,
                stats.outcomes.corrected,
                stats.outcomes.removed,
                stats.outcomes.skipped
            );
        }
        _ => {
            for mutations in &page.script {
                fixture::apply_turn(&mut dom, mutations);
            }
        }
    }

    println!("\n── Final tree ──");
    print!("{}", fixture::outline(&dom));
    Ok(())
}
