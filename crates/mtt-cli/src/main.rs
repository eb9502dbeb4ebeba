use std::io::stdout;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mtt_cli::commands::{edit, export, insert, status, timer, watch};
use mtt_cli::store::TrackerDocument;
use mtt_cli::{Cli, Commands, Config, DocumentArgs};
use mtt_core::SystemClock;

/// Address the requested tracker block using the configured fence language.
fn open_document(args: &DocumentArgs, config: &Config) -> TrackerDocument {
    TrackerDocument::new(&args.file, &config.block_language, args.block)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let settings = config.report_settings();
    let clock = SystemClock;
    let mut out = stdout().lock();

    match &cli.command {
        Some(Commands::Insert { file }) => {
            insert::run(&mut out, file, &config.block_language)?;
        }
        Some(Commands::Status(args)) => {
            status::run(&mut out, &open_document(args, &config), &settings, &clock)?;
        }
        Some(Commands::Start { doc, name }) => {
            timer::start(&mut out, &open_document(doc, &config), name.as_deref(), &clock)?;
        }
        Some(Commands::Stop(args)) => {
            timer::stop(&mut out, &open_document(args, &config), &settings, &clock)?;
        }
        Some(Commands::Continue { doc, path, name }) => {
            timer::continue_entry(
                &mut out,
                &open_document(doc, &config),
                path,
                name.as_deref(),
                &clock,
            )?;
        }
        Some(Commands::Rename { doc, path, name }) => {
            edit::rename(&mut out, &open_document(doc, &config), path, name)?;
        }
        Some(Commands::Remove { doc, path }) => {
            edit::remove(&mut out, &open_document(doc, &config), path)?;
        }
        Some(Commands::Edit { doc, mode, total }) => {
            edit::set_mode(
                &mut out,
                &open_document(doc, &config),
                *mode,
                total.as_deref(),
                &settings,
                &clock,
            )?;
        }
        Some(Commands::Table(args)) => {
            let doc = open_document(args, &config);
            export::run(&mut out, &doc, export::Format::Table, &settings, &clock)?;
        }
        Some(Commands::Csv(args)) => {
            let doc = open_document(args, &config);
            export::run(&mut out, &doc, export::Format::Csv, &settings, &clock)?;
        }
        Some(Commands::Json(args)) => {
            let doc = open_document(args, &config);
            export::run(&mut out, &doc, export::Format::Json, &settings, &clock)?;
        }
        Some(Commands::Watch { doc, ticks }) => {
            let doc = open_document(doc, &config);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            runtime.block_on(watch::run(
                &mut out,
                &doc,
                &settings,
                &clock,
                watch::TICK,
                *ticks,
            ))?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
