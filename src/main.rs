//! Binary entrypoint for the slot gallery.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use slot_gallery::cache::SlotCache;
use slot_gallery::config::Configuration;
use slot_gallery::events::{Displayed, NavCommand, ResolveSlot, SlotEvent};
use slot_gallery::navigator::Navigator;
use slot_gallery::tasks::{loader, shell};

/// Simple CLI
#[derive(Debug, Parser)]
#[command(name = "slot-gallery", about = "Slot-addressed image gallery")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE", default_value = "gallery.yaml")]
    config: PathBuf,

    /// Override the pause before each uncached load (ms)
    #[arg(long, value_name = "MILLIS")]
    load_delay_ms: Option<u64>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("slot_gallery={}", level)
            .parse()
            .context("building log filter")?,
    );
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = Configuration::from_yaml_file(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?
        .validated()
        .context("validating configuration")?;
    if let Some(ms) = cli.load_delay_ms {
        cfg.load_delay = Duration::from_millis(ms);
    }

    let slot_loader = loader::SlotLoader::new(&cfg, Some(SlotCache::new()));
    let slot_count = slot_loader.count();
    info!(slots = slot_count, "gallery ready");

    let navigator = Navigator::new(0, slot_count - 1);

    // Channels (small/bounded)
    let (command_tx, command_rx) = mpsc::channel::<NavCommand>(16); // stdin -> Shell
    let (resolve_tx, resolve_rx) = mpsc::channel::<ResolveSlot>(4); // Shell -> Loader
    let (event_tx, event_rx) = mpsc::channel::<SlotEvent>(4); // Loader -> Shell
    let (displayed_tx, mut displayed_rx) = mpsc::channel::<Displayed>(16); // Shell -> confirmations

    let cancel = CancellationToken::new();

    // Ctrl-C cancels the pipeline
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    spawn_command_reader(command_tx, cancel.clone());

    let mut tasks = JoinSet::new();

    // SlotLoader
    tasks.spawn({
        let resolve_rx = resolve_rx;
        let event_tx = event_tx.clone();
        let cancel = cancel.clone();
        async move {
            loader::run(slot_loader, resolve_rx, event_tx, cancel)
                .await
                .context("loader task failed")
        }
    });

    // Presentation shell
    tasks.spawn({
        let command_rx = command_rx;
        let event_rx = event_rx;
        let resolve_tx = resolve_tx.clone();
        let displayed_tx = displayed_tx.clone();
        let cancel = cancel.clone();
        async move {
            shell::run(
                navigator,
                command_rx,
                resolve_tx,
                event_rx,
                displayed_tx,
                cancel,
            )
            .await
            .context("shell task failed")
        }
    });

    // Drain display confirmations so the channel never backs up
    tasks.spawn({
        let cancel = cancel.clone();
        async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    shown = displayed_rx.recv() => match shown {
                        Some(Displayed(id)) => tracing::debug!(id, "display confirmed"),
                        None => break,
                    },
                }
            }
            Ok(())
        }
    });

    // Drain JoinSet (wait for tasks to complete)
    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!("task error: {e:?}");
                cancel.cancel();
            }
            Err(e) => {
                tracing::error!("join error: {e}");
                cancel.cancel();
            }
        }
    }

    Ok(())
}

/// Read navigation commands from stdin: `n`/`next`, `p`/`prev`, `q`/`quit`.
///
/// Runs on a plain detached thread so a read blocked on an open terminal
/// never delays runtime shutdown.
fn spawn_command_reader(commands: mpsc::Sender<NavCommand>, cancel: CancellationToken) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) => {
                    info!("stdin closed; initiating shutdown");
                    cancel.cancel();
                    break;
                }
                Ok(_) => match line.trim() {
                    "n" | "next" => {
                        if commands.blocking_send(NavCommand::Next).is_err() {
                            break;
                        }
                    }
                    "p" | "prev" | "previous" => {
                        if commands.blocking_send(NavCommand::Previous).is_err() {
                            break;
                        }
                    }
                    "q" | "quit" => {
                        info!("quit requested; initiating shutdown");
                        cancel.cancel();
                        break;
                    }
                    "" => {}
                    other => warn!(input = other, "unknown command; use n, p, or q"),
                },
                Err(err) => {
                    warn!("stdin read failed: {err}");
                    cancel.cancel();
                    break;
                }
            }
        }
    });
}
