// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod notifier;
pub mod slots;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate};
use crate::engine::{EventDispatcher, IdleReaper, Runtime, RuntimeEvent, request_shutdown};
use crate::notifier::{HttpNotifier, spawn_notifier};
use crate::watch::{NotifyWatchBackend, WatchBackend};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the notify-based watch backend and the root subscription
/// - the notifier delivery loop
/// - the idle reaper (own task) and the dispatch runtime (this task)
/// - Ctrl-C handling
///
/// Returns an error for startup failures and for the fatal
/// subscription-failure case; returns `Ok(())` on Ctrl-C.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_and_validate(&args.config)
        .with_context(|| format!("loading config {:?}", args.config))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let root = cfg
        .watch
        .root
        .canonicalize()
        .with_context(|| format!("resolving watch root {:?}", cfg.watch.root))?;
    if !root.is_dir() {
        bail!("watch root {:?} is not a directory", root);
    }

    // Runtime event channel, fed by the watch backend and the Ctrl-C task.
    let (rt_tx, rt_rx) = mpsc::unbounded_channel::<RuntimeEvent>();

    let backend: Arc<dyn WatchBackend> = Arc::new(NotifyWatchBackend::new(rt_tx.clone())?);
    let root_watch = backend
        .subscribe(&root)
        .with_context(|| format!("watching root directory {:?}", root))?;
    info!(?root, %root_watch, "watching root directory");

    let notifier = Arc::new(HttpNotifier::new(cfg.notify.url.clone(), cfg.notify.timeout)?);
    let outbox = spawn_notifier(notifier, cfg.notify.timeout);

    let slots = slots::shared(cfg.watch.capacity);

    let reaper = IdleReaper::new(
        &root,
        Arc::clone(&slots),
        Arc::clone(&backend),
        cfg.watch.inactivity_timeout,
        cfg.notify.notify_on_empty,
        outbox,
    );
    let reaper_task = tokio::spawn(reaper.run(cfg.watch.poll_interval));

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            request_shutdown(&tx);
        });
    }

    let dispatcher = EventDispatcher::new(root, root_watch, slots, backend, cfg.classifier());
    let result = Runtime::new(dispatcher, rt_rx).run().await;

    reaper_task.abort();
    result.context("event dispatch stopped")
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("dropwatch dry-run");
    println!("  watch.root = {}", cfg.watch.root.display());
    println!("  watch.capacity = {}", cfg.watch.capacity);
    println!("  watch.inactivity_timeout = {:?}", cfg.watch.inactivity_timeout);
    println!("  watch.poll_interval = {:?}", cfg.watch.poll_interval);
    println!();

    println!("content ({} extensions):", cfg.content.len());
    for (ext, kind) in cfg.content.iter() {
        println!("  .{ext} -> {kind}");
    }
    println!();

    println!("notify:");
    println!("  url = {}", cfg.notify.url);
    println!("  timeout = {:?}", cfg.notify.timeout);
    println!("  notify_on_empty = {}", cfg.notify.notify_on_empty);

    debug!("dry-run complete (nothing watched)");
}
