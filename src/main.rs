use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use pollwatch::{
    cli::Cli,
    monitor::Monitor,
    sink::{ConsoleSink, FileSink, LogSink},
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = cli.validate() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    cli.setup_logging();

    let config = cli.build_config()?;

    if config.paths.is_empty() {
        // Same outcome as the start guard, surfaced before anything runs.
        eprintln!("Warning: no folders to monitor were configured.");
        tracing::warn!("start rejected: no watch paths configured");
        return Ok(());
    }

    let mut sinks: Vec<Box<dyn LogSink>> = vec![Box::new(ConsoleSink)];
    if let Some(path) = &config.log_file {
        // An unwritable log file is user-visible data loss; fail the session
        // up front instead of silently dropping it.
        sinks.push(Box::new(FileSink::open(path)?));
    }

    for path in &config.paths {
        tracing::info!("watching {}", path.display());
    }
    tracing::info!(
        "polling every {:.1}s ({})",
        config.interval_secs,
        if config.recursive { "recursive" } else { "shallow" }
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let mut monitor = Monitor::new(config, cli.output, sinks)?;
    monitor.run(&running)
}
