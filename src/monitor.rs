//! The polling loop: scan, diff, report, repeat.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};

use crate::config::WatchConfig;
use crate::diff::compare_snapshots;
use crate::events::{ChangeEvent, ChangeKind, EntryId};
use crate::filter::EntryFilter;
use crate::scanner::{self, Snapshot};
use crate::sink::{LineFormat, LogSink};

const STARTED_LINE: &str = "=== Monitoring Started ===";
const STOPPED_LINE: &str = "=== Monitoring Stopped ===";

/// Granularity of the stop-flag check while sleeping between ticks.
const SLEEP_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Monitoring,
}

/// Owns the configuration, the retained snapshot, and the output sinks for
/// one monitoring session. Ticks never overlap: each scan-diff-report runs to
/// completion before the next is scheduled.
pub struct Monitor {
    config: WatchConfig,
    filter: EntryFilter,
    format: LineFormat,
    sinks: Vec<Box<dyn LogSink>>,
    snapshot: Snapshot,
    state: MonitorState,
}

impl Monitor {
    pub fn new(
        config: WatchConfig,
        format: LineFormat,
        sinks: Vec<Box<dyn LogSink>>,
    ) -> Result<Self> {
        let filter = EntryFilter::new(&config.include, &config.exclude)?;
        Ok(Self {
            config,
            filter,
            format,
            sinks,
            snapshot: Snapshot::new(),
            state: MonitorState::Idle,
        })
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Enter the Monitoring state: emit the start boundary line and take the
    /// baseline snapshot. The baseline produces no diff events.
    ///
    /// Rejected when no watch paths are configured; the monitor stays Idle.
    pub fn start(&mut self) -> Result<()> {
        if self.config.paths.is_empty() {
            bail!("no watch paths configured");
        }
        self.emit_session(STARTED_LINE)?;
        self.snapshot = scanner::scan(&self.config, &self.filter);
        self.state = MonitorState::Monitoring;
        Ok(())
    }

    /// One poll tick: rescan, diff against the retained snapshot, emit one
    /// line per change (added, then removed, then modified, each sorted by
    /// identity), then retain the new snapshot.
    pub fn tick(&mut self) -> Result<()> {
        let new_snapshot = scanner::scan(&self.config, &self.filter);
        let diff = compare_snapshots(&self.snapshot, &new_snapshot);

        for id in &diff.added {
            self.emit_change(id.clone(), ChangeKind::Added)?;
        }
        for id in &diff.removed {
            self.emit_change(id.clone(), ChangeKind::Removed)?;
        }
        for id in &diff.modified {
            self.emit_change(id.clone(), ChangeKind::Modified)?;
        }

        self.snapshot = new_snapshot;
        Ok(())
    }

    /// Leave the Monitoring state. No final scan is performed.
    pub fn stop(&mut self) -> Result<()> {
        if self.state == MonitorState::Monitoring {
            self.emit_session(STOPPED_LINE)?;
            self.state = MonitorState::Idle;
        }
        Ok(())
    }

    /// Drive the session until `running` clears: start, then sleep-and-tick,
    /// then stop. The sleep is sliced so a stop request takes effect within
    /// ~100ms, and the interval is re-read from the configuration before
    /// every wait.
    pub fn run(&mut self, running: &AtomicBool) -> Result<()> {
        self.start()?;

        while running.load(Ordering::SeqCst) {
            let deadline = Instant::now() + self.config.interval();
            let mut stopped = false;
            while Instant::now() < deadline {
                if !running.load(Ordering::SeqCst) {
                    stopped = true;
                    break;
                }
                let remaining = deadline.saturating_duration_since(Instant::now());
                thread::sleep(remaining.min(SLEEP_SLICE));
            }
            if stopped {
                break;
            }
            self.tick()?;
        }

        self.stop()
    }

    fn emit_change(&mut self, entry: EntryId, kind: ChangeKind) -> Result<()> {
        let event = ChangeEvent::new(entry, kind);
        let line = self.format.render_change(&event)?;
        self.emit(&line)
    }

    fn emit_session(&mut self, message: &str) -> Result<()> {
        if let Some(line) = self.format.render_session(message) {
            self.emit(&line)?;
        }
        Ok(())
    }

    fn emit(&mut self, line: &str) -> Result<()> {
        for sink in &mut self.sinks {
            sink.append(line)?;
        }
        Ok(())
    }
}
