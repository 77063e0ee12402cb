//! Log output sinks and line formats.
//!
//! The monitor depends only on the `LogSink` trait; where lines end up
//! (terminal, file, in-memory buffer) is the caller's choice.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;
use clap::ValueEnum;

use crate::events::ChangeEvent;

/// Destination for formatted log lines, one line per call.
pub trait LogSink {
    fn append(&mut self, line: &str) -> Result<()>;
}

/// Writes lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn append(&mut self, line: &str) -> Result<()> {
        println!("{line}");
        Ok(())
    }
}

/// Appends lines to a file, flushing after every line so the log survives an
/// abrupt exit.
#[derive(Debug)]
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file: {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn append(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{line}").context("failed to write to log file")?;
        self.writer.flush().context("failed to flush log file")?;
        Ok(())
    }
}

/// Collects lines in a shared buffer. Stands in for a display surface and
/// lets tests inspect what the monitor emitted.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }
}

impl LogSink for MemorySink {
    fn append(&mut self, line: &str) -> Result<()> {
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| anyhow::anyhow!("log buffer lock poisoned"))?;
        lines.push(line.to_string());
        Ok(())
    }
}

/// How change events are rendered before they reach the sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LineFormat {
    /// `<timestamp> <level> [<base>] <marker> <relative-path>`
    #[default]
    Standard,
    /// One JSON object per event, for scripting.
    Json,
    /// `<sigil> <base>|<relative-path>`
    Compact,
}

impl LineFormat {
    pub fn render_change(&self, event: &ChangeEvent) -> Result<String> {
        match self {
            LineFormat::Standard => Ok(stamp(&event.message())),
            LineFormat::Json => {
                serde_json::to_string(event).context("failed to serialize change event")
            }
            LineFormat::Compact => Ok(format!("{} {}", event.kind.sigil(), event.entry)),
        }
    }

    /// Session boundary lines only appear in the standard format; JSON and
    /// compact streams stay machine-parseable.
    pub fn render_session(&self, message: &str) -> Option<String> {
        match self {
            LineFormat::Standard => Some(stamp(message)),
            LineFormat::Json | LineFormat::Compact => None,
        }
    }
}

fn stamp(message: &str) -> String {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("{now} {:<8} {message}", "INFO")
}
