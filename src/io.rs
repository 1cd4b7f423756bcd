//! Reading the JSON-lines event log and writing the aggregated output.
//!
//! `-` stands for stdin / stdout on either side.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use crate::events::Event;

const STDIO_PATH: &str = "-";

/// Whether `path` is the `-` placeholder for stdin / stdout.
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}

/// Parse one event per line. Blank lines are skipped; any other line that
/// does not deserialize fails the whole read.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<Event>> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let ev: Event = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid event on line {}", idx + 1))?;
        events.push(ev);
    }
    Ok(events)
}

/// Read the event log at `path` (or stdin for `-`).
pub fn read_events_file(path: &Path) -> Result<Vec<Event>> {
    if is_stdio(path) {
        return read_events(io::stdin().lock());
    }
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_events(BufReader::new(file)).with_context(|| format!("parsing {}", path.display()))
}

/// Write `contents` to `path`, replacing whatever was there (stdout for `-`).
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    if is_stdio(path) {
        return write_to(io::stdout().lock(), contents).context("writing to stdout");
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

/// Write `contents` to any sink and flush it.
pub fn write_to<W: Write>(mut out: W, contents: &str) -> io::Result<()> {
    out.write_all(contents.as_bytes())?;
    out.flush()
}
