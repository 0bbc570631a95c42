/// B.League calendar export: Logger
/// JSONL run-event stream (one file per day)

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!("Cannot create log dir {}: {}", dir.display(), e);
        }
        Self { log_dir: dir }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Path of today's event file.
    pub fn current_file(&self) -> PathBuf {
        let date = Utc::now().format("%Y-%m-%d").to_string();
        self.log_dir.join(format!("{date}.jsonl"))
    }

    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let path  = self.current_file();
        let line  = serde_json::to_string(event)?;
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open event log {}", path.display()))?;
        writeln!(f, "{line}")?;
        Ok(())
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event typy ────────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct MonthExtractedEvent {
    pub ts:             String,
    pub event:          &'static str,   // "MONTH_EXTRACTED"
    pub team:           String,
    pub year:           i32,
    pub month:          u32,
    pub pass:           String,         // "structured" | "heuristic"
    pub games:          usize,
    pub skipped:        usize,
    pub unparsed_times: usize,
}

#[derive(Serialize, Debug)]
pub struct ScrapeFinishedEvent {
    pub ts:      String,
    pub event:   &'static str,          // "SCRAPE_FINISHED"
    pub team:    String,
    pub start:   String,                // YYYY-MM
    pub end:     String,
    pub months:  usize,
    pub games:   usize,
    pub output:  String,
}

#[derive(Serialize, Debug)]
pub struct ValidationFinishedEvent {
    pub ts:          String,
    pub event:       &'static str,      // "VALIDATION_FINISHED"
    pub actual:      String,
    pub expected:    String,
    pub equal:       bool,
    pub divergences: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_dir(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("bleague_logger_{name}_{}", std::process::id()));
        p
    }

    #[test]
    fn appends_one_json_line_per_event() {
        let dir = tmp_dir("append");
        let _ = fs::remove_dir_all(&dir);
        let logger = EventLogger::new(&dir);

        for month in [10, 11] {
            logger
                .log(&MonthExtractedEvent {
                    ts: now_iso(),
                    event: "MONTH_EXTRACTED",
                    team: "alvark".to_string(),
                    year: 2025,
                    month,
                    pass: "structured".to_string(),
                    games: 8,
                    skipped: 1,
                    unparsed_times: 0,
                })
                .unwrap();
        }

        let content = fs::read_to_string(logger.current_file()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "MONTH_EXTRACTED");
        assert_eq!(first["month"], 10);
        assert_eq!(first["games"], 8);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn creates_missing_log_dir() {
        let dir = tmp_dir("nested").join("deeper");
        let _ = fs::remove_dir_all(&dir);
        let logger = EventLogger::new(&dir);
        assert!(logger.log_dir().is_dir());
        let _ = fs::remove_dir_all(dir.parent().unwrap());
    }
}
