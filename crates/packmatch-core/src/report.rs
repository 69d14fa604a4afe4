//! Run reports and the audit log.
//!
//! Every tagged group produces exactly one [`GroupRecord`] per run, matched
//! or not, so operators can answer "why was this panel skipped" from the
//! log alone. Records format to the audit line shape
//! `[TIMESTAMP] [STATUS] group path → detail`, and a [`LogSink`] persists
//! the lines plus a closing summary.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::assoc::AssociationOutcome;
use crate::tags::PanelTag;

/// How the export sink handled one matched group.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportRecord {
    /// The sink produced (or in a dry run, would produce) this artifact.
    Exported(PathBuf),
    /// The sink failed for this asset; the run carried on.
    Failed(String),
}

/// The full story of one tagged group for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRecord {
    /// Slash-joined pre-normalization path, the group's identity in the log.
    pub display_path: String,
    /// Canonical tag the group normalized to.
    pub tag: PanelTag,
    /// How association ended.
    pub outcome: AssociationOutcome,
    /// Final group name after renaming. `Some` only for matched groups.
    pub final_name: Option<String>,
    /// Export result. `Some` only for matched groups.
    pub export: Option<ExportRecord>,
}

impl GroupRecord {
    /// Returns the status keyword for the audit line.
    ///
    /// An export failure overrides `MATCHED`: the association stood, but
    /// the line must surface the failure.
    #[must_use = "returns the status keyword for the record"]
    pub fn status(&self) -> &'static str {
        if matches!(self.export, Some(ExportRecord::Failed(_))) {
            return "EXPORT_FAILED";
        }
        match self.outcome {
            AssociationOutcome::Matched { .. } => "MATCHED",
            AssociationOutcome::NoCandidateInRange => "NO_CANDIDATE_IN_RANGE",
            AssociationOutcome::NoCandidateInQuadrant => "NO_CANDIDATE_IN_QUADRANT",
            AssociationOutcome::AmbiguousTie { .. } => "AMBIGUOUS_TIE",
            AssociationOutcome::AlreadyAssigned => "ALREADY_ASSIGNED",
        }
    }

    /// Formats the audit line for this record.
    #[must_use = "returns the formatted audit line"]
    pub fn format_line(&self, timestamp: DateTime<Utc>) -> String {
        let stamp = timestamp.format("%Y-%m-%d %H:%M:%S");
        format!(
            "[{stamp}] [{}] {} → {}",
            self.status(),
            self.display_path,
            self.detail()
        )
    }

    fn detail(&self) -> String {
        match (&self.outcome, &self.export) {
            (AssociationOutcome::Matched { .. }, Some(ExportRecord::Exported(path))) => path
                .file_name()
                .map_or_else(|| path.display().to_string(), |name| {
                    name.to_string_lossy().into_owned()
                }),
            (AssociationOutcome::Matched { .. }, Some(ExportRecord::Failed(reason))) => {
                format!("{}: {reason}", self.final_name.as_deref().unwrap_or_default())
            }
            (AssociationOutcome::Matched { .. }, None) => {
                self.final_name.clone().unwrap_or_default()
            }
            (AssociationOutcome::NoCandidateInRange, _) => "no label within range".to_string(),
            (AssociationOutcome::NoCandidateInQuadrant, _) => {
                "no label in lower-right quadrant".to_string()
            }
            (AssociationOutcome::AmbiguousTie { distance }, _) => {
                format!("ambiguous tie at distance {distance:.1}")
            }
            (AssociationOutcome::AlreadyAssigned, _) => {
                "all nearby labels claimed by closer groups".to_string()
            }
        }
    }
}

/// Outcome counts for one run.
///
/// `matched` counts successful associations; a later export failure does
/// not un-match a group, it shows up in `export_failures` instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of tagged groups processed.
    pub total: usize,
    /// Groups that claimed a label.
    pub matched: usize,
    /// Groups whose quadrant held labels, all beyond the distance cap.
    pub no_candidate_in_range: usize,
    /// Groups with an empty lower-right quadrant.
    pub no_candidate_in_quadrant: usize,
    /// Groups whose nearest candidates were equally close.
    pub ambiguous_tie: usize,
    /// Groups whose candidates were all claimed by closer groups.
    pub already_assigned: usize,
    /// Matched groups whose export failed.
    pub export_failures: usize,
}

impl RunSummary {
    /// Tallies outcomes over a run's records.
    #[must_use = "returns the summary of the records"]
    pub fn from_records(records: &[GroupRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.outcome {
                AssociationOutcome::Matched { .. } => summary.matched += 1,
                AssociationOutcome::NoCandidateInRange => summary.no_candidate_in_range += 1,
                AssociationOutcome::NoCandidateInQuadrant => summary.no_candidate_in_quadrant += 1,
                AssociationOutcome::AmbiguousTie { .. } => summary.ambiguous_tie += 1,
                AssociationOutcome::AlreadyAssigned => summary.already_assigned += 1,
            }
            if matches!(record.export, Some(ExportRecord::Failed(_))) {
                summary.export_failures += 1;
            }
        }
        summary
    }

    /// Number of tagged groups that did not claim a label.
    #[inline]
    #[must_use = "returns the number of unmatched groups"]
    pub const fn unmatched(&self) -> usize {
        self.total - self.matched
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} matched, {} out of range, {} out of quadrant, {} ambiguous, {} already assigned, {} export failures",
            self.matched,
            self.total,
            self.no_candidate_in_range,
            self.no_candidate_in_quadrant,
            self.ambiguous_tie,
            self.already_assigned,
            self.export_failures
        )
    }
}

/// Everything a run produced, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// One record per tagged group, document order.
    pub records: Vec<GroupRecord>,
    /// Tally over the records.
    pub summary: RunSummary,
}

impl RunReport {
    /// Builds a report, computing the summary from the records.
    #[must_use = "creates a new run report"]
    pub fn new(records: Vec<GroupRecord>) -> Self {
        let summary = RunSummary::from_records(&records);
        Self { records, summary }
    }

    /// Formats the full audit block: one line per record, then the summary.
    ///
    /// Every line carries the same timestamp, so a run is one contiguous,
    /// reproducible block in the log.
    #[must_use = "returns the formatted audit lines"]
    pub fn lines(&self, timestamp: DateTime<Utc>) -> Vec<String> {
        let mut lines: Vec<String> = self
            .records
            .iter()
            .map(|record| record.format_line(timestamp))
            .collect();
        let stamp = timestamp.format("%Y-%m-%d %H:%M:%S");
        lines.push(format!("[{stamp}] [SUMMARY] {}", self.summary));
        lines
    }
}

/// Destination for audit lines.
pub trait LogSink {
    /// Appends one formatted line.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Flushes buffered lines. Called once after the whole report.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes a report's audit block through a sink, stamping all lines with
/// the given timestamp.
pub fn write_report(
    sink: &mut dyn LogSink,
    report: &RunReport,
    timestamp: DateTime<Utc>,
) -> io::Result<()> {
    for line in report.lines(timestamp) {
        sink.write_line(&line)?;
    }
    sink.flush()
}

/// Log sink that appends to a file, one line per record.
///
/// Runs accumulate: an existing log is never truncated.
pub struct FileLogSink {
    writer: BufWriter<File>,
}

impl FileLogSink {
    /// Opens (or creates) the log file in append mode.
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl LogSink for FileLogSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Log sink that keeps lines in memory, for embedding hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    /// Captured lines, in write order.
    pub lines: Vec<String>,
}

impl MemoryLogSink {
    /// Creates an empty sink.
    #[must_use = "creates a new memory log sink"]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogSink for MemoryLogSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}
