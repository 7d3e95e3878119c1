//! Run-level report: counters, timing, status, and the terminal result.
//!
//! The report is owned exclusively by the engine for the duration of a
//! run and returned as the run's sole output. Counters go through a
//! single increment entry point and cannot be decremented; derived
//! values (percentages, duration, averages) are computed from the raw
//! counters, never stored.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use swiftbatch_types::{Disposition, RunStatus};

/// Aggregate outcome of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pipeline: String,
    source: String,
    status: RunStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    /// Number of records actually read; unknown until the source is
    /// exhausted (or the run aborts in strict mode).
    total_records: Option<u64>,
    limit: Option<u64>,
    success: u64,
    filtered: u64,
    skipped: u64,
    ignored: u64,
    rejected: u64,
    errors: u64,
    batch_result: Option<serde_json::Value>,
}

impl Report {
    pub(crate) fn new(pipeline: &str, source: &str, limit: Option<u64>) -> Self {
        Self {
            pipeline: pipeline.to_string(),
            source: source.to_string(),
            status: RunStatus::Initializing,
            started_at: None,
            ended_at: None,
            total_records: None,
            limit,
            success: 0,
            filtered: 0,
            skipped: 0,
            ignored: 0,
            rejected: 0,
            errors: 0,
            batch_result: None,
        }
    }

    /// Count one record under its disposition. The engine calls this
    /// exactly once per record.
    pub(crate) fn tally(&mut self, disposition: Disposition) {
        match disposition {
            Disposition::Success => self.success += 1,
            Disposition::Filtered => self.filtered += 1,
            Disposition::Skipped => self.skipped += 1,
            Disposition::Ignored => self.ignored += 1,
            Disposition::Rejected => self.rejected += 1,
            Disposition::Error => self.errors += 1,
        }
    }

    pub(crate) fn start(&mut self) {
        if self.status == RunStatus::Initializing {
            self.status = RunStatus::Started;
            self.started_at = Some(Utc::now());
        }
    }

    pub(crate) fn finish(&mut self, total_records: u64) {
        if !self.status.is_terminal() {
            self.status = RunStatus::Finished;
            self.ended_at = Some(Utc::now());
            self.total_records = Some(total_records);
        }
    }

    pub(crate) fn abort(&mut self) {
        if !self.status.is_terminal() {
            self.status = RunStatus::Aborted;
            self.ended_at = Some(Utc::now());
        }
    }

    pub(crate) fn set_total_records(&mut self, total_records: u64) {
        if !self.status.is_terminal() {
            self.total_records = Some(total_records);
        }
    }

    pub(crate) fn set_batch_result(&mut self, result: serde_json::Value) {
        if !self.status.is_terminal() {
            self.batch_result = Some(result);
        }
    }

    pub fn pipeline(&self) -> &str {
        &self.pipeline
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn total_records(&self) -> Option<u64> {
        self.total_records
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn success_count(&self) -> u64 {
        self.success
    }

    pub fn filtered_count(&self) -> u64 {
        self.filtered
    }

    pub fn skipped_count(&self) -> u64 {
        self.skipped
    }

    pub fn ignored_count(&self) -> u64 {
        self.ignored
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }

    pub fn error_count(&self) -> u64 {
        self.errors
    }

    pub fn batch_result(&self) -> Option<&serde_json::Value> {
        self.batch_result.as_ref()
    }

    /// Wall-clock duration of the run in milliseconds, once ended.
    pub fn duration_ms(&self) -> Option<i64> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds()),
            _ => None,
        }
    }

    /// Share of the given count over the total, in percent. `None` when
    /// the total is unknown or zero.
    pub fn percent_of(&self, count: u64) -> Option<f64> {
        match self.total_records {
            Some(total) if total > 0 => Some((count * 100) as f64 / total as f64),
            _ => None,
        }
    }

    /// Average wall-clock time per record in milliseconds. `None` when
    /// the total is unknown or zero, or the run has not ended.
    pub fn average_record_time_ms(&self) -> Option<f64> {
        match (self.duration_ms(), self.total_records) {
            (Some(duration), Some(total)) if total > 0 => Some(duration as f64 / total as f64),
            _ => None,
        }
    }
}

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn fmt_count_line(report: &Report, count: u64) -> String {
    match report.percent_of(count) {
        Some(percent) => format!("{count} ({percent:.1}%)"),
        None => count.to_string(),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Batch report:")?;
        writeln!(f, "\tPipeline = {}", self.pipeline)?;
        writeln!(f, "\tData source = {}", self.source)?;
        writeln!(f, "\tStatus = {}", self.status)?;
        match self.started_at {
            Some(t) => writeln!(f, "\tStart time = {}", t.format(TIME_FORMAT))?,
            None => writeln!(f, "\tStart time = N/A")?,
        }
        match self.ended_at {
            Some(t) => writeln!(f, "\tEnd time = {}", t.format(TIME_FORMAT))?,
            None => writeln!(f, "\tEnd time = N/A")?,
        }
        match self.duration_ms() {
            Some(d) => writeln!(f, "\tDuration = {d}ms")?,
            None => writeln!(f, "\tDuration = N/A")?,
        }
        if let Some(limit) = self.limit {
            writeln!(f, "\tRecord limit = {limit}")?;
        }
        match self.total_records {
            Some(total) => writeln!(f, "\tTotal records = {total}")?,
            None => writeln!(f, "\tTotal records = N/A")?,
        }
        writeln!(f, "\tSkipped records = {}", fmt_count_line(self, self.skipped))?;
        writeln!(f, "\tFiltered records = {}", fmt_count_line(self, self.filtered))?;
        writeln!(f, "\tIgnored records = {}", fmt_count_line(self, self.ignored))?;
        writeln!(f, "\tRejected records = {}", fmt_count_line(self, self.rejected))?;
        writeln!(f, "\tError records = {}", fmt_count_line(self, self.errors))?;
        writeln!(f, "\tSuccess records = {}", fmt_count_line(self, self.success))?;
        match self.average_record_time_ms() {
            Some(avg) => writeln!(f, "\tRecord time average = {avg:.3}ms")?,
            None => writeln!(f, "\tRecord time average = N/A")?,
        }
        if let Some(result) = &self.batch_result {
            writeln!(f, "\tResult = {result}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_routes_each_disposition_to_its_counter() {
        let mut report = Report::new("test", "in-memory", None);
        report.tally(Disposition::Success);
        report.tally(Disposition::Success);
        report.tally(Disposition::Filtered);
        report.tally(Disposition::Skipped);
        report.tally(Disposition::Ignored);
        report.tally(Disposition::Rejected);
        report.tally(Disposition::Error);

        assert_eq!(report.success_count(), 2);
        assert_eq!(report.filtered_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.ignored_count(), 1);
        assert_eq!(report.rejected_count(), 1);
        assert_eq!(report.error_count(), 1);
    }

    #[test]
    fn percentages_unavailable_without_a_total() {
        let report = Report::new("test", "in-memory", None);
        assert_eq!(report.percent_of(5), None);
        assert_eq!(report.average_record_time_ms(), None);
    }

    #[test]
    fn percentages_computed_from_the_total() {
        let mut report = Report::new("test", "in-memory", None);
        report.start();
        report.tally(Disposition::Success);
        report.finish(4);
        assert_eq!(report.percent_of(1), Some(25.0));
    }

    #[test]
    fn terminal_status_is_final() {
        let mut report = Report::new("test", "in-memory", None);
        report.start();
        report.abort();
        assert_eq!(report.status(), RunStatus::Aborted);

        report.finish(10);
        assert_eq!(report.status(), RunStatus::Aborted);
        assert_eq!(report.total_records(), None);
    }

    #[test]
    fn display_renders_unavailable_values_as_na() {
        let report = Report::new("test", "in-memory", None);
        let rendered = report.to_string();
        assert!(rendered.contains("Total records = N/A"));
        assert!(rendered.contains("Record time average = N/A"));
        assert!(rendered.contains("Skipped records = 0\n"));
    }

    #[test]
    fn display_includes_percentages_once_finished() {
        let mut report = Report::new("test", "in-memory", None);
        report.start();
        report.tally(Disposition::Success);
        report.tally(Disposition::Filtered);
        report.finish(2);
        let rendered = report.to_string();
        assert!(rendered.contains("Success records = 1 (50.0%)"));
        assert!(rendered.contains("Filtered records = 1 (50.0%)"));
    }

    #[test]
    fn report_serializes_to_json() {
        let mut report = Report::new("test", "in-memory", Some(2));
        report.start();
        report.tally(Disposition::Success);
        report.finish(1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pipeline"], "test");
        assert_eq!(json["status"], "finished");
        assert_eq!(json["total_records"], 1);
        assert_eq!(json["limit"], 2);
    }
}
