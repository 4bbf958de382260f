use crate::id_extraction::extract_external_id;
use crate::movie::MovieReconciler;
use crate::outcome::Reconciliation;
use crate::series::SeriesReconciler;
use arr_sync_models::{ExternalId, MediaKind, OutputRow, SheetRange, SyncStatus, WatchListRow};
use arr_sync_sources::{SourceError, SourceSet};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// Called after each row with (rows done, total rows)
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

pub struct SyncOrchestrator {
    sources: SourceSet,
    range: SheetRange,
    dry_run: bool,
    progress: Option<ProgressCallback>,
}

/// One watch list row and what was written next to it
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    /// Sheet row number, 1-based
    pub row_number: u32,
    pub url: Option<String>,
    pub external_id: Option<ExternalId>,
    #[serde(flatten)]
    pub output: OutputRow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum WriteBack {
    Written { range: String, rows: usize },
    Skipped { reason: String },
    Failed {
        range: String,
        error: String,
        /// What to change in the setup when the sheet refused the write
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<String>,
    },
}

impl WriteBack {
    pub fn is_failed(&self) -> bool {
        matches!(self, WriteBack::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub rows: Vec<ReportRow>,
    /// Add requests accepted by a library manager
    pub added: usize,
    pub dry_run: bool,
    pub read_error: Option<String>,
    pub write_back: WriteBack,
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
}

impl SyncReport {
    /// Rows per status category, blank rows excluded
    pub fn status_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for status in self.rows.iter().filter_map(|row| row.output.status) {
            *counts.entry(status.category()).or_insert(0) += 1;
        }
        counts
    }

    pub fn count(&self, category: &str) -> usize {
        self.status_counts().get(category).copied().unwrap_or(0)
    }

    pub fn blank_rows(&self) -> usize {
        self.rows.iter().filter(|row| row.output.is_blank()).count()
    }

    /// The run finished but something was not recorded or read
    pub fn has_errors(&self) -> bool {
        self.read_error.is_some() || self.write_back.is_failed() || self.count(SyncStatus::Error.category()) > 0
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl SyncOrchestrator {
    pub fn new(sources: SourceSet, range: SheetRange) -> Self {
        Self {
            sources,
            range,
            dry_run: false,
            progress: None,
        }
    }

    /// Query everything but skip add requests and the write-back
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    #[instrument(skip(self), fields(range = %self.range, dry_run = self.dry_run))]
    pub async fn run(&self) -> SyncReport {
        let start = Instant::now();

        let (rows, read_error) = match self.sources.sheet.read_rows(self.range.as_str()).await {
            Ok(rows) => (rows, None),
            Err(e) => {
                error!("Failed to read watch list from {}: {}", self.range, e);
                (Vec::new(), Some(e.to_string()))
            }
        };
        info!("Read {} rows from {}", rows.len(), self.range);

        let first_row = self.range.start_row().unwrap_or(1);
        let total = rows.len();
        let mut report_rows = Vec::with_capacity(total);
        let mut added = 0;

        for (index, cells) in rows.iter().enumerate() {
            let row = WatchListRow::from_cells(cells);
            let external_id = row.url().and_then(extract_external_id);

            let output = match (row.url(), external_id) {
                (None, _) => OutputRow::blank(),
                (Some(url), None) => {
                    debug!("Row {}: unrecognised URL {}", first_row as usize + index, url);
                    OutputRow::blank()
                }
                (Some(_), Some(id)) => {
                    let result = self.reconcile(id).await;
                    if result.added {
                        added += 1;
                    }
                    result.row
                }
            };

            report_rows.push(ReportRow {
                row_number: first_row + index as u32,
                url: row.url().map(str::to_string),
                external_id,
                output,
            });

            if let Some(progress) = &self.progress {
                progress(index + 1, total);
            }
        }

        let write_back = self.write_back(&report_rows).await;

        let report = SyncReport {
            rows: report_rows,
            added,
            dry_run: self.dry_run,
            read_error,
            write_back,
            duration: start.elapsed(),
        };
        info!(
            "Sync finished: {} rows, {} added in {:.2}s",
            report.rows.len(),
            report.added,
            report.duration.as_secs_f64()
        );
        report
    }

    async fn reconcile(&self, id: ExternalId) -> Reconciliation {
        match id.kind {
            MediaKind::Movie => {
                MovieReconciler::new(self.sources.movies.as_ref())
                    .with_dry_run(self.dry_run)
                    .reconcile(id.tmdb_id)
                    .await
            }
            MediaKind::Series => {
                SeriesReconciler::new(self.sources.series.as_ref())
                    .with_dry_run(self.dry_run)
                    .reconcile(id.tmdb_id)
                    .await
            }
        }
    }

    /// Write every output row in one request
    async fn write_back(&self, rows: &[ReportRow]) -> WriteBack {
        if rows.is_empty() {
            return WriteBack::Skipped {
                reason: "no rows".to_string(),
            };
        }
        if self.dry_run {
            return WriteBack::Skipped {
                reason: "dry run".to_string(),
            };
        }

        let range = self.range.output_range();
        let values: Vec<Vec<String>> = rows.iter().map(|row| row.output.to_cells()).collect();

        match self.sources.sheet.write_rows(&range, &values).await {
            Ok(()) => {
                info!("Wrote {} rows to {}", values.len(), range);
                WriteBack::Written {
                    range,
                    rows: values.len(),
                }
            }
            Err(e) => {
                error!("Failed to write results to {}: {}", range, e);
                let hint = write_hint(self.sources.sheet.can_write(), &e);
                if let Some(hint) = &hint {
                    warn!("{}", hint);
                }
                WriteBack::Failed {
                    range,
                    error: e.to_string(),
                    hint,
                }
            }
        }
    }
}

fn write_hint(can_write: bool, error: &SourceError) -> Option<String> {
    if !can_write {
        Some("An API key only grants read access; configure service_account_file to write results".to_string())
    } else if error.is_permission_denied() {
        Some("The service account needs editor access; share the spreadsheet with its client_email".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeMovieLibrary, FakeSeriesLibrary, FakeSheet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const MATRIX: &str = "https://www.themoviedb.org/movie/603-the-matrix";
    const FIGHT_CLUB: &str = "https://www.themoviedb.org/movie/550-fight-club";
    const THRONES: &str = "https://www.themoviedb.org/tv/1399-game-of-thrones";

    fn range() -> SheetRange {
        SheetRange::parse("Sheet1!A2:A").unwrap()
    }

    fn movies() -> FakeMovieLibrary {
        FakeMovieLibrary::default()
            .with_movie(603, true, Some("1999-09-21T00:00:00Z"))
            .with_lookup(550, Some("2000-04-25T00:00:00Z"))
    }

    fn series() -> FakeSeriesLibrary {
        FakeSeriesLibrary::default()
            .with_lookup(1399, 121361, "Game of Thrones", Some("2011-04-17"))
            .with_series(121361, 45.6)
    }

    fn orchestrator(sheet: FakeSheet, movies: FakeMovieLibrary, series: FakeSeriesLibrary) -> SyncOrchestrator {
        let sources = SourceSet {
            sheet: Box::new(sheet),
            movies: Box::new(movies),
            series: Box::new(series),
        };
        SyncOrchestrator::new(sources, range())
    }

    fn cells(status: &str, date: &str) -> Vec<String> {
        vec![status.to_string(), date.to_string()]
    }

    #[tokio::test]
    async fn test_output_rows_line_up_with_input() {
        let sheet = FakeSheet::with_urls(&[MATRIX, "", "https://example.com/nothing", THRONES, FIGHT_CLUB]);
        let writes = sheet.writes.clone();
        let report = orchestrator(sheet, movies(), series()).run().await;

        let writes = writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        let (written_range, values) = &writes[0];
        assert_eq!(written_range, "Sheet1!B2:C");
        assert_eq!(
            values,
            &vec![
                cells("Downloaded", "1999-09-21"),
                cells("", ""),
                cells("", ""),
                cells("Partial (46%)", "2011-04-17"),
                cells("Monitored", "2000-04-25"),
            ]
        );

        assert_eq!(report.rows.len(), 5);
        assert_eq!(report.rows[0].row_number, 2);
        assert_eq!(report.rows[4].row_number, 6);
        assert_eq!(report.added, 1);
        assert_eq!(report.blank_rows(), 2);
        assert_eq!(
            report.write_back,
            WriteBack::Written {
                range: "Sheet1!B2:C".to_string(),
                rows: 5
            }
        );
        assert!(!report.has_errors());
    }

    #[tokio::test]
    async fn test_status_counts() {
        let sheet = FakeSheet::with_urls(&[MATRIX, THRONES, FIGHT_CLUB, "https://www.themoviedb.org/tv/42"]);
        let report = orchestrator(sheet, movies(), series()).run().await;

        let counts = report.status_counts();
        assert_eq!(counts.get("Downloaded"), Some(&1));
        assert_eq!(counts.get("Partial"), Some(&1));
        assert_eq!(counts.get("Monitored"), Some(&1));
        assert_eq!(counts.get("Not Found"), Some(&1));
    }

    #[tokio::test]
    async fn test_empty_sheet_skips_write() {
        let sheet = FakeSheet::with_urls(&[]);
        let writes = sheet.writes.clone();
        let report = orchestrator(sheet, movies(), series()).run().await;

        assert!(report.rows.is_empty());
        assert!(writes.lock().unwrap().is_empty());
        assert!(matches!(report.write_back, WriteBack::Skipped { .. }));
    }

    #[tokio::test]
    async fn test_read_failure_is_a_no_op_run() {
        let mut sheet = FakeSheet::with_urls(&[MATRIX]);
        sheet.fail_read = true;
        let writes = sheet.writes.clone();
        let report = orchestrator(sheet, movies(), series()).run().await;

        assert!(report.rows.is_empty());
        assert!(report.read_error.is_some());
        assert!(writes.lock().unwrap().is_empty());
        assert!(report.has_errors());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_adds() {
        let mut sheet = FakeSheet::with_urls(&[FIGHT_CLUB]);
        sheet.write_error = Some(403);
        sheet.writable = false;
        let movies = movies();
        let add_calls = movies.add_calls.clone();
        let report = orchestrator(sheet, movies, series()).run().await;

        assert_eq!(*add_calls.lock().unwrap(), vec![550]);
        assert_eq!(report.added, 1);
        assert!(report.write_back.is_failed());
        assert!(report.has_errors());
    }

    #[tokio::test]
    async fn test_write_failure_hints() {
        let mut read_only = FakeSheet::with_urls(&[FIGHT_CLUB]);
        read_only.write_error = Some(403);
        read_only.writable = false;
        let report = orchestrator(read_only, movies(), series()).run().await;
        let WriteBack::Failed { hint: Some(hint), .. } = report.write_back else {
            panic!("expected a failed write with a hint");
        };
        assert!(hint.contains("service_account_file"));

        let mut not_shared = FakeSheet::with_urls(&[FIGHT_CLUB]);
        not_shared.write_error = Some(403);
        let report = orchestrator(not_shared, movies(), series()).run().await;
        let WriteBack::Failed { hint: Some(hint), .. } = report.write_back else {
            panic!("expected a failed write with a hint");
        };
        assert!(hint.contains("editor access"));

        let mut unavailable = FakeSheet::with_urls(&[FIGHT_CLUB]);
        unavailable.write_error = Some(503);
        let report = orchestrator(unavailable, movies(), series()).run().await;
        assert!(matches!(report.write_back, WriteBack::Failed { hint: None, .. }));
    }

    #[tokio::test]
    async fn test_dry_run_neither_adds_nor_writes() {
        let sheet = FakeSheet::with_urls(&[MATRIX, FIGHT_CLUB]);
        let writes = sheet.writes.clone();
        let movies = movies();
        let add_calls = movies.add_calls.clone();
        let report = orchestrator(sheet, movies, series()).with_dry_run(true).run().await;

        assert!(add_calls.lock().unwrap().is_empty());
        assert!(writes.lock().unwrap().is_empty());
        assert_eq!(report.rows[1].output.status, Some(SyncStatus::WouldAdd));
        assert_eq!(report.rows[1].output.date, "2000-04-25");
        assert_eq!(
            report.write_back,
            WriteBack::Skipped {
                reason: "dry run".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_query_errors_are_written_as_rows() {
        let sheet = FakeSheet::with_urls(&[MATRIX, THRONES]);
        let writes = sheet.writes.clone();
        let movies = FakeMovieLibrary {
            fail_queries: true,
            ..Default::default()
        };
        let report = orchestrator(sheet, movies, series()).run().await;

        assert_eq!(report.rows[0].output.status, Some(SyncStatus::Error));
        assert_eq!(writes.lock().unwrap()[0].1[0], cells("Error", ""));
        assert!(report.has_errors());
    }

    #[tokio::test]
    async fn test_progress_reports_every_row() {
        let sheet = FakeSheet::with_urls(&[MATRIX, "", THRONES]);
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let report = orchestrator(sheet, movies(), series())
            .with_progress(Box::new(move |done, total| {
                assert_eq!(total, 3);
                counter.store(done, Ordering::SeqCst);
            }))
            .run()
            .await;

        assert_eq!(report.rows.len(), 3);
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_report_serializes_labels() {
        let sheet = FakeSheet::with_urls(&[THRONES]);
        let report = orchestrator(sheet, movies(), series()).run().await;

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rows"][0]["status"], "Partial (46%)");
        assert_eq!(json["rows"][0]["date"], "2011-04-17");
        assert_eq!(json["write_back"]["result"], "written");
    }
}
