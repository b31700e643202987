// edgewave-app/src/progress.rs

use edgewave_core::{ProgressInfo, SolveStatus};
use std::time::{Duration, Instant};

/// Trait for reporting the progress of a solve.
///
/// Implementors of this trait can display progress information in various ways
/// (e.g., console output, log files).
pub trait ProgressReporter {
    /// Called after every step with updated progress information.
    fn report(&mut self, info: &ProgressInfo);

    /// Called once the solve reaches a terminal status.
    fn finish(&mut self, info: &ProgressInfo, status: SolveStatus);
}

/// A `ProgressReporter` that writes status lines to the log.
///
/// Records are emitted from this module, so their visibility follows the
/// progress log level.
pub struct ConsoleProgressReporter {
    start_time: Instant,
    last_report_time: Instant,
    report_interval: Duration,
}

impl ConsoleProgressReporter {
    /// Creates a new `ConsoleProgressReporter`.
    ///
    /// # Arguments
    ///
    /// * `report_interval` - The minimum time that must elapse between progress reports.
    pub fn new(report_interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_report_time: now,
            report_interval,
        }
    }

    /// Whether a report is due at `now`; resets the timer when it is.
    pub fn due(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_report_time) >= self.report_interval {
            self.last_report_time = now;
            true
        } else {
            false
        }
    }

    pub fn format_line(info: &ProgressInfo, elapsed: Duration) -> String {
        let secs = elapsed.as_secs_f64();
        let rate = if secs > 0.0 {
            info.resolved_cells as f64 / secs
        } else {
            0.0
        };
        format!(
            "Progress: Step {} | Resolved: {}/{} ({:.1}%) | Elapsed: {} | Rate: {:.1} cells/s",
            info.steps,
            info.resolved_cells,
            info.total_cells,
            info.percentage(),
            humantime::format_duration(Duration::from_millis(elapsed.as_millis() as u64)),
            rate
        )
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report(&mut self, info: &ProgressInfo) {
        if self.due(Instant::now()) {
            log::info!("{}", Self::format_line(info, self.start_time.elapsed()));
        }
    }

    fn finish(&mut self, info: &ProgressInfo, status: SolveStatus) {
        let elapsed = self.start_time.elapsed();
        match status {
            SolveStatus::Contradiction { .. } => log::warn!(
                "Solve stopped: {} after {} steps ({})",
                status,
                info.steps,
                humantime::format_duration(Duration::from_millis(elapsed.as_millis() as u64))
            ),
            _ => log::info!(
                "Solve finished: {} after {} steps ({})",
                status,
                info.steps,
                humantime::format_duration(Duration::from_millis(elapsed.as_millis() as u64))
            ),
        }
        self.start_time = Instant::now();
        self.last_report_time = self.start_time;
    }
}
