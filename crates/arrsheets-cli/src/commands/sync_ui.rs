use arr_sync_core::ProgressCallback;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

/// Rows between progress log lines when no terminal is attached
const LOG_INTERVAL: usize = 25;

pub struct SyncUI {
    bar: ProgressBar,
    interactive: bool,
}

impl SyncUI {
    /// `enabled` is false for quiet or JSON output; the bar then stays hidden
    pub fn new(enabled: bool) -> Self {
        let interactive = enabled && is_interactive();

        let bar = if interactive {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        } else {
            tracing::debug!(
                operation = "ui_init",
                mode = "non_interactive",
                "Progress bar disabled, using structured logging"
            );
            ProgressBar::hidden()
        };

        Self { bar, interactive }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        let msg = msg.into();
        if self.interactive {
            self.bar.set_message(msg);
        } else {
            tracing::info!(operation = "progress", message = %msg, "Progress update");
        }
    }

    /// Callback for the orchestrator; turns the spinner into a row counter
    /// once the sheet has been read
    pub fn row_callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        let interactive = self.interactive;
        Box::new(move |done, total| {
            if interactive {
                if bar.length() != Some(total as u64) {
                    bar.set_length(total as u64);
                    bar.set_style(
                        ProgressStyle::default_bar()
                            .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} rows")
                            .unwrap_or_else(|_| ProgressStyle::default_bar())
                            .progress_chars("█▉▊▋▌▍▎▏  "),
                    );
                }
                bar.set_position(done as u64);
            } else if done % LOG_INTERVAL == 0 || done == total {
                tracing::info!(
                    operation = "progress",
                    current = done,
                    total = total,
                    percent = (done as f64 / total.max(1) as f64 * 100.0) as u8,
                    "Sync progress update"
                );
            }
        })
    }

    pub fn finish(&self) {
        if self.interactive {
            self.bar.finish_and_clear();
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
