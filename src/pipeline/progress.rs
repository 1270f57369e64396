// file: src/pipeline/progress.rs
// description: spinner feedback and request statistics for interactive queries
// reference: uses indicatif for progress spinners and tracks request metrics

use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct QueryStats {
    pub items_returned: usize,
    pub duration_secs: f64,
}

impl QueryStats {
    pub fn summary_line(&self) -> String {
        format!(
            "{} items in {:.2}s",
            self.items_returned, self.duration_secs
        )
    }
}

/// Spinner shown while a summary flow waits on the store or the classifier.
pub struct QueryProgress {
    spinner: ProgressBar,
    start_time: Instant,
    finished: bool,
}

impl QueryProgress {
    pub fn start(message: &str, colored: bool) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style(colored));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(message.to_string());

        Self {
            spinner,
            start_time: Instant::now(),
            finished: false,
        }
    }

    /// Spinner that never draws, for piped or exported output.
    pub fn hidden() -> Self {
        Self {
            spinner: ProgressBar::hidden(),
            start_time: Instant::now(),
            finished: false,
        }
    }

    pub fn finish(&mut self, items_returned: usize) -> QueryStats {
        let stats = QueryStats {
            items_returned,
            duration_secs: self.start_time.elapsed().as_secs_f64(),
        };

        self.spinner.finish_and_clear();
        self.finished = true;
        stats
    }
}

impl Drop for QueryProgress {
    fn drop(&mut self) {
        if !self.finished {
            self.spinner.finish_and_clear();
        }
    }
}

fn spinner_style(colored: bool) -> ProgressStyle {
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] {msg:.cyan}"
    } else {
        "{spinner} [{elapsed_precise}] {msg}"
    };

    ProgressStyle::default_spinner()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
