//! Progress bar on stderr while repositories are evaluated

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// One tick per evaluated repository; a no-op when hidden
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Show a bar over `repositories` tasks, unless disabled or there is nothing to evaluate
    pub fn start(enabled: bool, repositories: usize) -> Self {
        if !enabled || repositories == 0 {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(repositories as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} Evaluating {msg} [{bar:30.cyan/blue}] {pos}/{len}")
                .expect("Invalid template")
                .progress_chars("█▓▒░"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    pub fn repository_done(&self, repository: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(repository.to_string());
            bar.inc(1);
        }
    }

    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_progress_has_no_bar() {
        let progress = Progress::start(false, 10);
        assert!(progress.bar.is_none());
        progress.repository_done("acme/web");
        progress.finish();
    }

    #[test]
    fn test_empty_run_has_no_bar() {
        assert!(Progress::start(true, 0).bar.is_none());
    }

    #[test]
    fn test_bar_counts_repositories() {
        let progress = Progress::start(true, 2);
        progress.repository_done("acme/web");
        progress.repository_done("acme/api");
        assert_eq!(progress.bar.as_ref().map(|b| b.position()), Some(2));
        progress.finish();
    }
}
