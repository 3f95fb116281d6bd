use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} items {msg}";

pub(crate) struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    pub(crate) fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE) {
            bar.set_style(style.progress_chars("##-"));
        }
        // Keeps the elapsed time moving while a request is backing off
        bar.enable_steady_tick(Duration::from_secs(1));

        Self { bar }
    }

    pub(crate) fn start(&self, item: &str) {
        self.bar.set_message(item.to_string());
    }

    pub(crate) fn increment(&self) {
        self.bar.inc(1);
    }

    pub(crate) fn finish(&self, message: String) {
        self.bar.finish_with_message(message);
    }
}
