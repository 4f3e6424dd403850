//! Terminal feedback while a file is being transformed.

use indicatif::{ProgressBar, ProgressStyle};

/// A cyan spinner ticking in the background, with room for a short status message
#[must_use]
pub fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(120);
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}"));

    pb
}
