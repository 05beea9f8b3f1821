use crate::utils::ProgressStyleTemplate;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

pub trait MultiProgressNew {
    fn add_with_style(&self, pb: ProgressBar, style: ProgressStyle) -> ProgressBar;

    fn add_spinner(&self, message: impl Into<String>) -> ProgressBar {
        let pb = self.add_with_style(
            ProgressBar::new_spinner(),
            ProgressStyleTemplate::only_message(),
        );
        pb.set_message(message.into());
        pb
    }
}

impl MultiProgressNew for MultiProgress {
    fn add_with_style(&self, pb: ProgressBar, style: ProgressStyle) -> ProgressBar {
        let pb = self.add(pb);
        pb.set_style(style);
        if !self.is_hidden() {
            pb.enable_steady_tick(Duration::from_millis(100));
        }
        pb
    }
}

/// Progress drawn on stderr, or nowhere when `quiet`.
pub fn multi_progress(quiet: bool) -> MultiProgress {
    if quiet {
        MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
    } else {
        MultiProgress::with_draw_target(ProgressDrawTarget::stderr())
    }
}
