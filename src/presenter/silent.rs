use crate::presenter::FeedbackPresenter;
use log::debug;

/// Presenter for hosts without a display.
pub struct SilentPresenter;

impl SilentPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SilentPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackPresenter for SilentPresenter {
    fn show_transient(&self, label: &str) {
        debug!("No display attached; skipping transient view for {label}");
    }

    fn restore(&self) {
        // Nothing was replaced
    }
}
