use crate::config::DisplayConfig;
use crate::error::Result;
use crate::presenter::surface::{DisplaySurface, VisualSnapshot};
use crate::presenter::{FeedbackPresenter, TRANSIENT_KEYS, TransientView};
use log::{debug, error, info};
use std::sync::{Mutex, MutexGuard, PoisonError};

struct PresenterState<S> {
    surface: S,
    snapshot: Option<VisualSnapshot>,
}

/// Presenter that swaps the whole display for the transient view and puts
/// the captured elements back afterwards.
pub struct SnapshotPresenter<S: DisplaySurface> {
    view: TransientView,
    state: Mutex<PresenterState<S>>,
}

impl<S: DisplaySurface> SnapshotPresenter<S> {
    pub fn new(surface: S, display: DisplayConfig) -> Self {
        Self {
            view: TransientView::new(display),
            state: Mutex::new(PresenterState {
                surface,
                snapshot: None,
            }),
        }
    }

    pub fn holds_snapshot(&self) -> bool {
        self.lock().snapshot.is_some()
    }

    /// Runs `f` against the underlying surface.
    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.lock().surface)
    }

    // A panic in a surface call must not wedge every later switch.
    fn lock(&self) -> MutexGuard<'_, PresenterState<S>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn draw_transient(&self, surface: &mut S, label: &str) -> Result<()> {
        for (key, element) in self.view.elements(label) {
            surface.add_element(key, element)?;
        }
        surface.update(true)
    }
}

impl<S: DisplaySurface> FeedbackPresenter for SnapshotPresenter<S> {
    fn show_transient(&self, label: &str) {
        let mut state = self.lock();
        let PresenterState { surface, snapshot } = &mut *state;

        if snapshot.is_none() {
            let captured = VisualSnapshot::capture(surface);
            debug!("Captured {} display elements", captured.len());
            *snapshot = Some(captured);
        }

        for (key, _) in surface.elements() {
            surface.remove_element(&key);
        }

        if let Err(e) = self.draw_transient(surface, label) {
            error!("UI update failed: {e}");
        }
    }

    fn restore(&self) {
        let mut state = self.lock();
        let PresenterState { surface, snapshot } = &mut *state;
        info!("Restoring normal UI...");

        for key in TRANSIENT_KEYS {
            if surface.contains(key) {
                surface.remove_element(key);
            }
        }

        if let Some(captured) = snapshot.take() {
            let mut failed = false;
            for (key, element) in captured.iter() {
                if let Err(e) = surface.add_element(key, element.clone()) {
                    error!("UI restore failed for '{key}': {e}");
                    failed = true;
                }
            }
            if failed {
                // Keep the capture so a later restore can finish the job.
                *snapshot = Some(captured);
            }
        }

        if let Err(e) = surface.update(true) {
            error!("UI restore failed: {e}");
        }
    }
}
