// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Feedback shown while a switch or UI test is running.
//!
//! The coordinator only depends on [`FeedbackPresenter`]. Implementations:
//! - [`SnapshotPresenter`] - snapshots a [`DisplaySurface`], swaps in the
//!   transient status view and puts the original elements back on restore
//! - [`SilentPresenter`] - no display attached (Null Object pattern)

mod silent;
mod snapshot;
mod surface;

pub use silent::SilentPresenter;
pub use snapshot::SnapshotPresenter;
pub use surface::{DisplaySurface, ElementDefinition, MemorySurface, VisualSnapshot};

use crate::config::DisplayConfig;

/// Element keys owned by the transient view.
pub const FACE_KEY: &str = "restart_face";
pub const MESSAGE_KEY: &str = "restart_msg";
pub const ABORT_KEY: &str = "restart_abort";
pub const TRANSIENT_KEYS: [&str; 3] = [FACE_KEY, MESSAGE_KEY, ABORT_KEY];

/// Label shown by the calibration test in place of a target mode.
pub const TEST_LABEL: &str = "TESTING";

/// Snapshot / replace / restore protocol the host display must honor.
///
/// Neither operation returns an error: rendering failures are logged by the
/// implementation and must leave any held snapshot intact.
pub trait FeedbackPresenter: Send + Sync {
    /// Replaces everything on screen with the status view for `label`.
    ///
    /// Captures the current elements first unless a capture is already held,
    /// so calling it twice never overwrites the real display with the
    /// transient one.
    fn show_transient(&self, label: &str);

    /// Removes the status view and re-adds the captured elements.
    /// Safe to call without a held capture.
    fn restore(&self);
}

/// The three status elements, built from the display configuration.
#[derive(Debug, Clone)]
pub struct TransientView {
    display: DisplayConfig,
}

impl TransientView {
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    /// Message template with `{mode}` replaced by `label`.
    pub fn message(&self, label: &str) -> String {
        self.display.msg.replace("{mode}", label)
    }

    pub fn elements(&self, label: &str) -> [(&'static str, ElementDefinition); 3] {
        let display = &self.display;
        let font = display.font_path.clone();
        [
            (
                FACE_KEY,
                ElementDefinition::text(
                    display.face.clone(),
                    (display.face_x, display.face_y),
                    display.face_size,
                )
                .with_font(font.clone()),
            ),
            (
                MESSAGE_KEY,
                ElementDefinition::text(
                    self.message(label),
                    (display.msg_x, display.msg_y),
                    display.msg_size,
                )
                .with_font(font.clone()),
            ),
            (
                ABORT_KEY,
                ElementDefinition::text(
                    display.abort_msg.clone(),
                    (display.abort_x, display.abort_y),
                    display.abort_size,
                )
                .with_font(font),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn message_substitutes_label() {
        let view = TransientView::new(DisplayConfig::default());
        assert_eq!(view.message("MANUAL"), "REBOOTING TO\n    MANUAL");
        assert_eq!(view.message(TEST_LABEL), "REBOOTING TO\n    TESTING");
    }

    #[test]
    fn elements_follow_display_config() {
        let display = DisplayConfig {
            face: "(>_<)".to_string(),
            abort_y: 90,
            font_path: Some(PathBuf::from("/fonts/bold.ttf")),
            ..Default::default()
        };
        let view = TransientView::new(display);
        let [face, message, abort] = view.elements("AUTO");

        assert_eq!(face.0, FACE_KEY);
        assert_eq!(face.1.value, "(>_<)");
        assert_eq!(face.1.position, (55, 15));
        assert_eq!(face.1.font_size, 35);
        assert_eq!(message.0, MESSAGE_KEY);
        assert!(message.1.value.ends_with("AUTO"));
        assert_eq!(abort.0, ABORT_KEY);
        assert_eq!(abort.1.position, (50, 90));
        assert_eq!(
            abort.1.font_path.as_deref(),
            Some(std::path::Path::new("/fonts/bold.ttf"))
        );
    }
}
