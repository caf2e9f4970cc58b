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

//! Trigger events and the level-triggered signal channels they come from.

pub mod filesystem;
pub mod memory;

pub use filesystem::FilesystemSignalSource;
pub use memory::InMemorySignalSource;

use crate::error::Result;
use std::fmt;

/// Named request a trigger source can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum TriggerKind {
    /// Toggle between AUTO and MANUAL after the countdown
    #[value(alias = "toggle")]
    Switch,
    /// Show the transient view for the configured delay, then restore
    Test,
    /// Abort a pending switch
    Cancel,
}

impl TriggerKind {
    /// Order in which the watchdog inspects signals on every poll.
    pub const POLL_ORDER: [TriggerKind; 3] =
        [TriggerKind::Switch, TriggerKind::Test, TriggerKind::Cancel];

    /// Maps a webhook-style command path to a trigger.
    pub fn from_command(command: &str) -> Option<Self> {
        match command.trim_matches('/') {
            "toggle" | "switch" => Some(TriggerKind::Switch),
            "test" => Some(TriggerKind::Test),
            "cancel" => Some(TriggerKind::Cancel),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Switch => "switch",
            TriggerKind::Test => "test",
            TriggerKind::Cancel => "cancel",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request, consumed once by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    pub kind: TriggerKind,
    /// Where the request came from. Only used for logging.
    pub origin: String,
}

impl TriggerEvent {
    pub fn new(kind: TriggerKind, origin: impl Into<String>) -> Self {
        Self {
            kind,
            origin: origin.into(),
        }
    }
}

/// Three independently settable boolean signals, polled rather than pushed.
pub trait SignalSource: Send + Sync {
    /// Label recorded as the origin of events raised from this source.
    fn origin(&self) -> &str;

    fn is_asserted(&self, kind: TriggerKind) -> bool;

    /// Sets the signal. Asserting an already asserted signal is a no-op.
    fn assert(&self, kind: TriggerKind) -> Result<()>;

    /// Clears the signal. Clearing an absent signal succeeds.
    fn clear(&self, kind: TriggerKind) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_command_accepts_aliases() {
        assert_eq!(TriggerKind::from_command("toggle"), Some(TriggerKind::Switch));
        assert_eq!(TriggerKind::from_command("switch"), Some(TriggerKind::Switch));
        assert_eq!(TriggerKind::from_command("/test/"), Some(TriggerKind::Test));
        assert_eq!(TriggerKind::from_command("cancel"), Some(TriggerKind::Cancel));
        assert_eq!(TriggerKind::from_command("reboot"), None);
    }

    #[test]
    fn poll_order_is_switch_test_cancel() {
        assert_eq!(
            TriggerKind::POLL_ORDER,
            [TriggerKind::Switch, TriggerKind::Test, TriggerKind::Cancel]
        );
    }

    #[test]
    fn event_records_origin() {
        let event = TriggerEvent::new(TriggerKind::Cancel, "Webhook");
        assert_eq!(event.kind, TriggerKind::Cancel);
        assert_eq!(event.origin, "Webhook");
    }
}
