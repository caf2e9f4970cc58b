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

//! Cooperative cancellation shared between threads.
//!
//! A [`CancellationToken`] is what a countdown watches between ticks and what
//! the daemon loop watches between watchdog checks. Setting it never blocks.

use log::warn;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::flag;
use std::os::raw::c_int;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

const SHUTDOWN_SIGNALS: [c_int; 2] = [SIGINT, SIGTERM];

static SHUTDOWN_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    fn observing(flag: &Arc<AtomicBool>) -> Self {
        Self {
            flag: Arc::clone(flag),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Re-arms the token for the next countdown.
    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

fn install_shutdown_flag() -> Arc<AtomicBool> {
    let raised = Arc::new(AtomicBool::new(false));
    for signal in SHUTDOWN_SIGNALS {
        if let Err(e) = flag::register(signal, Arc::clone(&raised)) {
            warn!("Cannot watch signal {signal} for shutdown: {e}");
        }
    }
    raised
}

/// Token cancelled once the process receives SIGINT or SIGTERM. Handlers are
/// installed on first use.
pub fn shutdown_token() -> CancellationToken {
    CancellationToken::observing(SHUTDOWN_FLAG.get_or_init(install_shutdown_flag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_state() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());

        token.cancel();
        assert!(observer.is_cancelled());

        token.reset();
        assert!(!observer.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancellation_crosses_threads() {
        let token = CancellationToken::new();
        let worker_token = token.clone();
        let worker = thread::spawn(move || {
            while !worker_token.is_cancelled() {
                thread::yield_now();
            }
        });
        token.cancel();
        worker.join().unwrap();
    }

    #[test]
    #[cfg(unix)]
    fn sigterm_cancels_every_shutdown_token() {
        let first = shutdown_token();
        let second = shutdown_token();
        assert!(!first.is_cancelled());

        signal_hook::low_level::raise(SIGTERM).unwrap();

        assert!(first.is_cancelled());
        assert!(second.is_cancelled());
    }
}
