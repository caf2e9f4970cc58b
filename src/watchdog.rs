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

//! Turns level-triggered signals into one-shot trigger events.
//!
//! Every poll clears an asserted signal before dispatching it, so a single
//! assertion produces a single event no matter how long the signal would
//! otherwise have stayed up.

use crate::cancellation::CancellationToken;
use crate::coordinator::TriggerHandler;
use crate::error::Result;
use crate::signals::{SignalSource, TriggerEvent, TriggerKind};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const WATCHDOG_THREAD_NAME: &str = "modeswitch-watchdog";
const STOP_CHECK_INTERVAL: Duration = Duration::from_millis(50);

pub struct DebouncedWatchdog {
    source: Arc<dyn SignalSource>,
    handler: Arc<dyn TriggerHandler>,
    interval: Duration,
}

impl DebouncedWatchdog {
    pub fn new(
        source: Arc<dyn SignalSource>,
        handler: Arc<dyn TriggerHandler>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            handler,
            interval,
        }
    }

    /// Inspects every signal once, in [`TriggerKind::POLL_ORDER`], and
    /// returns how many events were dispatched.
    pub fn poll_once(&self) -> usize {
        let mut dispatched = 0;
        for kind in TriggerKind::POLL_ORDER {
            if !self.source.is_asserted(kind) {
                continue;
            }

            // A signal that cannot be cleared fires again next poll; the
            // coordinator rejects the repeat.
            if let Err(e) = self.source.clear(kind) {
                warn!("{e}");
            }

            let origin = self.source.origin().to_string();
            let response = self.handler.handle(TriggerEvent::new(kind, origin.as_str()));
            info!("[{origin}] {kind}: {response}");
            dispatched += 1;
        }
        dispatched
    }

    /// Polls until `stop` is cancelled.
    pub fn run(&self, stop: &CancellationToken) {
        info!(
            "Watchdog polling {} signals every {:?}",
            self.source.origin(),
            self.interval
        );
        while !stop.is_cancelled() {
            let dispatched = self.poll_once();
            if dispatched > 0 {
                debug!("Dispatched {dispatched} trigger(s)");
            }
            self.sleep_until_next_poll(stop);
        }
        info!("Watchdog stopped");
    }

    fn sleep_until_next_poll(&self, stop: &CancellationToken) {
        let deadline = Instant::now() + self.interval;
        loop {
            let now = Instant::now();
            if stop.is_cancelled() || now >= deadline {
                return;
            }
            thread::sleep(STOP_CHECK_INTERVAL.min(deadline - now));
        }
    }

    /// Runs the poll loop on its own thread.
    pub fn spawn(self) -> Result<WatchdogHandle> {
        let stop = CancellationToken::new();
        let token = stop.clone();
        let thread = thread::Builder::new()
            .name(WATCHDOG_THREAD_NAME.to_string())
            .spawn(move || self.run(&token))?;

        Ok(WatchdogHandle {
            stop,
            thread: Some(thread),
        })
    }
}

/// Stops the watchdog thread when asked or when dropped.
pub struct WatchdogHandle {
    stop: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl WatchdogHandle {
    /// Signals the loop to stop and waits for it.
    ///
    /// A UI test in progress finishes first, since it blocks the poll loop.
    pub fn stop(mut self) {
        self.stop.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Watchdog thread panicked");
            }
        }
    }
}

impl Drop for WatchdogHandle {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}
