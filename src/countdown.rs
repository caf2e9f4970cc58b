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

use crate::cancellation::CancellationToken;
use crate::config::ModeSwitchConfig;
use log::{debug, info};
use std::thread;
use std::time::Duration;

/// Terminal state of a countdown. A countdown is `Running` until `run` returns one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    Completed,
    Aborted,
}

/// Fixed-length timer that checks a cancellation token before every tick,
/// bounding abort latency to one tick regardless of the total delay.
#[derive(Debug)]
pub struct CancellableCountdown {
    steps: u64,
    tick: Duration,
    token: CancellationToken,
}

impl CancellableCountdown {
    pub fn new(steps: u64, tick: Duration, token: CancellationToken) -> Self {
        Self { steps, tick, token }
    }

    pub fn from_config(config: &ModeSwitchConfig, token: CancellationToken) -> Self {
        Self::new(config.countdown_steps(), config.tick_interval(), token)
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Blocks the calling thread until the countdown ends.
    ///
    /// `on_abort` runs if the token is cancelled before the last tick has
    /// elapsed; otherwise `on_complete` runs. Exactly one of them is called.
    pub fn run(self, on_complete: impl FnOnce(), on_abort: impl FnOnce()) -> CountdownOutcome {
        debug!("Countdown started: {} ticks of {:?}", self.steps, self.tick);

        for _ in 0..self.steps {
            if self.token.is_cancelled() {
                return self.abort(on_abort);
            }
            thread::sleep(self.tick);
        }
        if self.token.is_cancelled() {
            return self.abort(on_abort);
        }

        info!("Countdown finished. Executing restart.");
        on_complete();
        CountdownOutcome::Completed
    }

    fn abort(&self, on_abort: impl FnOnce()) -> CountdownOutcome {
        info!("Restart ABORTED by user.");
        on_abort();
        CountdownOutcome::Aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Instant;

    #[test]
    fn zero_steps_completes_immediately() {
        let completed = Cell::new(false);
        let countdown =
            CancellableCountdown::new(0, Duration::from_millis(100), CancellationToken::new());

        let started = Instant::now();
        let outcome = countdown.run(|| completed.set(true), || panic!("must not abort"));

        assert_eq!(outcome, CountdownOutcome::Completed);
        assert!(completed.get());
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn runs_all_ticks_then_completes() {
        let countdown =
            CancellableCountdown::new(5, Duration::from_millis(10), CancellationToken::new());

        let started = Instant::now();
        let outcome = countdown.run(|| {}, || panic!("must not abort"));

        assert_eq!(outcome, CountdownOutcome::Completed);
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn pre_cancelled_token_aborts_without_waiting() {
        let token = CancellationToken::new();
        token.cancel();
        let aborted = Cell::new(false);

        let started = Instant::now();
        let outcome = CancellableCountdown::new(1_000, Duration::from_millis(100), token)
            .run(|| panic!("must not commit"), || aborted.set(true));

        assert_eq!(outcome, CountdownOutcome::Aborted);
        assert!(aborted.get());
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn cancellation_mid_countdown_aborts_within_a_tick() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        let countdown = CancellableCountdown::new(100, Duration::from_millis(10), token);

        let handle = thread::spawn(move || countdown.run(|| {}, || {}));
        thread::sleep(Duration::from_millis(50));
        let cancelled_at = Instant::now();
        canceller.cancel();

        assert_eq!(handle.join().unwrap(), CountdownOutcome::Aborted);
        assert!(cancelled_at.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn cancellation_during_last_tick_still_aborts() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        let countdown = CancellableCountdown::new(1, Duration::from_millis(200), token);

        let handle = thread::spawn(move || countdown.run(|| panic!("must not commit"), || {}));
        thread::sleep(Duration::from_millis(50));
        canceller.cancel();

        assert_eq!(handle.join().unwrap(), CountdownOutcome::Aborted);
    }

    #[test]
    fn steps_follow_config() {
        let config = ModeSwitchConfig {
            restart_delay: 2.0,
            ..Default::default()
        };
        let countdown = CancellableCountdown::from_config(&config, CancellationToken::new());
        assert_eq!(countdown.steps(), 20);
    }
}
