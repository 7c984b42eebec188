//! Periodic refresh with cancellation
//!
//! A blocking interval loop for watch mode. Each tick runs to completion
//! before the next wait starts, so at most one fetch is in flight. The wait
//! between ticks ends early as soon as the token is cancelled.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::core::ScannerResult;

use super::RefreshConfig;

/// Interval timer driving repeated scans
#[derive(Debug, Clone)]
pub struct RefreshLoop {
    interval: Duration,
    max_ticks: Option<u64>,
}

impl RefreshLoop {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_ticks: None,
        }
    }

    pub fn from_config(config: &RefreshConfig) -> Self {
        Self {
            interval: config.interval(),
            max_ticks: config.max_ticks,
        }
    }

    /// Stop after `n` ticks even if never cancelled
    pub fn with_max_ticks(mut self, n: u64) -> Self {
        self.max_ticks = Some(n);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Call `tick` now and then once per interval until cancelled
    ///
    /// `tick` receives the 1-based tick number. Returns how many ticks ran.
    pub fn run<F>(&self, token: &CancellationToken, mut tick: F) -> ScannerResult<u64>
    where
        F: FnMut(u64),
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;

        let mut ticks = 0u64;
        while !token.is_cancelled() {
            ticks += 1;
            tick(ticks);

            if self.max_ticks.is_some_and(|max| ticks >= max) {
                tracing::debug!("Refresh loop reached {} ticks", ticks);
                break;
            }

            let cancelled = runtime.block_on(async {
                tokio::select! {
                    _ = token.cancelled() => true,
                    _ = tokio::time::sleep(self.interval) => false,
                }
            });
            if cancelled {
                break;
            }
        }

        tracing::info!("Refresh loop stopped after {} ticks", ticks);
        Ok(ticks)
    }
}
