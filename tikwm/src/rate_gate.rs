//! Process-wide spacing of outbound API calls.
//!
//! tikwm rejects clients that call it too often, and the limit applies to the
//! whole client rather than to a single endpoint. Every request issued by a
//! [`Tikwm`](crate::Tikwm) passes through one shared [`RateGate`] first.
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tikwm::RateGate;
//!
//! # async fn example() {
//! let gate = Arc::new(RateGate::new(Duration::from_secs(1)));
//! gate.acquire().await; // immediate
//! gate.acquire().await; // waits for the rest of the second
//! # }
//! ```

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Interval the public tikwm API tolerates between two calls.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(11);

/// Guarantees a minimum interval between the start of any two gated calls.
///
/// Meant to be created once and shared behind an `Arc`; cloning a
/// [`Tikwm`](crate::Tikwm) client shares its gate.
#[derive(Debug)]
pub struct RateGate {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>
}

impl Default for RateGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

impl RateGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None)
        }
    }

    /// A gate that never waits.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until a call may start and records its start time.
    ///
    /// The lock is held across the sleep so that concurrent callers queue up
    /// behind each other, but it is released before the caller performs its
    /// I/O.
    pub async fn acquire(&self) {
        let mut last_request = self.last_request.lock().await;

        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let delay = self.min_interval - elapsed;
                tracing::debug!(delay_ms = delay.as_millis(), "rate gate delaying request");
                tokio::time::sleep(delay).await;
            }
        }

        *last_request = Some(Instant::now());
    }
}
