//! Global request-rate limiter shared by all workers.
//!
//! Sliding-window admission: at most `rate` operations inside any
//! trailing `period`. Callers suspend in [`RateLimiter::acquire`] until
//! the oldest admission in the window ages out. Ordering under
//! contention is not guaranteed beyond "someone gets the freed slot".

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

pub struct RateLimiter {
    rate: usize,
    period: Duration,
    admissions: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Create a limiter admitting `rate` operations per `period`.
    ///
    /// Both values are validated at configuration time; zero here is a
    /// wiring bug.
    pub fn new(rate: usize, period: Duration) -> Self {
        assert!(rate > 0, "rate limit must be greater than zero");
        assert!(!period.is_zero(), "rate period must be greater than zero");
        Self {
            rate,
            period,
            admissions: Mutex::new(VecDeque::new()),
        }
    }

    /// Suspend until one more operation fits in the trailing window,
    /// then record the admission.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut window = self.admissions.lock().await;
                let now = Instant::now();

                while let Some(&oldest) = window.front() {
                    if now.duration_since(oldest) >= self.period {
                        window.pop_front();
                    } else {
                        break;
                    }
                }

                if window.len() < self.rate {
                    window.push_back(now);
                    return;
                }

                // Window is full; sleep until the oldest entry expires.
                let oldest = *window.front().expect("full window has a front");
                oldest + self.period - now
            };

            tokio::time::sleep(wait).await;
        }
    }
}
