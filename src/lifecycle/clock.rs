//! Time sources for build timing.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that replays a scripted sequence of offsets.
///
/// Each call to [`now`](Clock::now) consumes the next offset from a fixed
/// origin. Once the script runs out, the last offset repeats.
///
/// ```
/// use cosby::lifecycle::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::with_ticks([Duration::ZERO, Duration::from_millis(2500)]);
/// let start = clock.now();
/// assert_eq!(clock.now() - start, Duration::from_millis(2500));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    state: Mutex<TickState>,
}

#[derive(Debug, Default)]
struct TickState {
    pending: VecDeque<Duration>,
    last: Duration,
}

impl ManualClock {
    /// Create a clock that stays at its origin until ticks are pushed.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Mutex::new(TickState::default()),
        }
    }

    /// Create a clock with a scripted sequence of offsets.
    pub fn with_ticks(ticks: impl IntoIterator<Item = Duration>) -> Self {
        let clock = Self::new();
        for tick in ticks {
            clock.push_tick(tick);
        }
        clock
    }

    /// Queue another offset from the origin.
    pub fn push_tick(&self, offset: Duration) {
        self.lock().pending.push_back(offset);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TickState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let mut state = self.lock();
        if let Some(next) = state.pending.pop_front() {
            state.last = next;
        }
        self.origin + state.last
    }
}
