use crate::config::TimingConfig;

/// Time-based rescan scheduling, driven by the host clock (`now` values
/// are monotonic milliseconds supplied by the host). Triggers: one
/// immediate pass at session start, delayed offsets after `load`,
/// debounced mutation batches, and a fixed polling interval that catches
/// password inputs appearing without a mutation.
#[derive(Debug)]
pub struct RescanScheduler {
    timing: TimingConfig,
    immediate: bool,
    debounce_at: Option<u64>,
    delayed: Vec<u64>,
    next_poll_at: u64,
}

impl RescanScheduler {
    pub fn new(timing: &TimingConfig, now: u64) -> RescanScheduler {
        RescanScheduler {
            timing: timing.clone(),
            immediate: true,
            debounce_at: None,
            delayed: Vec::new(),
            next_poll_at: now + timing.poll_interval_ms,
        }
    }

    /// Queue the configured post-load rescans (deferred client-side
    /// rendering shows up well after the load event).
    pub fn on_load(&mut self, now: u64) {
        self.delayed = self
            .timing
            .load_rescan_delays_ms
            .iter()
            .map(|delay| now + delay)
            .collect();
    }

    /// Trailing-edge debounce: every relevant mutation pushes the
    /// deadline out again, so a burst coalesces into one rescan.
    pub fn on_mutation(&mut self, now: u64) {
        self.debounce_at = Some(now + self.timing.mutation_debounce_ms);
    }

    /// Whether a rescan is due at `now`. Consumes every fired trigger and
    /// advances the poll deadline.
    pub fn take_due(&mut self, now: u64) -> bool {
        let mut due = false;

        if self.immediate {
            self.immediate = false;
            due = true;
        }

        if self.debounce_at.is_some_and(|t| t <= now) {
            self.debounce_at = None;
            due = true;
        }

        let before = self.delayed.len();
        self.delayed.retain(|t| *t > now);
        if self.delayed.len() < before {
            due = true;
        }

        if now >= self.next_poll_at {
            self.next_poll_at = now + self.timing.poll_interval_ms;
            due = true;
        }

        due
    }

    /// Wholesale reset for a navigation.
    pub fn reset(&mut self, now: u64) {
        let timing = self.timing.clone();
        *self = RescanScheduler::new(&timing, now);
    }
}
