use std::time::{Duration, Instant};

use tracing::info;

const REPORT_INTERVAL: Duration = Duration::from_millis(500);

/// Logs throughput and ETA of a scan over a known number of items.
pub struct ProgressReport {
    what: &'static str,
    items: u64,
    total_items: u64,
    start: Instant,
    previous_print: Instant,
}

impl ProgressReport {
    pub fn new(what: &'static str, total_items: u64) -> Self {
        let now = Instant::now();
        Self {
            what,
            items: 0,
            total_items,
            start: now,
            previous_print: now,
        }
    }

    pub fn update(&mut self) {
        self.items += 1;

        // keep the clock off the hot path
        if self.items % 4096 != 0 {
            return;
        }

        let now = Instant::now();
        if now.duration_since(self.previous_print) > REPORT_INTERVAL {
            let elapsed = now.duration_since(self.start).as_secs_f64();
            let throughput = self.items as f64 / elapsed;
            let estimate = (self.total_items.saturating_sub(self.items) as f64) / throughput;

            info!(
                "Processed {:>12} of {:>12} {} in {elapsed:.1}s ({throughput:.1} items/s) ETA: {estimate:.1}s",
                self.items, self.total_items, self.what
            );
            self.previous_print = now;
        }
    }

    pub fn items(&self) -> u64 {
        self.items
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
