//! Progress reporting for long matching runs.
//!
//! [`PointingProgress`] drives an [`indicatif`] bar over a batch of pointings. Its message
//! carries a smoothed time per matched pointing (`avg ← α·dt + (1–α)·avg`, the first matched
//! pointing initializes it) and the running failure count. Skipped pointings advance the bar
//! but do not enter the average.
//!
//! This module is enabled only with the `progress` feature.
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Weight of the latest pointing in the smoothed duration.
const SMOOTHING: f64 = 0.2;

pub(crate) struct PointingProgress {
    bar: ProgressBar,
    last: Instant,
    average: Option<Duration>,
    failed: usize,
}

impl PointingProgress {
    pub(crate) fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos}/{len} pointings ({percent:>3}%) \
             | ETA {eta_precise} | {msg}",
        ) {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(200));
        PointingProgress {
            bar,
            last: Instant::now(),
            average: None,
            failed: 0,
        }
    }

    /// A pointing left untouched because its artifacts already exist.
    pub(crate) fn skipped(&mut self) {
        self.last = Instant::now();
        self.bar.inc(1);
    }

    /// A pointing matched (or failed) during this run.
    pub(crate) fn processed(&mut self, failed: bool) {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        self.last = now;

        self.average = Some(match self.average {
            None => dt,
            Some(avg) => avg.mul_f64(1.0 - SMOOTHING) + dt.mul_f64(SMOOTHING),
        });
        if failed {
            self.failed += 1;
        }

        self.bar.set_message(self.message());
        self.bar.inc(1);
    }

    fn message(&self) -> String {
        match self.average {
            Some(avg) => format!("avg {avg:.2?}/pointing, failed: {}", self.failed),
            None => format!("failed: {}", self.failed),
        }
    }

    pub(crate) fn finish(self) {
        self.bar.finish_and_clear();
    }
}
