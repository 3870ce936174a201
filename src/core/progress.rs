use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Percentage complete (0-100, two decimals) of a running archive operation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ProgressEvent {
    pub percentage: f64,
}

/// Receives progress events synchronously from the archive loop.
/// Implementations must return quickly; the loop waits on them.
pub trait ProgressSink: Send + Sync {
    fn publish(&self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn publish(&self, event: ProgressEvent) {
        self(event)
    }
}

impl ProgressSink for UnboundedSender<ProgressEvent> {
    fn publish(&self, event: ProgressEvent) {
        // A dropped receiver only means nobody is listening anymore.
        let _ = self.send(event);
    }
}

pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn publish(&self, _event: ProgressEvent) {}
}

/// `processed / total * 100`, rounded to two decimals and clamped to `[0, max]`.
pub fn progress_percentage(total: f64, processed: f64, max: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    let perc = (processed / total * 100.0 * 100.0).round() / 100.0;
    perc.clamp(0.0, max)
}

/// Counts processed entries and publishes only when the rounded value rises.
pub struct ProgressTracker<'a> {
    sink: &'a dyn ProgressSink,
    total: f64,
    processed: f64,
    previous: f64,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(sink: &'a dyn ProgressSink, total: usize) -> Self {
        Self {
            sink,
            total: total as f64,
            processed: 0.0,
            previous: 0.0,
        }
    }

    /// Starts counting again over `total` entries. Values at or below the last
    /// published one stay silent, so a restarted pass never moves backwards.
    pub fn restart(&mut self, total: usize) {
        self.total = total as f64;
        self.processed = 0.0;
    }

    pub fn published(&self) -> f64 {
        self.previous
    }

    pub fn advance(&mut self) {
        self.processed += 1.0;
        let perc = progress_percentage(self.total, self.processed, 100.0);
        if perc > self.previous {
            self.sink.publish(ProgressEvent { percentage: perc });
            self.previous = perc;
        }
    }
}
