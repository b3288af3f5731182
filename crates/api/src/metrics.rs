use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

pub struct Metrics {
    // Counters
    total_submissions: AtomicUsize,
    successful_submissions: AtomicUsize,
    failed_submissions: AtomicUsize,
    iterations_completed: AtomicUsize,
    iterations_failed: AtomicUsize,
    exports_written: AtomicUsize,

    // Timing (in microseconds)
    total_submission_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_submissions: AtomicUsize::new(0),
            successful_submissions: AtomicUsize::new(0),
            failed_submissions: AtomicUsize::new(0),
            iterations_completed: AtomicUsize::new(0),
            iterations_failed: AtomicUsize::new(0),
            exports_written: AtomicUsize::new(0),
            total_submission_time_us: AtomicU64::new(0),
        })
    }

    pub fn record_submission(
        &self,
        success: bool,
        duration: std::time::Duration,
        completed: usize,
        failed: usize,
    ) {
        self.total_submissions.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_submissions.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_submissions.fetch_add(1, Ordering::Relaxed);
        }
        self.iterations_completed.fetch_add(completed, Ordering::Relaxed);
        self.iterations_failed.fetch_add(failed, Ordering::Relaxed);
        self.total_submission_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_export(&self) {
        self.exports_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total = self.total_submissions.load(Ordering::Relaxed);
        let total_us = self.total_submission_time_us.load(Ordering::Relaxed) as f64;
        MetricsSnapshot {
            total_submissions: total,
            successful_submissions: self.successful_submissions.load(Ordering::Relaxed),
            failed_submissions: self.failed_submissions.load(Ordering::Relaxed),
            iterations_completed: self.iterations_completed.load(Ordering::Relaxed),
            iterations_failed: self.iterations_failed.load(Ordering::Relaxed),
            exports_written: self.exports_written.load(Ordering::Relaxed),
            avg_submission_time_ms: if total > 0 {
                total_us / total as f64 / 1000.0
            } else {
                0.0
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_submissions: usize,
    pub successful_submissions: usize,
    pub failed_submissions: usize,
    pub iterations_completed: usize,
    pub iterations_failed: usize,
    pub exports_written: usize,
    pub avg_submission_time_ms: f64,
}
