use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use verify::Tally;

/// Pipeline stages timed per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Acquire,
    Extract,
    Claims,
    Research,
    Verify,
    Summarize,
}

impl Stage {
    const ALL: [Stage; 6] = [
        Stage::Acquire,
        Stage::Extract,
        Stage::Claims,
        Stage::Research,
        Stage::Verify,
        Stage::Summarize,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Acquire => "acquire",
            Stage::Extract => "extract",
            Stage::Claims => "claims",
            Stage::Research => "research",
            Stage::Verify => "verify",
            Stage::Summarize => "summarize",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Default)]
struct StageTimer {
    total_time_us: AtomicU64,
    runs: AtomicUsize,
}

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,

    // Timing (in microseconds)
    stages: [StageTimer; 6],

    // Counts
    total_claims: AtomicUsize,
    supported: AtomicUsize,
    contradicted: AtomicUsize,
    unverifiable: AtomicUsize,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            stages: Default::default(),
            total_claims: AtomicUsize::new(0),
            supported: AtomicUsize::new(0),
            contradicted: AtomicUsize::new(0),
            unverifiable: AtomicUsize::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_stage(&self, stage: Stage, duration: Duration) {
        let timer = &self.stages[stage.index()];
        timer.total_time_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
        timer.runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verdicts(&self, tally: &Tally) {
        self.total_claims.fetch_add(tally.total(), Ordering::Relaxed);
        self.supported.fetch_add(tally.supported, Ordering::Relaxed);
        self.contradicted.fetch_add(tally.contradicted, Ordering::Relaxed);
        self.unverifiable.fetch_add(tally.unverifiable, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            stages: Stage::ALL
                .iter()
                .map(|stage| {
                    let timer = &self.stages[stage.index()];
                    StageSnapshot {
                        stage: stage.name(),
                        runs: timer.runs.load(Ordering::Relaxed),
                        avg_time_ms: avg_time_ms(&timer.total_time_us, &timer.runs),
                    }
                })
                .collect(),
            total_claims: self.total_claims.load(Ordering::Relaxed),
            verdicts: Tally {
                supported: self.supported.load(Ordering::Relaxed),
                contradicted: self.contradicted.load(Ordering::Relaxed),
                unverifiable: self.unverifiable.load(Ordering::Relaxed),
            },
        }
    }
}

fn avg_time_ms(total_us: &AtomicU64, count: &AtomicUsize) -> f64 {
    let total = total_us.load(Ordering::Relaxed) as f64;
    let cnt = count.load(Ordering::Relaxed) as f64;
    if cnt > 0.0 {
        total / cnt / 1000.0 // Convert to ms
    } else {
        0.0
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub stages: Vec<StageSnapshot>,
    pub total_claims: usize,
    pub verdicts: Tally,
}

#[derive(Debug, Serialize)]
pub struct StageSnapshot {
    pub stage: &'static str,
    pub runs: usize,
    pub avg_time_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
