use crate::codec::ImageCodec;
use crate::config::{BatchConfig, OutputMode};
use crate::error::{CompressionError, Result};
use crate::worker::{compress, CompressionResult};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

/// Before/after byte sums over successful compressions only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub total_before_bytes: u64,
    pub total_after_bytes: u64,
}

impl RunTotals {
    /// Adds a successful result and returns `true`; failures are ignored.
    pub fn record(&mut self, result: &CompressionResult) -> bool {
        if !result.is_success() {
            return false;
        }
        self.total_before_bytes += result.before_size;
        self.total_after_bytes += result.after_size;
        true
    }

    pub fn reduction(&self) -> i64 {
        self.total_before_bytes as i64 - self.total_after_bytes as i64
    }
}

/// Emitted once every item of a batch has produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// 1-based.
    pub index: usize,
    pub batch_count: usize,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub totals: RunTotals,
    pub processed: usize,
    pub succeeded: usize,
    pub failures: Vec<CompressionResult>,
    pub batches: usize,
    pub elapsed: Duration,
    /// Set when the cancel flag stopped the run before the last batch.
    pub cancelled: bool,
}

impl RunReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Receives scheduler events on the scheduling thread, in arrival order.
pub trait RunObserver {
    fn file_completed(&mut self, _result: &CompressionResult) {}

    fn batch_completed(&mut self, _summary: &BatchSummary) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {}

/// Splits `items` into consecutive chunks of `batch_size`, keeping order.
/// The last chunk may be shorter.
pub fn partition<T>(items: &[T], batch_size: usize) -> std::slice::Chunks<'_, T> {
    items.chunks(batch_size.max(1))
}

/// Runs `f` over every item on `pool` and blocks until all of them finish.
///
/// Results are handed to `on_result` on the calling thread as they arrive,
/// so `on_result` is the single writer of whatever it accumulates into.
/// Arrival order is unspecified.
pub fn bounded_map<T, R, F, G>(pool: &ThreadPool, items: &[T], f: F, mut on_result: G)
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
    G: FnMut(R),
{
    let (tx, rx) = mpsc::channel();
    let f = &f;

    pool.in_place_scope(|scope| {
        for item in items {
            let tx = tx.clone();
            scope.spawn(move |_| {
                // The receiver lives until every sender is gone.
                let _ = tx.send(f(item));
            });
        }
        drop(tx);

        for result in rx.iter() {
            on_result(result);
        }
    });
}

/// Drives a run: one batch at a time, each fanned out over a fixed-size pool.
pub struct Scheduler<C: ImageCodec> {
    codec: C,
    config: BatchConfig,
    output: OutputMode,
    cancel: Option<Arc<AtomicBool>>,
}

impl<C: ImageCodec> Scheduler<C> {
    pub fn new(codec: C, config: BatchConfig, output: OutputMode) -> Self {
        Self {
            codec,
            config,
            output,
            cancel: None,
        }
    }

    /// Checked before each batch starts. Items already running are not interrupted.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    fn build_pool(&self) -> Result<ThreadPool> {
        let available = num_cpus::get();
        if self.config.worker_count > available {
            crate::warn!(
                "{} workers requested but only {} CPUs available",
                self.config.worker_count,
                available
            );
        }
        crate::verbose!(
            "Using {} worker threads ({} CPUs available)",
            self.config.worker_count,
            available
        );

        ThreadPoolBuilder::new()
            .num_threads(self.config.worker_count)
            .thread_name(|i| format!("jpeg-batch-worker-{}", i))
            .build()
            .map_err(|e| CompressionError::ThreadPool(e.to_string()))
    }

    /// Compresses `paths` batch by batch and returns the aggregate.
    ///
    /// Only pool construction can fail; per-file problems end up in
    /// [`RunReport::failures`] and never stop the run.
    pub fn run<O: RunObserver + ?Sized>(
        &self,
        paths: &[PathBuf],
        observer: &mut O,
    ) -> Result<RunReport> {
        let start_time = Instant::now();
        let pool = self.build_pool()?;
        let batch_count = self.config.batch_count(paths.len());
        let quality = self.config.quality;

        let mut totals = RunTotals::default();
        let mut report = RunReport::default();

        for (i, chunk) in partition(paths, self.config.batch_size).enumerate() {
            if self.is_cancelled() {
                crate::warn!("Cancelled before batch {} of {}", i + 1, batch_count);
                report.cancelled = true;
                break;
            }

            let batch_start = Instant::now();
            let mut summary = BatchSummary {
                index: i + 1,
                batch_count,
                processed: 0,
                succeeded: 0,
                failed: 0,
            };

            bounded_map(
                &pool,
                chunk,
                |path| compress(&self.codec, path, quality, &self.output),
                |result| {
                    summary.processed += 1;
                    if totals.record(&result) {
                        summary.succeeded += 1;
                    } else {
                        summary.failed += 1;
                    }
                    observer.file_completed(&result);
                    if !result.is_success() {
                        report.failures.push(result);
                    }
                },
            );

            crate::verbose!(
                "Batch {}/{}: {} files in {:?}",
                summary.index,
                batch_count,
                summary.processed,
                batch_start.elapsed()
            );

            report.processed += summary.processed;
            report.succeeded += summary.succeeded;
            report.batches += 1;
            observer.batch_completed(&summary);
        }

        report.totals = totals;
        report.elapsed = start_time.elapsed();
        Ok(report)
    }
}
