use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::codec::{CodecAdapter, default_adapters};
use crate::config::RunnerConfig;
use crate::error::RunnerError;
use crate::format::EncodeFormat;
use crate::job::{Completion, EncodeJob, GenerationId, Generations, JobOutcome};
use crate::quality::Quality;
use crate::source::SourceImage;

const DELIVERY_THREAD: &str = "encode-delivery";

/// Destination for finished, non-stale jobs.
///
/// Always called from the runner's delivery thread, one completion at a time.
/// The two formats of a generation arrive in no particular order.
pub trait CompletionSink: Send + 'static {
    fn deliver(&self, completion: Completion);
}

impl<F> CompletionSink for F
where
    F: Fn(Completion) + Send + 'static,
{
    fn deliver(&self, completion: Completion) {
        self(completion)
    }
}

impl CompletionSink for mpsc::Sender<Completion> {
    fn deliver(&self, completion: Completion) {
        if self.send(completion).is_err() {
            log::debug!("completion receiver dropped");
        }
    }
}

/// Runs one encode job per codec adapter for each submitted image/quality pair.
///
/// Only the most recent generation may reach the sink: submitting again or
/// calling [`EncodeRunner::cancel_all`] makes every older job skip its encode
/// if it has not started yet, or throw its result away if it has.
pub struct EncodeRunner {
    adapters: Vec<Arc<dyn CodecAdapter>>,
    pool: ThreadPool,
    generations: Arc<Generations>,
    in_flight: Arc<AtomicUsize>,
    sender: Option<mpsc::Sender<Completion>>,
    delivery: Option<JoinHandle<()>>,
}

impl EncodeRunner {
    pub fn new<S: CompletionSink>(
        adapters: Vec<Arc<dyn CodecAdapter>>,
        sink: S,
        config: &RunnerConfig,
    ) -> Result<Self, RunnerError> {
        let prefix = config.thread_name.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()?;

        let generations = Arc::new(Generations::new());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let (sender, receiver) = mpsc::channel::<Completion>();

        let delivery = {
            let generations = generations.clone();
            let in_flight = in_flight.clone();
            thread::Builder::new()
                .name(DELIVERY_THREAD.to_string())
                .spawn(move || deliver_loop(receiver, sink, &generations, &in_flight))
                .map_err(RunnerError::DeliveryThread)?
        };

        log::debug!(
            "encode runner started: {} adapter(s), {} worker(s)",
            adapters.len(),
            pool.current_num_threads()
        );

        Ok(Self {
            adapters,
            pool,
            generations,
            in_flight,
            sender: Some(sender),
            delivery: Some(delivery),
        })
    }

    /// JPEG and HEIC adapters with the default configuration.
    pub fn with_defaults<S: CompletionSink>(sink: S) -> Result<Self, RunnerError> {
        Self::new(default_adapters(), sink, &RunnerConfig::default())
    }

    /// Start a new generation for `image` at `quality`. Never blocks.
    pub fn submit(&self, image: Arc<SourceImage>, quality: Quality) -> GenerationId {
        let generation = self.generations.advance();
        let submitted_at = Instant::now();

        log::debug!(
            "submitting generation {} at quality {} ({} job(s), {}x{})",
            generation,
            quality,
            self.adapters.len(),
            image.width(),
            image.height()
        );

        let Some(sender) = &self.sender else {
            return generation;
        };

        for adapter in &self.adapters {
            let job = EncodeJob::new(
                adapter.clone(),
                image.clone(),
                quality,
                generation,
                submitted_at,
                self.generations.clone(),
            );
            let sender = sender.clone();
            let in_flight = self.in_flight.clone();

            in_flight.fetch_add(1, Ordering::SeqCst);
            self.pool.spawn(move || match job.run() {
                JobOutcome::Finished(completion) => {
                    // Settled by the delivery thread from here on.
                    if sender.send(completion).is_err() {
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                    }
                }
                JobOutcome::Skipped | JobOutcome::Stale => {
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                }
            });
        }

        generation
    }

    /// Invalidate all outstanding jobs without submitting new ones.
    pub fn cancel_all(&self) {
        log::debug!("cancelling generation {}", self.generations.current());
        self.generations.cancel_all();
    }

    pub fn current_generation(&self) -> GenerationId {
        self.generations.current()
    }

    pub fn is_current(&self, generation: GenerationId) -> bool {
        self.generations.is_current(generation)
    }

    /// Jobs submitted whose outcome has not settled yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn formats(&self) -> impl Iterator<Item = EncodeFormat> + '_ {
        self.adapters.iter().map(|a| a.format())
    }

    /// Cancel everything and wait for the delivery thread to drain.
    pub fn shutdown(mut self) {
        self.cancel_all();
        self.sender.take();
        if let Some(handle) = self.delivery.take() {
            if handle.join().is_err() {
                log::error!("completion sink panicked");
            }
        }
    }
}

impl Drop for EncodeRunner {
    fn drop(&mut self) {
        self.generations.cancel_all();
        // The delivery thread exits once the last in-flight job drops its sender.
        self.sender.take();
    }
}

fn deliver_loop<S: CompletionSink>(
    receiver: mpsc::Receiver<Completion>,
    sink: S,
    generations: &Generations,
    in_flight: &AtomicUsize,
) {
    for completion in receiver {
        if generations.is_current(completion.generation) {
            sink.deliver(completion);
        } else {
            log::debug!(
                "discarding stale {} result of generation {}",
                completion.format,
                completion.generation
            );
        }
        in_flight.fetch_sub(1, Ordering::SeqCst);
    }
    log::debug!("delivery thread stopped");
}
