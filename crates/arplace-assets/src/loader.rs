use crate::renderable::Renderable;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded, unbounded};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("failed to import {file}: {reason}")]
    Import { file: String, reason: String },
    #[error("{0} contains no triangle geometry")]
    Empty(String),
    #[error("no loader worker is running")]
    Unavailable,
    #[error("loader worker stopped before delivering a result")]
    Abandoned,
}

pub type LoadResult = Result<Renderable, LoadError>;

/// Where renderables come from. Called on a loader worker thread, never on
/// the UI thread.
pub trait ModelSource: Send + Sync + 'static {
    fn load_model(&self, file_name: &str) -> LoadResult;
}

impl<F> ModelSource for F
where
    F: Fn(&str) -> LoadResult + Send + Sync + 'static,
{
    fn load_model(&self, file_name: &str) -> LoadResult {
        self(file_name)
    }
}

struct Job {
    file_name: String,
    reply: Sender<LoadResult>,
}

/// Fixed pool of background workers servicing model load requests.
///
/// Results are never applied by the workers themselves: each request hands
/// back a [`LoadSubscription`] that the owner drains on its own thread.
pub struct AssetLoader {
    jobs: Sender<Job>,
    workers: usize,
}

impl AssetLoader {
    pub fn new(source: impl ModelSource, workers: usize) -> Self {
        let source: Arc<dyn ModelSource> = Arc::new(source);
        let (jobs, queue) = unbounded::<Job>();

        let mut spawned = 0;
        for index in 0..workers.max(1) {
            let queue = queue.clone();
            let source = Arc::clone(&source);
            let worker = std::thread::Builder::new()
                .name(format!("asset-loader-{index}"))
                .spawn(move || run_worker(queue, source));
            match worker {
                Ok(_) => spawned += 1,
                Err(err) => log::error!("failed to spawn asset loader worker {index}: {err}"),
            }
        }

        Self {
            jobs,
            workers: spawned,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Queue a load and return immediately.
    pub fn request(&self, file_name: impl Into<String>) -> LoadSubscription {
        let (reply, rx) = bounded(1);
        let job = Job {
            file_name: file_name.into(),
            reply,
        };

        if let Err(rejected) = self.jobs.send(job) {
            let job = rejected.into_inner();
            let _ = job.reply.send(Err(LoadError::Unavailable));
        }

        LoadSubscription { rx }
    }
}

fn run_worker(queue: Receiver<Job>, source: Arc<dyn ModelSource>) {
    for job in queue.iter() {
        let result = source.load_model(&job.file_name);
        if job.reply.send(result).is_err() {
            log::debug!("discarding load of {}: owner was released", job.file_name);
        }
    }
}

/// Receiving end of one load request. Dropping it cancels delivery.
#[derive(Debug)]
pub struct LoadSubscription {
    rx: Receiver<LoadResult>,
}

impl LoadSubscription {
    /// Non-blocking; `None` while the load is still in flight.
    pub fn try_take(&self) -> Option<LoadResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LoadError::Abandoned)),
        }
    }

    pub fn wait(&self, timeout: Duration) -> Option<LoadResult> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(LoadError::Abandoned)),
        }
    }
}
