use std::panic::{self, AssertUnwindSafe};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};

use crate::parallel::domain::band_executor::{BandExecutor, BandJob, EngineError};

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Fixed set of long-lived worker threads fed from a bounded task queue.
///
/// Layout: `caller → [task queue] → N workers → [per-call result channel] → caller`
///
/// A filter call submits one task per band and then blocks on its own
/// result channel until every band has reported back. Submission blocks
/// while the queue is full, so the number of queued bands stays bounded no
/// matter how many connections are filtering at once.
pub struct WorkerPool {
    task_tx: Option<Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(size: usize, queue_capacity: usize) -> std::io::Result<Self> {
        let size = size.max(1);
        let (task_tx, task_rx) = crossbeam_channel::bounded::<Task>(queue_capacity.max(1));

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let task_rx = task_rx.clone();
            let handle = std::thread::Builder::new()
                .name(format!("band-worker-{id}"))
                .spawn(move || worker_loop(id, task_rx))?;
            workers.push(handle);
        }

        log::debug!(
            "Started worker pool: {} threads, queue capacity {}",
            size,
            queue_capacity.max(1)
        );
        Ok(Self {
            task_tx: Some(task_tx),
            workers,
        })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl BandExecutor for WorkerPool {
    fn run_all(&self, jobs: Vec<BandJob>) -> Result<Vec<Vec<u8>>, EngineError> {
        let total = jobs.len();
        let task_tx = self.task_tx.as_ref().ok_or(EngineError::ShutDown)?;
        let (done_tx, done_rx) = crossbeam_channel::unbounded::<(usize, Vec<u8>)>();

        for (index, job) in jobs.into_iter().enumerate() {
            let done_tx = done_tx.clone();
            let task: Task = Box::new(move || {
                let bytes = job();
                // The caller only stops listening once it has every result.
                let _ = done_tx.send((index, bytes));
            });
            task_tx.send(task).map_err(|_| EngineError::ShutDown)?;
        }
        drop(done_tx);

        join_bands(&done_rx, total)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the queue ends each worker's receive loop.
        drop(self.task_tx.take());
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(id: usize, task_rx: Receiver<Task>) {
    for task in task_rx {
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            log::error!("band-worker-{id}: band job panicked");
        }
    }
}

/// Counting barrier over the per-call result channel.
///
/// Returns once `total` results have arrived, or fails once every sender
/// is gone with results still missing (a job panicked).
fn join_bands(
    done_rx: &Receiver<(usize, Vec<u8>)>,
    total: usize,
) -> Result<Vec<Vec<u8>>, EngineError> {
    let mut slots: Vec<Option<Vec<u8>>> = (0..total).map(|_| None).collect();
    let mut received = 0;

    while received < total {
        match done_rx.recv() {
            Ok((index, bytes)) => {
                slots[index] = Some(bytes);
                received += 1;
            }
            Err(_) => break,
        }
    }

    if received < total {
        return Err(EngineError::JobsLost {
            lost: total - received,
            total,
        });
    }
    Ok(slots.into_iter().flatten().collect())
}
