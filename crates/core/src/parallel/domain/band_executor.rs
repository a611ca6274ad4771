use thiserror::Error;

/// One unit of band work: computes the output bytes for its rows.
pub type BandJob = Box<dyn FnOnce() -> Vec<u8> + Send + 'static>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("worker pool has shut down")]
    ShutDown,
    #[error("{lost} of {total} band jobs did not complete")]
    JobsLost { lost: usize, total: usize },
}

/// Runs a batch of band jobs and waits for all of them.
///
/// Outputs come back in submission order once every job has finished.
pub trait BandExecutor: Send + Sync {
    fn run_all(&self, jobs: Vec<BandJob>) -> Result<Vec<Vec<u8>>, EngineError>;
}
