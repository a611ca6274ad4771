use crate::parallel::domain::band_executor::{BandExecutor, BandJob, EngineError};

/// Runs band jobs one after another on the calling thread.
///
/// Used for single-threaded runs (`pixelwire apply --inline`) and by tests
/// that compare sequential and pooled output.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineExecutor;

impl BandExecutor for InlineExecutor {
    fn run_all(&self, jobs: Vec<BandJob>) -> Result<Vec<Vec<u8>>, EngineError> {
        Ok(jobs.into_iter().map(|job| job()).collect())
    }
}
