use hr_core::HrError;
use hr_ingest::IngestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Config(#[from] HrError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("nothing to play back: the record sequence is empty")]
    EmptySequence,

    #[error("record at position {position} carries sequence index {found}")]
    OutOfSequence { position: usize, found: usize },

    #[error("record {position} has non-finite payload {payload}")]
    NonFinitePayload { position: usize, payload: f64 },
}

pub type ReplayResult<T> = Result<T, ReplayError>;
