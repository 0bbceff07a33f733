use std::fmt;

use go_record::RecordError;

#[derive(Debug)]
pub enum WorkerError {
    Record(RecordError),
    /// A load report could not be rendered.
    Report(serde_json::Error),
    /// The worker has shut down or its queue is gone.
    Closed,
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::Record(e) => write!(f, "{e}"),
            WorkerError::Report(e) => write!(f, "failed to render load report: {e}"),
            WorkerError::Closed => write!(f, "record worker is not running"),
        }
    }
}

impl std::error::Error for WorkerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WorkerError::Record(e) => Some(e),
            WorkerError::Report(e) => Some(e),
            WorkerError::Closed => None,
        }
    }
}

impl From<RecordError> for WorkerError {
    fn from(e: RecordError) -> Self {
        WorkerError::Record(e)
    }
}

impl From<serde_json::Error> for WorkerError {
    fn from(e: serde_json::Error) -> Self {
        WorkerError::Report(e)
    }
}
