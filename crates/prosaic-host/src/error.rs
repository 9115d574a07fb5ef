#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image path unresolved: {0}")]
    ImageUnresolved(String),
    #[error("clipboard unavailable")]
    ClipboardUnavailable,
}

pub type HostResult<T> = Result<T, HostError>;
