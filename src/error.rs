use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("detector error: {0}")]
    Detector(String),
    #[error("unknown camera: {0}")]
    UnknownCamera(String),
    #[error("watch channel send failed")]
    WatchSend,
    #[error("state lock poisoned")]
    StateLock,
}
