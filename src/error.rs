use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Debug, Error)]
pub enum DemoError {
    /// The engine could not produce a factory or a peer connection.
    #[error("could not initialize peer connection: {0}")]
    Initialization(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("webrtc: {0}")]
    Engine(#[from] webrtc::Error),
    #[error("session has been disposed")]
    Disposed,
    #[error("session was already disposed")]
    AlreadyDisposed,
    #[error("candidate gathering was already started for this session")]
    AlreadyGathering,
}
