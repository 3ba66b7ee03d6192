/// Crate-wide error type. Every failure is either dropped at the boundary
/// (bad frames) or terminal for the session; there is no retry path.
#[derive(Debug, thiserror::Error)]
pub(crate) enum AppError {
    #[error("websocket error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("room directory request failed: {0}")]
    Directory(#[from] reqwest::Error),

    #[error("room directory refused: {0}")]
    RoomRejected(String),

    #[error("no room selected")]
    NoRoom,

    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),

    #[error("audio unavailable: {0}")]
    Audio(String),

    #[error("invalid config file: {0}")]
    Config(String),
}
