use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open store connection: {0}")]
    Open(#[source] rusqlite::Error),

    #[error("Failed to create schema: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("Write failed: {0}")]
    Write(#[source] rusqlite::Error),

    #[error("Read failed: {0}")]
    Read(#[source] rusqlite::Error),

    #[error("Failed to close store connection: {0}")]
    Close(#[source] rusqlite::Error),

    #[error("Store task aborted: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Store connection still in use")]
    Busy,
}
