use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("observer failed: {0}")]
    Failed(String),
}

impl ObserverError {
    pub fn new(msg: impl Into<String>) -> Self {
        ObserverError::Failed(msg.into())
    }
}
