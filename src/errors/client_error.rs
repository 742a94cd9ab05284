use thiserror::Error;
use crate::errors::parking_lot_error::ParkingLotError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to parking lot server failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered, but refused the operation.
    #[error(transparent)]
    Rejected(#[from] ParkingLotError),
    #[error("unexpected response from parking lot server: {0}")]
    Unexpected(String),
}

impl ClientError {
    pub fn rejection(&self) -> Option<ParkingLotError> {
        match self {
            ClientError::Rejected(e) => Some(*e),
            _ => None,
        }
    }
}
