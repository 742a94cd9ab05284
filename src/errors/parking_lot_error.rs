use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a park, unpark or lookup can be refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParkingLotError {
    #[error("vehicle already parked")]
    VehicleAlreadyParked,
    #[error("parking lot is full")]
    ParkingLotFull,
    #[error("vehicle is not available")]
    VehicleNotFound,
}
