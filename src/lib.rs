//! Slot allocator for a parking lot, plus an HTTP service and client around it.
//!
//! Slot 0 is closest to the entrance. Handicapped drivers are placed at the
//! lowest free slot and everyone else at the highest, which keeps the front
//! of the lot free for longer.

pub mod config;
pub mod core;
pub mod errors;
pub mod server;
pub mod clients;

pub use crate::core::driver::DriverType;
pub use crate::core::observer::{CapacityObserver, FullLotCounter};
pub use crate::core::parking_lot::ParkingLot;
pub use crate::errors::parking_lot_error::ParkingLotError;
