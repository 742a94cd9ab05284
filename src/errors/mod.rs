pub mod parking_lot_error;
pub mod observer_error;
pub mod client_error;
