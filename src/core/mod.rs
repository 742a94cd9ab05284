pub mod driver;
pub mod observer;
pub mod parking_lot;
