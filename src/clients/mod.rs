pub mod parking_client;
