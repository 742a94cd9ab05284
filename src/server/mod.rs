pub mod parking_server;
