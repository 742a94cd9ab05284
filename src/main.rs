use std::env;
use log::debug;
use parkinglot::config::ServerConfig;
use parkinglot::server::parking_server;

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    let config = ServerConfig::from_args(&args);
    debug!("config found = {:?}", config);
    parking_server::run(config)
}
