use log::warn;

const DEFAULT_HOST: [u8; 4] = [127, 0, 0, 1];
const DEFAULT_PORT: u16 = 3030;
const DEFAULT_CAPACITY: usize = 20;
const DEFAULT_MAX_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: [u8; 4],
    pub port: u16,
    pub capacity: usize,
    /// Upper bound for the initial capacity and for resets over HTTP.
    pub max_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            capacity: DEFAULT_CAPACITY,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_host(raw: &str) -> Option<[u8; 4]> {
    let octets: Vec<u8> = raw.split('.').map(|o| o.parse().ok()).collect::<Option<_>>()?;
    octets.try_into().ok()
}

impl ServerConfig {
    /// Reads `--h <host> --p <port> --c <capacity> --m <max capacity>`; bad or missing values fall back to defaults.
    /// A capacity above the maximum is replaced by the default, clamped to the maximum.
    pub fn from_args(args: &[String]) -> Self {
        let port = match flag_value(args, "--p") {
            Some(raw) => raw.parse().unwrap_or(DEFAULT_PORT),
            None => DEFAULT_PORT,
        };
        let max_capacity = match flag_value(args, "--m") {
            Some(raw) => raw.parse().unwrap_or(DEFAULT_MAX_CAPACITY),
            None => DEFAULT_MAX_CAPACITY,
        };
        let mut capacity = match flag_value(args, "--c") {
            Some(raw) => raw.parse().unwrap_or(DEFAULT_CAPACITY),
            None => DEFAULT_CAPACITY,
        };
        if capacity > max_capacity {
            warn!("capacity {capacity} is above the limit of {max_capacity}, using the default");
            capacity = DEFAULT_CAPACITY.min(max_capacity);
        }
        let host = flag_value(args, "--h").and_then(parse_host).unwrap_or(DEFAULT_HOST);
        Self { host, port, capacity, max_capacity }
    }
}
