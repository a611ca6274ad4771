use std::time::Duration;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";

/// Wall-clock bound on one connection's full read → filter → write exchange.
pub const DEFAULT_CONNECTION_DEADLINE: Duration = Duration::from_secs(120);

pub const JPEG_QUALITY: u8 = 95;

/// Number of processing units, falling back to 1 when it can't be queried.
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
