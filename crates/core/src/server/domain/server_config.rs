use std::time::Duration;

use crate::protocol::domain::response::ResponseLayout;
use crate::shared::constants::{
    available_parallelism, DEFAULT_CONNECTION_DEADLINE, DEFAULT_LISTEN_ADDR,
};

/// Jobs that may wait in the pool queue per worker thread.
const QUEUE_SLOTS_PER_WORKER: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: String,
    /// Band count used when a request asks for `workers <= 0`.
    /// Zero means "one per available processing unit".
    pub default_workers: usize,
    pub pool_size: usize,
    pub queue_capacity: usize,
    /// Bound on one whole request/response exchange.
    pub deadline: Duration,
    pub layout: ResponseLayout,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let pool_size = available_parallelism();
        Self {
            addr: DEFAULT_LISTEN_ADDR.to_string(),
            default_workers: 0,
            pool_size,
            queue_capacity: pool_size * QUEUE_SLOTS_PER_WORKER,
            deadline: DEFAULT_CONNECTION_DEADLINE,
            layout: ResponseLayout::Plain,
        }
    }
}

impl ServerConfig {
    pub fn with_addr(mut self, addr: impl Into<String>) -> Self {
        self.addr = addr.into();
        self
    }

    pub fn with_default_workers(mut self, workers: usize) -> Self {
        self.default_workers = workers;
        self
    }

    /// Sets the pool size; the queue capacity follows unless set afterwards.
    pub fn with_pool_size(mut self, size: usize) -> Self {
        self.pool_size = size.max(1);
        self.queue_capacity = self.pool_size * QUEUE_SLOTS_PER_WORKER;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_layout(mut self, layout: ResponseLayout) -> Self {
        self.layout = layout;
        self
    }
}
