use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::filtering::infrastructure::filter_engine::FilterEngine;
use crate::parallel::infrastructure::worker_pool::WorkerPool;
use crate::server::connection_dispatcher::ConnectionDispatcher;
use crate::server::domain::server_config::ServerConfig;
use crate::server::filter_image_use_case::FilterImageUseCase;

use super::deadline_stream::DeadlineStream;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to start worker pool: {0}")]
    Pool(#[source] io::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Accept loop: one thread per connection, one exchange per connection,
/// all sharing a single band worker pool.
pub struct TcpServer {
    listener: TcpListener,
    dispatcher: Arc<ConnectionDispatcher>,
    deadline: Duration,
}

impl TcpServer {
    pub fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let pool =
            WorkerPool::new(config.pool_size, config.queue_capacity).map_err(ServerError::Pool)?;
        let pool_size = pool.size();
        let engine = FilterEngine::new(Arc::new(pool));
        let use_case = FilterImageUseCase::new(engine, config.default_workers);
        let dispatcher = Arc::new(ConnectionDispatcher::new(use_case, config.layout));

        let listener = TcpListener::bind(&config.addr).map_err(|source| ServerError::Bind {
            addr: config.addr.clone(),
            source,
        })?;
        log::info!(
            "Listening on {} ({} pool worker(s), queue {}, deadline {:?}, {:?} responses)",
            listener.local_addr()?,
            pool_size,
            config.queue_capacity,
            config.deadline,
            config.layout
        );

        Ok(Self {
            listener,
            dispatcher,
            deadline: config.deadline,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves connections until the listener fails for good. Per-connection
    /// failures are logged and never stop the loop.
    pub fn serve(self) -> Result<(), ServerError> {
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => self.spawn_connection(stream),
                Err(e) => log::warn!("Failed to accept connection: {e}"),
            }
        }
        Ok(())
    }

    fn spawn_connection(&self, stream: TcpStream) {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown peer".to_string());
        let dispatcher = Arc::clone(&self.dispatcher);
        let deadline = self.deadline;

        let spawned = thread::Builder::new()
            .name(format!("conn-{peer}"))
            .spawn(move || handle_connection(&dispatcher, stream, deadline, &peer));
        if let Err(e) = spawned {
            log::error!("Failed to spawn connection handler: {e}");
        }
    }
}

fn handle_connection(
    dispatcher: &ConnectionDispatcher,
    stream: TcpStream,
    deadline: Duration,
    peer: &str,
) {
    log::debug!("Accepted connection from {peer}");
    let mut stream = DeadlineStream::new(stream, deadline);
    match dispatcher.handle(&mut stream) {
        Ok(()) => log::debug!("Served {peer}"),
        Err(e) if e.is_transport() => log::warn!("Dropped {peer}: {e}"),
        Err(e) => log::warn!("Rejected request from {peer}: {e}"),
    }
}
