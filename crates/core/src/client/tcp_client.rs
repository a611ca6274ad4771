use std::io::{BufReader, BufWriter};
use std::net::TcpStream;
use std::time::Duration;

use thiserror::Error;

use crate::protocol::domain::protocol_error::ProtocolError;
use crate::protocol::domain::request::Request;
use crate::protocol::domain::response::{Response, ResponseLayout};
use crate::protocol::infrastructure::wire_format::{read_response, write_request};
use crate::shared::constants::DEFAULT_CONNECTION_DEADLINE;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sends one request per connection and waits for the reply.
#[derive(Clone, Debug)]
pub struct TcpClient {
    addr: String,
    layout: ResponseLayout,
    timeout: Duration,
}

impl TcpClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            layout: ResponseLayout::Plain,
            timeout: DEFAULT_CONNECTION_DEADLINE,
        }
    }

    /// Must match the server's layout; the frame does not say which is used.
    pub fn with_layout(mut self, layout: ResponseLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let stream = TcpStream::connect(self.addr.as_str()).map_err(|source| ClientError::Connect {
            addr: self.addr.clone(),
            source,
        })?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        write_request(&mut BufWriter::new(&stream), request)?;
        let response = read_response(&mut BufReader::new(&stream), self.layout)?;
        Ok(response)
    }
}
