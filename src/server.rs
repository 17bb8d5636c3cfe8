//! TCP server for handling one-shot key-value connections.
//!
//! Each accepted connection carries exactly one request: the handler reads
//! one frame, parses it, executes it against the shared store, writes the
//! single-line response, and closes. There is no keep-alive and no
//! pipelining; concurrency comes from running one task per connection.

use crate::config::Config;
use crate::framer::read_frame;
use crate::protocol::{Command, Parser, Response};
use crate::storage::Store;
use bytes::BytesMut;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, trace};

/// Server instance
pub struct Server {
    config: Config,
    store: Arc<Store>,
    connection_limit: Arc<Semaphore>,
}

impl Server {
    /// Create a new server instance
    pub fn new(config: Config) -> Self {
        let store = Store::new();
        let connection_limit = Arc::new(Semaphore::new(config.max_connections));

        Server {
            config,
            store,
            connection_limit,
        }
    }

    /// Bind the configured address and begin accepting connections
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(&self.config.listen).await?;
        info!(address = %self.config.listen, "server listening");

        self.serve(listener).await
    }

    /// Accept connections from an already-bound listener.
    ///
    /// Split out of [`run`] so tests can serve on an ephemeral port.
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            // Wait for a connection slot
            let permit = self.connection_limit.clone().acquire_owned().await?;

            match listener.accept().await {
                Ok((stream, addr)) => {
                    debug!(peer = %addr, "new connection");

                    let store = Arc::clone(&self.store);

                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, store).await {
                            debug!(error = %e, "connection error");
                        }
                        drop(permit);
                    });
                }
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                }
            }
        }
    }

    /// Get a reference to the store for testing
    #[cfg(test)]
    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }
}

/// Handle a single client connection: one request, one response, close.
///
/// An I/O error here is local to this connection; the caller logs it and
/// the store and all other connections are unaffected.
async fn handle_connection(
    mut stream: TcpStream,
    store: Arc<Store>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let frame = read_frame(&mut stream).await?;

    let command = Parser::parse(&frame);
    trace!(?command, "processing command");

    let response = execute_command(command, &store);

    // Drain the write fully before closing the connection
    stream.write_all(&response).await?;
    stream.shutdown().await?;

    Ok(())
}

/// Execute a command against the store and produce the response bytes.
///
/// Every command maps to exactly one response shape; execution itself
/// cannot fail — all validation happened in the parser.
fn execute_command(command: Command, store: &Store) -> BytesMut {
    match command {
        Command::Put { key, value } => {
            store.put(key, value);
            BytesMut::from(Response::ok())
        }

        Command::Get { key } => match store.get(&key) {
            Some(value) => Response::value(&value),
            None => BytesMut::from(Response::empty()),
        },

        Command::MalformedGet => BytesMut::from(Response::empty()),

        Command::Invalid => BytesMut::from(Response::error()),
    }
}
