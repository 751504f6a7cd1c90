//! Rate-limited order dispatch

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::protocol::MoveOrder;
use crate::strategy::MoveIntent;

/// Result of one dispatch round
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Number of orders written
    Sent(usize),
    /// The connection is closed; nothing more will be sent
    Closed,
}

/// Writes move orders as JSON lines, at most `max_orders` per round
#[derive(Debug)]
pub struct OrderDispatcher {
    max_orders: usize,
    closed: bool,
    total_sent: u64,
}

impl OrderDispatcher {
    pub fn new(max_orders: usize) -> Self {
        Self {
            max_orders,
            closed: false,
            total_sent: 0,
        }
    }

    pub fn max_orders(&self) -> usize {
        self.max_orders
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn total_sent(&self) -> u64 {
        self.total_sent
    }

    /// Send up to `max_orders` of `intents`.
    ///
    /// A cleanly closed connection yields `Closed`; an abrupt reset is
    /// returned as an error so the caller can reconnect. Any other per-order
    /// failure is logged and the order skipped.
    pub async fn dispatch<W>(&mut self, writer: &mut W, intents: Vec<MoveIntent>) -> io::Result<DispatchOutcome>
    where
        W: AsyncWrite + Unpin,
    {
        if self.closed {
            return Ok(DispatchOutcome::Closed);
        }

        let mut sent = 0;
        for intent in intents.into_iter().take(self.max_orders) {
            let order = MoveOrder::new(intent.unit_id, intent.target);
            let line = match order.to_line() {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to encode order for unit {}: {}", order.unit_id, e);
                    continue;
                }
            };

            match write_line(writer, &line).await {
                Ok(()) => {
                    debug!("Sent move order: unit {} -> {}", order.unit_id, order.target());
                    sent += 1;
                    self.total_sent += 1;
                }
                Err(e) if is_closed(&e) => {
                    warn!("Connection closed while sending orders: {}", e);
                    self.closed = true;
                    return Ok(DispatchOutcome::Closed);
                }
                Err(e) if is_reset(&e) => {
                    warn!("Connection lost while sending orders: {}", e);
                    self.closed = true;
                    return Err(e);
                }
                Err(e) => {
                    warn!("Error sending move order for unit {}: {}", order.unit_id, e);
                }
            }
        }

        Ok(DispatchOutcome::Sent(sent))
    }
}

async fn write_line<W>(writer: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

/// The peer closed its end in an orderly way
fn is_closed(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::NotConnected | io::ErrorKind::WriteZero
    )
}

/// The connection dropped underneath us
fn is_reset(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::UnexpectedEof
    )
}
