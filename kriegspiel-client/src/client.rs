//! Connection management and the reconnect loop

use tokio::net::TcpStream;
use tracing::{info, warn};

use crate::artifacts::record_game;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::run_session;
use crate::state::SharedWorld;
use crate::strategy::Strategy;
use crate::sync::{SessionEnd, SyncHandler};

/// Connect, play and record one game.
///
/// Transport failures are retried up to `max_attempts` times with a fixed
/// delay. Sequence gating and the scoring baseline carry over between
/// attempts. A finished game, a departed opponent or a connection closed
/// under a send are terminal and not retried.
pub async fn run_client<S>(config: ClientConfig, strategy: S) -> Result<SessionEnd, ClientError>
where
    S: Strategy + Clone + 'static,
{
    let mut handler = SyncHandler::new(config.faction, config.scoring.clone(), SharedWorld::new());
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        info!(
            "Connecting to {} (attempt {}/{})",
            config.server_addr, attempt, max_attempts
        );

        let result = match TcpStream::connect(&config.server_addr).await {
            Ok(stream) => {
                info!("Connected to {}", config.server_addr);
                let (reader, writer) = stream.into_split();
                run_session(reader, writer, &mut handler, strategy.clone(), &config).await
            }
            Err(source) => Err(ClientError::Connect {
                addr: config.server_addr.clone(),
                source,
            }),
        };

        match result {
            Ok(end) => {
                record_game(&config, &end)?;
                return Ok(end);
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                warn!("{}; retrying in {:?}", e, config.retry_delay);
                tokio::time::sleep(config.retry_delay).await;
            }
            Err(e) if e.is_retryable() => {
                return Err(ClientError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(e),
                });
            }
            Err(e) => return Err(e),
        }
    }
}
