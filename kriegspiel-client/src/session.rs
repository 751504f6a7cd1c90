//! One connected game session
//!
//! Two activities share the world view:
//! - inbound (the calling task): reads lines and feeds the sync handler
//! - outbound (a spawned task): wakes on a fixed interval, runs the strategy
//!   on the latest view and dispatches orders
//!
//! The outbound task is stopped through a `watch` channel when the inbound
//! side finishes. It ends the session itself when a send finds the
//! connection closed (a normal end) or reset (a retryable transport error).

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use kriegspiel_core::Faction;

use crate::config::ClientConfig;
use crate::dispatcher::{DispatchOutcome, OrderDispatcher};
use crate::error::ClientError;
use crate::state::SharedWorld;
use crate::strategy::Strategy;
use crate::sync::{Flow, SessionEnd, SyncHandler};

/// Why the outbound task returned
#[derive(Debug)]
enum OutboundEnd {
    Stopped,
    ConnectionClosed,
    ConnectionLost(std::io::Error),
}

/// Run one session over an established connection until the game ends, the
/// connection drops or a fatal condition occurs.
pub async fn run_session<R, W, S>(
    reader: R,
    writer: W,
    handler: &mut SyncHandler,
    strategy: S,
    config: &ClientConfig,
) -> Result<SessionEnd, ClientError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
    S: Strategy + 'static,
{
    let (stop_tx, stop_rx) = watch::channel(false);
    let mut outbound = tokio::spawn(outbound_loop(
        writer,
        handler.world().clone(),
        strategy,
        OrderDispatcher::new(config.max_orders_per_tick),
        config.faction,
        config.order_interval,
        stop_rx,
    ));
    let mut outbound_done = false;

    let mut lines = BufReader::new(reader).lines();
    let result = loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(text)) => {
                    if text.trim().is_empty() {
                        continue;
                    }
                    match handler.handle_line(&text) {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Finished(end)) => break Ok(end),
                        Err(e) => break Err(e),
                    }
                }
                Ok(None) => break Err(ClientError::ConnectionLost),
                Err(e) => break Err(ClientError::Transport(e)),
            },
            joined = &mut outbound, if !outbound_done => {
                outbound_done = true;
                match joined {
                    Ok(OutboundEnd::ConnectionClosed) => {
                        info!("Connection closed by peer, ending session");
                        break Ok(SessionEnd::ConnectionClosed);
                    }
                    Ok(OutboundEnd::ConnectionLost(e)) => break Err(ClientError::Transport(e)),
                    Ok(OutboundEnd::Stopped) => {
                        debug!("Outbound task stopped early");
                    }
                    Err(e) => break Err(ClientError::OutboundTask(e.to_string())),
                }
            }
        }
    };

    let _ = stop_tx.send(true);
    if !outbound_done {
        if let Err(e) = outbound.await {
            warn!("Outbound task failed during shutdown: {}", e);
        }
    }

    result
}

async fn outbound_loop<W, S>(
    mut writer: W,
    world: SharedWorld,
    mut strategy: S,
    mut dispatcher: OrderDispatcher,
    faction: Faction,
    period: Duration,
    mut stop: watch::Receiver<bool>,
) -> OutboundEnd
where
    W: AsyncWrite + Unpin,
    S: Strategy,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = stop.changed() => return OutboundEnd::Stopped,
            _ = ticker.tick() => {}
        }

        let view = world.snapshot();
        if view.is_empty() {
            continue;
        }

        let intents = strategy.plan(faction, &view, dispatcher.max_orders());
        // A peer that stops reading must not keep the task alive past shutdown
        let outcome = tokio::select! {
            _ = stop.changed() => return OutboundEnd::Stopped,
            outcome = dispatcher.dispatch(&mut writer, intents) => outcome,
        };
        match outcome {
            Ok(DispatchOutcome::Sent(0)) => {}
            Ok(DispatchOutcome::Sent(count)) => debug!("Dispatched {} orders", count),
            Ok(DispatchOutcome::Closed) => return OutboundEnd::ConnectionClosed,
            Err(e) => return OutboundEnd::ConnectionLost(e),
        }
    }
}
