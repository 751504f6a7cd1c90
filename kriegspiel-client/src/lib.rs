//! Kriegspiel Client - Networked game-state client
//!
//! This crate connects the engine to a live game:
//! - Wire protocol (newline-delimited JSON)
//! - Sequence-gated snapshot synchronisation
//! - Shared world view with single-swap publish
//! - Pluggable strategies and rate-limited order dispatch
//! - Session loops and the reconnect loop
//! - Score log and final map artifacts

mod artifacts;
mod client;
mod config;
mod dispatcher;
mod error;
mod protocol;
mod session;
mod state;
mod strategy;
mod sync;

pub use artifacts::{append_score, record_game, write_final_map};
pub use client::run_client;
pub use config::ClientConfig;
pub use dispatcher::{DispatchOutcome, OrderDispatcher};
pub use error::{ClientError, ProtocolError};
pub use protocol::{decode, InboundMessage, MoveOrder, Snapshot};
pub use session::run_session;
pub use state::SharedWorld;
pub use strategy::{AdvanceStrategy, MoveIntent, Strategy};
pub use sync::{build_view, Flow, SessionEnd, SyncHandler};
