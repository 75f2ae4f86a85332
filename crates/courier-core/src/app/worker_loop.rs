//! WorkerLoop - poll, dispatch, reply, repeat until idle.
//!
//! # Flow (one tick)
//! 1. Stop if the shutdown signal is raised.
//! 2. Stop if nothing was processed successfully for longer than the idle
//!    timeout.
//! 3. `receive_one()`; on a message: decode → lookup → handle → encode → send.
//! 4. Only a fully successful call resets the idle timer.
//!
//! Per-message failures never stop the loop. Messages addressed to other
//! functions are skipped without a trace.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use super::binder::Capabilities;
use super::config::WorkerConfig;
use super::idle::IdleTimer;
use super::status::{RunReport, StopReason, WorkerStats};
use crate::domain::{Reply, WorkerEvent};
use crate::ports::{Clock, EventSink};
use crate::typed::DispatchTable;
use crate::typed::codec;

/// What happened to one received message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Handled, response sent.
    Processed,
    /// Function not in this worker's table.
    NotMine,
    /// Structurally invalid envelope.
    Rejected,
    /// Bad arguments or handler failure; dropped.
    CallFailed,
    /// Bad arguments or handler failure; error reply sent.
    ErrorReplied,
    EncodeFailed,
    SendFailed,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Queue was empty.
    Idle,
    Handled(Outcome),
    Stop(StopReason),
}

/// Mutable state of one run. Owned by the loop and passed to each tick.
#[derive(Debug, Clone)]
pub struct WorkerState {
    idle: IdleTimer,
    stats: WorkerStats,
}

impl WorkerState {
    pub fn idle(&self) -> &IdleTimer {
        &self.idle
    }

    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }
}

pub struct Worker {
    capabilities: Capabilities,
    table: DispatchTable,
    config: WorkerConfig,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl Worker {
    pub(crate) fn new(
        capabilities: Capabilities,
        table: DispatchTable,
        config: WorkerConfig,
        clock: Arc<dyn Clock>,
        events: Arc<dyn EventSink>,
        shutdown: Option<watch::Receiver<bool>>,
    ) -> Self {
        Self {
            capabilities,
            table,
            config,
            clock,
            events,
            shutdown,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Fresh per-run state; the idle window starts now.
    pub fn start_state(&self) -> WorkerState {
        WorkerState {
            idle: IdleTimer::new(self.clock.now(), self.config.idle_timeout),
            stats: WorkerStats::default(),
        }
    }

    /// Run until idle timeout or shutdown. Consumes the worker, so the bound
    /// capabilities are released when this returns.
    pub async fn run(self) -> RunReport {
        let mut state = self.start_state();
        info!(
            functions = ?self.table.functions(),
            idle_timeout_ms = self.config.idle_timeout.as_millis() as u64,
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "worker started"
        );

        let reason = loop {
            if let Tick::Stop(reason) = self.tick(&mut state).await {
                break reason;
            }
            tokio::time::sleep(self.config.poll_interval).await;
        };

        info!(?reason, stats = ?state.stats, "worker stopped");
        RunReport {
            reason,
            stats: state.stats,
        }
    }

    pub async fn tick(&self, state: &mut WorkerState) -> Tick {
        if self.shutdown_requested() {
            return Tick::Stop(StopReason::Shutdown);
        }
        if state.idle.is_expired(self.clock.now()) {
            return Tick::Stop(StopReason::IdleTimeout);
        }

        let Some(message) = self.capabilities.inbox().receive_one().await else {
            return Tick::Idle;
        };

        let outcome = self.process(&message).await;
        state.stats.record(outcome);
        if outcome == Outcome::Processed {
            state.idle.reset(self.clock.now());
        }
        Tick::Handled(outcome)
    }

    /// Handle one inbound message end to end.
    pub async fn process(&self, message: &str) -> Outcome {
        let call = match codec::decode_call(message) {
            Ok(call) => call,
            Err(error) => {
                self.events.emit(WorkerEvent::Rejected { error });
                return Outcome::Rejected;
            }
        };

        let Some(handler) = self.table.lookup(call.function().as_str()) else {
            return Outcome::NotMine;
        };

        let reply = match handler.call(call.args()) {
            Ok(result) => Reply::Result(call.respond(result)),
            Err(error) => {
                let message = error.to_string();
                self.events.emit(WorkerEvent::CallFailed {
                    function: call.function().clone(),
                    correlation_id: call.correlation_id().clone(),
                    error,
                });
                if !self.config.error_replies {
                    return Outcome::CallFailed;
                }
                Reply::Error {
                    correlation_id: call.correlation_id().clone(),
                    message,
                }
            }
        };

        let text = match codec::encode_reply(&reply) {
            Ok(text) => text,
            Err(error) => {
                self.events.emit(WorkerEvent::EncodeFailed {
                    correlation_id: call.correlation_id().clone(),
                    error,
                });
                return Outcome::EncodeFailed;
            }
        };

        if let Err(e) = self.capabilities.outbox().send_one(text).await {
            self.events.emit(WorkerEvent::SendFailed {
                correlation_id: call.correlation_id().clone(),
                reason: e.to_string(),
            });
            return Outcome::SendFailed;
        }

        match reply {
            Reply::Result(_) => {
                self.events.emit(WorkerEvent::Processed {
                    function: call.function().clone(),
                    correlation_id: call.correlation_id().clone(),
                });
                Outcome::Processed
            }
            Reply::Error { .. } => Outcome::ErrorReplied,
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }
}
