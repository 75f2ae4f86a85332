//! Per-run counters and the final run report.

use serde::{Deserialize, Serialize};

use super::worker_loop::Outcome;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStats {
    pub received: u64,
    pub processed: u64,
    pub not_mine: u64,
    pub rejected: u64,
    pub call_failed: u64,
    pub error_replies: u64,
    pub encode_failed: u64,
    pub send_failed: u64,
}

impl WorkerStats {
    pub fn record(&mut self, outcome: Outcome) {
        self.received += 1;
        match outcome {
            Outcome::Processed => self.processed += 1,
            Outcome::NotMine => self.not_mine += 1,
            Outcome::Rejected => self.rejected += 1,
            Outcome::CallFailed => self.call_failed += 1,
            Outcome::ErrorReplied => {
                self.call_failed += 1;
                self.error_replies += 1;
            }
            Outcome::EncodeFailed => self.encode_failed += 1,
            Outcome::SendFailed => self.send_failed += 1,
        }
    }

    /// Messages this worker dropped with a diagnostic.
    pub fn dropped(&self) -> u64 {
        self.rejected + (self.call_failed - self.error_replies) + self.encode_failed
            + self.send_failed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// No message was processed successfully within the idle timeout.
    IdleTimeout,

    /// The shutdown signal was raised.
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub reason: StopReason,
    pub stats: WorkerStats,
}
