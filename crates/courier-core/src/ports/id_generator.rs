//! IdGenerator port - correlation id generation for callers.
//!
//! Workers only echo correlation ids. Callers that build envelopes need fresh
//! ones, and get them here so tests can pin the timestamp part via the clock.

use std::sync::Arc;

use ulid::Ulid;

use crate::domain::CorrelationId;
use crate::ports::Clock;

pub trait IdGenerator: Send + Sync {
    fn generate_correlation_id(&self) -> CorrelationId;
}

/// ULID-based ids: sortable by creation time, no coordination needed.
pub struct UlidGenerator {
    clock: Arc<dyn Clock>,
}

impl UlidGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl IdGenerator for UlidGenerator {
    fn generate_correlation_id(&self) -> CorrelationId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        CorrelationId::from_ulid(ulid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{FixedClock, SystemClock};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_generated_ids_are_unique() {
        let id_gen = UlidGenerator::new(Arc::new(SystemClock));

        let id1 = id_gen.generate_correlation_id();
        let id2 = id_gen.generate_correlation_id();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_fixed_clock_pins_the_timestamp_part() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(Arc::new(FixedClock::new(fixed_time)));

        let id1 = id_gen.generate_correlation_id();
        let id2 = id_gen.generate_correlation_id();
        assert_ne!(id1, id2);

        let ts1 = Ulid::from_string(id1.as_str()).unwrap().timestamp_ms();
        let ts2 = Ulid::from_string(id2.as_str()).unwrap().timestamp_ms();
        assert_eq!(ts1, ts2);
        assert_eq!(ts1, fixed_time.timestamp_millis() as u64);
    }
}
