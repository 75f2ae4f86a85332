//! End-to-end worker scenarios over in-memory and line-based queues.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, TimeZone, Utc};
use courier_core::app::{
    Capabilities, CapabilityNames, StopReason, Tick, WorkerBuilder, WorkerConfig,
};
use courier_core::domain::{Reply, Value, WorkerEvent};
use courier_core::impls::arith::{Add, AddHandler, builtin_table};
use courier_core::impls::{InMemoryModule, LineModule, MemoryEventSink};
use courier_core::ports::FixedClock;
use courier_core::typed::codec;

fn fast_config(idle_ms: u64) -> WorkerConfig {
    WorkerConfig {
        idle_timeout: Duration::from_millis(idle_ms),
        poll_interval: Duration::from_millis(1),
        ..WorkerConfig::default()
    }
}

#[tokio::test]
async fn test_serves_add_then_stops_when_idle() {
    let module = InMemoryModule::new();
    module
        .input()
        .push(r#"{"function":"add","args":{"a":2,"b":3},"uuid":"abc"}"#)
        .unwrap();
    module
        .input()
        .push(r#"{"function":"sub","args":{"a":2,"b":3},"uuid":"def"}"#)
        .unwrap();
    module
        .input()
        .push(r#"{"function":"add","args":{"a":"x","b":3},"uuid":"ghi"}"#)
        .unwrap();

    let events = Arc::new(MemoryEventSink::new());
    let config = fast_config(50);
    let caps = Capabilities::bind(&module, &config.capabilities).unwrap();
    let worker = WorkerBuilder::new()
        .register::<Add, _>(AddHandler)
        .unwrap()
        .expect_functions(&["add"])
        .config(config)
        .event_sink(events.clone())
        .build(caps)
        .unwrap();

    let report = worker.run().await;

    assert_eq!(report.reason, StopReason::IdleTimeout);
    assert_eq!(report.stats.received, 3);
    assert_eq!(report.stats.processed, 1);
    assert_eq!(report.stats.not_mine, 1);
    assert_eq!(report.stats.call_failed, 1);

    assert_eq!(
        module.output().drain(),
        vec![r#"{"uuid":"abc","result":5}"#.to_string()]
    );
    assert_eq!(events.diagnostics().len(), 1);
}

#[tokio::test]
async fn test_responses_match_requests_by_correlation_id() {
    let module = InMemoryModule::new();
    for (uuid, a, b) in [("r1", 1, 1), ("r2", 10, -4), ("r3", 0, 0)] {
        let call = format!(r#"{{"function":"add","args":{{"a":{a},"b":{b}}},"uuid":"{uuid}"}}"#);
        module.input().push(call).unwrap();
    }

    let caps = Capabilities::bind(&module, &CapabilityNames::default()).unwrap();
    let worker = WorkerBuilder::new()
        .with_table(builtin_table(&["add"]).unwrap())
        .config(fast_config(30))
        .event_sink(Arc::new(MemoryEventSink::new()))
        .build(caps)
        .unwrap();
    worker.run().await;

    let replies: Vec<(String, Value)> = module
        .output()
        .drain()
        .iter()
        .map(|text| match codec::decode_reply(text).unwrap() {
            Reply::Result(r) => (r.correlation_id.to_string(), r.result),
            Reply::Error { .. } => panic!("unexpected error reply"),
        })
        .collect();
    assert_eq!(
        replies,
        vec![
            ("r1".to_string(), Value::Integer(2)),
            ("r2".to_string(), Value::Integer(6)),
            ("r3".to_string(), Value::Integer(0)),
        ]
    );
}

#[tokio::test]
async fn test_missing_capability_prevents_startup() {
    let module = InMemoryModule::new().with_names("read_from_queue", "write_to_output_queue");
    let result = Capabilities::bind(&module, &CapabilityNames::default());
    assert!(result.is_err());
}

#[tokio::test]
async fn test_foreign_traffic_does_not_keep_worker_alive() {
    let module = InMemoryModule::new();
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let events = Arc::new(MemoryEventSink::new());
    let caps = Capabilities::bind(&module, &CapabilityNames::default()).unwrap();
    let worker = WorkerBuilder::new()
        .with_table(builtin_table(&["add"]).unwrap())
        .clock(clock.clone())
        .event_sink(events.clone())
        .build(caps)
        .unwrap();
    let mut state = worker.start_state();

    let mut ticks = 0;
    let reason = loop {
        module
            .input()
            .push(r#"{"function":"multiply","args":{"a":2,"b":3},"uuid":"m"}"#)
            .unwrap();
        match worker.tick(&mut state).await {
            Tick::Stop(reason) => break reason,
            _ => ticks += 1,
        }
        clock.advance(TimeDelta::milliseconds(500));
    };

    assert_eq!(reason, StopReason::IdleTimeout);
    assert_eq!(ticks, 21);
    assert!(module.output().is_empty());
    assert!(events.events().is_empty());
}

#[tokio::test]
async fn test_line_module_serves_a_pipeline() {
    let input = std::io::Cursor::new(
        b"{\"function\":\"add\",\"args\":{\"a\":40,\"b\":2},\"uuid\":\"p1\"}\nnot json\n".to_vec(),
    );
    let (writer, mut reader) = tokio::io::duplex(1024);
    let module = LineModule::from_io(input, writer);

    let events = Arc::new(MemoryEventSink::new());
    let caps = Capabilities::bind(&module, &CapabilityNames::default()).unwrap();
    let worker = WorkerBuilder::new()
        .with_table(builtin_table(&["add"]).unwrap())
        .config(fast_config(100))
        .event_sink(events.clone())
        .build(caps)
        .unwrap();

    let report = worker.run().await;
    assert_eq!(report.stats.processed, 1);
    assert_eq!(report.stats.rejected, 1);
    assert!(matches!(
        &events.diagnostics()[..],
        [WorkerEvent::Rejected { .. }]
    ));

    drop(module);
    let mut out = String::new();
    tokio::io::AsyncReadExt::read_to_string(&mut reader, &mut out)
        .await
        .unwrap();
    assert_eq!(out, "{\"uuid\":\"p1\",\"result\":42}\n");
}
