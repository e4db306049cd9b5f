//! Host lifecycle: readiness, shutdown ordering, failure collection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use blackrock::config::HostConfig;
use blackrock::lifecycle::TeardownError;
use blackrock::observability::{MemorySink, SHUTDOWN};
use blackrock::{Host, HostError, LifecycleState, RegistryError};

mod common;

use common::{fragment, Gate, ScriptedProtocol, StopLog};

fn three_modules() -> HostConfig {
    HostConfig::default()
        .with_router("all", ["*"])
        .with_interface("First", "a", fragment())
        .with_interface("Second", "b", fragment())
        .with_interface("Third", "c", fragment())
}

fn scripted_host(config: HostConfig, stops: &StopLog, sink: Arc<MemorySink>) -> Host {
    Host::builder(config)
        .protocol("First", Arc::new(ScriptedProtocol::new("First", stops.clone())))
        .protocol("Second", Arc::new(ScriptedProtocol::new("Second", stops.clone())))
        .protocol("Third", Arc::new(ScriptedProtocol::new("Third", stops.clone())))
        .log_sink(sink)
        .build()
}

#[tokio::test]
async fn ready_callbacks_run_once_before_and_immediately_after() {
    let host = scripted_host(three_modules(), &StopLog::default(), Arc::new(MemorySink::new()));
    let calls = Arc::new(AtomicUsize::new(0));

    let early = calls.clone();
    host.ready(move || {
        early.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!host.is_ready());
    assert_eq!(host.state(), LifecycleState::Initializing);

    host.start().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(host.state(), LifecycleState::Ready);

    let late = calls.clone();
    host.ready(move || {
        late.fetch_add(10, Ordering::SeqCst);
    });
    assert_eq!(calls.load(Ordering::SeqCst), 11);

    // Already-ready waiters resolve at once.
    host.wait_ready().await;
}

#[tokio::test]
async fn wait_ready_resolves_when_start_finishes() {
    let host = Arc::new(scripted_host(
        three_modules(),
        &StopLog::default(),
        Arc::new(MemorySink::new()),
    ));

    let waiter = {
        let host = host.clone();
        tokio::spawn(async move { host.wait_ready().await })
    };
    host.start().await.unwrap();

    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .expect("waiter never woke")
        .unwrap();
}

#[tokio::test]
async fn modules_tear_down_in_reverse_registration_order() {
    let stops = StopLog::default();
    let sink = Arc::new(MemorySink::new());
    let host = scripted_host(three_modules(), &stops, sink.clone());
    host.start().await.unwrap();

    let report = host.shutdown().await;

    assert!(report.is_clean());
    assert!(!report.already_stopped);
    assert_eq!(report.torn_down, vec!["Third", "Second", "First", "router"]);
    assert_eq!(*stops.lock(), vec!["Third/c", "Second/b", "First/a"]);
    assert_eq!(sink.matching(SHUTDOWN, "stopped").len(), 4);
    assert_eq!(host.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn second_shutdown_is_a_no_op() {
    let stops = StopLog::default();
    let host = scripted_host(three_modules(), &stops, Arc::new(MemorySink::new()));
    host.start().await.unwrap();

    let first = host.shutdown().await;
    let second = host.shutdown().await;

    assert!(!first.already_stopped);
    assert!(second.already_stopped);
    assert!(second.torn_down.is_empty());
    assert_eq!(stops.lock().len(), 3, "teardown hooks ran twice");
}

#[tokio::test]
async fn concurrent_shutdowns_run_hooks_once() {
    let stops = StopLog::default();
    let config = three_modules();
    let host = Arc::new(
        Host::builder(config)
            .protocol(
                "First",
                Arc::new(
                    ScriptedProtocol::new("First", stops.clone())
                        .slow_stop(Duration::from_millis(50)),
                ),
            )
            .log_sink(Arc::new(MemorySink::new()))
            .build(),
    );
    host.start().await.unwrap();

    let (a, b) = tokio::join!(host.shutdown(), host.shutdown());

    assert_ne!(a.already_stopped, b.already_stopped);
    assert_eq!(*stops.lock(), vec!["First/a"]);
    // The loser returns only after the winner finished.
    assert_eq!(host.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn teardown_failures_are_collected_and_do_not_stop_the_sequence() {
    let stops = StopLog::default();
    let sink = Arc::new(MemorySink::new());
    let host = Host::builder(three_modules())
        .protocol("First", Arc::new(ScriptedProtocol::new("First", stops.clone())))
        .protocol(
            "Second",
            Arc::new(ScriptedProtocol::new("Second", stops.clone()).failing_stop()),
        )
        .protocol("Third", Arc::new(ScriptedProtocol::new("Third", stops.clone())))
        .log_sink(sink.clone())
        .build();
    host.start().await.unwrap();

    let report = host.shutdown().await;

    assert_eq!(*stops.lock(), vec!["Third/c", "Second/b", "First/a"]);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].module(), "Second");
    assert!(matches!(report.errors[0], TeardownError::Transport { .. }));
    assert_eq!(sink.matching(SHUTDOWN, "would not stop").len(), 1);
    assert_eq!(host.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn slow_teardown_times_out_and_the_rest_still_run() {
    let stops = StopLog::default();
    let mut config = three_modules();
    config.host.teardown_timeout_secs = 1;
    let host = Host::builder(config)
        .protocol("First", Arc::new(ScriptedProtocol::new("First", stops.clone())))
        .protocol(
            "Third",
            Arc::new(
                ScriptedProtocol::new("Third", stops.clone()).slow_stop(Duration::from_secs(30)),
            ),
        )
        .log_sink(Arc::new(MemorySink::new()))
        .build();
    host.start().await.unwrap();

    let report = host.shutdown().await;

    assert_eq!(report.errors.len(), 1);
    assert!(matches!(
        &report.errors[0],
        TeardownError::TimedOut { module, .. } if module == "Third"
    ));
    assert_eq!(*stops.lock(), vec!["First/a"]);
    assert_eq!(report.torn_down.len(), 4);
}

#[tokio::test]
async fn start_twice_is_rejected() {
    let host = scripted_host(three_modules(), &StopLog::default(), Arc::new(MemorySink::new()));
    host.start().await.unwrap();

    assert!(matches!(host.start().await, Err(HostError::AlreadyStarted)));
}

#[tokio::test]
async fn shutdown_before_start_prevents_start() {
    let host = scripted_host(three_modules(), &StopLog::default(), Arc::new(MemorySink::new()));

    let report = host.shutdown().await;
    assert!(report.torn_down.is_empty());

    assert!(matches!(
        host.start().await,
        Err(HostError::NotStartable(LifecycleState::Stopped))
    ));
    assert!(!host.is_ready());
}

#[tokio::test]
async fn module_name_colliding_with_router_fails_startup() {
    let stops = StopLog::default();
    let config = HostConfig::default()
        .with_router("all", ["*"])
        .with_interface("Router", "a", fragment());
    let host = Host::builder(config)
        .protocol("Router", Arc::new(ScriptedProtocol::new("Router", stops.clone())))
        .log_sink(Arc::new(MemorySink::new()))
        .build();

    let err = host.start().await.unwrap_err();
    assert!(matches!(
        err,
        HostError::Registry(RegistryError::DuplicateModule(ref name)) if name == "Router"
    ));
    assert!(stops.lock().is_empty(), "duplicate module was started");
    assert!(!host.is_ready());
}

#[tokio::test]
async fn globals_are_shared_through_the_host() {
    let host = scripted_host(three_modules(), &StopLog::default(), Arc::new(MemorySink::new()));
    host.start().await.unwrap();

    assert!(host.set_global("zero", 0));
    assert!(host.set_global("empty", ""));
    assert!(host.set_global("config", json!({ "retries": 3 })));

    assert_eq!(host.get_global("zero"), Some(json!(0)));
    assert_eq!(host.get_global("empty"), Some(json!("")));
    assert_eq!(host.get_global("config"), Some(json!({ "retries": 3 })));
    assert_eq!(host.get_global("missing"), None);

    // Modules see the same store.
    assert_eq!(host.context().get_global("zero"), Some(json!(0)));
}

#[tokio::test]
async fn services_come_from_config() {
    let config = three_modules()
        .with_service("billing", ["/invoices", "/refunds"])
        .with_service("accounts", ["/users"]);
    let host = scripted_host(config, &StopLog::default(), Arc::new(MemorySink::new()));

    assert_eq!(host.service_list(), vec!["accounts", "billing"]);
    let stats = host.service_stats();
    assert_eq!(stats.services_count, 2);
    assert_eq!(stats.services_route_count, 3);
}

#[tokio::test]
async fn shutdown_during_startup_waits_for_the_module_being_activated() {
    let stops = StopLog::default();
    let gate = Arc::new(Gate::default());
    let config = HostConfig::default()
        .with_router("all", ["*"])
        .with_interface("Slow", "a", fragment())
        .with_interface("Slow", "b", fragment())
        .with_interface("Later", "c", fragment());
    let slow = Arc::new(
        ScriptedProtocol::new("Slow", stops.clone())
            .gated(gate.clone())
            .failing_stop(),
    );
    let later = Arc::new(ScriptedProtocol::new("Later", stops.clone()));
    let host = Arc::new(
        Host::builder(config)
            .protocol("Slow", slow.clone())
            .protocol("Later", later.clone())
            .log_sink(Arc::new(MemorySink::new()))
            .build(),
    );

    let starting = {
        let host = host.clone();
        tokio::spawn(async move { host.start().await })
    };
    gate.entered.notified().await;

    let stopping = {
        let host = host.clone();
        tokio::spawn(async move { host.shutdown().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!stopping.is_finished(), "shutdown returned while a module was mid-activation");

    gate.release.notify_one();
    let started = tokio::time::timeout(Duration::from_secs(5), starting)
        .await
        .expect("start never returned")
        .unwrap();
    assert!(matches!(
        started,
        Err(HostError::NotStartable(LifecycleState::ShuttingDown))
    ));

    let report = tokio::time::timeout(Duration::from_secs(5), stopping)
        .await
        .expect("shutdown never returned")
        .unwrap();
    assert_eq!(report.torn_down, vec!["Slow", "router"]);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].module(), "Slow");
    assert_eq!(*stops.lock(), vec!["Slow/a"]);

    // Nothing after the interrupted sub-interface was activated.
    assert_eq!(slow.activations().len(), 1);
    assert!(later.activations().is_empty());
    assert_eq!(host.state(), LifecycleState::Stopped);
    assert!(!host.is_ready());
}
