use clockface::document::ElementKind;
use clockface::prelude::*;
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

/// Starts `engine` in the background and waits until its dispatcher is live.
async fn start(
    engine: &FaceEngine,
    events: &mut broadcast::Receiver<SystemEvent>,
) -> (oneshot::Sender<()>, JoinHandle<anyhow::Result<()>>) {
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let runner = engine.clone();
    let handle = tokio::spawn(async move {
        runner
            .run_until(async {
                stop_rx.await.ok();
            })
            .await
    });
    wait_for(events, |event| matches!(event, SystemEvent::EngineStarted { .. })).await;
    (stop_tx, handle)
}

async fn wait_for(
    events: &mut broadcast::Receiver<SystemEvent>,
    mut predicate: impl FnMut(&SystemEvent) -> bool,
) -> SystemEvent {
    timeout(WAIT, async {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("system event stream closed"),
            };
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for system event")
}

async fn rendered(events: &mut broadcast::Receiver<SystemEvent>, cause: RenderCause) {
    wait_for(
        events,
        |event| matches!(event, SystemEvent::Rendered { cause: c, .. } if *c == cause),
    )
    .await;
}

async fn value_of(engine: &FaceEngine, name: &str) -> String {
    engine
        .snapshot()
        .await
        .into_iter()
        .find(|element| element.name == name)
        .map(|element| element.value)
        .unwrap_or_default()
}

#[tokio::test]
async fn first_tick_draws_the_whole_face() {
    let engine = FaceEngine::new(FaceConfig::default());
    engine
        .update_activity(|today| today.calories = 2048)
        .await;
    let mut events = engine.subscribe_system_events();
    let (stop, handle) = start(&engine, &mut events).await;

    rendered(&mut events, RenderCause::Tick).await;

    let time = value_of(&engine, "timeLabelMain").await;
    assert_eq!(time.len(), 5);
    assert_eq!(&time[2..3], ":");
    assert_eq!(value_of(&engine, "timeLabelShadow").await, time);
    assert_eq!(value_of(&engine, "dateLabelMain").await.len(), 6);
    assert_eq!(value_of(&engine, "statsLabelMain").await, "2048");
    assert_eq!(value_of(&engine, "statsIconMain").await, "calories.png");
    assert!(engine.sensor_active());

    stop.send(()).ok();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn taps_cycle_and_readings_follow_the_heart_rate_mode() {
    let engine = FaceEngine::new(FaceConfig::default());
    let mut events = engine.subscribe_system_events();
    let (stop, handle) = start(&engine, &mut events).await;

    // Calories is showing, so this reading is recorded but not drawn.
    engine.push_heart_rate(58);
    engine.tap();
    rendered(&mut events, RenderCause::Click).await;
    assert_eq!(value_of(&engine, "statsIconMain").await, "heartRate.png");
    assert_eq!(value_of(&engine, "statsLabelMain").await, "  58");

    engine.push_heart_rate(74);
    rendered(&mut events, RenderCause::HeartRate).await;
    assert_eq!(value_of(&engine, "statsLabelMain").await, "  74");
    assert_eq!(value_of(&engine, "statsLabelShadow").await, "  74");

    engine.tap();
    rendered(&mut events, RenderCause::Click).await;
    assert_eq!(value_of(&engine, "statsIconShadow").await, "steps.png");

    stop.send(()).ok();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn taps_outside_the_root_are_dropped() {
    let engine = FaceEngine::new(FaceConfig::default());
    let mut events = engine.subscribe_system_events();
    let (stop, handle) = start(&engine, &mut events).await;

    engine.click("statsLabelMain");
    let event = wait_for(&mut events, |event| {
        matches!(event, SystemEvent::InputDropped { .. })
    })
    .await;
    assert!(matches!(event, SystemEvent::InputDropped { ref target } if target == "statsLabelMain"));

    stop.send(()).ok();
    handle.await.unwrap().unwrap();
    wait_for(&mut events, |event| matches!(event, SystemEvent::EngineShutdown)).await;
}

#[tokio::test]
async fn a_burst_of_taps_is_applied_in_full() {
    let engine = FaceEngine::new(FaceConfig::default());
    let mut events = engine.subscribe_system_events();
    let (stop, handle) = start(&engine, &mut events).await;

    // More taps than the system event stream buffers; every one must land.
    for _ in 0..302 {
        engine.tap();
    }
    engine.click("done");
    wait_for(&mut events, |event| {
        matches!(event, SystemEvent::InputDropped { target } if target == "done")
    })
    .await;

    // 302 taps from calories is two full cycles plus two steps.
    assert_eq!(value_of(&engine, "statsIconMain").await, "steps.png");
    assert_eq!(value_of(&engine, "statsIconShadow").await, "steps.png");

    stop.send(()).ok();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn an_engine_runs_only_once() {
    let engine = FaceEngine::new(FaceConfig::default());
    let mut events = engine.subscribe_system_events();
    let (stop, handle) = start(&engine, &mut events).await;

    let err = engine.run_until(async {}).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FaceError>(),
        Some(FaceError::AlreadyRunning)
    ));

    engine.tap();
    engine.click("done");
    let mut click_renders = 0;
    wait_for(&mut events, |event| match event {
        SystemEvent::Rendered {
            cause: RenderCause::Click,
            ..
        } => {
            click_renders += 1;
            false
        }
        SystemEvent::InputDropped { target } => target == "done",
        _ => false,
    })
    .await;

    assert_eq!(click_renders, 1);
    assert_eq!(value_of(&engine, "statsIconMain").await, "heartRate.png");

    stop.send(()).ok();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn a_failed_start_can_be_retried() {
    let mut document = Document::new();
    document.insert("clock", ElementKind::Group);
    let engine = FaceEngine::with_document(FaceConfig::default(), document);

    for _ in 0..2 {
        let err = engine.run_until(async {}).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FaceError>(),
            Some(FaceError::ElementNotFound(_))
        ));
    }
}

#[tokio::test]
async fn initial_mode_comes_from_config() {
    let config = FaceConfig::from_toml_str(r#"initial_mode = "activeZoneMinutes""#).unwrap();
    let engine = FaceEngine::new(config);
    engine
        .update_activity(|today| today.active_zone_minutes = 31)
        .await;
    let mut events = engine.subscribe_system_events();
    let (stop, handle) = start(&engine, &mut events).await;

    rendered(&mut events, RenderCause::Tick).await;
    assert_eq!(value_of(&engine, "statsLabelMain").await, "  31");

    engine.tap();
    rendered(&mut events, RenderCause::Click).await;
    assert_eq!(value_of(&engine, "statsIconMain").await, "calories.png");

    stop.send(()).ok();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn missing_root_element_fails_startup() {
    let document = Document::clock_face();
    let config = FaceConfig {
        root_element: "face".to_string(),
        ..FaceConfig::default()
    };
    let engine = FaceEngine::with_document(config, document);

    let result = engine.run_until(async {}).await;
    assert!(result.is_err());
    assert!(!engine.sensor_active());
}

#[tokio::test]
async fn missing_face_elements_fail_startup() {
    let mut document = Document::new();
    document.insert("clock", ElementKind::Group);
    let engine = FaceEngine::with_document(FaceConfig::default(), document);

    let err = engine.run_until(async {}).await.unwrap_err();
    assert!(err.to_string().contains("timeLabelMain"));
}
