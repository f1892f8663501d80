use anyhow::Result;
use clockface::prelude::*;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // 2. Load the configuration. An explicit path may be passed as the first argument.
    let path = std::env::args().nth(1);
    let config = FaceConfig::load(path.as_deref())?;
    info!("Loaded configuration: {:?}", config);

    // 3. Create the FaceEngine instance.
    let engine = FaceEngine::new(config);
    engine
        .update_activity(|today| {
            *today = ActivityTotals {
                calories: 1275,
                steps: 6402,
                distance: 4810,
                active_zone_minutes: 18,
            };
        })
        .await;

    // 4. Spawn a task that logs everything the engine reports.
    spawn_event_listeners(&engine);

    // 5. Simulate a wearer: a tap every few seconds and a steady pulse.
    spawn_demo_wearer(&engine);

    // 6. Run the engine until Ctrl+C.
    engine.run().await?;

    Ok(())
}

/// Spawns a task that logs the engine's system events and the face after each render.
fn spawn_event_listeners(engine: &FaceEngine) {
    let mut system_rx = engine.subscribe_system_events();
    let handle = engine.clone();
    tokio::spawn(async move {
        while let Ok(event) = system_rx.recv().await {
            info!("[SYSTEM] => {:?}", event);
            if let SystemEvent::Rendered { .. } = event {
                let face = handle
                    .snapshot()
                    .await
                    .into_iter()
                    .filter(|element| element.name.ends_with("Main"))
                    .map(|element| format!("{}={:?}", element.name, element.value))
                    .collect::<Vec<_>>()
                    .join(" ");
                info!("[FACE] => {}", face);
            }
        }
    });
}

/// Spawns a task that taps the face every 5 seconds and feeds the heart-rate sensor.
fn spawn_demo_wearer(engine: &FaceEngine) {
    let engine = engine.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        let mut seconds: u32 = 0;
        loop {
            ticker.tick().await;
            seconds += 1;
            engine.push_heart_rate(62 + (seconds * 7) % 23);
            if seconds % 5 == 0 {
                engine.tap();
            }
        }
    });
}
