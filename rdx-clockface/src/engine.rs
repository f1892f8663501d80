//! The simulated host runtime that drives a `Watch`.

use crate::common::ClockDisplay;
use crate::components::watch::Watch;
use crate::config::FaceConfig;
use crate::document::{Document, ElementSnapshot};
use crate::error::FaceError;
use crate::events::{HeartRateReading, HostEvent, InputEvent, RenderCause, SystemEvent};
use crate::host::{
    ActivityTotals, DocumentTree, HeartRateSensor, HostContext, SimulatedHeartRateSensor,
    StaticPreferences,
};
use crate::time::SystemClock;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

/// Everything the host owns on behalf of the face.
#[derive(Debug)]
pub struct HostState {
    pub document: Document,
    pub preferences: StaticPreferences,
    pub activity: ActivityTotals,
}

impl HostState {
    fn context(&mut self) -> HostContext<'_> {
        HostContext {
            document: &mut self.document,
            preferences: &self.preferences,
            activity: &self.activity,
        }
    }
}

/// The clock-face engine.
///
/// Plays the part of the device runtime: it owns the document tree and the
/// data services, runs the `SystemClock`, and feeds clock, input and sensor
/// events to a single `Watch`, one at a time and in arrival order. The
/// engine is cheap to clone; every clone is a handle to the same running
/// instance. An engine runs at most once: the inbound event queue has a
/// single receiver, and the first `run_until` takes it.
#[derive(Clone)]
pub struct FaceEngine {
    config: Arc<FaceConfig>,
    host: Arc<RwLock<HostState>>,
    sensor: SimulatedHeartRateSensor,

    host_event_sender: mpsc::UnboundedSender<HostEvent>,
    host_event_receiver: Arc<Mutex<Option<mpsc::UnboundedReceiver<HostEvent>>>>,
    system_event_sender: broadcast::Sender<SystemEvent>,
}

impl FaceEngine {
    /// Creates an engine with the standard clock-face layout.
    pub fn new(config: FaceConfig) -> Self {
        Self::with_document(config, Document::clock_face())
    }

    /// Creates an engine that renders into `document`.
    pub fn with_document(config: FaceConfig, document: Document) -> Self {
        const CHANNEL_CAPACITY: usize = 256;
        let (host_event_sender, host_event_receiver) = mpsc::unbounded_channel();
        let (system_event_sender, _) = broadcast::channel(CHANNEL_CAPACITY);

        let host = HostState {
            document,
            preferences: StaticPreferences {
                clock_display: config.clock_display,
            },
            activity: ActivityTotals::default(),
        };

        Self {
            config: Arc::new(config),
            host: Arc::new(RwLock::new(host)),
            sensor: SimulatedHeartRateSensor::new(),
            host_event_sender,
            host_event_receiver: Arc::new(Mutex::new(Some(host_event_receiver))),
            system_event_sender,
        }
    }

    /// Runs the engine until Ctrl+C.
    pub async fn run(&self) -> anyhow::Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        })
        .await
    }

    /// Runs the engine until `shutdown` completes.
    ///
    /// This method will:
    /// 1. Take the inbound event queue, failing if the engine already ran.
    /// 2. Build the `Watch`, failing if the document lacks any face element.
    ///    The queue is handed back in that case.
    /// 3. Spawn the dispatcher that feeds events to the `Watch`.
    /// 4. Spawn the `SystemClock`.
    /// 5. Wait for `shutdown`, then stop both tasks.
    pub async fn run_until(&self, shutdown: impl Future<Output = ()>) -> anyhow::Result<()> {
        info!("FaceEngine starting up...");
        let mut receiver_slot = self.host_event_receiver.lock().await;
        let Some(event_rx) = receiver_slot.take() else {
            return Err(FaceError::AlreadyRunning.into());
        };
        let watch = match self.build_watch().await {
            Ok(watch) => watch,
            Err(e) => {
                *receiver_slot = Some(event_rx);
                return Err(e.into());
            }
        };
        drop(receiver_slot);

        let (shutdown_tx, _) = broadcast::channel(1);

        let dispatcher = Dispatcher {
            watch,
            root_element: self.config.root_element.clone(),
            host: self.host.clone(),
            system_event_sender: self.system_event_sender.clone(),
        };
        let dispatcher_handle = tokio::spawn(dispatcher.run(event_rx, shutdown_tx.subscribe()));

        let clock = SystemClock::new(
            self.config.granularity,
            self.config.timezone,
            self.host_event_sender.clone(),
        );
        let clock_handle = tokio::spawn(clock.run(shutdown_tx.subscribe()));

        info!(
            "Engine running with {:?} ticks in {}.",
            self.config.granularity, self.config.timezone
        );
        shutdown.await;

        info!("Shutdown signal received. Broadcasting to all tasks...");
        if shutdown_tx.send(()).is_err() {
            error!("Failed to send shutdown signal. Some tasks may not terminate gracefully.");
        }
        clock_handle.await?;
        dispatcher_handle.await?;
        self.system_event_sender
            .send(SystemEvent::EngineShutdown)
            .ok();
        info!("FaceEngine has shut down.");
        Ok(())
    }

    async fn build_watch(&self) -> Result<Watch, FaceError> {
        let host = self.host.read().await;
        if host.document.element_id(&self.config.root_element).is_none() {
            return Err(FaceError::ElementNotFound(self.config.root_element.clone()));
        }
        Ok(Watch::new(&host.document, Box::new(self.sensor.clone()))?
            .with_initial_mode(self.config.initial_mode))
    }
}

// Public API implementation block.
impl FaceEngine {
    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    /// Delivers a tap on the element named `target`.
    pub fn click(&self, target: impl Into<String>) {
        self.host_event_sender
            .send(HostEvent::Input(InputEvent::Click {
                target: target.into(),
            }))
            .ok();
    }

    /// Delivers a tap on the root element.
    pub fn tap(&self) {
        self.click(self.config.root_element.clone());
    }

    /// Delivers a heart-rate sample, as the sensor driver would.
    pub fn push_heart_rate(&self, heart_rate: u32) {
        self.host_event_sender
            .send(HostEvent::HeartRate(HeartRateReading {
                heart_rate,
                timestamp: Instant::now(),
            }))
            .ok();
    }

    /// Whether the face currently holds the sensor open.
    pub fn sensor_active(&self) -> bool {
        self.sensor.is_activated()
    }

    /// Changes today's activity totals. Shown on the next render.
    pub async fn update_activity(&self, update: impl FnOnce(&mut ActivityTotals)) {
        update(&mut self.host.write().await.activity);
    }

    /// Changes the clock-display preference. Shown on the next tick.
    pub async fn set_clock_display(&self, clock_display: ClockDisplay) {
        self.host.write().await.preferences.clock_display = clock_display;
    }

    /// Returns every element as it is currently drawn.
    pub async fn snapshot(&self) -> Vec<ElementSnapshot> {
        self.host.read().await.document.snapshot()
    }

    /// Subscribes to the `SystemEvent` stream.
    pub fn subscribe_system_events(&self) -> broadcast::Receiver<SystemEvent> {
        self.system_event_sender.subscribe()
    }
}

/// Owns the `Watch` and applies events to it in arrival order.
struct Dispatcher {
    watch: Watch,
    root_element: String,
    host: Arc<RwLock<HostState>>,
    system_event_sender: broadcast::Sender<SystemEvent>,
}

impl Dispatcher {
    async fn run(
        mut self,
        mut event_rx: mpsc::UnboundedReceiver<HostEvent>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        self.system_event_sender
            .send(SystemEvent::EngineStarted {
                timestamp: Instant::now(),
            })
            .ok();

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                event = event_rx.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
            }
        }
    }

    async fn handle(&mut self, event: HostEvent) {
        match event {
            HostEvent::Tick(tick) => {
                trace!("Tick #{} received.", tick.tick_count);
                self.dispatch(RenderCause::Tick, |watch, ctx| watch.on_tick(&tick, ctx))
                    .await;
            }
            HostEvent::Input(InputEvent::Click { target }) => {
                if target == self.root_element {
                    self.dispatch(RenderCause::Click, |watch, ctx| watch.on_click(ctx))
                        .await;
                } else {
                    warn!("Dropping tap on '{}': not the root element.", target);
                    self.system_event_sender
                        .send(SystemEvent::InputDropped { target })
                        .ok();
                }
            }
            HostEvent::HeartRate(reading) => {
                trace!("Heart rate {} bpm received.", reading.heart_rate);
                self.dispatch(RenderCause::HeartRate, |watch, ctx| {
                    watch.on_heart_rate_reading(&reading, ctx)
                })
                .await;
            }
        }
    }

    async fn dispatch<F>(&mut self, cause: RenderCause, handler: F)
    where
        F: FnOnce(&mut Watch, &mut HostContext<'_>) -> Result<(), FaceError>,
    {
        let mut host = self.host.write().await;
        let before = host.document.writes();
        let result = handler(&mut self.watch, &mut host.context());
        let writes = host.document.writes() - before;
        drop(host);

        match result {
            Ok(()) if writes > 0 => {
                debug!("Rendered {} writes for {:?}.", writes, cause);
                self.system_event_sender
                    .send(SystemEvent::Rendered { cause, writes })
                    .ok();
            }
            Ok(()) => trace!("Nothing to render for {:?}.", cause),
            Err(e) => {
                error!("Render for {:?} failed: {}", cause, e);
                self.system_event_sender
                    .send(SystemEvent::RenderFailed {
                        cause,
                        error: e.to_string(),
                    })
                    .ok();
            }
        }
    }
}
