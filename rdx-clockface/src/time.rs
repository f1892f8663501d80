//! The clock source that drives the face.

use crate::config::ClockGranularity;
use crate::events::HostEvent;
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

/// A periodic timestamp notification.
#[derive(Debug, Clone)]
pub struct TickEvent {
    /// Number of ticks emitted before this one.
    pub tick_count: u64,
    /// Local wall-clock time at the moment of the tick.
    pub date: NaiveDateTime,
}

/// Emits a `TickEvent` once per granularity period.
///
/// The first tick fires immediately so the face is drawn at startup. Later
/// ticks are aligned to the granularity boundary in the configured timezone,
/// so a minute clock ticks at `hh:mm:00`.
pub struct SystemClock {
    granularity: ClockGranularity,
    timezone: Tz,
    sender: mpsc::UnboundedSender<HostEvent>,
}

impl SystemClock {
    pub fn new(
        granularity: ClockGranularity,
        timezone: Tz,
        sender: mpsc::UnboundedSender<HostEvent>,
    ) -> Self {
        Self {
            granularity,
            timezone,
            sender,
        }
    }

    /// Current local wall-clock time.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }

    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut tick_count = 0;
        self.emit(&mut tick_count);

        let first = Instant::now() + self.granularity.until_next_boundary(self.now());
        let mut ticker = interval_at(first, self.granularity.period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!("SystemClock ticking every {:?}.", self.granularity.period());

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                _ = ticker.tick() => self.emit(&mut tick_count),
            }
        }
        debug!("SystemClock stopped after {} ticks.", tick_count);
    }

    fn emit(&self, tick_count: &mut u64) {
        let tick = TickEvent {
            tick_count: *tick_count,
            date: self.now(),
        };
        trace!("Tick #{} at {}.", tick.tick_count, tick.date);
        self.sender.send(HostEvent::Tick(Arc::new(tick))).ok();
        *tick_count += 1;
    }
}
