//! Interfaces to everything the clock face consumes but does not own.
//!
//! The face never reaches for ambient globals. Each handler receives a
//! [`HostContext`] that borrows the document tree and the data services for
//! the duration of one event. The heart-rate sensor is the exception: the
//! face owns its subscription for its whole lifetime.

use crate::common::{ClockDisplay, ElementId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// A handle-by-identifier registry of visual elements.
pub trait DocumentTree {
    /// Resolves an element by its identifier.
    fn element_id(&self, name: &str) -> Option<ElementId>;

    /// Replaces the text of a label element.
    fn set_text(&mut self, id: ElementId, text: &str);

    /// Replaces the resource reference of an image element.
    fn set_href(&mut self, id: ElementId, href: &str);
}

/// Read-only user preferences.
pub trait UserPreferences {
    fn clock_display(&self) -> ClockDisplay;
}

/// Today's adjusted activity totals.
pub trait ActivityData {
    fn today(&self) -> ActivityTotals;
}

/// Lifecycle control of the heart-rate sensor.
///
/// Readings themselves arrive as events; see
/// [`HeartRateReading`](crate::events::HeartRateReading).
pub trait HeartRateSensor: Send {
    fn start(&mut self);
    fn stop(&mut self);
    fn is_activated(&self) -> bool;
}

/// Borrowed host services for the duration of one event.
pub struct HostContext<'a> {
    pub document: &'a mut dyn DocumentTree,
    pub preferences: &'a dyn UserPreferences,
    pub activity: &'a dyn ActivityData,
}

/// A day's accumulated activity values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityTotals {
    pub calories: u32,
    pub steps: u32,
    /// Meters.
    pub distance: u32,
    /// Total active-zone minutes across all zones.
    pub active_zone_minutes: u32,
}

impl ActivityData for ActivityTotals {
    fn today(&self) -> ActivityTotals {
        *self
    }
}

/// Preferences fixed at startup, changeable only by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPreferences {
    pub clock_display: ClockDisplay,
}

impl UserPreferences for StaticPreferences {
    fn clock_display(&self) -> ClockDisplay {
        self.clock_display
    }
}

/// A sensor whose activation flag is shared with the host.
///
/// Clones observe the same flag, so the host can keep a handle while the
/// face owns another.
#[derive(Debug, Clone, Default)]
pub struct SimulatedHeartRateSensor {
    activated: Arc<AtomicBool>,
}

impl SimulatedHeartRateSensor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HeartRateSensor for SimulatedHeartRateSensor {
    fn start(&mut self) {
        self.activated.store(true, Ordering::Relaxed);
        info!("Heart-rate sensor started.");
    }

    fn stop(&mut self) {
        self.activated.store(false, Ordering::Relaxed);
        info!("Heart-rate sensor stopped.");
    }

    fn is_activated(&self) -> bool {
        self.activated.load(Ordering::Relaxed)
    }
}
