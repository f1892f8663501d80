//! Defines the event types flowing into and out of the clock face.
//!
//! Inbound events (`InputEvent`, `HeartRateReading`, and `TickEvent` from
//! the `time` module) are produced by the host and travel together as
//! `HostEvent`s. `SystemEvent`s report what the engine did with them.

use crate::time::TickEvent;
use std::sync::Arc;
use tokio::time::Instant;

/// Any event the host delivers to the face, in a single ordered stream.
#[derive(Debug, Clone)]
pub enum HostEvent {
    Tick(Arc<TickEvent>),
    Input(InputEvent),
    HeartRate(HeartRateReading),
}

/// User interaction with the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A tap on the element named `target`.
    Click { target: String },
}

/// A single sample from the heart-rate sensor.
#[derive(Debug, Clone, Copy)]
pub struct HeartRateReading {
    /// Beats per minute.
    pub heart_rate: u32,
    pub timestamp: Instant,
}

/// The host event that triggered a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCause {
    Tick,
    Click,
    HeartRate,
}

/// Events related to the lifecycle and state of the engine itself.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Fired once when the dispatcher begins accepting events.
    EngineStarted { timestamp: Instant },
    /// Fired after a handler changed what is on screen.
    Rendered { cause: RenderCause, writes: u64 },
    /// Fired when a handler returned an error. The engine keeps running.
    RenderFailed { cause: RenderCause, error: String },
    /// Fired when a tap lands outside the root element.
    InputDropped { target: String },
    /// Fired once when the engine's `run` loop is about to exit.
    EngineShutdown,
}
