//! # Clockface
//!
//! An event-driven clock face for wearable displays.
//!
//! Clockface renders the time, the date and one of five rotating activity
//! statistics onto a host-provided document tree. All of its logic runs in
//! response to host events, one event at a time.
//!
//! ## Core Concepts
//!
//! - **Shadowed elements**: every visible value is drawn twice, once on a
//!   "main" element and once on an offset "shadow" element. `ShadowedLabel`
//!   and `ShadowedIcon` keep both copies in lockstep.
//! - **Stats**: a rotating slot that cycles through calories, heart rate,
//!   steps, distance and active-zone minutes on every tap.
//! - **Watch**: the root component. It reacts to clock ticks, taps and
//!   heart-rate readings.
//! - **Host**: everything the face does not own (the document tree, user
//!   preferences, activity totals, the heart-rate sensor) is reached through
//!   the traits in [`host`]. The [`engine::FaceEngine`] is a complete
//!   simulated host built on tokio.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use clockface::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // 1. Load the configuration (optional file plus CLOCKFACE_* overrides).
//!     let config = FaceConfig::load(None)?;
//!
//!     // 2. Create the engine with the standard clock-face layout.
//!     let engine = FaceEngine::new(config);
//!
//!     // 3. Subscribe before starting so no event is missed.
//!     let mut system_events = engine.subscribe_system_events();
//!     tokio::spawn(async move {
//!         while let Ok(event) = system_events.recv().await {
//!             println!("Received System Event: {:?}", event);
//!         }
//!     });
//!
//!     // 4. Run until Ctrl+C.
//!     engine.run().await?;
//!
//!     Ok(())
//! }
//! ```

pub const FACE_NAME: &str = "Clockface";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod common;
pub mod components;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod time;

/// A prelude module for easy importing of the most common Clockface types.
pub mod prelude {
    pub use crate::common::{ClockDisplay, ElementId, Mode};
    pub use crate::components::stats::Stats;
    pub use crate::components::watch::Watch;
    pub use crate::config::{ClockGranularity, FaceConfig};
    pub use crate::document::Document;
    pub use crate::engine::FaceEngine;
    pub use crate::error::FaceError;
    pub use crate::events::{HeartRateReading, HostEvent, InputEvent, RenderCause, SystemEvent};
    pub use crate::host::{
        ActivityData, ActivityTotals, DocumentTree, HeartRateSensor, HostContext,
        UserPreferences,
    };
    pub use crate::time::TickEvent;
}
