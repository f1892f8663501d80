//! The rotating stats slot.

use crate::common::Mode;
use crate::components::shadowed::{ShadowedIcon, ShadowedLabel};
use crate::error::FaceError;
use crate::events::HeartRateReading;
use crate::host::{ActivityData, DocumentTree, HeartRateSensor, HostContext};
use tracing::debug;

/// Visual padding in front of narrow values.
const NARROW_PREFIX: &str = "  ";

/// Shows one activity statistic at a time, with its icon.
///
/// The slot starts on [`Mode::Calories`] and advances one mode per
/// [`toggle_mode`](Stats::toggle_mode), wrapping after the last one. It owns
/// the heart-rate subscription: the sensor is started on construction and
/// is never stopped.
pub struct Stats {
    label: ShadowedLabel,
    icon: ShadowedIcon,
    current_mode_index: usize,
    sensor: Box<dyn HeartRateSensor>,
    heart_rate: Option<u32>,
}

impl Stats {
    pub fn new(
        document: &dyn DocumentTree,
        mut sensor: Box<dyn HeartRateSensor>,
    ) -> Result<Self, FaceError> {
        let label = ShadowedLabel::new(document, "stats")?;
        let icon = ShadowedIcon::new(document, "stats")?;
        sensor.start();
        Ok(Self {
            label,
            icon,
            current_mode_index: 0,
            sensor,
            heart_rate: None,
        })
    }

    /// Jumps straight to `mode`.
    pub fn set_mode(&mut self, mode: Mode) {
        self.current_mode_index = mode.index();
    }

    pub fn mode(&self) -> Result<Mode, FaceError> {
        Mode::from_index(self.current_mode_index)
            .ok_or_else(|| FaceError::UnknownMode(format!("#{}", self.current_mode_index)))
    }

    /// The most recent heart-rate reading, if one has arrived.
    pub fn heart_rate(&self) -> Option<u32> {
        self.heart_rate
    }

    /// The display string for the current mode.
    ///
    /// A heart rate that has not been read yet shows as `--`.
    pub fn value(&self, activity: &dyn ActivityData) -> Result<String, FaceError> {
        let today = activity.today();
        let value = match self.mode()? {
            Mode::Calories => today.calories.to_string(),
            Mode::Steps => today.steps.to_string(),
            Mode::Distance => today.distance.to_string(),
            Mode::HeartRate => match self.heart_rate {
                Some(bpm) => format!("{NARROW_PREFIX}{bpm}"),
                None => format!("{NARROW_PREFIX}--"),
            },
            Mode::ActiveZoneMinutes => {
                format!("{NARROW_PREFIX}{}", today.active_zone_minutes)
            }
        };
        Ok(value)
    }

    /// Redraws the icon and the value of the current mode.
    pub fn refresh(&self, ctx: &mut HostContext<'_>) -> Result<(), FaceError> {
        let mode = self.mode()?;
        let value = self.value(ctx.activity)?;
        self.icon.set_icon(ctx.document, &mode.icon());
        self.label.set_text(ctx.document, &value);
        debug!(%mode, %value, "Stats refreshed.");
        Ok(())
    }

    pub fn toggle_mode(&mut self) {
        self.current_mode_index = (self.current_mode_index + 1) % Mode::ALL.len();
        if let Ok(mode) = self.mode() {
            debug!(%mode, "Stats mode changed.");
        }
    }

    /// Records a sensor reading and redraws if heart rate is on screen.
    ///
    /// Readings delivered while the sensor is stopped are ignored.
    pub fn on_heart_rate_reading(
        &mut self,
        reading: &HeartRateReading,
        ctx: &mut HostContext<'_>,
    ) -> Result<(), FaceError> {
        if !self.sensor.is_activated() {
            return Ok(());
        }
        self.heart_rate = Some(reading.heart_rate);
        if matches!(self.mode(), Ok(Mode::HeartRate)) {
            self.refresh(ctx)?;
        }
        Ok(())
    }
}
