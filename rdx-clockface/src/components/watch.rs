//! The root component of the clock face.

use crate::common::{ClockDisplay, Mode};
use crate::components::shadowed::ShadowedLabel;
use crate::components::stats::Stats;
use crate::error::FaceError;
use crate::events::HeartRateReading;
use crate::host::{DocumentTree, HeartRateSensor, HostContext};
use crate::time::TickEvent;
use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::debug;

const WEEK_DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Formats `date` as `HH:MM`, in 12-hour form when `display` asks for it.
pub fn format_time(date: &NaiveDateTime, display: ClockDisplay) -> String {
    let mut hours = date.hour();
    if display == ClockDisplay::TwelveHour {
        hours %= 12;
        if hours == 0 {
            hours = 12;
        }
    }
    format!("{:02}:{:02}", hours, date.minute())
}

/// Formats `date` as `Www DD`.
pub fn format_date(date: &NaiveDateTime) -> String {
    let week_day = WEEK_DAY_NAMES[date.weekday().num_days_from_sunday() as usize];
    format!("{} {:02}", week_day, date.day())
}

/// Time, date and the stats slot.
pub struct Watch {
    time_label: ShadowedLabel,
    date_label: ShadowedLabel,
    stats: Stats,
}

impl Watch {
    /// Resolves every element of the face and starts the heart-rate sensor.
    pub fn new(
        document: &dyn DocumentTree,
        sensor: Box<dyn HeartRateSensor>,
    ) -> Result<Self, FaceError> {
        Ok(Self {
            time_label: ShadowedLabel::new(document, "time")?,
            date_label: ShadowedLabel::new(document, "date")?,
            stats: Stats::new(document, sensor)?,
        })
    }

    pub fn with_initial_mode(mut self, mode: Mode) -> Self {
        self.stats.set_mode(mode);
        self
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn on_tick(&mut self, event: &TickEvent, ctx: &mut HostContext<'_>) -> Result<(), FaceError> {
        let time = format_time(&event.date, ctx.preferences.clock_display());
        let date = format_date(&event.date);
        debug!(%time, %date, "Tick #{}.", event.tick_count);

        self.time_label.set_text(ctx.document, &time);
        self.date_label.set_text(ctx.document, &date);
        self.stats.refresh(ctx)
    }

    pub fn on_click(&mut self, ctx: &mut HostContext<'_>) -> Result<(), FaceError> {
        self.stats.toggle_mode();
        self.stats.refresh(ctx)
    }

    pub fn on_heart_rate_reading(
        &mut self,
        reading: &HeartRateReading,
        ctx: &mut HostContext<'_>,
    ) -> Result<(), FaceError> {
        self.stats.on_heart_rate_reading(reading, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::host::{ActivityTotals, SimulatedHeartRateSensor, StaticPreferences};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const TODAY: ActivityTotals = ActivityTotals {
        calories: 512,
        steps: 4321,
        distance: 3050,
        active_zone_minutes: 7,
    };

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    fn new_watch(document: &Document) -> Watch {
        Watch::new(document, Box::new(SimulatedHeartRateSensor::new())).unwrap()
    }

    #[test]
    fn twelve_hour_clock_maps_midnight_and_noon_to_12() {
        let twelve = ClockDisplay::TwelveHour;
        assert_eq!(format_time(&at(2026, 1, 1, 0, 0), twelve), "12:00");
        assert_eq!(format_time(&at(2026, 1, 1, 12, 30), twelve), "12:30");
        assert_eq!(format_time(&at(2026, 1, 1, 13, 5), twelve), "01:05");
        assert_eq!(format_time(&at(2026, 1, 1, 23, 59), twelve), "11:59");
    }

    #[test]
    fn twenty_four_hour_clock_keeps_the_hour() {
        let day = ClockDisplay::TwentyFourHour;
        assert_eq!(format_time(&at(2026, 1, 1, 0, 0), day), "00:00");
        assert_eq!(format_time(&at(2026, 1, 1, 13, 5), day), "13:05");
    }

    #[test]
    fn date_is_weekday_and_padded_day() {
        // 2026-05-03 is a Sunday.
        assert_eq!(format_date(&at(2026, 5, 3, 8, 0)), "Sun 03");
        assert_eq!(format_date(&at(2026, 5, 9, 8, 0)), "Sat 09");
        assert_eq!(format_date(&at(2026, 5, 27, 8, 0)), "Wed 27");
    }

    #[test]
    fn tick_draws_time_date_and_stats() {
        let mut document = Document::clock_face();
        let preferences = StaticPreferences {
            clock_display: ClockDisplay::TwelveHour,
        };
        let mut watch = new_watch(&document);
        let tick = TickEvent {
            tick_count: 0,
            date: at(2026, 5, 3, 13, 5),
        };

        watch
            .on_tick(
                &tick,
                &mut HostContext {
                    document: &mut document,
                    preferences: &preferences,
                    activity: &TODAY,
                },
            )
            .unwrap();

        assert_eq!(document.text("timeLabelMain"), Some("01:05"));
        assert_eq!(document.text("timeLabelShadow"), Some("01:05"));
        assert_eq!(document.text("dateLabelMain"), Some("Sun 03"));
        assert_eq!(document.text("dateLabelShadow"), Some("Sun 03"));
        assert_eq!(document.text("statsLabelMain"), Some("512"));
        assert_eq!(document.href("statsIconMain"), Some("calories.png"));
    }

    #[test]
    fn click_advances_and_redraws_stats() {
        let mut document = Document::clock_face();
        let preferences = StaticPreferences::default();
        let mut watch = new_watch(&document).with_initial_mode(Mode::Steps);

        watch
            .on_click(&mut HostContext {
                document: &mut document,
                preferences: &preferences,
                activity: &TODAY,
            })
            .unwrap();

        assert_eq!(watch.stats().mode().unwrap(), Mode::Distance);
        assert_eq!(document.text("statsLabelShadow"), Some("3050"));
        assert_eq!(document.href("statsIconShadow"), Some("distance.png"));
        assert_eq!(document.text("timeLabelMain"), Some(""));
    }

    #[test]
    fn construction_fails_without_a_date_label() {
        let mut document = Document::new();
        document.insert("timeLabelMain", crate::document::ElementKind::Text);
        document.insert("timeLabelShadow", crate::document::ElementKind::Text);

        let result = Watch::new(&document, Box::new(SimulatedHeartRateSensor::new()));
        assert!(matches!(result, Err(FaceError::ElementNotFound(ref name)) if name == "dateLabelMain"));
    }
}
