//! # Time system
//!
//! Julian Day ↔ calendar conversion, calendar arithmetic on [`Epoch`] values and the
//! fixed menu of animation steps.
//!
//! An [`Epoch`] is an immutable Julian Day together with its Gregorian calendar
//! breakdown. Every operation returns a new value; nothing is updated in place.
//! The calendar side goes through `hifitime` (proleptic Gregorian, TAI); the
//! fractional day of month is kept on top of it.
//!
//! ## Calendar arithmetic
//!
//! [`Epoch::apply_delta`] applies the calendar part of a [`TimeDelta`] (years, months)
//! first, keeping the day of month, then adds the sub-calendar part (days, hours,
//! minutes, seconds) to the Julian Day. A day of month that does not exist in the
//! target month rolls over into the following month (Jan 31 + 1 month = Mar 3 or
//! Mar 2), the same way the Julian Day formula itself does.
//!
//! ## Supported range
//!
//! The viewer works inside `[1600-01-01, 2200-01-01]`; [`Epoch::clamp_to_supported`]
//! maps anything outside to the nearest bound.
use std::fmt;

use hifitime::TimeScale;
use serde::Deserialize;

use crate::constants::{JulianDay, Radian, DAYS_PER_CENTURY, JD2000, MAX_YEAR, MIN_YEAR};
use crate::ref_system::obleq;

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Largest |JD| given a calendar breakdown; beyond it the date saturates.
const CALENDAR_JD_LIMIT: JulianDay = 5.0e7;

/// Largest |year| accepted when building a Julian Day from a calendar date.
const CALENDAR_YEAR_LIMIT: i32 = 250_000;

/// Gregorian calendar date with a fractional day of month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarDate {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    /// Day of month including the fraction of day (1.0 ≤ day < 32.0)
    pub day: f64,
}

impl CalendarDate {
    pub fn day_of_month(&self) -> u32 {
        self.day.floor() as u32
    }

    pub fn day_fraction(&self) -> f64 {
        self.day - self.day.floor()
    }

    /// Three-letter English abbreviation of the month ("Jan".."Dec").
    pub fn month_abbr(&self) -> &'static str {
        MONTH_ABBR[(self.month.clamp(1, 12) - 1) as usize]
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {}",
            self.month_abbr(),
            self.day_of_month(),
            self.year
        )
    }
}

/// Julian Day of 0h on the first day of a month.
///
/// `months` counts months from year 0 (`year · 12 + month − 1`), so out-of-range
/// months roll over into the neighbouring years. The date is proleptic Gregorian and
/// read in TAI, which keeps the conversion free of leap seconds.
fn month_start(months: i32) -> JulianDay {
    let year = months
        .div_euclid(12)
        .clamp(-CALENDAR_YEAR_LIMIT, CALENDAR_YEAR_LIMIT);
    let month = (months.rem_euclid(12) + 1) as u8;
    let jd = hifitime::Epoch::from_gregorian_at_midnight(year, month, 1, TimeScale::TAI)
        .to_jde_tai_days();
    // 0h always falls on a half Julian Day
    (jd - 0.5).round() + 0.5
}

fn month_index(year: i32, month: u32) -> i32 {
    let year = year.clamp(-CALENDAR_YEAR_LIMIT, CALENDAR_YEAR_LIMIT);
    let month = month.min(12 * CALENDAR_YEAR_LIMIT as u32) as i32;
    year * 12 + month - 1
}

/// Julian Day of a calendar date with a fractional day of month.
///
/// `day` may exceed the length of the month, in which case the result lies in the
/// following month.
fn julian_day(year: i32, month: u32, day: f64) -> JulianDay {
    month_start(month_index(year, month)) + day - 1.0
}

/// Inverse of [`julian_day`].
fn calendar_date(jd: JulianDay) -> CalendarDate {
    let jd = if jd.is_nan() {
        JD2000
    } else {
        jd.clamp(-CALENDAR_JD_LIMIT, CALENDAR_JD_LIMIT)
    };

    let (year, month, ..) = hifitime::Epoch::from_jde_tai(jd).to_gregorian_tai();
    let mut months = month_index(year, u32::from(month));

    // The breakdown rounds to the nanosecond; settle the month on the JD itself.
    if jd < month_start(months) {
        months -= 1;
    } else if month_start(months + 1) <= jd {
        months += 1;
    }

    CalendarDate {
        year: months.div_euclid(12),
        month: (months.rem_euclid(12) + 1) as u32,
        day: 1.0 + (jd - month_start(months)),
    }
}

/// A point in time: Julian Day plus its calendar breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Epoch {
    jd: JulianDay,
    date: CalendarDate,
}

impl Epoch {
    pub fn from_jd(jd: JulianDay) -> Self {
        Epoch {
            jd,
            date: calendar_date(jd),
        }
    }

    /// Build an epoch from a calendar date with a fractional day of month.
    pub fn from_calendar(year: i32, month: u32, fractional_day: f64) -> Self {
        Epoch::from_jd(julian_day(year, month, fractional_day))
    }

    /// Parse the host's numeric `YYYYMMDD.fraction` date format.
    ///
    /// Arguments
    /// ---------
    /// * `ymd`: e.g. `19860209.7695` for 1986-02-09 18:28:05
    ///
    /// Return
    /// ------
    /// * The corresponding epoch (not clamped).
    pub fn from_ymd_decimal(ymd: f64) -> Self {
        let year = (ymd / 10000.0).floor();
        let rest = ymd - year * 10000.0;
        let month = (rest / 100.0).floor();
        let day = rest - month * 100.0;
        Epoch::from_calendar(year as i32, month as u32, day)
    }

    /// Validate a date typed in the date-entry dialog.
    ///
    /// Returns `None` when the year is outside 1600..=2199, the month outside 1..=12
    /// or the day outside 1..=31.
    pub fn from_date_entry(year: i32, month: u32, day: u32) -> Option<Self> {
        let valid = (MIN_YEAR..MAX_YEAR).contains(&year)
            && (1..=12).contains(&month)
            && (1..=31).contains(&day);
        valid.then(|| Epoch::from_calendar(year, month, day as f64))
    }

    /// Current date from the system clock, truncated to 0h UTC like the viewer's
    /// start-up date.
    pub fn now() -> Self {
        match hifitime::Epoch::now() {
            Ok(now) => {
                let date = Epoch::from(now).to_calendar();
                Epoch::from_calendar(date.year, date.month, date.day.floor())
            }
            Err(err) => {
                log::warn!("system clock unavailable ({err}), starting at J2000");
                Epoch::from_jd(JD2000)
            }
        }
    }

    pub fn jd(&self) -> JulianDay {
        self.jd
    }

    pub fn to_calendar(&self) -> CalendarDate {
        self.date
    }

    /// Julian centuries elapsed since J2000.0.
    pub fn centuries_since_j2000(&self) -> f64 {
        (self.jd - JD2000) / DAYS_PER_CENTURY
    }

    /// Shift the epoch by `delta` in the given direction.
    ///
    /// Years and months are applied on the calendar first, then the day-level part
    /// is added to the Julian Day. The delta itself is left untouched.
    pub fn apply_delta(&self, delta: &TimeDelta, direction: Direction) -> Epoch {
        let sign = direction.sign();
        let mut jd = self.jd;

        let month_shift = delta.years * 12 + delta.months;
        if month_shift != 0 {
            let months = month_index(self.date.year, self.date.month) + sign * month_shift;
            jd = month_start(months) + self.date.day - 1.0;
        }

        jd += sign as f64 * delta.day_span();
        Epoch::from_jd(jd)
    }

    pub fn clamp(&self, min: &Epoch, max: &Epoch) -> Epoch {
        if self.jd <= min.jd {
            *min
        } else if max.jd <= self.jd {
            *max
        } else {
            *self
        }
    }

    /// Bounds of the supported calendar range.
    pub fn supported_range() -> (Epoch, Epoch) {
        (
            Epoch::from_calendar(MIN_YEAR, 1, 1.0),
            Epoch::from_calendar(MAX_YEAR, 1, 1.0),
        )
    }

    pub fn is_within_supported(&self) -> bool {
        let (min, max) = Epoch::supported_range();
        min.jd < self.jd && self.jd < max.jd
    }

    /// Clamp to the supported range, never failing.
    pub fn clamp_to_supported(&self) -> Epoch {
        let (min, max) = Epoch::supported_range();
        let clamped = self.clamp(&min, &max);
        if clamped.jd != self.jd {
            log::debug!("epoch JD {} clamped to JD {}", self.jd, clamped.jd);
        }
        clamped
    }
}

impl From<hifitime::Epoch> for Epoch {
    fn from(epoch: hifitime::Epoch) -> Self {
        Epoch::from_jd(epoch.to_jde_utc_days())
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (JD {:.4})", self.date, self.jd)
    }
}

/// Mean obliquity of the ecliptic at `epoch`.
pub fn mean_obliquity(epoch: &Epoch) -> Radian {
    obleq(epoch.jd())
}

/// Direction of time for steps and playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    pub fn reversed(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Calendar offset. Years and months are calendar units, the rest is a plain span.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct TimeDelta {
    pub years: i32,
    pub months: i32,
    pub days: i32,
    pub hours: i32,
    pub minutes: i32,
    pub seconds: f64,
}

impl TimeDelta {
    pub fn years(years: i32) -> Self {
        TimeDelta {
            years,
            ..Default::default()
        }
    }

    pub fn months(months: i32) -> Self {
        TimeDelta {
            months,
            ..Default::default()
        }
    }

    pub fn days(days: i32) -> Self {
        TimeDelta {
            days,
            ..Default::default()
        }
    }

    pub fn hours(hours: i32) -> Self {
        TimeDelta {
            hours,
            ..Default::default()
        }
    }

    /// Length of the day-level part in days.
    pub fn day_span(&self) -> f64 {
        self.days as f64
            + self.hours as f64 / 24.0
            + self.minutes as f64 / 1440.0
            + self.seconds / 86400.0
    }
}

/// The fixed menu of animation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum TimeStep {
    OneHour,
    #[default]
    OneDay,
    ThreeDays,
    TenDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl TimeStep {
    pub const ALL: [TimeStep; 8] = [
        TimeStep::OneHour,
        TimeStep::OneDay,
        TimeStep::ThreeDays,
        TimeStep::TenDays,
        TimeStep::OneMonth,
        TimeStep::ThreeMonths,
        TimeStep::SixMonths,
        TimeStep::OneYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeStep::OneHour => "1 Hour",
            TimeStep::OneDay => "1 Day",
            TimeStep::ThreeDays => "3 Days",
            TimeStep::TenDays => "10 Days",
            TimeStep::OneMonth => "1 Month",
            TimeStep::ThreeMonths => "3 Months",
            TimeStep::SixMonths => "6 Months",
            TimeStep::OneYear => "1 Year",
        }
    }

    pub fn from_label(label: &str) -> Option<TimeStep> {
        TimeStep::ALL.into_iter().find(|step| step.label() == label)
    }

    pub fn delta(self) -> TimeDelta {
        match self {
            TimeStep::OneHour => TimeDelta::hours(1),
            TimeStep::OneDay => TimeDelta::days(1),
            TimeStep::ThreeDays => TimeDelta::days(3),
            TimeStep::TenDays => TimeDelta::days(10),
            TimeStep::OneMonth => TimeDelta::months(1),
            TimeStep::ThreeMonths => TimeDelta::months(3),
            TimeStep::SixMonths => TimeDelta::months(6),
            TimeStep::OneYear => TimeDelta::years(1),
        }
    }
}
