// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recurring maintenance windows
//!
//! A window opens every day (`"HH:MM"`) or every week (`"Tue HH:MM"`) in the
//! wall-clock time of the reference timestamp and stays open for a fixed
//! duration. The closing instant still counts as inside the window.

use chrono::{
    DateTime, Datelike, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Weekday,
};
use std::fmt;
use thiserror::Error;

/// Errors from parsing a maintenance window
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("invalid window start {0:?}: expected \"HH:MM\" or \"<day> HH:MM\"")]
    Fields(String),
    #[error("invalid time of day {0:?}")]
    TimeOfDay(String),
    #[error("invalid day of week {0:?}")]
    Weekday(String),
    #[error("invalid window length {input:?}: {reason}")]
    Duration { input: String, reason: String },
}

/// A single occurrence of a window
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Window<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// A window that recurs daily or weekly
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Periodic {
    weekday: Option<Weekday>,
    start: NaiveTime,
    length: TimeDelta,
}

impl Periodic {
    /// Parse a window from its start time and length
    ///
    /// `start` is `"HH:MM"` or `"<weekday> HH:MM"`; `length` is a humantime
    /// duration such as `"1h"` or `"1h30m"` and must be positive.
    pub fn parse(start: &str, length: &str) -> Result<Self, WindowError> {
        let length = parse_length(length)?;

        let fields: Vec<&str> = start.split_whitespace().collect();
        let (weekday, time) = match fields.as_slice() {
            [time] => (None, parse_time_of_day(time)?),
            [day, time] => (Some(parse_weekday(day)?), parse_time_of_day(time)?),
            _ => return Err(WindowError::Fields(start.to_string())),
        };

        Ok(Self {
            weekday,
            start: time,
            length,
        })
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.weekday
    }

    pub fn length(&self) -> TimeDelta {
        self.length
    }

    fn period(&self) -> TimeDelta {
        match self.weekday {
            Some(_) => TimeDelta::weeks(1),
            None => TimeDelta::days(1),
        }
    }

    /// The first window that ends at or after `from`
    pub fn next<Tz: TimeZone>(&self, from: &DateTime<Tz>) -> Window<Tz> {
        let local = from.naive_local();

        let mut date = local.date();
        if let Some(weekday) = self.weekday {
            let back =
                (7 + date.weekday().num_days_from_sunday() - weekday.num_days_from_sunday()) % 7;
            date = date - TimeDelta::days(i64::from(back));
        }

        let mut start = date.and_time(self.start);
        if start > local {
            start -= self.period();
        }
        if start + self.length < local {
            start += self.period();
        }

        let start = resolve_local(from, start);
        let end = start.clone() + self.length;
        Window { start, end }
    }

    /// Signed time from `from` until the next window opens
    ///
    /// Zero or negative means `from` is already inside a window.
    pub fn duration_to_start<Tz: TimeZone>(&self, from: &DateTime<Tz>) -> TimeDelta {
        self.next(from).start.signed_duration_since(from.clone())
    }
}

impl fmt::Display for Periodic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(day) = self.weekday {
            write!(f, "{} ", day)?;
        }
        let length = self
            .length
            .to_std()
            .map(|d| humantime::format_duration(d).to_string())
            .unwrap_or_default();
        write!(f, "{} for {}", self.start.format("%H:%M"), length)
    }
}

// Map a wall-clock time back into the zone of `reference`. Times that fall
// into a DST gap keep the reference's UTC offset.
fn resolve_local<Tz: TimeZone>(reference: &DateTime<Tz>, local: NaiveDateTime) -> DateTime<Tz> {
    let tz = reference.timezone();
    match tz.from_local_datetime(&local).earliest() {
        Some(resolved) => resolved,
        None => {
            let offset = TimeDelta::seconds(i64::from(reference.offset().fix().local_minus_utc()));
            tz.from_utc_datetime(&(local - offset))
        }
    }
}

fn parse_length(input: &str) -> Result<TimeDelta, WindowError> {
    let err = |reason: String| WindowError::Duration {
        input: input.to_string(),
        reason,
    };

    let length = humantime::parse_duration(input.trim()).map_err(|e| err(e.to_string()))?;
    if length.is_zero() {
        return Err(err("must be positive".to_string()));
    }
    TimeDelta::from_std(length).map_err(|e| err(e.to_string()))
}

fn parse_time_of_day(input: &str) -> Result<NaiveTime, WindowError> {
    let err = || WindowError::TimeOfDay(input.to_string());

    let (hour, minute) = input.split_once(':').ok_or_else(err)?;
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return Err(err());
    }
    if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(err());
    }

    let hour: u32 = hour.parse().map_err(|_| err())?;
    let minute: u32 = minute.parse().map_err(|_| err())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(err)
}

fn parse_weekday(input: &str) -> Result<Weekday, WindowError> {
    let day = match input.to_ascii_lowercase().as_str() {
        "sun" | "sunday" => Weekday::Sun,
        "mon" | "monday" => Weekday::Mon,
        "tue" | "tuesday" => Weekday::Tue,
        "wed" | "wednesday" => Weekday::Wed,
        "thu" | "thursday" => Weekday::Thu,
        "fri" | "friday" => Weekday::Fri,
        "sat" | "saturday" => Weekday::Sat,
        _ => return Err(WindowError::Weekday(input.to_string())),
    };
    Ok(day)
}

#[cfg(test)]
#[path = "window_tests.rs"]
mod tests;
