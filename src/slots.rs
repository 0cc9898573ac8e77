//! Free-slot aggregation: turns the flat slot list produced by the
//! schedule analysis service into day-grouped, duration-annotated view
//! models plus summary statistics.
//!
//! All functions here are pure; bad upstream data (missing times, inverted
//! ranges) degrades to zero or negative durations, never to an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical weekday order used for group sorting.
pub const DAYS_OF_WEEK: [&str; 7] = [
    "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche",
];

/// Group label for slots whose weekday the analyzer could not determine.
pub const UNSPECIFIED_DAY: &str = "Non spécifié";

/// One free interval detected in an uploaded schedule. Field names follow
/// the analyzer's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeSlot {
    #[serde(rename = "jour_semaine", default)]
    pub weekday: Option<String>,
    #[serde(rename = "heure_debut", default)]
    pub start_time: String,
    #[serde(rename = "heure_fin", default)]
    pub end_time: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub slot_type: Option<String>,
}

impl FreeSlot {
    pub fn duration_hours(&self) -> f64 {
        duration_hours(&self.start_time, &self.end_time)
    }
}

/// Quality classification of a slot by duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationClass {
    /// Under an hour: quick review material.
    Short,
    /// One to two hours: revisions and exercises.
    Medium,
    /// Two hours or more: deep-work study blocks.
    Long,
}

impl DurationClass {
    /// Boundaries are inclusive on the lower classification: exactly 2.0
    /// is `Long`, exactly 1.0 is `Medium`.
    pub fn classify(hours: f64) -> Self {
        if hours >= 2.0 {
            DurationClass::Long
        } else if hours >= 1.0 {
            DurationClass::Medium
        } else {
            DurationClass::Short
        }
    }
}

/// Slots bucketed under a single weekday label, sorted by start time.
#[derive(Debug, Clone)]
pub struct DayGroup {
    pub day: String,
    pub slots: Vec<FreeSlot>,
    pub total_hours: f64,
}

/// Aggregate statistics over the whole slot list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlotSummary {
    pub count: usize,
    pub total_hours: f64,
    pub avg_hours: f64,
    pub long_count: usize,
}

/// Fractional hours between two `HH:MM` wall-clock times. Missing or
/// unparseable operands yield 0; an inverted range yields a negative value
/// surfaced as-is (upstream data-quality issue, not corrected here).
pub fn duration_hours(start: &str, end: &str) -> f64 {
    match (parse_minutes(start), parse_minutes(end)) {
        (Some(start_min), Some(end_min)) => f64::from(end_min - start_min) / 60.0,
        _ => 0.0,
    }
}

fn parse_minutes(time: &str) -> Option<i32> {
    let (hours, minutes) = time.split_once(':')?;
    let hours: i32 = hours.trim().parse().ok()?;
    let minutes: i32 = minutes.trim().parse().ok()?;
    Some(hours * 60 + minutes)
}

/// Group slots by weekday, each group sorted ascending by start time
/// (lexicographic works on zero-padded `HH:MM`), groups ordered
/// Lundi..Dimanche with non-canonical labels last.
pub fn group_by_weekday(slots: &[FreeSlot]) -> Vec<DayGroup> {
    let mut by_day: HashMap<String, Vec<FreeSlot>> = HashMap::new();
    for slot in slots {
        let day = slot
            .weekday
            .clone()
            .unwrap_or_else(|| UNSPECIFIED_DAY.to_string());
        by_day.entry(day).or_default().push(slot.clone());
    }

    let mut groups: Vec<DayGroup> = by_day
        .into_iter()
        .map(|(day, mut slots)| {
            slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));
            let total_hours = slots.iter().map(FreeSlot::duration_hours).sum();
            DayGroup {
                day,
                slots,
                total_hours,
            }
        })
        .collect();

    groups.sort_by(|a, b| {
        day_index(&a.day)
            .cmp(&day_index(&b.day))
            .then_with(|| a.day.cmp(&b.day))
    });
    groups
}

fn day_index(day: &str) -> usize {
    DAYS_OF_WEEK
        .iter()
        .position(|d| *d == day)
        .unwrap_or(DAYS_OF_WEEK.len())
}

/// Totals over the flat list. Empty input is all zeros, not an error.
pub fn summarize(slots: &[FreeSlot]) -> SlotSummary {
    if slots.is_empty() {
        return SlotSummary::default();
    }

    let durations: Vec<f64> = slots.iter().map(FreeSlot::duration_hours).collect();
    let total_hours: f64 = durations.iter().sum();
    let long_count = durations
        .iter()
        .filter(|hours| DurationClass::classify(**hours) == DurationClass::Long)
        .count();

    SlotSummary {
        count: slots.len(),
        total_hours,
        avg_hours: total_hours / slots.len() as f64,
        long_count,
    }
}

/// Human display of a fractional-hour duration: `"45 min"`, `"2h"`,
/// `"1h30"`.
pub fn format_duration(hours: f64) -> String {
    if hours < 1.0 {
        return format!("{} min", (hours * 60.0).round() as i64);
    }
    let whole = hours.floor() as i64;
    let minutes = ((hours - hours.floor()) * 60.0).round() as i64;
    if minutes > 0 {
        format!("{whole}h{minutes:02}")
    } else {
        format!("{whole}h")
    }
}
