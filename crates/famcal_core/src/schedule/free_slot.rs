//! Earliest-free-slot search used by reschedule suggestions.

use crate::schedule::interval::{overlaps, to_interval, EventInterval};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Daily bounds within which rescheduled events may be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for DayWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(7, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
        }
    }
}

/// Search parameters for one free-slot lookup.
#[derive(Debug, Clone, Copy)]
pub struct SlotQuery {
    pub date: NaiveDate,
    pub duration_minutes: i64,
    /// No slot may start before this instant.
    pub not_before: NaiveDateTime,
    pub window: DayWindow,
    pub step_minutes: i64,
}

/// Returns the earliest start on `query.date` that avoids every `busy` interval.
///
/// Candidate starts are aligned to `step_minutes` from the window start.
/// Returns `None` when no slot fits before the window end.
pub fn find_free_slot(query: &SlotQuery, busy: &[EventInterval]) -> Option<NaiveDateTime> {
    if query.step_minutes <= 0 || query.duration_minutes <= 0 {
        return None;
    }
    let window_start = query.date.and_time(query.window.start);
    let window_end = query.date.and_time(query.window.end);

    let mut start = window_start;
    if query.not_before > window_start {
        let offset = (query.not_before - window_start).num_minutes();
        let steps = offset.checked_add(query.step_minutes - 1)? / query.step_minutes;
        start = to_interval(window_start, steps.checked_mul(query.step_minutes)?)?.end;
    }

    loop {
        let slot = to_interval(start, query.duration_minutes)?;
        if slot.end > window_end {
            return None;
        }
        if !busy.iter().any(|taken| overlaps(&slot, taken)) {
            return Some(slot.start);
        }
        start = to_interval(start, query.step_minutes)?.end;
    }
}

#[cfg(test)]
mod tests {
    use super::{find_free_slot, DayWindow, SlotQuery};
    use crate::schedule::interval::{parse_date, parse_time_of_day, to_interval, EventInterval};
    use chrono::NaiveDateTime;

    fn at(time: &str) -> NaiveDateTime {
        parse_date("2025-09-04")
            .expect("date")
            .and_time(parse_time_of_day(time).expect("time"))
    }

    fn busy(time: &str, minutes: i64) -> EventInterval {
        to_interval(at(time), minutes).expect("interval")
    }

    fn query(not_before: &str, minutes: i64) -> SlotQuery {
        SlotQuery {
            date: parse_date("2025-09-04").expect("date"),
            duration_minutes: minutes,
            not_before: at(not_before),
            window: DayWindow {
                start: parse_time_of_day("07:00").expect("time"),
                end: parse_time_of_day("22:00").expect("time"),
            },
            step_minutes: 15,
        }
    }

    #[test]
    fn finds_slot_right_after_busy_block() {
        let slot = find_free_slot(&query("15:00", 60), &[busy("14:30", 30)]);
        assert_eq!(slot, Some(at("15:00")));
    }

    #[test]
    fn aligns_to_step_grid() {
        let slot = find_free_slot(&query("15:05", 30), &[]);
        assert_eq!(slot, Some(at("15:15")));
    }

    #[test]
    fn skips_over_busy_blocks() {
        let slot = find_free_slot(
            &query("09:00", 60),
            &[busy("09:00", 90), busy("10:45", 30)],
        );
        assert_eq!(slot, Some(at("11:15")));
    }

    #[test]
    fn oversized_step_returns_none_instead_of_overflowing() {
        let mut oversized = query("15:05", 30);
        oversized.step_minutes = i64::MAX;
        assert_eq!(find_free_slot(&oversized, &[]), None);

        oversized.step_minutes = i64::MAX / 2;
        assert_eq!(find_free_slot(&oversized, &[]), None);
    }

    #[test]
    fn returns_none_when_day_is_full() {
        assert_eq!(find_free_slot(&query("21:30", 60), &[]), None);
        assert_eq!(find_free_slot(&query("07:00", 60), &[busy("07:00", 900)]), None);
    }

    #[test]
    fn starts_at_window_when_not_before_is_earlier() {
        let slot = find_free_slot(&query("05:00", 30), &[]);
        assert_eq!(slot, Some(at("07:00")));
    }
}
