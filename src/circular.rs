//! Circular mean of clock times
//!
//! The arithmetic mean of clock times is wrong across midnight (23:00 and
//! 01:00 average to 12:00, not 00:00). Mapping each time-of-day onto the
//! 24-hour circle and averaging the angles gives the correct value.

use std::f64::consts::TAU;

use chrono::{DateTime, Local, Timelike};

/// Average clock time of a set of instants, formatted as zero-padded `HH:MM`.
///
/// Each instant's time-of-day becomes an angle on the 24-hour circle
/// (`(hour + minute/60) / 24 * 2π`); the mean direction of the unit vectors is
/// converted back to hours. An empty input returns `"00:00"` by convention.
pub fn mean_clock_time(times: &[DateTime<Local>]) -> String {
    if times.is_empty() {
        return "00:00".to_string();
    }

    let mut sin_sum = 0.0;
    let mut cos_sum = 0.0;
    for t in times {
        let angle = (f64::from(t.hour()) + f64::from(t.minute()) / 60.0) / 24.0 * TAU;
        sin_sum += angle.sin();
        cos_sum += angle.cos();
    }

    let n = times.len() as f64;
    let mut mean_angle = (sin_sum / n).atan2(cos_sum / n);
    if mean_angle < 0.0 {
        mean_angle += TAU;
    }

    let hours = mean_angle / TAU * 24.0;
    let mut h = hours.floor() as u32;
    let mut m = ((hours - hours.floor()) * 60.0).round() as u32;
    if m == 60 {
        m = 0;
        h += 1;
    }
    format!("{:02}:{:02}", h % 24, m)
}
