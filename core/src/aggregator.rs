// core/src/aggregator.rs
use chrono::Duration;
use log::info;

use crate::models::{RideState, RideSummary, Segment, SegmentRow};
use crate::physics::RoundTo;

/// Fast buffer lagt til total kjøretid i visningen (pauser, stopp).
pub const TRIP_BUFFER_S: f64 = 60.0;

/// Løpende sum av segmenttid.
pub fn cumulative_times(states: &[RideState]) -> Vec<f64> {
    states
        .iter()
        .scan(0.0, |acc, s| {
            *acc += s.elapsed_s;
            Some(*acc)
        })
        .collect()
}

/// Σ P·t / 1000, avrundet til hele kJ.
pub fn total_energy_kj(states: &[RideState]) -> i64 {
    let joules: f64 = states.iter().map(|s| s.target_power_w * s.elapsed_s).sum();
    (joules / 1000.0).round() as i64
}

/// Σ distanse·gradient/100 over stigende segmenter, trunkert.
pub fn elevation_gain_m(segments: &[Segment]) -> i64 {
    segments
        .iter()
        .filter(|s| s.gradient_pct > 0.0)
        .map(|s| s.distance_m * s.gradient_pct / 100.0)
        .sum::<f64>()
        .trunc() as i64
}

fn plural(n: i64, word: &str) -> String {
    if n == 1 { format!("{n} {word}") } else { format!("{n} {word}s") }
}

/// "H hour(s) and M minute(s)" fra 3600 s og oppover, ellers "M minute(s)".
pub fn format_duration(total_s: f64) -> String {
    let d = Duration::milliseconds((total_s.max(0.0) * 1000.0) as i64);
    let hours = d.num_hours();
    let minutes = d.num_minutes() - hours * 60;
    if d.num_seconds() >= 3600 {
        format!("{} and {}", plural(hours, "hour"), plural(minutes, "minute"))
    } else {
        plural(minutes, "minute")
    }
}

/// Bygger det endelige sammendraget. Forutsetter at hele ruten er integrert.
pub fn summarize(segments: &[Segment], states: &[RideState]) -> RideSummary {
    let total_time_s = cumulative_times(states).last().copied().unwrap_or(0.0);
    let distance_m = segments.last().map_or(0.0, |s| s.cumulative_distance_m);

    let summary = RideSummary {
        total_time_s,
        duration_text: format_duration(total_time_s + TRIP_BUFFER_S),
        energy_kj: total_energy_kj(states),
        elevation_gain_m: elevation_gain_m(segments),
        distance_km: (distance_m / 1000.0).round_to(1),
    };
    info!(
        "ride summary: {} km, {} m climb, {} kJ, {}",
        summary.distance_km, summary.elevation_gain_m, summary.energy_kj, summary.duration_text
    );
    summary
}

/// Ruteprofilen som presentasjonslaget tegner (én rad per segment).
pub fn profile_rows(segments: &[Segment], states: &[RideState]) -> Vec<SegmentRow> {
    let cumulative = cumulative_times(states);
    segments
        .iter()
        .zip(states.iter())
        .zip(cumulative)
        .map(|((seg, st), t)| SegmentRow::new(seg, st, t))
        .collect()
}
