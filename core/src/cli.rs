use std::fmt::Write;

use crate::models::SegmentRow;
use crate::RideOutcome;

/// Tekstrapport: overskrift + de første `max_rows` radene av ruteprofilen.
pub fn format_ride_report(outcome: &RideOutcome, max_rows: usize) -> String {
    let s = &outcome.summary;
    let mut out = String::new();

    let _ = writeln!(out, "--- Ride Report ---");
    let _ = writeln!(out, "Distance: {:.1} km", s.distance_km);
    let _ = writeln!(out, "Elevation gain: {} m", s.elevation_gain_m);
    let _ = writeln!(out, "Energy: {} kJ", s.energy_kj);
    let _ = writeln!(out, "Estimated time: {}", s.duration_text);
    if outcome.stall_events > 0 {
        let _ = writeln!(out, "Stall events: {}", outcome.stall_events);
    }

    let rows = outcome.rows();
    if rows.is_empty() || max_rows == 0 {
        return out;
    }
    let _ = writeln!(
        out,
        "{:>10} {:>10} {:>8} {:>7} {:>9} {:>8} {:>7}",
        "lat", "lon", "elev_m", "grad_%", "cum_km", "km/h", "watt"
    );
    for r in rows.iter().take(max_rows) {
        let _ = writeln!(out, "{}", format_row(r));
    }
    if rows.len() > max_rows {
        let _ = writeln!(out, "... ({} more segments)", rows.len() - max_rows);
    }
    out
}

fn format_row(r: &SegmentRow) -> String {
    format!(
        "{:>10.5} {:>10.5} {:>8.1} {:>7.1} {:>9.3} {:>8.1} {:>7.0}",
        r.latitude,
        r.longitude,
        r.elevation_m,
        r.gradient_pct,
        r.cumulative_distance_m / 1000.0,
        r.speed_kmh,
        r.power_w
    )
}

pub fn print_ride_report(outcome: &RideOutcome, max_rows: usize) {
    print!("{}", format_ride_report(outcome, max_rows));
}
