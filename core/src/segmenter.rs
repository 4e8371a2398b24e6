// core/src/segmenter.rs
use geo::{Distance, Geodesic, Point};
use log::debug;

use crate::error::Result;
use crate::models::{Fix, Segment};
use crate::physics::RoundTo;
use crate::track::validate_track;

/// Geodetisk avstand (WGS84-ellipsoide) mellom to fixes, i meter.
#[inline]
pub fn geodesic_distance_m(a: &Fix, b: &Fix) -> f64 {
    // geo bruker (x, y) = (lon, lat)
    let p1 = Point::new(a.longitude, a.latitude);
    let p2 = Point::new(b.longitude, b.latitude);
    Geodesic::distance(p1, p2)
}

/// Gradient i prosent, 1 desimal. 0 når distansen er 0.
#[inline]
pub fn gradient_pct(elevation_delta_m: f64, distance_m: f64) -> f64 {
    if distance_m == 0.0 {
        return 0.0;
    }
    (elevation_delta_m / distance_m * 100.0).round_to(1)
}

/// N fixes → N−1 segmenter med kumulativ distanse.
pub fn segment_track(fixes: &[Fix]) -> Result<Vec<Segment>> {
    validate_track(fixes)?;

    let mut out = Vec::with_capacity(fixes.len() - 1);
    let mut cumulative = 0.0;

    for (i, pair) in fixes.windows(2).enumerate() {
        let (prev, curr) = (&pair[0], &pair[1]);
        let distance_m = geodesic_distance_m(prev, curr);
        let elevation_delta_m = curr.elevation - prev.elevation;
        cumulative += distance_m;

        out.push(Segment {
            index: i + 1,
            end: *curr,
            distance_m,
            elevation_delta_m,
            gradient_pct: gradient_pct(elevation_delta_m, distance_m),
            cumulative_distance_m: cumulative,
        });
    }

    debug!("segmented {} fixes into {} segments ({:.1} m)", fixes.len(), out.len(), cumulative);
    Ok(out)
}
