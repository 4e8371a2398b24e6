//! Track Reader: gjør en opptatt rute (GPX eller ferdige punkter) om til
//! en validert sekvens av [`Fix`].

use std::io::Read;
use std::path::Path;

use gpx::{read, Gpx};
use log::{debug, info};

use crate::error::{Result, RideSimError};
use crate::models::Fix;

/// Minste antall fixes for å kunne lage ett segment.
pub const MIN_FIXES: usize = 2;

/// Sjekker at sporet kan segmenteres: minst to fixes og bare endelige tall.
pub fn validate_track(fixes: &[Fix]) -> Result<()> {
    if fixes.len() < MIN_FIXES {
        return Err(RideSimError::MalformedTrack(format!(
            "need at least {MIN_FIXES} fixes, got {}",
            fixes.len()
        )));
    }
    if let Some((i, bad)) = fixes.iter().enumerate().find(|(_, f)| !f.is_finite()) {
        return Err(RideSimError::MalformedTrack(format!(
            "fix {i} has non-finite value (lat={}, lon={}, elev={})",
            bad.latitude, bad.longitude, bad.elevation
        )));
    }
    Ok(())
}

/// (lat, lon, elev)-tupler → validerte fixes.
pub fn fixes_from_points(points: &[(f64, f64, f64)]) -> Result<Vec<Fix>> {
    let fixes: Vec<Fix> = points
        .iter()
        .map(|&(lat, lon, elev)| Fix::new(lat, lon, elev))
        .collect();
    validate_track(&fixes)?;
    Ok(fixes)
}

/// Leser GPX fra en vilkårlig `Read`. Alle tracks → alle segmenter → alle
/// punkter, i rekkefølge. Punkter uten høyde gir `MalformedTrack`.
pub fn read_gpx<R: Read>(reader: R) -> Result<Vec<Fix>> {
    let gpx: Gpx = read(reader)?;
    let fixes = extract_fixes(&gpx)?;
    validate_track(&fixes)?;
    info!("read {} fixes from {} GPX track(s)", fixes.len(), gpx.tracks.len());
    Ok(fixes)
}

pub fn read_gpx_bytes(data: &[u8]) -> Result<Vec<Fix>> {
    read_gpx(std::io::Cursor::new(data))
}

pub fn read_gpx_file(path: impl AsRef<Path>) -> Result<Vec<Fix>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| RideSimError::Gpx(format!("{}: {e}", path.display())))?;
    debug!("opening GPX {}", path.display());
    read_gpx(std::io::BufReader::new(file))
}

fn extract_fixes(gpx: &Gpx) -> Result<Vec<Fix>> {
    let mut fixes = Vec::new();
    for track in &gpx.tracks {
        for segment in &track.segments {
            for waypoint in &segment.points {
                let point = waypoint.point();
                let elevation = waypoint.elevation.ok_or_else(|| {
                    RideSimError::MalformedTrack(format!(
                        "track point {} ({:.6}, {:.6}) has no elevation",
                        fixes.len(),
                        point.y(),
                        point.x()
                    ))
                })?;
                fixes.push(Fix::new(point.y(), point.x(), elevation));
            }
        }
    }
    if fixes.is_empty() {
        return Err(RideSimError::MalformedTrack("no track points found in GPX".into()));
    }
    Ok(fixes)
}
