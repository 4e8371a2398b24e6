// core/src/api.rs
// JSON-grensesnittet mot presentasjonslaget. Tolerant inngang (aliaser,
// valgfrie felter), strengt validert før simulering.

use serde::{Deserialize, Serialize};
use serde_json::{self as json};
use serde_path_to_error as spte;

use crate::error::{Result, RideSimError};
use crate::models::{Fix, RideParams, RideSummary, SegmentRow};
use crate::pacing::Strategy;
use crate::track::validate_track;
use crate::{read_gpx_bytes, simulate_route};

// ──────────────────────────────────────────────────────────────────────────────
// INPUT
// ──────────────────────────────────────────────────────────────────────────────

/// Parametre slik klienten sender dem. Manglende felt → default.
#[derive(Debug, Default, Deserialize, Clone)]
struct ParamsInTol {
    #[serde(default, alias = "powerW", alias = "ftp", alias = "power")]
    power_w: Option<f64>,
    #[serde(default, alias = "riderMassKg", alias = "rider_weight_kg")]
    rider_mass_kg: Option<f64>,
    #[serde(default, alias = "bikeMassKg", alias = "bike_weight_kg")]
    bike_mass_kg: Option<f64>,
    #[serde(default, alias = "Crr")]
    crr: Option<f64>,
    #[serde(default, alias = "Cd")]
    cd: Option<f64>,
    #[serde(default, alias = "frontalAreaM2", alias = "area")]
    frontal_area_m2: Option<f64>,
    #[serde(default, alias = "airDensity", alias = "rho")]
    air_density: Option<f64>,
    #[serde(default)]
    strategy: Option<String>,

    // Valgfritt vær → lufttetthet (brukes bare hvis air_density mangler)
    #[serde(default)]
    air_temp_c: Option<f64>,
    #[serde(default, alias = "pressure_hpa")]
    air_pressure_hpa: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RouteRequest {
    #[serde(default)]
    fixes: Vec<Fix>,
    /// Rå GPX-tekst; brukes når `fixes` er tom.
    #[serde(default)]
    gpx: Option<String>,
    #[serde(default)]
    params: ParamsInTol,
}

fn to_core_params(p: ParamsInTol) -> Result<RideParams> {
    let d = RideParams::default();
    let strategy = match p.strategy.as_deref() {
        Some(s) => s.parse::<Strategy>()?,
        None => d.strategy,
    };
    let mut params = RideParams {
        power_w: p.power_w.unwrap_or(d.power_w),
        rider_mass_kg: p.rider_mass_kg.unwrap_or(d.rider_mass_kg),
        bike_mass_kg: p.bike_mass_kg.unwrap_or(d.bike_mass_kg),
        crr: p.crr.unwrap_or(d.crr),
        cd: p.cd.unwrap_or(d.cd),
        frontal_area_m2: p.frontal_area_m2.unwrap_or(d.frontal_area_m2),
        air_density: p.air_density.unwrap_or(d.air_density),
        strategy,
    };
    if p.air_density.is_none() {
        if let (Some(t), Some(hpa)) = (p.air_temp_c, p.air_pressure_hpa) {
            params = params.with_air_from_weather(t, hpa);
        }
    }
    params.validate()?;
    Ok(params)
}

fn parse_request(json_in: &str) -> Result<RouteRequest> {
    let de = &mut json::Deserializer::from_str(json_in);
    spte::deserialize(de)
        .map_err(|e| RideSimError::Json(format!("{} at '{}'", e.inner(), e.path())))
}

// ──────────────────────────────────────────────────────────────────────────────
// OUTPUT
// ──────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    pub summary: RideSummary,
    pub segments: Vec<SegmentRow>,
    pub stall_events: u64,
    pub strategy: Strategy,
}

/// JSON inn → JSON ut. Feilmeldinger bærer feltstien fra serde.
pub fn simulate_route_json(json_in: &str) -> Result<String> {
    let req = parse_request(json_in)?;

    // Sporet først, så parametre (samme rekkefølge som simulate_route)
    let fixes = match (req.fixes.is_empty(), req.gpx) {
        (false, _) => req.fixes,
        (true, Some(gpx)) => read_gpx_bytes(gpx.as_bytes())?,
        (true, None) => {
            return Err(RideSimError::MalformedTrack("request has neither fixes nor gpx".into()))
        }
    };
    validate_track(&fixes)?;
    let params = to_core_params(req.params)?;

    let outcome = simulate_route(&fixes, &params)?;
    let resp = RouteResponse {
        segments: outcome.rows(),
        summary: outcome.summary,
        stall_events: outcome.stall_events,
        strategy: params.strategy,
    };
    json::to_string(&resp).map_err(|e| RideSimError::Json(e.to_string()))
}

/// Pacing-tabellen for en strategi som JSON-liste av [gradient, multiplikator].
pub fn pacing_table_json(strategy: &str) -> Result<String> {
    let s: Strategy = strategy.parse()?;
    let entries: Vec<(i32, f64)> = s.table().entries().collect();
    json::to_string(&entries).map_err(|e| RideSimError::Json(e.to_string()))
}
