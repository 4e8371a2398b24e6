use serde::{Deserialize, Serialize};

use crate::error::{Result, RideSimError};
use crate::pacing::Strategy;
use crate::physics::{air_density, total_mass, RHO};

/// Én GPS-fix: posisjon (grader) + høyde (meter).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
    #[serde(alias = "elev", alias = "ele", alias = "altitude_m")]
    pub elevation: f64,
}

impl Fix {
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self { latitude, longitude, elevation }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.elevation.is_finite()
    }
}

/// Strekningen mellom to påfølgende fixes. `index` går fra 1..N-1,
/// index 0 er startpunktet og har ikke noe segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    /// Fixen segmentet ender i (brukes av kart/profil i presentasjonslaget)
    pub end: Fix,
    pub distance_m: f64,       // >= 0, geodetisk
    pub elevation_delta_m: f64, // signert
    pub gradient_pct: f64,     // 1 desimal, 0 ved distance 0
    pub cumulative_distance_m: f64,
}

/// Integratorens utdata per segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RideState {
    pub speed_ms: f64,        // fart ved segmentslutt
    pub elapsed_s: f64,       // tid brukt på segmentet
    pub target_power_w: f64,  // konstant effekt for hele segmentet
    pub covered_m: f64,       // faktisk tilbakelagt (lukkes eksakt av siste delsteg)
    pub substeps: u32,
    pub stalls: u32,          // antall klampede negative radikander
}

/// Sluttresultat som overleveres til presentasjon. Immutabel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideSummary {
    pub total_time_s: f64,
    pub duration_text: String,
    pub energy_kj: i64,
    pub elevation_gain_m: i64,
    pub distance_km: f64,
}

/// Én rad i ruteprofilen (segment + ride state flatet ut), samme kolonner
/// som tabellen presentasjonslaget viser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRow {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    pub gradient_pct: f64,
    pub distance_m: f64,
    pub cumulative_distance_m: f64,
    pub speed_kmh: f64,
    pub elapsed_s: f64,
    pub cumulative_time_s: f64,
    pub power_w: f64,
}

impl SegmentRow {
    pub fn new(seg: &Segment, state: &RideState, cumulative_time_s: f64) -> Self {
        Self {
            latitude: seg.end.latitude,
            longitude: seg.end.longitude,
            elevation_m: seg.end.elevation,
            gradient_pct: seg.gradient_pct,
            distance_m: seg.distance_m,
            cumulative_distance_m: seg.cumulative_distance_m,
            speed_kmh: state.speed_ms * 3.6,
            elapsed_s: state.elapsed_s,
            cumulative_time_s,
            power_w: state.target_power_w,
        }
    }
}

/// Rytter-, sykkel- og miljøparametre for én simulering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RideParams {
    /// Terskeleffekt (FTP) i watt
    #[serde(alias = "powerW", alias = "ftp", alias = "power")]
    pub power_w: f64,
    #[serde(alias = "riderMassKg", alias = "rider_weight_kg")]
    pub rider_mass_kg: f64,
    #[serde(alias = "bikeMassKg", alias = "bike_weight_kg")]
    pub bike_mass_kg: f64,
    #[serde(alias = "Crr")]
    pub crr: f64,
    #[serde(alias = "Cd")]
    pub cd: f64,
    #[serde(alias = "frontalAreaM2", alias = "area")]
    pub frontal_area_m2: f64,
    #[serde(alias = "airDensity", alias = "rho")]
    pub air_density: f64,
    pub strategy: Strategy,
}

impl Default for RideParams {
    fn default() -> Self {
        Self {
            power_w: 200.0,
            rider_mass_kg: 80.0,
            bike_mass_kg: 9.0,
            crr: 0.005,
            cd: 0.88,
            frontal_area_m2: 0.5,
            air_density: RHO,
            strategy: Strategy::Endurance,
        }
    }
}

impl RideParams {
    /// Total masse (kg) = rytter + sykkel.
    #[inline]
    pub fn total_mass(&self) -> f64 {
        total_mass(self.rider_mass_kg, self.bike_mass_kg)
    }

    /// Lufttetthet fra temperatur og trykk i stedet for fast verdi.
    pub fn with_air_from_weather(mut self, air_temp_c: f64, air_pressure_hpa: f64) -> Self {
        self.air_density = air_density(air_temp_c, air_pressure_hpa);
        self
    }

    /// Alle tall må være endelige og > 0.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("power_w", self.power_w),
            ("rider_mass_kg", self.rider_mass_kg),
            ("bike_mass_kg", self.bike_mass_kg),
            ("crr", self.crr),
            ("cd", self.cd),
            ("frontal_area_m2", self.frontal_area_m2),
            ("air_density", self.air_density),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value <= 0.0 {
                return Err(RideSimError::InvalidParameter(format!(
                    "{name} must be finite and > 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(RideParams::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_and_nan() {
        let p = RideParams { crr: 0.0, ..Default::default() };
        assert!(matches!(p.validate(), Err(RideSimError::InvalidParameter(_))));

        let p = RideParams { power_w: f64::NAN, ..Default::default() };
        assert!(matches!(p.validate(), Err(RideSimError::InvalidParameter(_))));

        let p = RideParams { bike_mass_kg: -1.0, ..Default::default() };
        assert!(matches!(p.validate(), Err(RideSimError::InvalidParameter(_))));
    }

    #[test]
    fn air_from_weather_stays_in_band() {
        let p = RideParams::default().with_air_from_weather(15.0, 1013.25);
        assert!((p.air_density - 1.225).abs() < 0.01);
        let cold = RideParams::default().with_air_from_weather(-80.0, 1100.0);
        assert!(cold.air_density <= 1.4);
    }
}
