// core/src/pacing.rs
// Gradient → effektmultiplikator. Tabellen er et fast array over heltalls-
// gradienter −15..=15, oppslag er alltid clamp → trunkering → indeks.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::RideSimError;

pub const MIN_GRADIENT: i32 = -15;
pub const MAX_GRADIENT: i32 = 15;
pub const TABLE_LEN: usize = (MAX_GRADIENT - MIN_GRADIENT + 1) as usize;

/// Over dette ligger multiplikatoren flatt på `PLATEAU_FACTOR × f`.
pub const PLATEAU_GRADIENT: i32 = 10;
pub const PLATEAU_FACTOR: f64 = 1.2;
/// Ned hit (og brattere) tråkker ikke rytteren.
pub const COAST_GRADIENT: i32 = -10;

/// Lukket sett av kjørestrategier.
/// Deserialiseres via `FromStr`, så fil og JSON-API godtar samme skrivemåter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Strategy {
    Recovery,
    Endurance,
    Tempo,
    Maximal,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Recovery,
        Strategy::Endurance,
        Strategy::Tempo,
        Strategy::Maximal,
    ];

    /// Intensitetsfaktor f relativt til terskeleffekt.
    pub fn intensity(self) -> f64 {
        match self {
            Strategy::Recovery => 0.5,
            Strategy::Endurance => 0.7,
            Strategy::Tempo => 0.85,
            Strategy::Maximal => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Recovery => "recovery",
            Strategy::Endurance => "endurance",
            Strategy::Tempo => "tempo",
            Strategy::Maximal => "maximal",
        }
    }

    /// Ferdigbygd tabell for strategien (bygges én gang per prosess).
    pub fn table(self) -> &'static PacingTable {
        static TABLES: Lazy<[PacingTable; 4]> =
            Lazy::new(|| Strategy::ALL.map(|s| PacingTable::new(s.intensity())));
        match self {
            Strategy::Recovery => &TABLES[0],
            Strategy::Endurance => &TABLES[1],
            Strategy::Tempo => &TABLES[2],
            Strategy::Maximal => &TABLES[3],
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Strategy {
    type Error = RideSimError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Strategy {
    type Err = RideSimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recovery" => Ok(Strategy::Recovery),
            "endurance" => Ok(Strategy::Endurance),
            "tempo" => Ok(Strategy::Tempo),
            "maximal" => Ok(Strategy::Maximal),
            other => Err(RideSimError::InvalidParameter(format!("unknown strategy '{other}'"))),
        }
    }
}

/// Multiplikator for én heltallsgradient (uten clamp).
pub fn multiplier_for(gradient: i32, intensity: f64) -> f64 {
    let g = gradient as f64;
    if gradient <= COAST_GRADIENT {
        0.0
    } else if gradient <= 0 {
        (g + 10.0) / 10.0 * intensity
    } else if gradient < PLATEAU_GRADIENT {
        ((g + 10.0) / 50.0 + 0.8) * intensity
    } else {
        PLATEAU_FACTOR * intensity
    }
}

/// Klamp til [−15, 15] og trunker mot null.
#[inline]
pub fn gradient_bucket(gradient_pct: f64) -> i32 {
    if gradient_pct.is_nan() {
        return 0;
    }
    gradient_pct.clamp(MIN_GRADIENT as f64, MAX_GRADIENT as f64).trunc() as i32
}

#[derive(Debug, Clone, PartialEq)]
pub struct PacingTable {
    intensity: f64,
    multipliers: [f64; TABLE_LEN],
}

impl PacingTable {
    pub fn new(intensity: f64) -> Self {
        let mut multipliers = [0.0; TABLE_LEN];
        for (i, m) in multipliers.iter_mut().enumerate() {
            *m = multiplier_for(MIN_GRADIENT + i as i32, intensity);
        }
        Self { intensity, multipliers }
    }

    pub fn for_strategy(strategy: Strategy) -> Self {
        Self::new(strategy.intensity())
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Oppslag på heltallsbøtte (klampes).
    pub fn at_bucket(&self, bucket: i32) -> f64 {
        let b = bucket.clamp(MIN_GRADIENT, MAX_GRADIENT);
        self.multipliers[(b - MIN_GRADIENT) as usize]
    }

    /// Oppslag på rå segmentgradient i prosent.
    pub fn multiplier(&self, gradient_pct: f64) -> f64 {
        self.at_bucket(gradient_bucket(gradient_pct))
    }

    /// (gradient, multiplikator) for hele tabellen, stigende gradient.
    pub fn entries(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.multipliers
            .iter()
            .enumerate()
            .map(|(i, m)| (MIN_GRADIENT + i as i32, *m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_gradient_is_intensity() {
        for s in Strategy::ALL {
            assert_eq!(s.table().multiplier(0.0), s.intensity());
            assert_eq!(s.table().multiplier(10.0), 1.2 * s.intensity());
            assert_eq!(s.table().multiplier(15.0), 1.2 * s.intensity());
        }
    }

    #[test]
    fn recovery_at_five_percent() {
        let m = Strategy::Recovery.table().multiplier(5.0);
        assert!((m - 0.55).abs() < 1e-12, "m={m}");
    }

    #[test]
    fn coasting_below_minus_ten() {
        let t = PacingTable::for_strategy(Strategy::Maximal);
        assert_eq!(t.multiplier(-10.0), 0.0);
        assert_eq!(t.multiplier(-14.2), 0.0);
        assert_eq!(t.multiplier(-40.0), 0.0);
        assert!((t.multiplier(-5.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn buckets_truncate_and_clamp() {
        assert_eq!(gradient_bucket(4.9), 4);
        assert_eq!(gradient_bucket(-4.7), -4);
        assert_eq!(gradient_bucket(30.0), 15);
        assert_eq!(gradient_bucket(-99.0), -15);
        assert_eq!(gradient_bucket(f64::NAN), 0);
    }

    #[test]
    fn non_decreasing_then_flat() {
        let t = PacingTable::new(0.85);
        let entries: Vec<_> = t.entries().collect();
        assert_eq!(entries.len(), TABLE_LEN);
        for w in entries.windows(2) {
            assert!(w[1].1 >= w[0].1, "{:?}", w);
        }
        let plateau: Vec<f64> = entries.iter().filter(|(g, _)| *g >= 10).map(|(_, m)| *m).collect();
        assert!(plateau.iter().all(|m| *m == plateau[0]));
    }

    #[test]
    fn serde_accepts_any_case_and_writes_lowercase() {
        let s: Strategy = serde_json::from_str("\"Tempo\"").unwrap();
        assert_eq!(s, Strategy::Tempo);
        let s: Strategy = serde_json::from_str("\" MAXIMAL \"").unwrap();
        assert_eq!(s, Strategy::Maximal);
        assert_eq!(serde_json::to_string(&Strategy::Recovery).unwrap(), "\"recovery\"");
        assert!(serde_json::from_str::<Strategy>("\"sprint\"").is_err());
    }

    #[test]
    fn unknown_strategy_is_invalid_parameter() {
        assert_eq!("Tempo".parse::<Strategy>().unwrap(), Strategy::Tempo);
        assert!(matches!("sprint".parse::<Strategy>(), Err(RideSimError::InvalidParameter(_))));
    }
}
