// core/src/physics.rs
// Kraft-/effektmodellen integratoren bygger på. Alle motstandsledd er
// uttrykt som effekt (W) ved gitt fart, slik som i resten av kjernen.

pub const G: f64 = 9.8067;          // gravitasjon (m/s²)
pub const RHO: f64 = 1.225;         // lufttetthet ved havnivå (kg/m³)
pub const R_DRY_AIR: f64 = 287.05;  // J/(kg·K)

// Delsteg (sek) – finere der kreftene endrer seg raskest
pub const DT_STEEP_S: f64 = 0.025;  // gradient > 20 %
pub const DT_CLIMB_S: f64 = 0.05;   // gradient > 10 %
pub const DT_DEFAULT_S: f64 = 0.1;

// --- RoundTo trait (offentlig, brukt av segmenter/aggregator) ---
pub trait RoundTo {
    fn round_to(self, dp: u32) -> f64;
}

impl RoundTo for f64 {
    #[inline]
    fn round_to(self, dp: u32) -> f64 {
        if dp == 0 { return self.round(); }
        let factor = 10_f64.powi(dp as i32);
        (self * factor).round() / factor
    }
}

/// Total masse (kg) = rytter + sykkel.
#[inline]
pub fn total_mass(rider_weight_kg: f64, bike_weight_kg: f64) -> f64 {
    (rider_weight_kg + bike_weight_kg).round_to(5)
}

/// Lufttetthet fra temperatur (°C) og trykk (hPa), klampet til et fornuftig bånd.
pub fn air_density(air_temp_c: f64, air_pressure_hpa: f64) -> f64 {
    let p_pa = (air_pressure_hpa * 100.0).max(1.0);
    let t_k = (air_temp_c + 273.15).max(150.0);
    (p_pa / (R_DRY_AIR * t_k)).clamp(0.9, 1.4)
}

/// Stigningsvinkel θ = atan(gradient/100).
#[inline]
pub fn slope_angle(gradient_pct: f64) -> f64 {
    (gradient_pct / 100.0).atan()
}

/// Delsteg valgt etter gradientens størrelse.
#[inline]
pub fn substep_dt(gradient_pct: f64) -> f64 {
    let g = gradient_pct.abs();
    if g > 20.0 {
        DT_STEEP_S
    } else if g > 10.0 {
        DT_CLIMB_S
    } else {
        DT_DEFAULT_S
    }
}

/// Aerodynamikk/rulling/tyngde for ett segment (konstant vinkel).
#[derive(Debug, Clone, Copy)]
pub struct ResistanceModel {
    pub mass_kg: f64,
    pub crr: f64,
    pub cd: f64,
    pub frontal_area_m2: f64,
    pub rho: f64,
    pub sin_theta: f64,
    pub cos_theta: f64,
}

impl ResistanceModel {
    pub fn new(mass_kg: f64, crr: f64, cd: f64, frontal_area_m2: f64, rho: f64, gradient_pct: f64) -> Self {
        let theta = slope_angle(gradient_pct);
        Self {
            mass_kg,
            crr,
            cd,
            frontal_area_m2,
            rho,
            sin_theta: theta.sin(),
            cos_theta: theta.cos(),
        }
    }

    // ----- Effekt-komponent helpers -----

    #[inline]
    pub fn drag_watt(&self, v_ms: f64) -> f64 {
        0.5 * self.cd * self.frontal_area_m2 * self.rho * v_ms.powi(3)
    }

    #[inline]
    pub fn rolling_watt(&self, v_ms: f64) -> f64 {
        self.crr * self.mass_kg * G * self.cos_theta * v_ms
    }

    /// Signert: negativ i nedoverbakke (gir drivkraft).
    #[inline]
    pub fn gravity_watt(&self, v_ms: f64) -> f64 {
        self.mass_kg * G * self.sin_theta * v_ms
    }

    #[inline]
    pub fn total_watt(&self, v_ms: f64) -> f64 {
        self.drag_watt(v_ms) + self.rolling_watt(v_ms) + self.gravity_watt(v_ms)
    }

    /// "Akselerasjon" = (P − motstand) / m. Effekt-ekvivalent, ikke kraft.
    #[inline]
    pub fn acceleration(&self, power_w: f64, v_ms: f64) -> f64 {
        (power_w - self.total_watt(v_ms)) / self.mass_kg
    }

    /// Kraftbalanse fra stillstand: tyngdens komponent nedover minus rulling.
    /// Brukes bare når fart og drivkraft begge er 0.
    #[inline]
    pub fn rest_acceleration(&self) -> f64 {
        -G * self.sin_theta - self.crr * G * self.cos_theta
    }
}

/// Fart fra v² + 2·a·Δd. Negativ radikand → `None` (stall), kalleren klamper.
#[inline]
pub fn speed_after(v_ms: f64, accel: f64, dist_m: f64) -> Option<f64> {
    let radicand = v_ms * v_ms + 2.0 * accel * dist_m;
    if radicand.is_finite() && radicand >= 0.0 {
        Some(radicand.sqrt())
    } else {
        None
    }
}

/// Resultat av ett kinematisk delsteg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub dist_m: f64,
    pub v_new_ms: f64,
    pub stalled: bool,
}

/// Ett delsteg: Δd = v·Δt + ½·a·Δt², v' = √(v² + 2·a·Δd).
///
/// Hvis retardasjonen ville ført farten under null innen steget (eller
/// radikanden blir negativ) klampes v' til 0 og steget flagges som stall.
/// Distansen er da bremselengden v²/(2|a|).
pub fn kinematic_step(v_ms: f64, accel: f64, dt_s: f64) -> Step {
    let stall_dist = if accel < 0.0 { v_ms * v_ms / (-2.0 * accel) } else { 0.0 };
    if v_ms + accel * dt_s < 0.0 {
        return Step { dist_m: stall_dist, v_new_ms: 0.0, stalled: true };
    }
    let dist_m = v_ms * dt_s + 0.5 * accel * dt_s * dt_s;
    match speed_after(v_ms, accel, dist_m) {
        Some(v_new_ms) => Step { dist_m, v_new_ms, stalled: false },
        None => Step { dist_m: stall_dist, v_new_ms: 0.0, stalled: true },
    }
}

/// Farten der effekt balanserer motstand (terminalhastighet), via bisection.
/// Brukes i tester og rapport; integratoren selv trenger den ikke.
pub fn terminal_speed(model: &ResistanceModel, power_w: f64) -> f64 {
    if power_w <= 0.0 {
        return 0.0;
    }
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    while model.total_watt(hi) < power_w && hi < 1e4 {
        hi *= 2.0;
    }
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if model.total_watt(mid) < power_w { lo = mid; } else { hi = mid; }
    }
    0.5 * (lo + hi)
}
