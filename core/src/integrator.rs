// core/src/integrator.rs
// Kinematisk integrator: foldes sekvensielt over segmentene. Hvert segment
// starter med sluttfarten til forrige og deles i faste tidssteg til hele
// distansen er tilbakelagt.

use log::{debug, warn};

use crate::error::{Result, RideSimError};
use crate::models::{RideParams, RideState, Segment};
use crate::pacing::PacingTable;
use crate::physics::{kinematic_step, speed_after, substep_dt, ResistanceModel};

/// Første segment får fast tid (reaksjon/start), uansett simulert verdi.
pub const FIRST_SEGMENT_TIME_S: f64 = 3.1;

/// Øvre grense for delsteg i ett segment før vi gir opp.
pub const MAX_SUBSTEPS_PER_SEGMENT: u32 = 5_000_000;

const EPS_SPEED: f64 = 1e-9;

/// Alt integratoren produserer for én rute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Integration {
    pub states: Vec<RideState>,
    pub substeps: u64,
    pub stall_events: u64,
    pub backfilled: usize,
}

pub struct Integrator<'a> {
    params: &'a RideParams,
    table: &'a PacingTable,
    mass_kg: f64,
}

impl<'a> Integrator<'a> {
    pub fn new(params: &'a RideParams, table: &'a PacingTable) -> Self {
        Self { params, table, mass_kg: params.total_mass() }
    }

    /// Konstant måleffekt for segmentet: P × multiplikator(gradient).
    #[inline]
    pub fn target_power(&self, seg: &Segment) -> f64 {
        self.params.power_w * self.table.multiplier(seg.gradient_pct)
    }

    /// Effekt brukt for å komme i gang fra stillstand når verken tråkk
    /// eller tyngde gir fremdrift: P × f.
    #[inline]
    fn start_push_w(&self) -> f64 {
        self.params.power_w * self.table.intensity()
    }

    fn model_for(&self, seg: &Segment) -> ResistanceModel {
        ResistanceModel::new(
            self.mass_kg,
            self.params.crr,
            self.params.cd,
            self.params.frontal_area_m2,
            self.params.air_density,
            seg.gradient_pct,
        )
    }

    /// Neste ride state fra forrige (None = stående start).
    pub fn next_state(&self, seg: &Segment, prev: Option<&RideState>) -> Result<RideState> {
        let v_start = prev.map_or(0.0, |s| s.speed_ms);
        let power = self.target_power(seg);

        // Null-distanse: ingen kinematikk, farten føres videre
        if seg.distance_m <= 0.0 {
            return Ok(RideState {
                speed_ms: v_start,
                elapsed_s: 0.0,
                target_power_w: power,
                covered_m: 0.0,
                substeps: 0,
                stalls: 0,
            });
        }

        let model = self.model_for(seg);
        let dt_nominal = substep_dt(seg.gradient_pct);

        let mut v = v_start;
        let mut covered = 0.0;
        let mut elapsed = 0.0;
        let mut substeps = 0u32;
        let mut stalls = 0u32;

        while covered < seg.distance_m {
            if substeps >= MAX_SUBSTEPS_PER_SEGMENT {
                return Err(RideSimError::NumericDomain {
                    segment: seg.index,
                    detail: format!(
                        "no convergence after {substeps} sub-steps ({covered:.3}/{:.3} m)",
                        seg.distance_m
                    ),
                });
            }
            substeps += 1;

            let mut accel = model.acceleration(power, v);
            if v <= EPS_SPEED && accel <= 0.0 {
                // Stillstand uten tråkk: bare tyngden kan sette i gang
                accel = model.rest_acceleration();
                if accel <= 0.0 {
                    // Rullemotstanden holder igjen: rytteren tråkker i gang
                    // med strategiens grunnintensitet
                    accel = self.start_push_w() / self.mass_kg;
                    warn!(
                        "segment {} stuck at rest (gradient {:.1} %): pushing off at {:.1} W",
                        seg.index,
                        seg.gradient_pct,
                        self.start_push_w()
                    );
                }
            }

            let step = kinematic_step(v, accel, dt_nominal);
            let remaining = seg.distance_m - covered;
            if step.dist_m >= remaining {
                // Siste delsteg: lukk segmentet eksakt
                let v_end = match speed_after(v, accel, remaining) {
                    Some(x) => x,
                    None => {
                        stalls += 1;
                        warn!("stall closing segment {}: speed clamped to 0", seg.index);
                        0.0
                    }
                };
                let dt = if v_end > EPS_SPEED {
                    remaining / v_end
                } else if v + v_end > EPS_SPEED {
                    2.0 * remaining / (v + v_end)
                } else {
                    dt_nominal
                };
                elapsed += dt;
                covered = seg.distance_m;
                v = v_end;
                break;
            }

            if step.stalled {
                stalls += 1;
                warn!(
                    "stall in segment {} (v={:.3} m/s, a={:.3}, gradient {:.1} %): speed clamped to 0",
                    seg.index, v, accel, seg.gradient_pct
                );
            }

            covered += step.dist_m;
            elapsed += dt_nominal;
            v = step.v_new_ms;
        }

        Ok(RideState {
            speed_ms: v,
            elapsed_s: elapsed,
            target_power_w: power,
            covered_m: covered,
            substeps,
            stalls,
        })
    }

    /// Integrerer hele ruten. Stateless mellom kall.
    pub fn run(&self, segments: &[Segment]) -> Result<Integration> {
        let mut states: Vec<RideState> = Vec::with_capacity(segments.len());
        for seg in segments {
            let next = self.next_state(seg, states.last())?;
            states.push(next);
        }

        if let Some(first) = states.first_mut() {
            first.elapsed_s = FIRST_SEGMENT_TIME_S;
        }
        let backfilled = backfill_power(&mut states);

        let substeps = states.iter().map(|s| s.substeps as u64).sum();
        let stall_events = states.iter().map(|s| s.stalls as u64).sum();
        debug!(
            "integrated {} segments: {} sub-steps, {} stall(s)",
            states.len(),
            substeps,
            stall_events
        );

        Ok(Integration { states, substeps, stall_events, backfilled })
    }
}

/// Bakoverfyll av manglende (ikke-endelig) effekt: neste gyldige verdi,
/// etterfølgende hull fylles fra forrige, ellers 0. Returnerer antall fylt.
pub fn backfill_power(states: &mut [RideState]) -> usize {
    let mut filled = 0;
    let mut next_valid: Option<f64> = None;
    for s in states.iter_mut().rev() {
        if s.target_power_w.is_finite() {
            next_valid = Some(s.target_power_w);
        } else if let Some(p) = next_valid {
            s.target_power_w = p;
            filled += 1;
        }
    }
    let mut prev_valid = 0.0;
    for s in states.iter_mut() {
        if s.target_power_w.is_finite() {
            prev_valid = s.target_power_w;
        } else {
            s.target_power_w = prev_valid;
            filled += 1;
        }
    }
    if filled > 0 {
        warn!("backward-filled {filled} missing power value(s)");
    }
    filled
}
