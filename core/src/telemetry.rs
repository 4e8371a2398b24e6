// core/src/telemetry.rs
// Prometheus-tellere for diagnostikk. Eies av kalleren; simuleringen selv
// holder ingen delt tilstand.
use prometheus::{IntCounter, Registry};

use crate::integrator::Integration;

#[derive(Clone)]
pub struct SimTelemetry {
    registry: Registry,
    pub runs_total: IntCounter,
    pub substeps_total: IntCounter,
    pub stall_events_total: IntCounter,
}

impl SimTelemetry {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        let runs_total = IntCounter::new("ridesim_runs_total", "Completed route simulations")?;
        let substeps_total =
            IntCounter::new("ridesim_substeps_total", "Kinematic sub-steps integrated")?;
        let stall_events_total = IntCounter::new(
            "ridesim_stall_events_total",
            "Sub-steps where speed was clamped to zero (deceleration overshoot)",
        )?;
        registry.register(Box::new(runs_total.clone()))?;
        registry.register(Box::new(substeps_total.clone()))?;
        registry.register(Box::new(stall_events_total.clone()))?;
        Ok(Self { registry, runs_total, substeps_total, stall_events_total })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record(&self, run: &Integration) {
        self.runs_total.inc();
        self.substeps_total.inc_by(run.substeps);
        self.stall_events_total.inc_by(run.stall_events);
    }
}

impl std::fmt::Debug for SimTelemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimTelemetry")
            .field("runs_total", &self.runs_total.get())
            .field("substeps_total", &self.substeps_total.get())
            .field("stall_events_total", &self.stall_events_total.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates() {
        let t = SimTelemetry::new().unwrap();
        let run = Integration { substeps: 40, stall_events: 2, ..Default::default() };
        t.record(&run);
        t.record(&run);
        assert_eq!(t.runs_total.get(), 2);
        assert_eq!(t.substeps_total.get(), 80);
        assert_eq!(t.stall_events_total.get(), 4);
        assert_eq!(t.registry().gather().len(), 3);
    }
}
