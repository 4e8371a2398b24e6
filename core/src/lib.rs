//! RideSim core: estimerer kjøretid, energi og høydemeter for en opptatt
//! sykkelrute gitt rytterens effekt og valgt strategi.
//!
//! Pipeline: Track Reader → Segmenter → Pacing Table → Integrator → Aggregator.

pub mod aggregator;
pub mod api;
pub mod cli;
pub mod error;
pub mod integrator;
pub mod models;
pub mod pacing;
pub mod physics;
pub mod segmenter;
pub mod storage;
pub mod telemetry;
pub mod track;

#[cfg(feature = "python")]
pub mod py;

use log::info;

pub use aggregator::{format_duration, profile_rows, summarize, TRIP_BUFFER_S};
pub use error::{Result, RideSimError};
pub use integrator::{Integration, Integrator, FIRST_SEGMENT_TIME_S};
pub use models::{Fix, RideParams, RideState, RideSummary, Segment, SegmentRow};
pub use pacing::{PacingTable, Strategy};
pub use segmenter::segment_track;
pub use storage::{load_params, save_params};
pub use telemetry::SimTelemetry;
pub use track::{read_gpx, read_gpx_bytes, read_gpx_file};

/// Alt én simulering gir tilbake: segmenter + ride state for profil/kart,
/// og sammendraget for overskriftstekst.
#[derive(Debug, Clone, PartialEq)]
pub struct RideOutcome {
    pub segments: Vec<Segment>,
    pub states: Vec<RideState>,
    pub summary: RideSummary,
    pub substeps: u64,
    pub stall_events: u64,
}

impl RideOutcome {
    pub fn rows(&self) -> Vec<SegmentRow> {
        profile_rows(&self.segments, &self.states)
    }
}

fn run_pipeline(fixes: &[Fix], params: &RideParams) -> Result<(Vec<Segment>, Integration)> {
    track::validate_track(fixes)?;
    params.validate()?;

    let segments = segment_track(fixes)?;
    let table = params.strategy.table();
    let run = Integrator::new(params, table).run(&segments)?;
    Ok((segments, run))
}

fn finish(segments: Vec<Segment>, run: Integration) -> RideOutcome {
    let summary = summarize(&segments, &run.states);
    RideOutcome {
        segments,
        states: run.states,
        summary,
        substeps: run.substeps,
        stall_events: run.stall_events,
    }
}

/// Simulerer én rute fra start til mål. Deterministisk, ingen sideeffekter.
pub fn simulate_route(fixes: &[Fix], params: &RideParams) -> Result<RideOutcome> {
    info!(
        "simulating {} fixes, {} W, strategy {}",
        fixes.len(),
        params.power_w,
        params.strategy
    );
    let (segments, run) = run_pipeline(fixes, params)?;
    Ok(finish(segments, run))
}

/// Som [`simulate_route`], men teller kjøringer/delsteg/stall i `telemetry`.
pub fn simulate_route_with_telemetry(
    fixes: &[Fix],
    params: &RideParams,
    telemetry: &SimTelemetry,
) -> Result<RideOutcome> {
    let (segments, run) = run_pipeline(fixes, params)?;
    telemetry.record(&run);
    Ok(finish(segments, run))
}
