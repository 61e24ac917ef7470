//! Disturbance Estimates - Demo Entry Point
//!
//! Builds a synthetic three-channel fault record in memory and logs the
//! steady-state phasor and RMS of every channel before and after the fault.
//! Configuration comes from the file named by `PIPELINE_CONFIG` (optional)
//! and `DISTURBANCE_*` environment variables.

use anyhow::Context;
use channel_data::{AnalogChannelDescriptor, DisturbanceRecord, Record};
use channel_pipeline::{init_logging, ChannelPipeline, PipelineConfig};
use std::f64::consts::PI;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

const NOMINAL_HZ: f64 = 60.0;
const CYCLES: usize = 12;
const FAULT_CYCLE: usize = 5;

/// Pre-fault load, then a fault with decaying DC offset and third harmonic
fn fault_waveform(n: usize, pre: f64, fault: f64, phase: f64) -> Vec<f64> {
    let tau = 2.0 * n as f64;
    (0..n * CYCLES)
        .map(|k| {
            let theta = 2.0 * PI * k as f64 / n as f64 + phase;
            if k < n * FAULT_CYCLE {
                pre * theta.sin()
            } else {
                let t = (k - n * FAULT_CYCLE) as f64;
                fault * theta.sin() + 0.15 * fault * (3.0 * theta).sin() + 0.5 * fault * (-t / tau).exp()
            }
        })
        .collect()
}

fn synthetic_record(n: usize) -> anyhow::Result<DisturbanceRecord> {
    let ia = AnalogChannelDescriptor::from_flag(1200.0, 5.0, "S")?
        .with_name("IA")
        .with_unit("A");
    let ib = AnalogChannelDescriptor::from_flag(1200.0, 5.0, "S")?
        .with_name("IB")
        .with_unit("A");
    let va = AnalogChannelDescriptor::from_flag(132_000.0, 110.0, "P")?
        .with_name("VA")
        .with_unit("V");

    Ok(DisturbanceRecord::new()
        .with_channel(ia, fault_waveform(n, 2.5, 40.0, 0.0))
        .with_channel(ib, fault_waveform(n, 2.5, 2.8, -2.0 * PI / 3.0))
        .with_channel(va, fault_waveform(n, 107_000.0, 38_000.0, 0.4)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging().context("failed to install tracing subscriber")?;

    info!("=== Disturbance Estimates v{} ===", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::var_os("PIPELINE_CONFIG").map(PathBuf::from);
    let config = PipelineConfig::load(config_path.as_deref()).context("failed to load configuration")?;
    let n = config.cycle_length;
    info!(
        "Sampling at {} Hz ({} samples per {} Hz cycle)",
        n as f64 * NOMINAL_HZ,
        n,
        NOMINAL_HZ
    );

    let record = Arc::new(synthetic_record(n)?);
    let pipeline = ChannelPipeline::new(config)?;
    let results = pipeline.run_all_parallel(Arc::clone(&record)).await;

    for result in results {
        let estimates = match result {
            Ok(estimates) => estimates,
            Err(e) => {
                warn!("{}", e);
                continue;
            }
        };
        let name = estimates.name.as_deref().unwrap_or("?");
        let unit = estimates.unit.as_deref().unwrap_or("");

        let pre_fault = n * FAULT_CYCLE - 1;
        if let (Some(phasor), Some(rms)) = (estimates.phasors[pre_fault], estimates.rms[pre_fault]) {
            info!(
                "{} pre-fault: |X|={:.3} {} at {:.1} deg, RMS={:.3} {}",
                name,
                phasor.magnitude(),
                unit,
                phasor.phase_degrees(),
                rms,
                unit
            );
        }
        if let Some(summary) = estimates.steady_state_summary() {
            info!(
                "{} fault: |X|={:.3} {} at {:.1} deg, RMS={:.3} {} ({} domain)",
                name,
                summary.phasor.magnitude(),
                unit,
                summary.phasor.phase_degrees(),
                summary.rms,
                unit,
                estimates.domain
            );
        }
    }

    info!("Processed {} analog channels", record.channel_count());
    Ok(())
}
