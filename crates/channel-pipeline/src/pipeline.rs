//! Channel Estimation Pipeline

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use channel_data::{convert_channel, Record, UnitDomain};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use waveform_estimators::{Phasor, PhasorEstimator, RmsEstimator};

/// Converted samples and both estimate sequences for one channel, aligned by index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelEstimates {
    /// Zero-based channel index in the record
    pub channel: usize,
    pub name: Option<String>,
    pub unit: Option<String>,
    /// Domain `samples` (and therefore the estimates) are expressed in
    pub domain: UnitDomain,
    /// Samples per cycle used by both estimators
    pub cycle_length: usize,
    pub samples: Vec<f64>,
    /// `None` for the first `cycle_length - 1` indices
    pub phasors: Vec<Option<Phasor>>,
    /// `None` for the first `cycle_length - 1` indices
    pub rms: Vec<Option<f64>>,
}

/// Last fully-windowed estimates of a channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SteadyState {
    pub index: usize,
    pub phasor: Phasor,
    pub rms: f64,
}

impl ChannelEstimates {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Indices with a full window, paired with their phasor
    pub fn defined_phasors(&self) -> impl Iterator<Item = (usize, Phasor)> + '_ {
        self.phasors
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (i, p)))
    }

    /// Indices with a full window, paired with their RMS value
    pub fn defined_rms(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rms
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
    }

    /// Estimates at the last index, if the channel spans at least one cycle
    pub fn steady_state_summary(&self) -> Option<SteadyState> {
        let index = self.len().checked_sub(1)?;
        Some(SteadyState {
            index,
            phasor: self.phasors[index]?,
            rms: self.rms[index]?,
        })
    }
}

/// Per-channel pipeline: unit conversion, then phasor and true-RMS estimation
#[derive(Debug, Clone)]
pub struct ChannelPipeline {
    config: PipelineConfig,
    phasor: PhasorEstimator,
    rms: RmsEstimator,
}

impl ChannelPipeline {
    /// Create a pipeline, validating the cycle length up front
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let phasor = PhasorEstimator::with_scaling(config.cycle_length, config.magnitude_scaling)?;
        let rms = RmsEstimator::new(config.cycle_length)?;
        info!(
            "Creating channel pipeline: N={}, domain={}, scaling={:?}",
            config.cycle_length, config.domain, config.magnitude_scaling
        );
        Ok(Self { config, phasor, rms })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run on `channel` in the configured domain
    pub fn run<R: Record + ?Sized>(
        &self,
        record: &R,
        channel: usize,
    ) -> Result<ChannelEstimates, PipelineError> {
        self.run_as(record, channel, self.config.domain)
    }

    /// Run on `channel`, returning values in `domain`
    pub fn run_as<R: Record + ?Sized>(
        &self,
        record: &R,
        channel: usize,
        domain: UnitDomain,
    ) -> Result<ChannelEstimates, PipelineError> {
        let (descriptor, raw) = record.channel(channel)?;
        debug!(
            "Channel {} ({}): {} samples recorded as {}, ratio {}",
            channel,
            descriptor.name.as_deref().unwrap_or("unnamed"),
            raw.len(),
            descriptor.recorded_as(),
            descriptor.ratio()
        );

        let samples = convert_channel(descriptor, raw)
            .map_err(|source| PipelineError::Conversion { channel, source })?
            .into_domain(domain);

        let phasors = self
            .phasor
            .estimate(&samples)
            .map_err(|source| PipelineError::Estimation { channel, source })?;
        let rms = self
            .rms
            .estimate(&samples)
            .map_err(|source| PipelineError::Estimation { channel, source })?;

        info!(
            "Channel {} estimated: {} samples in {} domain, N={}",
            channel,
            samples.len(),
            domain,
            self.config.cycle_length
        );

        Ok(ChannelEstimates {
            channel,
            name: descriptor.name.clone(),
            unit: descriptor.unit.clone(),
            domain,
            cycle_length: self.config.cycle_length,
            samples,
            phasors,
            rms,
        })
    }

    /// Run every channel in order. A failing channel does not stop the rest.
    pub fn run_all<R: Record + ?Sized>(
        &self,
        record: &R,
    ) -> Vec<Result<ChannelEstimates, PipelineError>> {
        (0..record.channel_count())
            .map(|channel| {
                let result = self.run(record, channel);
                if let Err(e) = &result {
                    warn!("Skipping channel {}: {}", channel, e);
                }
                result
            })
            .collect()
    }

    /// Run every channel on the blocking thread pool, results in channel order
    pub async fn run_all_parallel<R>(
        &self,
        record: Arc<R>,
    ) -> Vec<Result<ChannelEstimates, PipelineError>>
    where
        R: Record + Send + Sync + 'static,
    {
        let tasks: Vec<_> = (0..record.channel_count())
            .map(|channel| {
                let pipeline = self.clone();
                let record = Arc::clone(&record);
                tokio::task::spawn_blocking(move || pipeline.run(record.as_ref(), channel))
            })
            .collect();

        let mut results = Vec::with_capacity(tasks.len());
        for (channel, task) in tasks.into_iter().enumerate() {
            let result = match task.await {
                Ok(result) => result,
                Err(e) => Err(PipelineError::Task(e)),
            };
            if let Err(e) = &result {
                warn!("Skipping channel {}: {}", channel, e);
            }
            results.push(result);
        }
        results
    }
}

/// One-shot run of a single channel with cycle length `n` in `domain`
pub fn run_channel<R: Record + ?Sized>(
    record: &R,
    channel: usize,
    n: usize,
    domain: UnitDomain,
) -> Result<ChannelEstimates, PipelineError> {
    let config = PipelineConfig::default()
        .with_cycle_length(n)
        .with_domain(domain);
    ChannelPipeline::new(config)?.run(record, channel)
}
