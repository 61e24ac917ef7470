//! Pipeline configuration

use crate::error::PipelineError;
use channel_data::UnitDomain;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use waveform_estimators::{samples_per_cycle, EstimatorError, MagnitudeScaling};

/// Default samples per cycle when nothing else is configured
pub const DEFAULT_CYCLE_LENGTH: usize = 32;

/// Prefix for environment overrides, e.g. `DISTURBANCE_CYCLE_LENGTH=64`
pub const ENV_PREFIX: &str = "DISTURBANCE";

/// Estimation pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Samples per nominal power-system cycle (N)
    pub cycle_length: usize,

    /// Domain the converted samples and estimates are expressed in
    pub domain: UnitDomain,

    /// Phasor magnitude convention (peak or RMS of the fundamental)
    pub magnitude_scaling: MagnitudeScaling,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cycle_length: DEFAULT_CYCLE_LENGTH,
            domain: UnitDomain::Primary,
            magnitude_scaling: MagnitudeScaling::Peak,
        }
    }
}

impl PipelineConfig {
    /// Config for a recorder sampling at `sample_rate_hz` on a `nominal_hz` system
    pub fn from_frequencies(sample_rate_hz: f64, nominal_hz: f64) -> Result<Self, PipelineError> {
        Ok(Self {
            cycle_length: samples_per_cycle(sample_rate_hz, nominal_hz)?,
            ..Default::default()
        })
    }

    pub fn with_cycle_length(mut self, cycle_length: usize) -> Self {
        self.cycle_length = cycle_length;
        self
    }

    pub fn with_domain(mut self, domain: UnitDomain) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_magnitude_scaling(mut self, scaling: MagnitudeScaling) -> Self {
        self.magnitude_scaling = scaling;
        self
    }

    /// Check the parameters before any channel is processed
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.cycle_length < 2 {
            return Err(EstimatorError::InvalidWindowSize(self.cycle_length).into());
        }
        Ok(())
    }

    /// Load defaults, then an optional config file, then `DISTURBANCE_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        Self::load_from(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(path: Option<&Path>, environment: Environment) -> Result<Self, PipelineError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("cycle_length", defaults.cycle_length as i64)?
            .set_default("domain", defaults.domain.as_str())?
            .set_default("magnitude_scaling", "peak")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config: Self = builder
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
