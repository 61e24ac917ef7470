//! Pipeline Error Types

use channel_data::ChannelDataError;
use thiserror::Error;
use waveform_estimators::EstimatorError;

/// Errors from running the estimation pipeline on a channel
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Channel lookup failed (e.g. index out of range)
    #[error(transparent)]
    Record(#[from] ChannelDataError),

    /// Ratio or domain flag of the channel is unusable
    #[error("Channel {channel} conversion failed: {source}")]
    Conversion {
        channel: usize,
        source: ChannelDataError,
    },

    /// Estimator rejected the channel's samples
    #[error("Channel {channel} estimation failed: {source}")]
    Estimation {
        channel: usize,
        source: EstimatorError,
    },

    /// Pipeline parameters are invalid (e.g. cycle length below 2)
    #[error("Invalid pipeline parameters: {0}")]
    Parameters(#[from] EstimatorError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Background channel task panicked or was cancelled
    #[error("Channel task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
