//! Disturbance Record Channel Pipeline
//!
//! Expresses a recorded analog channel in primary or secondary units and
//! derives its one-cycle DFT phasor and true-RMS estimates, one per sample.

mod config;
mod error;
mod pipeline;

pub use config::{PipelineConfig, DEFAULT_CYCLE_LENGTH, ENV_PREFIX};
pub use error::PipelineError;
pub use pipeline::{run_channel, ChannelEstimates, ChannelPipeline, SteadyState};

use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
