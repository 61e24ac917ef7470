//! Channel Data Error Types

use thiserror::Error;

/// Errors raised while describing, looking up or converting an analog channel
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChannelDataError {
    /// Transformation ratio is zero, negative or not finite
    #[error("Invalid transformation ratio {0}: must be finite and greater than zero")]
    InvalidRatio(f64),

    /// A CT/VT rating is zero, negative or not finite
    #[error("Invalid {field} rating {value}: must be finite and greater than zero")]
    InvalidRating { field: &'static str, value: f64 },

    /// Unit domain flag is neither primary nor secondary
    #[error("Invalid unit domain flag {0:?}: expected primary (P) or secondary (S)")]
    InvalidDomainFlag(String),

    /// Channel index does not exist in the record
    #[error("Channel index {index} out of range: record has {count} analog channels")]
    ChannelIndexOutOfRange { index: usize, count: usize },
}
