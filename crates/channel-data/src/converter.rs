//! Primary / Secondary Unit Conversion

use crate::descriptor::{validate_ratio, AnalogChannelDescriptor};
use crate::domain::UnitDomain;
use crate::error::ChannelDataError;
use tracing::debug;

/// A channel's samples expressed on both sides of the transformer
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedChannel {
    pub primary: Vec<f64>,
    pub secondary: Vec<f64>,
}

impl ConvertedChannel {
    /// Borrow the sequence for the requested domain
    pub fn select(&self, request: UnitDomain) -> &[f64] {
        select(&self.primary, &self.secondary, request)
    }

    /// Take ownership of the sequence for the requested domain
    pub fn into_domain(self, request: UnitDomain) -> Vec<f64> {
        match request {
            UnitDomain::Primary => self.primary,
            UnitDomain::Secondary => self.secondary,
        }
    }
}

/// Express `raw` samples recorded in `recorded_as` in both domains.
///
/// The recorded side is copied as-is; the other side is scaled elementwise
/// by `ratio` (primary = secondary * ratio).
pub fn convert(
    raw: &[f64],
    ratio: f64,
    recorded_as: UnitDomain,
) -> Result<ConvertedChannel, ChannelDataError> {
    validate_ratio(ratio)?;
    debug!(
        "Converting {} samples recorded as {} (ratio {})",
        raw.len(),
        recorded_as,
        ratio
    );

    let converted = match recorded_as {
        UnitDomain::Secondary => ConvertedChannel {
            primary: raw.iter().map(|&v| v * ratio).collect(),
            secondary: raw.to_vec(),
        },
        UnitDomain::Primary => ConvertedChannel {
            primary: raw.to_vec(),
            secondary: raw.iter().map(|&v| v / ratio).collect(),
        },
    };
    Ok(converted)
}

/// Same as [`convert`] but takes the recorder's textual flag
pub fn convert_with_flag(
    raw: &[f64],
    ratio: f64,
    flag: &str,
) -> Result<ConvertedChannel, ChannelDataError> {
    convert(raw, ratio, flag.parse()?)
}

/// Convert a channel using its own descriptor
pub fn convert_channel(
    descriptor: &AnalogChannelDescriptor,
    raw: &[f64],
) -> Result<ConvertedChannel, ChannelDataError> {
    convert(raw, descriptor.ratio(), descriptor.recorded_as())
}

/// Pick the primary or secondary sequence
pub fn select<'a>(primary: &'a [f64], secondary: &'a [f64], request: UnitDomain) -> &'a [f64] {
    match request {
        UnitDomain::Primary => primary,
        UnitDomain::Secondary => secondary,
    }
}
