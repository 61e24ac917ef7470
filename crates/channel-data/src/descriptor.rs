//! Analog Channel Descriptor

use crate::domain::UnitDomain;
use crate::error::ChannelDataError;
use serde::Serialize;

/// Instrument transformer ratings and recording domain of one analog channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalogChannelDescriptor {
    primary_rating: f64,
    secondary_rating: f64,
    recorded_as: UnitDomain,
    /// Channel identifier as given by the recorder
    pub name: Option<String>,
    /// Engineering unit of the recorded values (e.g. "kV", "A")
    pub unit: Option<String>,
}

impl AnalogChannelDescriptor {
    /// Create a descriptor from CT/VT ratings and the domain the samples were recorded in
    pub fn new(
        primary_rating: f64,
        secondary_rating: f64,
        recorded_as: UnitDomain,
    ) -> Result<Self, ChannelDataError> {
        validate_rating("primary", primary_rating)?;
        validate_rating("secondary", secondary_rating)?;

        let descriptor = Self {
            primary_rating,
            secondary_rating,
            recorded_as,
            name: None,
            unit: None,
        };
        // Two tiny ratings can still overflow or underflow the quotient
        validate_ratio(descriptor.ratio())?;
        Ok(descriptor)
    }

    /// Create a descriptor from the raw recorder flag (`P`/`S`, any case)
    pub fn from_flag(
        primary_rating: f64,
        secondary_rating: f64,
        flag: &str,
    ) -> Result<Self, ChannelDataError> {
        Self::new(primary_rating, secondary_rating, flag.parse()?)
    }

    /// Attach the channel name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach the engineering unit
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn primary_rating(&self) -> f64 {
        self.primary_rating
    }

    pub fn secondary_rating(&self) -> f64 {
        self.secondary_rating
    }

    /// Domain the raw samples are expressed in
    pub fn recorded_as(&self) -> UnitDomain {
        self.recorded_as
    }

    /// Transformation ratio, primary over secondary
    pub fn ratio(&self) -> f64 {
        self.primary_rating / self.secondary_rating
    }
}

fn validate_rating(field: &'static str, value: f64) -> Result<(), ChannelDataError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ChannelDataError::InvalidRating { field, value })
    }
}

/// Check that a transformation ratio is usable for scaling
pub fn validate_ratio(ratio: f64) -> Result<(), ChannelDataError> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(())
    } else {
        Err(ChannelDataError::InvalidRatio(ratio))
    }
}
