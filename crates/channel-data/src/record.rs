//! Parsed Disturbance Record Access

use crate::descriptor::AnalogChannelDescriptor;
use crate::error::ChannelDataError;

/// Read-only view of an already-parsed disturbance record.
///
/// Implemented by whatever decodes the recorder's configuration and data
/// files; the estimation pipeline only ever reads through this trait.
pub trait Record {
    /// Number of analog channels
    fn channel_count(&self) -> usize;

    /// Descriptor of the analog channel at `index`
    fn descriptor(&self, index: usize) -> Option<&AnalogChannelDescriptor>;

    /// Raw samples of the analog channel at `index`
    fn samples(&self, index: usize) -> Option<&[f64]>;

    /// Descriptor and samples together, or `ChannelIndexOutOfRange`
    fn channel(&self, index: usize) -> Result<(&AnalogChannelDescriptor, &[f64]), ChannelDataError> {
        match (self.descriptor(index), self.samples(index)) {
            (Some(descriptor), Some(samples)) => Ok((descriptor, samples)),
            _ => Err(ChannelDataError::ChannelIndexOutOfRange {
                index,
                count: self.channel_count(),
            }),
        }
    }
}

/// One analog channel: its descriptor plus the raw sample sequence
#[derive(Debug, Clone)]
pub struct AnalogChannel {
    pub descriptor: AnalogChannelDescriptor,
    pub samples: Vec<f64>,
}

/// In-memory record holding analog channels in recorder order
#[derive(Debug, Clone, Default)]
pub struct DisturbanceRecord {
    channels: Vec<AnalogChannel>,
}

impl DisturbanceRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a channel, returning its zero-based index
    pub fn push_channel(&mut self, descriptor: AnalogChannelDescriptor, samples: Vec<f64>) -> usize {
        self.channels.push(AnalogChannel { descriptor, samples });
        self.channels.len() - 1
    }

    /// Builder-style variant of [`push_channel`](Self::push_channel)
    pub fn with_channel(mut self, descriptor: AnalogChannelDescriptor, samples: Vec<f64>) -> Self {
        self.push_channel(descriptor, samples);
        self
    }

    pub fn channels(&self) -> &[AnalogChannel] {
        &self.channels
    }
}

impl Record for DisturbanceRecord {
    fn channel_count(&self) -> usize {
        self.channels.len()
    }

    fn descriptor(&self, index: usize) -> Option<&AnalogChannelDescriptor> {
        self.channels.get(index).map(|c| &c.descriptor)
    }

    fn samples(&self, index: usize) -> Option<&[f64]> {
        self.channels.get(index).map(|c| c.samples.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnitDomain;

    fn ct() -> AnalogChannelDescriptor {
        AnalogChannelDescriptor::new(600.0, 1.0, UnitDomain::Secondary).unwrap()
    }

    #[test]
    fn test_push_and_lookup() {
        let mut record = DisturbanceRecord::new();
        assert_eq!(record.push_channel(ct(), vec![1.0, 2.0]), 0);
        assert_eq!(record.push_channel(ct(), vec![3.0]), 1);

        assert_eq!(record.channel_count(), 2);
        let (descriptor, samples) = record.channel(1).unwrap();
        assert_eq!(descriptor.ratio(), 600.0);
        assert_eq!(samples, &[3.0]);
    }

    #[test]
    fn test_out_of_range() {
        let record = DisturbanceRecord::new().with_channel(ct(), vec![0.0]);
        assert_eq!(
            record.channel(1).unwrap_err(),
            ChannelDataError::ChannelIndexOutOfRange { index: 1, count: 1 }
        );
    }
}
