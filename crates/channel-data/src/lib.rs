//! Disturbance Record Channel Data
//!
//! Analog channel descriptors, the primary/secondary unit domain and the
//! conversion between the two sides of a CT or VT.

mod converter;
mod descriptor;
mod domain;
mod error;
mod record;

pub use converter::{convert, convert_channel, convert_with_flag, select, ConvertedChannel};
pub use descriptor::{validate_ratio, AnalogChannelDescriptor};
pub use domain::UnitDomain;
pub use error::ChannelDataError;
pub use record::{AnalogChannel, DisturbanceRecord, Record};
