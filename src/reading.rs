//! Register frame decoding.

use crate::{
    error::DecodeError,
    fault::{Faults, classify},
    profile::{ChannelProfile, DeviceProfile, MAX_FRAME_LEN},
};

/// Bytes returned by one register read, fixed length per profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterFrame {
    bytes: [u8; MAX_FRAME_LEN],
    len: usize,
}

impl RegisterFrame {
    /// Copy a frame out of `bytes`
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::FrameLength`] when `bytes` does not have the
    /// length `profile` reads
    pub fn new(bytes: &[u8], profile: &DeviceProfile) -> Result<Self, DecodeError> {
        let expected = profile.frame_len();
        if bytes.len() != expected {
            return Err(DecodeError::FrameLength {
                expected,
                actual: bytes.len(),
            });
        }

        let mut frame = [0u8; MAX_FRAME_LEN];
        frame[..expected].copy_from_slice(bytes);
        Ok(Self {
            bytes: frame,
            len: expected,
        })
    }

    /// Frame bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl AsRef<[u8]> for RegisterFrame {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Value of one channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelReading {
    /// Converted temperature, °C
    Celsius(f32),
    /// A fatal fault for this channel is latched, no value was produced
    Faulted,
}

impl ChannelReading {
    /// Temperature, if the channel was not faulted
    #[must_use]
    pub const fn celsius(self) -> Option<f32> {
        match self {
            ChannelReading::Celsius(value) => Some(value),
            ChannelReading::Faulted => None,
        }
    }
}

/// Output of one read cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TemperatureReading {
    primary: ChannelReading,
    secondary: Option<ChannelReading>,
    faults: Faults,
}

impl TemperatureReading {
    /// RTD or thermocouple channel
    #[must_use]
    pub const fn primary(&self) -> ChannelReading {
        self.primary
    }

    /// Cold-junction channel, only on dual-channel profiles
    #[must_use]
    pub const fn cold_junction(&self) -> Option<ChannelReading> {
        self.secondary
    }

    /// RTD or thermocouple temperature, `None` when faulted
    #[must_use]
    pub const fn celsius(&self) -> Option<f32> {
        self.primary.celsius()
    }

    /// Cold-junction temperature, `None` when absent or faulted
    #[must_use]
    pub const fn cold_junction_celsius(&self) -> Option<f32> {
        match self.secondary {
            Some(channel) => channel.celsius(),
            None => None,
        }
    }

    /// Every fault latched in the status byte, fatal or not
    #[must_use]
    pub const fn faults(&self) -> &Faults {
        &self.faults
    }
}

fn channel(
    frame: &[u8],
    profile: &ChannelProfile,
    faults: &Faults,
) -> Result<ChannelReading, DecodeError> {
    if faults.contains(profile.fatal) {
        return Ok(ChannelReading::Faulted);
    }

    let code = profile.code.extract(frame).ok_or(DecodeError::FrameLength {
        expected: profile.code.end(),
        actual: frame.len(),
    })?;

    Ok(ChannelReading::Celsius(profile.conversion.apply(code)?))
}

/// Decode one frame.
///
/// Faults never abort the decode. Channels hit by a fatal fault come back
/// as [`ChannelReading::Faulted`], the rest are converted, and the full
/// fault set is returned with them.
///
/// # Errors
///
/// Returns an error if the frame length does not match the profile or a
/// conversion fails numerically
pub fn decode(frame: &[u8], profile: &DeviceProfile) -> Result<TemperatureReading, DecodeError> {
    let frame = RegisterFrame::new(frame, profile)?;
    decode_frame(&frame, profile)
}

/// Decode a frame already checked against `profile`
///
/// # Errors
///
/// Returns an error if a conversion fails numerically
pub fn decode_frame(
    frame: &RegisterFrame,
    profile: &DeviceProfile,
) -> Result<TemperatureReading, DecodeError> {
    let bytes = frame.as_bytes();
    let status = bytes
        .get(profile.status_offset())
        .copied()
        .ok_or(DecodeError::FrameLength {
            expected: profile.frame_len(),
            actual: bytes.len(),
        })?;
    let faults = classify(status, profile.fault_table());

    let primary = channel(bytes, profile.primary(), &faults)?;
    let secondary = profile
        .secondary()
        .map(|secondary| channel(bytes, secondary, &faults))
        .transpose()?;

    Ok(TemperatureReading {
        primary,
        secondary,
        faults,
    })
}
