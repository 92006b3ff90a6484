/// Error type for driver operations
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the converter
    Communication(E),
    /// The frame read back could not be turned into a temperature
    Decode(DecodeError),
}

impl<E> From<DecodeError> for Error<E> {
    fn from(err: DecodeError) -> Self {
        Error::Decode(err)
    }
}

/// Rejected device configuration. Raised before any bus traffic happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Raw sensor type code with no matching profile
    UnknownSensorType(u8),
    /// Raw chip select code with no matching line
    UnknownChipSelect(u8),
    /// Reference or nominal resistance is zero, negative or not finite
    InvalidResistance,
    /// Quadratic RTD curve on a reference its straight-line fallback does not fit
    UnsupportedReference,
}

/// Numeric failure while solving for temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MathError {
    /// The quadratic Callendar-Van Dusen discriminant is below zero
    NegativeDiscriminant,
    /// A conversion produced NaN or an infinite value
    NonFinite,
    /// The full-range root finder did not settle
    NoConvergence,
}

/// Failure decoding a register frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Frame length does not match the device profile
    FrameLength {
        /// Length the profile requires
        expected: usize,
        /// Length supplied
        actual: usize,
    },
    /// Temperature solve failed
    Math(MathError),
}

impl From<MathError> for DecodeError {
    fn from(err: MathError) -> Self {
        DecodeError::Math(err)
    }
}
