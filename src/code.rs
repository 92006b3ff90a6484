//! ADC code extraction from raw register bytes.

/// Where an ADC code sits inside a register frame and how wide it is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CodeLayout {
    /// Offset of the most significant byte
    pub offset: usize,
    /// Number of bytes combined, 2 or 3
    pub bytes: u8,
    /// Low-order don't-care bits shifted out
    pub shift: u8,
    /// Width of the code after the shift
    pub width: u8,
    /// Two's complement code
    pub signed: bool,
}

impl CodeLayout {
    /// 15-bit unsigned MAX31865 RTD code, bit 0 of the LSB is the fault flag
    pub const RTD: Self = Self::new(1, 2, 1, 15, false);
    /// 14-bit signed MAX31856 cold-junction code
    pub const COLD_JUNCTION: Self = Self::new(0, 2, 2, 14, true);
    /// 19-bit signed MAX31856 linearized thermocouple code
    pub const THERMOCOUPLE: Self = Self::new(2, 3, 5, 19, true);

    /// Describe a code layout
    #[must_use]
    pub const fn new(offset: usize, bytes: u8, shift: u8, width: u8, signed: bool) -> Self {
        Self {
            offset,
            bytes,
            shift,
            width,
            signed,
        }
    }

    /// Same layout at another frame offset
    #[must_use]
    pub const fn at(self, offset: usize) -> Self {
        Self { offset, ..self }
    }

    /// Last frame index the layout touches, plus one
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.bytes as usize
    }

    /// Pull the code out of `frame`.
    ///
    /// Bytes are most significant first. Returns `None` when the frame is
    /// too short to hold the code.
    #[must_use]
    pub fn extract(&self, frame: &[u8]) -> Option<AdcCode> {
        let raw = frame
            .get(self.offset..self.end())?
            .iter()
            .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte));

        Some(AdcCode(sign_extend(raw >> self.shift, self.width, self.signed)))
    }
}

/// Signed ADC code, valid for one conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcCode(i32);

impl AdcCode {
    /// Wrap an already extracted code
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Raw integer value
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl From<AdcCode> for i32 {
    fn from(code: AdcCode) -> i32 {
        code.0
    }
}

/// Mask `value` to `width` bits and apply two's complement when `signed`
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub const fn sign_extend(value: u32, width: u8, signed: bool) -> i32 {
    let full = 1u32 << width;
    let value = value & (full - 1);

    if signed && value & (full >> 1) != 0 {
        value as i32 - full as i32
    } else {
        value as i32
    }
}
