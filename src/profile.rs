//! Device profiles.
//!
//! A [`DeviceProfile`] is everything that differs between the supported
//! sensor setups: register frame layout, fault table, per-channel code
//! layout and conversion, and the bytes that start a conversion. It is
//! built once from a [`Config`] and never changes afterwards.

use crate::{
    code::CodeLayout,
    convert::{
        COLD_JUNCTION_RESOLUTION, Conversion, FALLBACK_REFERENCE_OHMS, PT100_R0, RtdCurve,
        THERMOCOUPLE_RESOLUTION,
    },
    error::ConfigError,
    fault::{self, FaultTable},
    register::{
        OPEN_CIRCUIT_DETECT, RtdConfig, RtdRegister, TC_TYPE_K, TcConfig0, TcConfig1,
        TcRegister, write_address,
    },
};

/// Reference resistor the straight-line fallback of [`RtdCurve::Quadratic`] is calibrated for, Ω
pub const DEFAULT_REFERENCE_OHMS: f32 = FALLBACK_REFERENCE_OHMS;

/// Longest configuration command any profile sends
pub const MAX_COMMAND_LEN: usize = 3;

/// Longest register frame any profile reads
pub const MAX_FRAME_LEN: usize = 8;

const RTD_SETTLE_MS: u32 = 100;
const THERMOCOUPLE_SETTLE_MS: u32 = 200;

/// Supported sensor setups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SensorType {
    /// 2-wire or 4-wire platinum RTD on a MAX31865
    Rtd = 0,
    /// 3-wire platinum RTD on a MAX31865
    Rtd3Wire = 1,
    /// Type K thermocouple with cold-junction sensing on a MAX31856
    Thermocouple = 2,
}

impl TryFrom<u8> for SensorType {
    type Error = ConfigError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(SensorType::Rtd),
            1 => Ok(SensorType::Rtd3Wire),
            2 => Ok(SensorType::Thermocouple),
            other => Err(ConfigError::UnknownSensorType(other)),
        }
    }
}

/// Chip select line the converter sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ChipSelect {
    /// CE0
    Ce0 = 0,
    /// CE1
    Ce1 = 1,
}

impl TryFrom<u8> for ChipSelect {
    type Error = ConfigError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(ChipSelect::Ce0),
            1 => Ok(ChipSelect::Ce1),
            other => Err(ConfigError::UnknownChipSelect(other)),
        }
    }
}

impl From<ChipSelect> for u8 {
    fn from(cs: ChipSelect) -> u8 {
        cs as u8
    }
}

/// Device configuration, validated into a [`DeviceProfile`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    sensor: SensorType,
    chip_select: ChipSelect,
    reference_ohms: f32,
    nominal_ohms: f32,
    curve: Option<RtdCurve>,
}

impl Config {
    /// PT100 defaults on the [`DEFAULT_REFERENCE_OHMS`] reference resistor
    #[must_use]
    pub const fn new(sensor: SensorType, chip_select: ChipSelect) -> Self {
        Self {
            sensor,
            chip_select,
            reference_ohms: DEFAULT_REFERENCE_OHMS,
            nominal_ohms: PT100_R0,
            curve: None,
        }
    }

    /// Build from raw sensor type and chip select codes
    ///
    /// # Errors
    ///
    /// Returns an error if either code is unknown
    pub fn from_raw(sensor: u8, chip_select: u8) -> Result<Self, ConfigError> {
        Ok(Self::new(
            SensorType::try_from(sensor)?,
            ChipSelect::try_from(chip_select)?,
        ))
    }

    /// Reference resistor on the board, Ω. Ignored by thermocouple profiles
    ///
    /// [`RtdCurve::Quadratic`] falls back to `code / 32 - 256` below 0 °C,
    /// which only holds for a PT100 on a 400 Ω reference. Any other
    /// reference needs [`RtdCurve::FullRange`].
    #[must_use]
    pub const fn reference_resistance(mut self, ohms: f32) -> Self {
        self.reference_ohms = ohms;
        self
    }

    /// RTD resistance at 0 °C, Ω. Ignored by thermocouple profiles
    #[must_use]
    pub const fn nominal_resistance(mut self, ohms: f32) -> Self {
        self.nominal_ohms = ohms;
        self
    }

    /// Override the RTD curve chosen for the sensor type
    #[must_use]
    pub const fn rtd_curve(mut self, curve: RtdCurve) -> Self {
        self.curve = Some(curve);
        self
    }

    /// Selected sensor type
    #[must_use]
    pub const fn sensor(&self) -> SensorType {
        self.sensor
    }

    /// Selected chip select line, for the bus layer that opens the device
    #[must_use]
    pub const fn chip_select(&self) -> ChipSelect {
        self.chip_select
    }

    #[allow(clippy::float_cmp)]
    fn fits_fallback(&self) -> bool {
        self.reference_ohms == FALLBACK_REFERENCE_OHMS && self.nominal_ohms == PT100_R0
    }

    /// Validate and build the immutable profile
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidResistance`] for a zero, negative or
    /// non-finite RTD resistance, and [`ConfigError::UnsupportedReference`]
    /// when the quadratic curve is paired with anything but a PT100 on a
    /// 400 Ω reference
    pub fn profile(&self) -> Result<DeviceProfile, ConfigError> {
        match self.sensor {
            SensorType::Rtd | SensorType::Rtd3Wire => {
                for ohms in [self.reference_ohms, self.nominal_ohms] {
                    if !ohms.is_finite() || ohms <= 0.0 {
                        return Err(ConfigError::InvalidResistance);
                    }
                }
                let three_wire = self.sensor == SensorType::Rtd3Wire;
                let curve = self.curve.unwrap_or(if three_wire {
                    RtdCurve::FullRange
                } else {
                    RtdCurve::Quadratic
                });
                if curve == RtdCurve::Quadratic && !self.fits_fallback() {
                    return Err(ConfigError::UnsupportedReference);
                }
                Ok(DeviceProfile::rtd(
                    three_wire,
                    Conversion::Rtd {
                        curve,
                        reference_ohms: self.reference_ohms,
                        nominal_ohms: self.nominal_ohms,
                    },
                ))
            }
            SensorType::Thermocouple => Ok(DeviceProfile::thermocouple()),
        }
    }
}

/// Code layout, conversion and fatal fault bits of one channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelProfile {
    /// Where the code sits in the frame
    pub code: CodeLayout,
    /// How the code becomes degrees Celsius
    pub conversion: Conversion,
    /// Status bits that invalidate this channel
    pub fatal: u8,
}

/// Immutable description of one converter setup
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceProfile {
    sensor: SensorType,
    faults: &'static FaultTable,
    read_address: u8,
    frame_len: usize,
    status_offset: usize,
    settle_ms: u32,
    init: [u8; MAX_COMMAND_LEN],
    convert: [u8; MAX_COMMAND_LEN],
    clear: [u8; MAX_COMMAND_LEN],
    command_len: usize,
    primary: ChannelProfile,
    secondary: Option<ChannelProfile>,
}

impl DeviceProfile {
    fn rtd(three_wire: bool, conversion: Conversion) -> Self {
        let mut base = RtdConfig(0);
        base.set_vbias(true);
        base.set_three_wire(three_wire);

        let mut convert = base;
        convert.set_one_shot(true);

        let mut clear = base;
        clear.set_fault_clear(true);

        let address = write_address(RtdRegister::Config);

        Self {
            sensor: if three_wire {
                SensorType::Rtd3Wire
            } else {
                SensorType::Rtd
            },
            faults: &fault::rtd::TABLE,
            read_address: RtdRegister::Config.into(),
            frame_len: 8,
            status_offset: 7,
            settle_ms: RTD_SETTLE_MS,
            init: [address, clear.0, 0],
            convert: [address, convert.0, 0],
            clear: [address, clear.0, 0],
            command_len: 2,
            primary: ChannelProfile {
                code: CodeLayout::RTD,
                conversion,
                fatal: fault::rtd::FATAL,
            },
            secondary: None,
        }
    }

    fn thermocouple() -> Self {
        let mut cr0 = TcConfig0(0);
        cr0.set_open_circuit(OPEN_CIRCUIT_DETECT);
        // FAULTCLR only acts in interrupt mode
        cr0.set_fault_mode(true);

        let mut convert = cr0;
        convert.set_one_shot(true);

        let mut clear = cr0;
        clear.set_fault_clear(true);

        let mut cr1 = TcConfig1(0);
        cr1.set_tc_type(TC_TYPE_K);

        let address = write_address(TcRegister::Cr0);

        Self {
            sensor: SensorType::Thermocouple,
            faults: &fault::thermocouple::TABLE,
            read_address: TcRegister::Cjth.into(),
            frame_len: 6,
            status_offset: 5,
            settle_ms: THERMOCOUPLE_SETTLE_MS,
            init: [address, clear.0, cr1.0],
            convert: [address, convert.0, cr1.0],
            clear: [address, clear.0, cr1.0],
            command_len: 3,
            primary: ChannelProfile {
                code: CodeLayout::THERMOCOUPLE,
                conversion: Conversion::Linear {
                    resolution: THERMOCOUPLE_RESOLUTION,
                },
                fatal: fault::thermocouple::TC_FATAL,
            },
            secondary: Some(ChannelProfile {
                code: CodeLayout::COLD_JUNCTION,
                conversion: Conversion::Linear {
                    resolution: COLD_JUNCTION_RESOLUTION,
                },
                fatal: fault::thermocouple::CJ_FATAL,
            }),
        }
    }

    /// Sensor type this profile was built for
    #[must_use]
    pub const fn sensor(&self) -> SensorType {
        self.sensor
    }

    /// Fault table applied to the status byte
    #[must_use]
    pub const fn fault_table(&self) -> &'static FaultTable {
        self.faults
    }

    /// Register the frame read starts at
    #[must_use]
    pub const fn read_address(&self) -> u8 {
        self.read_address
    }

    /// Length of one register frame
    #[must_use]
    pub const fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Offset of the fault status byte in the frame
    #[must_use]
    pub const fn status_offset(&self) -> usize {
        self.status_offset
    }

    /// Wait between starting a conversion and reading its result
    #[must_use]
    pub const fn settle_ms(&self) -> u32 {
        self.settle_ms
    }

    /// Bytes that put the converter in its idle configuration with faults cleared
    #[must_use]
    pub fn init_command(&self) -> &[u8] {
        &self.init[..self.command_len]
    }

    /// Bytes that start a single conversion
    #[must_use]
    pub fn conversion_command(&self) -> &[u8] {
        &self.convert[..self.command_len]
    }

    /// Bytes that clear latched faults
    #[must_use]
    pub fn clear_faults_command(&self) -> &[u8] {
        &self.clear[..self.command_len]
    }

    /// Main channel: the RTD, or the thermocouple
    #[must_use]
    pub const fn primary(&self) -> &ChannelProfile {
        &self.primary
    }

    /// Cold-junction channel of dual-channel profiles
    #[must_use]
    pub const fn secondary(&self) -> Option<&ChannelProfile> {
        self.secondary.as_ref()
    }
}

impl TryFrom<Config> for DeviceProfile {
    type Error = ConfigError;

    fn try_from(config: Config) -> Result<Self, Self::Error> {
        config.profile()
    }
}
