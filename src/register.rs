//! Register addresses for the MAX31865 and MAX31856.
//!
//! Both chips address registers with a single byte. Bit 7 clear reads,
//! bit 7 set writes.

/// Bit OR-ed into a register address to turn a read into a write
pub const WRITE_BIT: u8 = 0x80;

/// MAX31865 RTD-to-digital converter registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u8)]
pub enum RtdRegister {
    /// Configuration
    Config = 0x00,
    /// RTD resistance data MSB
    RtdMsb = 0x01,
    /// RTD resistance data LSB, bit 0 is the fault flag
    RtdLsb = 0x02,
    /// High fault threshold MSB
    HighFaultMsb = 0x03,
    /// High fault threshold LSB
    HighFaultLsb = 0x04,
    /// Low fault threshold MSB
    LowFaultMsb = 0x05,
    /// Low fault threshold LSB
    LowFaultLsb = 0x06,
    /// Fault status
    FaultStatus = 0x07,
}

/// MAX31856 thermocouple-to-digital converter registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
#[repr(u8)]
pub enum TcRegister {
    /// Configuration 0
    Cr0 = 0x00,
    /// Configuration 1
    Cr1 = 0x01,
    /// Fault mask
    Mask = 0x02,
    /// Cold-junction high fault threshold
    Cjhf = 0x03,
    /// Cold-junction low fault threshold
    Cjlf = 0x04,
    /// Linearized temperature high fault threshold MSB
    Lthfth = 0x05,
    /// Linearized temperature high fault threshold LSB
    Lthftl = 0x06,
    /// Linearized temperature low fault threshold MSB
    Ltlfth = 0x07,
    /// Linearized temperature low fault threshold LSB
    Ltlftl = 0x08,
    /// Cold-junction temperature offset
    Cjto = 0x09,
    /// Cold-junction temperature MSB
    Cjth = 0x0A,
    /// Cold-junction temperature LSB
    Cjtl = 0x0B,
    /// Linearized thermocouple temperature byte 2
    Ltcbh = 0x0C,
    /// Linearized thermocouple temperature byte 1
    Ltcbm = 0x0D,
    /// Linearized thermocouple temperature byte 0
    Ltcbl = 0x0E,
    /// Fault status
    Sr = 0x0F,
}

impl From<RtdRegister> for u8 {
    fn from(reg: RtdRegister) -> u8 {
        reg as u8
    }
}

impl From<TcRegister> for u8 {
    fn from(reg: TcRegister) -> u8 {
        reg as u8
    }
}

/// Address byte that starts a write at `register`
#[must_use]
pub fn write_address(register: impl Into<u8>) -> u8 {
    register.into() | WRITE_BIT
}

bitfield::bitfield! {
    /// MAX31865 CONFIG
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct RtdConfig(u8);
    impl Debug;
    u8;
    /// Bias voltage on
    pub vbias, set_vbias: 7;
    /// Automatic conversion mode
    pub auto_convert, set_auto_convert: 6;
    /// Start a single conversion. Self-clearing
    pub one_shot, set_one_shot: 5;
    /// 3-wire RTD connection
    ///
    /// - `0` = 2-wire or 4-wire
    /// - `1` = 3-wire
    pub three_wire, set_three_wire: 4;
    /// Fault detection cycle control
    pub fault_cycle, set_fault_cycle: 3, 2;
    /// Clear latched fault status. Self-clearing
    pub fault_clear, set_fault_clear: 1;
    /// Mains filter
    ///
    /// - `0` = 60 Hz
    /// - `1` = 50 Hz
    pub filter_50hz, set_filter_50hz: 0;
}

bitfield::bitfield! {
    /// MAX31856 CR0
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct TcConfig0(u8);
    impl Debug;
    u8;
    /// Automatic conversion mode
    pub auto_convert, set_auto_convert: 7;
    /// Start a single conversion. Self-clearing
    pub one_shot, set_one_shot: 6;
    /// Open-circuit fault detection mode
    pub open_circuit, set_open_circuit: 5, 4;
    /// Disable the internal cold-junction sensor
    pub cj_disable, set_cj_disable: 3;
    /// Fault mode
    ///
    /// - `0` = comparator
    /// - `1` = interrupt
    pub fault_mode, set_fault_mode: 2;
    /// Clear latched faults in interrupt mode
    pub fault_clear, set_fault_clear: 1;
    /// Mains filter
    ///
    /// - `0` = 60 Hz
    /// - `1` = 50 Hz
    pub filter_50hz, set_filter_50hz: 0;
}

bitfield::bitfield! {
    /// MAX31856 CR1
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct TcConfig1(u8);
    impl Debug;
    u8;
    /// Averaging mode, 2^n samples up to 16
    pub averaging, set_averaging: 6, 4;
    /// Thermocouple type. `0x3` = type K
    pub tc_type, set_tc_type: 3, 0;
}

/// MAX31856 CR1 thermocouple type code for a type K junction
pub const TC_TYPE_K: u8 = 0x03;

/// MAX31856 CR0 open-circuit mode for source impedance below 5 kΩ
pub const OPEN_CIRCUIT_DETECT: u8 = 0b01;
