//! Fault status decoding.
//!
//! Every bit set in a status byte is reported. Several wiring faults can
//! latch at once, so nothing stops at the first match.

/// One named status bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultEntry {
    /// Bit in the status byte
    pub mask: u8,
    /// Human readable description
    pub name: &'static str,
}

/// Fixed bitmask-to-name table for one converter
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultTable {
    entries: &'static [FaultEntry],
}

impl FaultTable {
    /// Build a table from its entries
    #[must_use]
    pub const fn new(entries: &'static [FaultEntry]) -> Self {
        Self { entries }
    }

    /// Entries in table order
    #[must_use]
    pub const fn entries(&self) -> &'static [FaultEntry] {
        self.entries
    }

    /// Name of the entry for `mask`, if the table has one
    #[must_use]
    pub fn name(&self, mask: u8) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|entry| entry.mask == mask)
            .map(|entry| entry.name)
    }

    /// Classify a status byte against this table
    #[must_use]
    pub fn classify(&'static self, status: u8) -> Faults {
        classify(status, self)
    }
}

/// MAX31865 fault status bits
pub mod rtd {
    use super::{FaultEntry, FaultTable};

    /// RTD value above the high fault threshold
    pub const HIGH_THRESHOLD: u8 = 0x80;
    /// RTD value below the low fault threshold
    pub const LOW_THRESHOLD: u8 = 0x40;
    /// REFIN- above 0.85 x VBIAS
    pub const REFIN_HIGH: u8 = 0x20;
    /// REFIN- below 0.85 x VBIAS, FORCE- open
    pub const REFIN_LOW: u8 = 0x10;
    /// RTDIN- below 0.85 x VBIAS, FORCE- open
    pub const RTDIN_LOW: u8 = 0x08;
    /// Over or under voltage on an input
    pub const OVER_UNDER_VOLTAGE: u8 = 0x04;

    /// Bits that make the RTD value meaningless
    pub const FATAL: u8 = REFIN_HIGH | REFIN_LOW | RTDIN_LOW | OVER_UNDER_VOLTAGE;

    /// Fault table of the MAX31865
    pub static TABLE: FaultTable = FaultTable::new(&[
        FaultEntry { mask: HIGH_THRESHOLD, name: "High threshold" },
        FaultEntry { mask: LOW_THRESHOLD, name: "Low threshold" },
        FaultEntry { mask: REFIN_HIGH, name: "REFIN- > 0.85 x Bias" },
        FaultEntry { mask: REFIN_LOW, name: "REFIN- < 0.85 x Bias - FORCE- open" },
        FaultEntry { mask: RTDIN_LOW, name: "RTDIN- < 0.85 x Bias - FORCE- open" },
        FaultEntry { mask: OVER_UNDER_VOLTAGE, name: "Under/Over voltage" },
    ]);
}

/// MAX31856 fault status bits
pub mod thermocouple {
    use super::{FaultEntry, FaultTable};

    /// Cold-junction temperature outside the operating range
    pub const CJ_RANGE: u8 = 0x80;
    /// Thermocouple temperature outside the range of the selected type
    pub const TC_RANGE: u8 = 0x40;
    /// Cold junction above its high threshold
    pub const CJ_HIGH: u8 = 0x20;
    /// Cold junction below its low threshold
    pub const CJ_LOW: u8 = 0x10;
    /// Thermocouple above its high threshold
    pub const TC_HIGH: u8 = 0x08;
    /// Thermocouple below its low threshold
    pub const TC_LOW: u8 = 0x04;
    /// Over or under voltage on the thermocouple inputs
    pub const OVER_UNDER_VOLTAGE: u8 = 0x02;
    /// Thermocouple open circuit
    pub const OPEN_CIRCUIT: u8 = 0x01;

    /// Bits that make the thermocouple value meaningless
    pub const TC_FATAL: u8 = TC_RANGE | OVER_UNDER_VOLTAGE | OPEN_CIRCUIT;
    /// Bits that make the cold-junction value meaningless
    pub const CJ_FATAL: u8 = CJ_RANGE | OVER_UNDER_VOLTAGE;

    /// Fault table of the MAX31856
    pub static TABLE: FaultTable = FaultTable::new(&[
        FaultEntry { mask: CJ_RANGE, name: "Cold junction out of range" },
        FaultEntry { mask: TC_RANGE, name: "Thermocouple out of range" },
        FaultEntry { mask: CJ_HIGH, name: "Cold junction high" },
        FaultEntry { mask: CJ_LOW, name: "Cold junction low" },
        FaultEntry { mask: TC_HIGH, name: "Thermocouple high" },
        FaultEntry { mask: TC_LOW, name: "Thermocouple low" },
        FaultEntry { mask: OVER_UNDER_VOLTAGE, name: "Over/under voltage" },
        FaultEntry { mask: OPEN_CIRCUIT, name: "Open circuit" },
    ]);
}

/// Set of active faults decoded from one status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Faults {
    bits: u8,
    table: &'static FaultTable,
}

impl Faults {
    /// Active bits known to the table
    #[must_use]
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// `true` when no fault is active
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of active faults
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Check for any bit of `mask`
    #[must_use]
    pub const fn contains(&self, mask: u8) -> bool {
        self.bits & mask != 0
    }

    /// Check whether a fault with this name is active
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    /// Active entries in table order
    pub fn iter(&self) -> impl Iterator<Item = &'static FaultEntry> + use<> {
        let bits = self.bits;
        self.table
            .entries()
            .iter()
            .filter(move |entry| bits & entry.mask != 0)
    }

    /// Names of the active faults in table order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + use<> {
        self.iter().map(|entry| entry.name)
    }
}

/// Collect every table entry whose bit is set in `status`.
///
/// Bits with no table entry are dropped. A zero byte yields an empty set.
#[must_use]
pub fn classify(status: u8, table: &'static FaultTable) -> Faults {
    let bits = table
        .entries()
        .iter()
        .filter(|entry| status & entry.mask != 0)
        .fold(0, |acc, entry| acc | entry.mask);

    Faults { bits, table }
}
