use crate::calibration::OversamplingRatio;

pub const RESET: u8 = 0x1E;
/// D1 conversion, OSR bits are or'ed in.
pub const CONVERT_D1: u8 = 0x40;
/// D2 conversion, OSR bits are or'ed in.
pub const CONVERT_D2: u8 = 0x50;
pub const CONVERT_D1_OSR4096: u8 = 0x48;
pub const CONVERT_D2_OSR4096: u8 = 0x58;
pub const ADC_READ: u8 = 0x00;
/// PROM word `n` is read with `PROM_READ_BASE + 2 * n`.
pub const PROM_READ_BASE: u8 = 0xA0;

/// Highest valid PROM word index.
pub const PROM_MAX_ADDRESS: u8 = 7;

/// A conversion the sensor can be asked to start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Conversion {
    /// D1, digital pressure value.
    Pressure(OversamplingRatio),
    /// D2, digital temperature value.
    Temperature(OversamplingRatio),
}

impl Conversion {
    pub fn oversampling_ratio(&self) -> OversamplingRatio {
        match *self {
            Conversion::Pressure(ratio) | Conversion::Temperature(ratio) => ratio,
        }
    }

    pub fn command(&self) -> Command {
        match *self {
            Conversion::Pressure(ratio) => Command::D1Conversion(ratio),
            Conversion::Temperature(ratio) => Command::D2Conversion(ratio),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Reset,
    /// PROM word index, 0..=7. Index 0 is the manufacturer word, 7 holds the CRC.
    ReadPROM(u8),
    D1Conversion(OversamplingRatio),
    D2Conversion(OversamplingRatio),
    ReadADC, // 24 bit pressure / temperature
}

impl Command {
    pub fn value(&self) -> u8 {
        match *self {
            Command::Reset => RESET,
            Command::ReadPROM(address) => PROM_READ_BASE | ((address & PROM_MAX_ADDRESS) << 1),
            Command::D1Conversion(ratio) => CONVERT_D1 | ratio.value(),
            Command::D2Conversion(ratio) => CONVERT_D2 | ratio.value(),
            Command::ReadADC => ADC_READ,
        }
    }
}
