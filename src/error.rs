/// Errors reported by the driver. `E` is the error type of the SPI device.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError<E> {
    /// The bus transaction failed.
    Spi(E),
    /// PROM index outside of 0..=7.
    InvalidPromAddress(u8),
    /// The CRC-4 stored in PROM word 7 does not match its contents.
    InvalidCRC,
    /// PROM coefficients read back as zero, no sensor answering.
    BlankPROM,
    /// Compensation was requested before the PROM was read.
    Uncalibrated,
    /// The ADC returned 0, i.e. no conversion had finished.
    ConversionNotReady,
}

impl<E> core::fmt::Display for DeviceError<E>
where
    E: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DeviceError::Spi(e) => write!(f, "SPI error: {:?}", e),
            DeviceError::InvalidPromAddress(address) => {
                write!(f, "PROM address {} out of range", address)
            }
            DeviceError::InvalidCRC => f.write_str("PROM CRC mismatch"),
            DeviceError::BlankPROM => f.write_str("PROM coefficients are blank"),
            DeviceError::Uncalibrated => f.write_str("device not calibrated"),
            DeviceError::ConversionNotReady => f.write_str("ADC conversion not ready"),
        }
    }
}
