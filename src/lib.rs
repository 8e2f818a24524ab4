#![cfg_attr(not(test), no_std)]
//! Driver for the MS56xx family of barometric pressure sensors (MS5611-01BA,
//! MS5607-02BA) on an SPI bus.
//!
//! The driver issues the sensor's single byte commands through an
//! [`embedded_hal::spi::SpiDevice`], so chip select is handled by the device
//! implementation. Conversion and reset waits go through a
//! [`embedded_hal::delay::DelayNs`].
//!
//! ```ignore
//! let mut sensor = Ms56xx::new(spi, delay, Config::default());
//! sensor.reset()?;
//! sensor.calibrate()?;
//! let measurement = sensor.read()?;
//! ```
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{Mode, Operation, SpiDevice, MODE_0};
mod calibration;
mod command;
mod error;
mod measurement;
pub use calibration::{crc4, Calibration, OversamplingRatio, Variant};
pub use command::{
    Command, Conversion, ADC_READ, CONVERT_D1, CONVERT_D1_OSR4096, CONVERT_D2,
    CONVERT_D2_OSR4096, PROM_MAX_ADDRESS, PROM_READ_BASE, RESET,
};
pub use error::DeviceError;
pub use measurement::{convert_raw_temperature_to_temperature, Measurement, RawMeasurement};

/// SPI mode the sensor samples on. Mode 3 works as well.
pub const SPI_MODE: Mode = MODE_0;
/// Default MCU core clock (`F_CPU` on AVR builds). Not an SPI bus clock.
pub const DEFAULT_CLOCK_FREQUENCY_HZ: u32 = 8_000_000;
/// Highest SPI clock the sensor accepts.
pub const MAX_SPI_FREQUENCY_HZ: u32 = 20_000_000;

/// Reload time after a reset, 2.8 ms on the datasheet.
pub const RESET_DELAY_US: u32 = 3_000;

/// ADC results are 24 bits wide.
pub const ADC_MAX: u32 = (1 << 24) - 1;

/// Driver settings, fixed at construction apart from the OSR.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Selects the compensation exponents.
    pub variant: Variant,
    /// Used by the pressure / temperature shortcuts.
    pub oversampling_ratio: OversamplingRatio,
    /// Wait after the reset command.
    pub reset_delay_us: u32,
    /// Apply the low temperature (below 20 °C) correction.
    pub second_order: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::Ms5611,
            oversampling_ratio: OversamplingRatio::OSR4096,
            reset_delay_us: RESET_DELAY_US,
            second_order: true,
        }
    }
}

impl Config {
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_oversampling_ratio(mut self, ratio: OversamplingRatio) -> Self {
        self.oversampling_ratio = ratio;
        self
    }

    pub fn with_reset_delay_us(mut self, reset_delay_us: u32) -> Self {
        self.reset_delay_us = reset_delay_us;
        self
    }

    pub fn with_second_order(mut self, second_order: bool) -> Self {
        self.second_order = second_order;
        self
    }
}

pub struct Ms56xx<SPI, D> {
    spi: SPI,
    delay: D,
    config: Config,
    calibration: Option<Calibration>, // filled by calibrate()
}

impl<SPI, D> Ms56xx<SPI, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    /// Create a new driver instance.
    /// Clock speed must not exceed 20MHz.
    /// Accept mode 0 or 3.
    /// Does not touch the bus: call [`reset`](Self::reset) and
    /// [`calibrate`](Self::calibrate) before reading compensated values.
    pub fn new(spi: SPI, delay: D, config: Config) -> Self {
        Self {
            spi,
            delay,
            config,
            calibration: None,
        }
    }

    /// Gives back the bus device and the delay.
    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    pub fn oversampling_ratio(&self) -> OversamplingRatio {
        self.config.oversampling_ratio
    }

    pub fn set_oversampling_ratio(&mut self, ratio: OversamplingRatio) {
        self.config.oversampling_ratio = ratio;
    }

    /// Sends the reset sequence and waits for the PROM to reload.
    pub fn reset(&mut self) -> Result<(), DeviceError<SPI::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("ms56xx: reset");
        self.spi
            .write(&[Command::Reset.value()])
            .map_err(DeviceError::Spi)?;
        self.delay.delay_us(self.config.reset_delay_us);
        Ok(())
    }

    /// Reads the 16 bit PROM word at `address` (0..=7).
    pub fn read_prom(&mut self, address: u8) -> Result<u16, DeviceError<SPI::Error>> {
        if address > PROM_MAX_ADDRESS {
            return Err(DeviceError::InvalidPromAddress(address));
        }
        let mut buf = [0u8; 2];
        self.spi
            .transaction(&mut [
                Operation::Write(&[Command::ReadPROM(address).value()]),
                Operation::Read(&mut buf),
            ])
            .map_err(DeviceError::Spi)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Every module is individually factory calibrated at two temperatures and two pressures. As a result, 6 coefficients
    /// necessary to compensate for process variations and temperature variations are calculated and stored in the 128-
    /// bit PROM of each module. These bits (partitioned into 6 coefficients) must be read by the microcontroller software
    /// and used in the program converting D1 and D2 into compensated pressure and temperature values.
    /// Only needs to be called once.
    pub fn calibrate(&mut self) -> Result<Calibration, DeviceError<SPI::Error>> {
        let mut words = [0u16; 8];
        for (address, word) in (0u8..).zip(words.iter_mut()) {
            *word = self.read_prom(address)?;
        }

        let calibration = Calibration::new(&words);
        if !calibration.is_valid() {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "ms56xx: PROM CRC mismatch, stored {=u8} computed {=u8}",
                calibration.stored_crc(),
                crc4(&words)
            );
            return Err(DeviceError::InvalidCRC);
        }
        if !calibration.has_coefficients() {
            #[cfg(feature = "defmt")]
            defmt::warn!("ms56xx: PROM reads back blank");
            return Err(DeviceError::BlankPROM);
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("ms56xx: calibration {}", calibration);
        self.calibration = Some(calibration);
        Ok(calibration)
    }

    /// Starts `conversion`, waits for it to finish and reads the 24 bit ADC result.
    pub fn read_raw_uncompensated_data(
        &mut self,
        conversion: Conversion,
    ) -> Result<u32, DeviceError<SPI::Error>> {
        self.spi
            .write(&[conversion.command().value()])
            .map_err(DeviceError::Spi)?;
        self.delay
            .delay_us(conversion.oversampling_ratio().delay_us());

        let mut buf = [0u8; 3];
        self.spi
            .transaction(&mut [
                Operation::Write(&[Command::ReadADC.value()]),
                Operation::Read(&mut buf),
            ])
            .map_err(DeviceError::Spi)?;

        // The ADC reads back 0 when no conversion has completed.
        let raw = u32::from_be_bytes([0, buf[0], buf[1], buf[2]]);
        #[cfg(feature = "defmt")]
        defmt::trace!("ms56xx: {} -> {=u32}", conversion, raw);
        if raw == 0 {
            return Err(DeviceError::ConversionNotReady);
        }
        Ok(raw)
    }

    /// D1
    pub fn read_raw_uncompensated_pressure(&mut self) -> Result<u32, DeviceError<SPI::Error>> {
        self.read_raw_uncompensated_data(Conversion::Pressure(self.config.oversampling_ratio))
    }

    /// D2
    pub fn read_raw_uncompensated_temperature(&mut self) -> Result<u32, DeviceError<SPI::Error>> {
        self.read_raw_uncompensated_data(Conversion::Temperature(self.config.oversampling_ratio))
    }

    /// Applies the calibration to a D1/D2 pair.
    pub fn convert_raw_uncompensated_data_to_raw_pressure(
        &self,
        d1: u32,
        d2: u32,
    ) -> Result<RawMeasurement, DeviceError<SPI::Error>> {
        let calibration = self.calibration.as_ref().ok_or(DeviceError::Uncalibrated)?;
        Ok(calibration.compensate(self.config.variant, d1, d2, self.config.second_order))
    }

    /// Runs a pressure then a temperature conversion and compensates them.
    pub fn read_raw_pressure(&mut self) -> Result<RawMeasurement, DeviceError<SPI::Error>> {
        if self.calibration.is_none() {
            return Err(DeviceError::Uncalibrated);
        }
        let d1 = self.read_raw_uncompensated_pressure()?;
        let d2 = self.read_raw_uncompensated_temperature()?;
        self.convert_raw_uncompensated_data_to_raw_pressure(d1, d2)
    }

    pub fn convert_raw_temperature_to_temperature(&self, raw_temperature: i32) -> f32 {
        convert_raw_temperature_to_temperature(raw_temperature)
    }

    /// Pressure in mbar and temperature in °C.
    pub fn read(&mut self) -> Result<Measurement, DeviceError<SPI::Error>> {
        self.read_raw_pressure().map(Measurement::from)
    }
}
