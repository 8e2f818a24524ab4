/// Compensated values in the sensor's integer units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawMeasurement {
    /// Pressure in 0.01 mbar (Pa).
    pub pressure: i32,
    /// Temperature in 0.01 °C.
    pub temperature: i32,
}

impl RawMeasurement {
    pub fn pressure_mbar(&self) -> f32 {
        self.pressure as f32 / 100.0
    }

    pub fn pressure_kpa(&self) -> f32 {
        self.pressure as f32 / 1000.0
    }

    pub fn temperature_celsius(&self) -> f32 {
        convert_raw_temperature_to_temperature(self.temperature)
    }
}

/// Pressure and temperature in engineering units.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    pub pressure_mbar: f32,
    pub temperature_c: f32,
}

impl From<RawMeasurement> for Measurement {
    fn from(raw: RawMeasurement) -> Self {
        Measurement {
            pressure_mbar: raw.pressure_mbar(),
            temperature_c: raw.temperature_celsius(),
        }
    }
}

/// Converts a compensated raw temperature (0.01 °C) to °C.
pub fn convert_raw_temperature_to_temperature(raw_temperature: i32) -> f32 {
    raw_temperature as f32 / 100.0
}
