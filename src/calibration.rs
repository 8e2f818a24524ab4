use crate::measurement::RawMeasurement;

/// Oversampling Ratio
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OversamplingRatio {
    OSR256,
    OSR512,
    OSR1024,
    OSR2048,
    #[default]
    OSR4096,
}

impl OversamplingRatio {
    pub fn value(&self) -> u8 {
        match *self {
            OversamplingRatio::OSR256 => 0x00,
            OversamplingRatio::OSR512 => 0x02,
            OversamplingRatio::OSR1024 => 0x04,
            OversamplingRatio::OSR2048 => 0x06,
            OversamplingRatio::OSR4096 => 0x08,
        }
    }

    /// Maximum conversion time in MICROSECONDS.
    pub fn delay_us(&self) -> u32 {
        // datasheet max: 0.54 / 1.06 / 2.08 / 4.13 / 8.22 ms, padded
        match *self {
            OversamplingRatio::OSR256 => 600,
            OversamplingRatio::OSR512 => 1_170,
            OversamplingRatio::OSR1024 => 2_280,
            OversamplingRatio::OSR2048 => 4_540,
            OversamplingRatio::OSR4096 => 9_040,
        }
    }
}

/// Sensor family member. The members share the command set but scale the
/// calibration coefficients differently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    #[default]
    Ms5611,
    Ms5607,
}

/// Power-of-two exponents of the first order compensation.
struct Exponents {
    off_t1: u32,
    tco: u32,
    sens_t1: u32,
    tcs: u32,
}

impl Variant {
    fn exponents(&self) -> Exponents {
        match *self {
            Variant::Ms5611 => Exponents {
                off_t1: 16,
                tco: 7,
                sens_t1: 15,
                tcs: 8,
            },
            Variant::Ms5607 => Exponents {
                off_t1: 17,
                tco: 6,
                sens_t1: 16,
                tcs: 7,
            },
        }
    }

    /// (T2, OFF2, SENS2) for a first order temperature below 20 °C.
    fn low_temperature_terms(&self, temp: i64, d_t: i64) -> (i64, i64, i64) {
        let t2 = d_t * d_t / (1 << 31);
        let cold = (temp - 2000).pow(2);
        let (mut off2, mut sens2) = match *self {
            Variant::Ms5611 => (5 * cold / 2, 5 * cold / 4),
            Variant::Ms5607 => (61 * cold / 16, 2 * cold),
        };
        if temp < -1500 {
            let very_cold = (temp + 1500).pow(2);
            match *self {
                Variant::Ms5611 => {
                    off2 += 7 * very_cold;
                    sens2 += 11 * very_cold / 2;
                }
                Variant::Ms5607 => {
                    off2 += 15 * very_cold;
                    sens2 += 8 * very_cold;
                }
            }
        }
        (t2, off2, sens2)
    }
}

/// Factory calibration data read from PROM
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    /// PROM[0]: Manufacturer reserved / factory data
    pub manufacturer: u16,
    /// C1: Pressure sensitivity | SENST1
    pub sens_t1: u16,
    /// C2: Pressure offset | OFFT1
    pub off_t1: u16,
    /// C3: Temperature coefficient of pressure sensitivity | TCS
    pub tcs: u16,
    /// C4: Temperature coefficient of pressure offset | TCO
    pub tco: u16,
    /// C5: Reference temperature | TREF
    pub t_ref: u16,
    /// C6: Temperature coefficient of the temperature | TEMPSENS
    pub temp_sens: u16,
    /// PROM[7]: Serial code, CRC in the low nibble
    pub serial_crc: u16,
}

impl Calibration {
    pub fn new(buf: &[u16; 8]) -> Calibration {
        Calibration {
            manufacturer: buf[0],
            sens_t1: buf[1],
            off_t1: buf[2],
            tcs: buf[3],
            tco: buf[4],
            t_ref: buf[5],
            temp_sens: buf[6],
            serial_crc: buf[7],
        }
    }

    pub fn words(&self) -> [u16; 8] {
        [
            self.manufacturer,
            self.sens_t1,
            self.off_t1,
            self.tcs,
            self.tco,
            self.t_ref,
            self.temp_sens,
            self.serial_crc,
        ]
    }

    /// CRC-4 stored in the PROM.
    pub fn stored_crc(&self) -> u8 {
        (self.serial_crc & 0x000F) as u8
    }

    pub fn is_valid(&self) -> bool {
        crc4(&self.words()) == self.stored_crc()
    }

    /// A factory trimmed part never has a zero coefficient. Zeros mean the
    /// bus read back nothing, e.g. MISO stuck low or no sensor fitted.
    pub fn has_coefficients(&self) -> bool {
        [
            self.sens_t1,
            self.off_t1,
            self.tcs,
            self.tco,
            self.t_ref,
            self.temp_sens,
        ]
        .iter()
        .all(|&c| c != 0)
    }

    /// Runs the datasheet compensation on a pressure (D1) and temperature
    /// (D2) conversion.
    pub fn compensate(
        &self,
        variant: Variant,
        d1: u32,
        d2: u32,
        second_order: bool,
    ) -> RawMeasurement {
        let exp = variant.exponents();

        let d_t = d2 as i64 - ((self.t_ref as i64) << 8);
        let mut temp = 2000 + d_t * self.temp_sens as i64 / (1 << 23);
        let mut off =
            ((self.off_t1 as i64) << exp.off_t1) + self.tco as i64 * d_t / (1 << exp.tco);
        let mut sens =
            ((self.sens_t1 as i64) << exp.sens_t1) + self.tcs as i64 * d_t / (1 << exp.tcs);

        if second_order && temp < 2000 {
            let (t2, off2, sens2) = variant.low_temperature_terms(temp, d_t);
            temp -= t2;
            off -= off2;
            sens -= sens2;
        }

        let pressure = (d1 as i64 * sens / (1 << 21) - off) / (1 << 15);

        RawMeasurement {
            pressure: pressure as i32,
            temperature: temp as i32,
        }
    }
}

/// CRC-4 over the eight PROM words as described in AN520. The CRC nibble in
/// word 7 is ignored.
pub fn crc4(prom: &[u16; 8]) -> u8 {
    let mut rem: u16 = 0;
    for (i, word) in prom.iter().enumerate() {
        let word = if i == 7 { word & 0xFF00 } else { *word };
        for byte in word.to_be_bytes() {
            rem ^= byte as u16;
            for _ in 0..8 {
                if rem & 0x8000 != 0 {
                    rem = (rem << 1) ^ 0x3000;
                } else {
                    rem <<= 1;
                }
            }
        }
    }
    ((rem >> 12) & 0x000F) as u8
}
