//! BMP280 calibration coefficients and compensation functions.
//!
//! This module handles parsing and applying the factory-trimmed compensation
//! coefficients read from registers 0x88–0x9F, as described in the Bosch
//! BMP280 datasheet (BST-BMP280-DS001 rev 1.26, section 3.11 "Compensation
//! formula" and Appendix 8.2).

/// Factory-trimmed calibration coefficients (dig_T* and dig_P*) for
/// temperature and pressure compensation.
///
/// Loaded from registers 0x88–0x9F (24 bytes, little-endian) once at
/// initialization and immutable afterwards. Used as read-only input to the
/// fixed-point compensation formulas (datasheet §3.11.3).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bmp280Calib {
    /// Temperature coefficient 1 (unsigned, typical ~27000–28000)
    pub dig_t1: u16,
    /// Temperature coefficient 2 (signed)
    pub dig_t2: i16,
    /// Temperature coefficient 3 (signed)
    pub dig_t3: i16,
    /// Pressure coefficient 1 (unsigned, typical ~30000–37000)
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
}

impl Bmp280Calib {
    /// Parses the 24-byte calibration block read from register 0x88.
    pub fn from_bytes(buffer: &[u8; 24]) -> Self {
        Self {
            dig_t1: u16::from_le_bytes([buffer[0], buffer[1]]),
            dig_t2: i16::from_le_bytes([buffer[2], buffer[3]]),
            dig_t3: i16::from_le_bytes([buffer[4], buffer[5]]),
            dig_p1: u16::from_le_bytes([buffer[6], buffer[7]]),
            dig_p2: i16::from_le_bytes([buffer[8], buffer[9]]),
            dig_p3: i16::from_le_bytes([buffer[10], buffer[11]]),
            dig_p4: i16::from_le_bytes([buffer[12], buffer[13]]),
            dig_p5: i16::from_le_bytes([buffer[14], buffer[15]]),
            dig_p6: i16::from_le_bytes([buffer[16], buffer[17]]),
            dig_p7: i16::from_le_bytes([buffer[18], buffer[19]]),
            dig_p8: i16::from_le_bytes([buffer[20], buffer[21]]),
            dig_p9: i16::from_le_bytes([buffer[22], buffer[23]]),
        }
    }

    /// Compensates a raw 20-bit temperature ADC value (adc_T).
    ///
    /// Implements the 32-bit fixed-point temperature formula
    /// (datasheet §3.11.3, `bmp280_compensate_T_int32`).
    ///
    /// Returns `(t_fine, temperature × 100)` where:
    /// - `t_fine` is the intermediate fine temperature value, required as
    ///   input to [`compensate_pressure`](Self::compensate_pressure)
    /// - `temperature × 100` is in 0.01 °C units (e.g. 2358 = 23.58 °C)
    pub fn compensate_temperature(&self, adc_t: i32) -> (i32, i32) {
        let var1 = (((adc_t >> 3) - ((self.dig_t1 as i32) << 1)) * (self.dig_t2 as i32)) >> 11;
        let var2 = (((((adc_t >> 4) - (self.dig_t1 as i32))
            * ((adc_t >> 4) - (self.dig_t1 as i32)))
            >> 12)
            * (self.dig_t3 as i32))
            >> 14;

        let t_fine = var1 + var2;
        let t = (t_fine * 5 + 128) >> 8;
        (t_fine, t)
    }

    /// Compensates a raw 20-bit pressure ADC value (adc_P) using `t_fine`.
    ///
    /// Implements the 64-bit-arithmetic pressure formula
    /// (datasheet §3.11.3, `bmp280_compensate_P_int64`).
    ///
    /// Returns pressure in Pa as an unsigned 32-bit value in Q24.8
    /// fixed-point format: 24 integer bits, 8 fractional bits
    /// (e.g. 25767233 = 25767233 / 256 ≈ 100653.25 Pa).
    ///
    /// Returns 0 if the divisor degenerates (only possible with an
    /// all-zero `dig_p1`, i.e. uninitialized calibration).
    pub fn compensate_pressure(&self, adc_p: i32, t_fine: i32) -> u32 {
        let mut var1 = (t_fine as i64) - 128000;
        let mut var2 = var1 * var1 * (self.dig_p6 as i64);
        var2 += (var1 * (self.dig_p5 as i64)) << 17;
        var2 += (self.dig_p4 as i64) << 35;
        var1 = ((var1 * var1 * (self.dig_p3 as i64)) >> 8) + ((var1 * (self.dig_p2 as i64)) << 12);
        var1 = (((1i64 << 47) + var1) * (self.dig_p1 as i64)) >> 33;

        if var1 == 0 {
            return 0; // avoid division by zero
        }

        let mut p: i64 = 1048576 - adc_p as i64;
        p = (((p << 31) - var2) * 3125) / var1;
        var1 = ((self.dig_p9 as i64) * (p >> 13) * (p >> 13)) >> 25;
        var2 = ((self.dig_p8 as i64) * p) >> 19;
        p = ((p + var1 + var2) >> 8) + ((self.dig_p7 as i64) << 4);

        p as u32
    }
}
