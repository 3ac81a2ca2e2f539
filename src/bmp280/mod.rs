//! Forced-mode BMP280 driver over SPI.
//!
//! The driver owns the SPI bus handle and the chip-select pin and speaks the
//! sensor's SPI register protocol directly: CS low, address byte (bit 7 set
//! for reads, cleared for writes), data bytes, CS high. Reads clock one 0x00
//! dummy byte per requested byte. The bus must be configured for
//! [`SPI_MODE`] (mode 0) by the caller.
//!
//! Every sample is a single-shot forced conversion; the sensor sleeps
//! between calls. A failed transfer is surfaced as an error, but bit errors
//! inside a transfer the bus reports as successful are not detectable and
//! come out as garbage numbers. The logger tolerates that for periodic
//! sampling.

pub mod calibration;
pub mod config;
pub mod registers;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{Mode, SpiBus, MODE_0};

use crate::bmp280::{
    calibration::Bmp280Calib,
    config::{Bmp280Config, PowerMode},
    registers::{
        Bmp280Register, BMP280_CHIP_ID, BMP280_RESET_REG_VALUE, SPI_READ_FLAG, SPI_WRITE_MASK,
    },
};

/// SPI mode the BMP280 is driven in. The sensor also supports mode 3, but
/// this driver assumes the bus is set up for mode 0.
pub const SPI_MODE: Mode = MODE_0;

/// Largest burst this driver performs: the 24-byte calibration block,
/// plus one address byte.
const MAX_TRANSFER: usize = 25;

/// Milliseconds to wait after a soft reset before the device responds.
const RESET_SETTLE_MS: u32 = 10;

/// Possible errors during BMP280 operation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bmp280Error<SPI, CS> {
    /// An SPI transfer failed
    Spi(SPI),
    /// Driving the chip-select pin failed
    Pin(CS),
    /// Chip ID register did not read 0x58 (not a BMP280); carries the
    /// value actually read
    ChipIdMismatch(u8),
}

/// One compensated sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Temperature in 0.01 °C units (2358 = 23.58 °C)
    pub temperature: i32,
    /// Pressure in Pa, Q24.8 fixed point (25767233 ≈ 100653.25 Pa)
    pub pressure: u32,
}

impl Measurement {
    pub fn temperature_celsius(&self) -> f32 {
        self.temperature as f32 / 100.0
    }

    pub fn pressure_pascals(&self) -> f32 {
        self.pressure as f32 / 256.0
    }
}

/// BMP280 driver instance (blocking SPI, forced mode).
///
/// Owns the bus handle, the chip-select pin and the calibration data.
pub struct Bmp280<SPI, CS> {
    spi: SPI,
    cs: CS,
    config: Bmp280Config,
    /// Loaded factory calibration coefficients, valid after [`begin`](Self::begin)
    pub calib: Bmp280Calib,
}

impl<SPI, CS> Bmp280<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    /// Creates a new driver instance with the default (weather preset)
    /// configuration and deasserts chip select.
    ///
    /// The bus must already be configured for [`SPI_MODE`].
    pub fn new(spi: SPI, cs: CS) -> Result<Self, Bmp280Error<SPI::Error, CS::Error>> {
        Self::with_config(spi, cs, Bmp280Config::default())
    }

    /// Same as [`new`](Self::new) with an explicit configuration.
    pub fn with_config(
        spi: SPI,
        mut cs: CS,
        config: Bmp280Config,
    ) -> Result<Self, Bmp280Error<SPI::Error, CS::Error>> {
        cs.set_high().map_err(Bmp280Error::Pin)?;
        Ok(Self {
            spi,
            cs,
            config,
            calib: Bmp280Calib::default(),
        })
    }

    /// Initializes the sensor for forced-mode operation.
    ///
    /// Sequence:
    /// 1. Soft reset (0xE0 ← 0xB6), wait ~10 ms
    /// 2. Verify chip ID (0xD0 == 0x58)
    /// 3. Read the 24-byte calibration block (0x88–0x9F)
    /// 4. Write the config register (0xF5); the device stays asleep until
    ///    the first forced trigger
    ///
    /// Must complete successfully before [`do_forced_read`](Self::do_forced_read);
    /// the driver does not enforce the ordering itself.
    ///
    /// # Errors
    /// Returns `Bmp280Error` on any transport failure or chip ID mismatch.
    /// No retry is attempted.
    pub fn begin(&mut self, delay: &mut impl DelayNs) -> Result<(), Bmp280Error<SPI::Error, CS::Error>> {
        self.write_register(Bmp280Register::Reset, BMP280_RESET_REG_VALUE)?;
        delay.delay_ms(RESET_SETTLE_MS);

        let id = self.read_register(Bmp280Register::Id)?;
        if id != BMP280_CHIP_ID {
            return Err(Bmp280Error::ChipIdMismatch(id));
        }

        let mut block = [0u8; 24];
        self.read_registers(Bmp280Register::CalibStart, &mut block)?;
        self.calib = Bmp280Calib::from_bytes(&block);

        self.write_register(Bmp280Register::Config, self.config.config_value())?;
        Ok(())
    }

    /// Triggers one forced conversion and returns the compensated sample.
    ///
    /// Writes ctrl_meas (0xF4) with the forced-mode bits, waits the
    /// worst-case conversion time for the configured oversampling, then
    /// burst-reads the six data registers starting at 0xF7 and applies the
    /// Bosch compensation formulas.
    pub fn do_forced_read(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<Measurement, Bmp280Error<SPI::Error, CS::Error>> {
        self.write_register(
            Bmp280Register::CtrlMeas,
            self.config.ctrl_meas_value(PowerMode::Forced),
        )?;
        delay.delay_us(self.config.max_measurement_micros());

        let mut data = [0u8; 6];
        self.read_registers(Bmp280Register::PressMsb, &mut data)?;

        // 20-bit raw values: msb<<12 | lsb<<4 | xlsb>>4
        let adc_p = ((data[0] as i32) << 12) | ((data[1] as i32) << 4) | ((data[2] as i32) >> 4);
        let adc_t = ((data[3] as i32) << 12) | ((data[4] as i32) << 4) | ((data[5] as i32) >> 4);

        let (t_fine, temperature) = self.calib.compensate_temperature(adc_t);
        let pressure = self.calib.compensate_pressure(adc_p, t_fine);

        Ok(Measurement {
            temperature,
            pressure,
        })
    }

    /// Consumes the driver and hands the bus and chip-select pin back.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Reads one register.
    fn read_register(&mut self, reg: Bmp280Register) -> Result<u8, Bmp280Error<SPI::Error, CS::Error>> {
        let mut value = [0u8; 1];
        self.read_registers(reg, &mut value)?;
        Ok(value[0])
    }

    /// Burst-reads `out.len()` registers starting at `reg`.
    ///
    /// One full-duplex transfer: the address byte with the read flag set,
    /// followed by one 0x00 dummy byte clocked per requested byte.
    fn read_registers(
        &mut self,
        reg: Bmp280Register,
        out: &mut [u8],
    ) -> Result<(), Bmp280Error<SPI::Error, CS::Error>> {
        let len = out.len() + 1;
        debug_assert!(len <= MAX_TRANSFER);
        let mut frame = [0u8; MAX_TRANSFER];
        frame[0] = reg as u8 | SPI_READ_FLAG;

        self.cs.set_low().map_err(Bmp280Error::Pin)?;
        self.spi
            .transfer_in_place(&mut frame[..len])
            .map_err(Bmp280Error::Spi)?;
        self.spi.flush().map_err(Bmp280Error::Spi)?;
        self.cs.set_high().map_err(Bmp280Error::Pin)?;

        out.copy_from_slice(&frame[1..len]);
        Ok(())
    }

    /// Writes one register: address byte with bit 7 cleared, then the value.
    fn write_register(
        &mut self,
        reg: Bmp280Register,
        value: u8,
    ) -> Result<(), Bmp280Error<SPI::Error, CS::Error>> {
        self.cs.set_low().map_err(Bmp280Error::Pin)?;
        self.spi
            .write(&[reg as u8 & SPI_WRITE_MASK, value])
            .map_err(Bmp280Error::Spi)?;
        self.spi.flush().map_err(Bmp280Error::Spi)?;
        self.cs.set_high().map_err(Bmp280Error::Pin)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    fn cs_cycle() -> [PinTransaction; 2] {
        [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]
    }

    /// Expectations for a register write: [addr & 0x7F, value].
    fn write_txn(addr: u8, value: u8) -> Vec<SpiTransaction<u8>> {
        vec![
            SpiTransaction::write_vec(vec![addr & SPI_WRITE_MASK, value]),
            SpiTransaction::flush(),
        ]
    }

    /// Expectations for a burst read: addr | 0x80, then dummy 0x00 per byte.
    fn read_txn(addr: u8, response: &[u8]) -> Vec<SpiTransaction<u8>> {
        let mut mosi = vec![addr | SPI_READ_FLAG];
        mosi.extend(core::iter::repeat(0u8).take(response.len()));
        let mut miso = vec![0u8];
        miso.extend_from_slice(response);
        vec![
            SpiTransaction::transfer_in_place(mosi, miso),
            SpiTransaction::flush(),
        ]
    }

    // Datasheet §3.12 calibration block, little-endian register image.
    fn calib_block() -> [u8; 24] {
        let mut block = [0u8; 24];
        let words: [(usize, u16); 12] = [
            (0, 27504),
            (2, 26435),
            (4, (-1000i16) as u16),
            (6, 36477),
            (8, (-10685i16) as u16),
            (10, 3024),
            (12, 2855),
            (14, 140),
            (16, (-7i16) as u16),
            (18, 15500),
            (20, (-14600i16) as u16),
            (22, 6000),
        ];
        for (offset, word) in words {
            block[offset..offset + 2].copy_from_slice(&word.to_le_bytes());
        }
        block
    }

    #[test]
    fn begin_resets_verifies_id_and_loads_calibration() {
        let mut spi_expect = Vec::new();
        spi_expect.extend(write_txn(0xE0, 0xB6));
        spi_expect.extend(read_txn(0xD0, &[0x58]));
        spi_expect.extend(read_txn(0x88, &calib_block()));
        spi_expect.extend(write_txn(0xF5, 0x00));
        let spi = SpiMock::new(&spi_expect);

        let mut pin_expect = vec![PinTransaction::set(PinState::High)]; // constructor
        for _ in 0..4 {
            pin_expect.extend(cs_cycle());
        }
        let cs = PinMock::new(&pin_expect);

        let mut bmp = Bmp280::new(spi, cs).unwrap();
        bmp.begin(&mut NoopDelay).unwrap();

        assert_eq!(bmp.calib.dig_t1, 27504);
        assert_eq!(bmp.calib.dig_p9, 6000);

        let (mut spi, mut cs) = bmp.release();
        spi.done();
        cs.done();
    }

    #[test]
    fn begin_rejects_wrong_chip_id() {
        let mut spi_expect = Vec::new();
        spi_expect.extend(write_txn(0xE0, 0xB6));
        // 0x60 is a BME280, not a BMP280
        spi_expect.extend(read_txn(0xD0, &[0x60]));
        let spi = SpiMock::new(&spi_expect);

        let mut pin_expect = vec![PinTransaction::set(PinState::High)];
        for _ in 0..2 {
            pin_expect.extend(cs_cycle());
        }
        let cs = PinMock::new(&pin_expect);

        let mut bmp = Bmp280::new(spi, cs).unwrap();
        assert!(matches!(
            bmp.begin(&mut NoopDelay),
            Err(Bmp280Error::ChipIdMismatch(0x60))
        ));

        let (mut spi, mut cs) = bmp.release();
        spi.done();
        cs.done();
    }

    #[test]
    fn forced_read_reproduces_datasheet_sample() {
        // adc_P = 415148 = 0x655AC, adc_T = 519888 = 0x7EED0,
        // packed into msb/lsb/xlsb register order.
        let raw = [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00];

        let mut spi_expect = Vec::new();
        // ctrl_meas: osrs_t x1 (001), osrs_p x1 (001), forced (01)
        spi_expect.extend(write_txn(0xF4, 0b001_001_01));
        spi_expect.extend(read_txn(0xF7, &raw));
        let spi = SpiMock::new(&spi_expect);

        let mut pin_expect = vec![PinTransaction::set(PinState::High)];
        for _ in 0..2 {
            pin_expect.extend(cs_cycle());
        }
        let cs = PinMock::new(&pin_expect);

        let mut bmp = Bmp280::new(spi, cs).unwrap();
        bmp.calib = Bmp280Calib {
            dig_t1: 27504,
            dig_t2: 26435,
            dig_t3: -1000,
            dig_p1: 36477,
            dig_p2: -10685,
            dig_p3: 3024,
            dig_p4: 2855,
            dig_p5: 140,
            dig_p6: -7,
            dig_p7: 15500,
            dig_p8: -14600,
            dig_p9: 6000,
        };

        let m = bmp.do_forced_read(&mut NoopDelay).unwrap();
        assert_eq!(m.temperature, 2508);
        assert_eq!(m.pressure, 25767233);
        assert!((m.temperature_celsius() - 25.08).abs() < 1e-3);
        assert!((m.pressure_pascals() - 100653.25).abs() < 0.01);

        let (mut spi, mut cs) = bmp.release();
        spi.done();
        cs.done();
    }

    #[test]
    fn transport_fault_is_surfaced() {
        use embedded_hal_mock::eh1::MockError;
        use std::io::ErrorKind;

        // Chip select refuses to assert; begin must fail before any SPI
        // traffic happens.
        let spi = SpiMock::new(&[] as &[SpiTransaction<u8>]);
        let pin_expect = vec![
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low).with_error(MockError::Io(ErrorKind::Other)),
        ];
        let cs = PinMock::new(&pin_expect);

        let mut bmp = Bmp280::new(spi, cs).unwrap();
        assert!(matches!(
            bmp.begin(&mut NoopDelay),
            Err(Bmp280Error::Pin(_))
        ));

        let (mut spi, mut cs) = bmp.release();
        spi.done();
        cs.done();
    }
}
