/// BMP280 register map (Bosch Sensortec BMP280 datasheet, revision 1.26).
///
/// All addresses are 8-bit. On the SPI bus only the low 7 bits address the
/// register; bit 7 of the first transferred byte selects the transfer
/// direction (1 = read, 0 = write). Most registers support burst access
/// through an auto-incrementing pointer.
///
/// Key groups:
/// - **Measurement results** - 0xF7–0xFC (6 bytes): pressure (20-bit) + temperature (20-bit)
/// - **Control registers** - 0xF4 (measurement config), 0xF5 (IIR + standby)
/// - **Status** - 0xF3 (measuring / updating bits)
/// - **Reset & ID** - 0xE0 (soft reset), 0xD0 (chip ID)
/// - **Calibration** - 0x88–0x9F (24 bytes, read-only, factory trimmed)
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum Bmp280Register {
    TempXlsb = 0xFC,
    TempLsb = 0xFB,
    TempMsb = 0xFA,
    PressXlsb = 0xF9,
    PressLsb = 0xF8,
    PressMsb = 0xF7,
    Config = 0xF5,
    CtrlMeas = 0xF4,
    // bit 3 - conversion running, bit 0 - NVM copy in progress
    Status = 0xF3,
    // If 0xB6 is written to the register,
    // the device is reset using the complete power-on-reset procedure
    Reset = 0xE0,
    // Chip identification number
    // Must be 0x58 after start up
    Id = 0xD0,
    // Calibration values start address
    CalibStart = 0x88,
}

pub const BMP280_RESET_REG_VALUE: u8 = 0xB6;
pub const BMP280_CHIP_ID: u8 = 0x58;

/// Set on the address byte of an SPI read transfer.
pub const SPI_READ_FLAG: u8 = 0x80;
/// Applied to the address byte of an SPI write transfer (clears bit 7).
pub const SPI_WRITE_MASK: u8 = 0x7F;
