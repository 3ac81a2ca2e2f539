//! Decoder for raw digital-caliper measurement frames.
//!
//! Cheap digital calipers clock out a 24-bit frame on their data port; the
//! logger's capture side widens it to a `u32` and hands it here. Frame
//! layout:
//!
//! | Bits  | Meaning                                          |
//! |-------|--------------------------------------------------|
//! | 0–19  | magnitude (metric: 1/100 mm, imperial: see below)|
//! | 20    | sign (1 = negative)                              |
//! | 23    | unit flag (0 = metric, 1 = imperial)             |
//!
//! In imperial mode the magnitude counts 1/1000 inch in bits 1–19, and bit 0
//! adds a final half increment of 0.0005 in.
//!
//! Decoding is pure and stateless; the capture hardware is the only place
//! that can fail, and it signals that with the [`INVALID_FRAME`] sentinel.

/// Sentinel emitted by the capture side when no reading is available.
pub const INVALID_FRAME: u32 = 0xFFFF_FFFF;

/// Bits 0–19: measurement magnitude.
const MAGNITUDE_MASK: u32 = 0x000F_FFFF;
/// Bit 20: measurement is negative.
const SIGN_BIT: u32 = 0x0010_0000;
/// Bit 23: clear for metric, set for imperial.
const UNIT_FLAG: u32 = 0x0080_0000;
/// Bit 0 in imperial mode: add a half thousandth (0.0005 in).
const HALF_INCREMENT_BIT: u32 = 0x1;

/// A decoded caliper measurement.
///
/// `value` is in millimetres (metric) or inches (imperial);
/// `decimal_places` is how many decimals the caliper's own display would
/// show, for faithful formatting: 2 for metric, 3 or 4 for imperial, 0 for
/// the invalid-frame sentinel.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaliperReading {
    pub value: f32,
    pub decimal_places: u8,
}

/// Returns `true` unless `raw` is the no-data sentinel.
pub fn is_valid(raw: u32) -> bool {
    raw != INVALID_FRAME
}

/// Returns `true` if the frame's unit flag selects metric.
pub fn is_metric(raw: u32) -> bool {
    raw & UNIT_FLAG == 0
}

/// Decodes a raw frame into a measurement.
///
/// The sentinel decodes to `(0.0, 0)` rather than an error; "no reading"
/// is a normal state for an idle caliper.
pub fn decode(raw: u32) -> CaliperReading {
    if !is_valid(raw) {
        return CaliperReading {
            value: 0.0,
            decimal_places: 0,
        };
    }

    let magnitude = raw & MAGNITUDE_MASK;
    let (mut value, decimal_places) = if is_metric(raw) {
        (magnitude as f32 / 100.0, 2)
    } else {
        let thousandths = (magnitude >> 1) as f32 / 1000.0;
        if magnitude & HALF_INCREMENT_BIT != 0 {
            (thousandths + 0.0005, 4)
        } else {
            (thousandths, 3)
        }
    };

    if raw & SIGN_BIT != 0 {
        value = -value;
    }

    CaliperReading {
        value,
        decimal_places,
    }
}
