//! Buffer codec: typed numeric reads and writes at byte offsets.
//!
//! Payload fields are decoded and encoded with one of 14 fixed binary
//! encodings. Signedness/width and endianness are orthogonal; each
//! encoding has a fixed byte width:
//!
//! | Encoding | Width |
//! |----------|-------|
//! | `int8`, `uint8` | 1 |
//! | `int16_le`, `int16_be`, `uint16_le`, `uint16_be` | 2 |
//! | `int32_le`, `int32_be`, `uint32_le`, `uint32_be`, `float32_le`, `float32_be` | 4 |
//! | `double64_le`, `double64_be` | 8 |
//!
//! All values travel as `f64` on the state side; `f64` represents every
//! supported integer encoding exactly (the widest is 32 bits).
//!
//! # Example
//!
//! ```
//! use radiohead_bridge::codec::{read_value, write_value, DataType};
//!
//! let mut buf = [0u8; 4];
//! write_value(-2.0, &mut buf, DataType::Int16Be, 1).unwrap();
//! assert_eq!(buf, [0x00, 0xFF, 0xFE, 0x00]);
//! assert_eq!(read_value(&buf, DataType::Int16Be, 1).unwrap(), -2.0);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Binary encoding of a payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer.
    Uint8,
    /// Signed 16-bit integer, little endian.
    Int16Le,
    /// Signed 16-bit integer, big endian.
    Int16Be,
    /// Unsigned 16-bit integer, little endian.
    Uint16Le,
    /// Unsigned 16-bit integer, big endian.
    Uint16Be,
    /// Signed 32-bit integer, little endian.
    Int32Le,
    /// Signed 32-bit integer, big endian.
    Int32Be,
    /// Unsigned 32-bit integer, little endian.
    Uint32Le,
    /// Unsigned 32-bit integer, big endian.
    Uint32Be,
    /// IEEE 754 single-precision float, little endian.
    Float32Le,
    /// IEEE 754 single-precision float, big endian.
    Float32Be,
    /// IEEE 754 double-precision float, little endian.
    Double64Le,
    /// IEEE 754 double-precision float, big endian.
    Double64Be,
}

impl DataType {
    /// Returns the width of this encoding in bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use radiohead_bridge::codec::DataType;
    ///
    /// assert_eq!(DataType::Uint8.width(), 1);
    /// assert_eq!(DataType::Int16Le.width(), 2);
    /// assert_eq!(DataType::Float32Be.width(), 4);
    /// assert_eq!(DataType::Double64Le.width(), 8);
    /// ```
    pub fn width(self) -> usize {
        match self {
            DataType::Int8 | DataType::Uint8 => 1,
            DataType::Int16Le | DataType::Int16Be | DataType::Uint16Le | DataType::Uint16Be => 2,
            DataType::Int32Le
            | DataType::Int32Be
            | DataType::Uint32Le
            | DataType::Uint32Be
            | DataType::Float32Le
            | DataType::Float32Be => 4,
            DataType::Double64Le | DataType::Double64Be => 8,
        }
    }
}

impl FromStr for DataType {
    type Err = Error;

    /// Parses the configuration name of an encoding (`int8`, `uint16_le`,
    /// `double64_be`, ...).
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownDataType` for names outside the closed
    /// enumeration, so an unknown type is a configuration error and can
    /// never reach the codec at runtime.
    fn from_str(name: &str) -> Result<Self> {
        match name {
            "int8" => Ok(DataType::Int8),
            "uint8" => Ok(DataType::Uint8),
            "int16_le" => Ok(DataType::Int16Le),
            "int16_be" => Ok(DataType::Int16Be),
            "uint16_le" => Ok(DataType::Uint16Le),
            "uint16_be" => Ok(DataType::Uint16Be),
            "int32_le" => Ok(DataType::Int32Le),
            "int32_be" => Ok(DataType::Int32Be),
            "uint32_le" => Ok(DataType::Uint32Le),
            "uint32_be" => Ok(DataType::Uint32Be),
            "float32_le" => Ok(DataType::Float32Le),
            "float32_be" => Ok(DataType::Float32Be),
            "double64_le" => Ok(DataType::Double64Le),
            "double64_be" => Ok(DataType::Double64Be),
            _ => Err(Error::unknown_data_type(name)),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int8 => "int8",
            DataType::Uint8 => "uint8",
            DataType::Int16Le => "int16_le",
            DataType::Int16Be => "int16_be",
            DataType::Uint16Le => "uint16_le",
            DataType::Uint16Be => "uint16_be",
            DataType::Int32Le => "int32_le",
            DataType::Int32Be => "int32_be",
            DataType::Uint32Le => "uint32_le",
            DataType::Uint32Be => "uint32_be",
            DataType::Float32Le => "float32_le",
            DataType::Float32Be => "float32_be",
            DataType::Double64Le => "double64_le",
            DataType::Double64Be => "double64_be",
        };
        write!(f, "{}", name)
    }
}

/// Checks that `offset + width(ty)` fits in `len`, returning the end
/// index of the field.
fn field_end(ty: DataType, offset: usize, len: usize) -> Result<usize> {
    let width = ty.width();
    match offset.checked_add(width) {
        Some(end) if end <= len => Ok(end),
        _ => Err(Error::buffer_too_short(width, offset, len)),
    }
}

/// Reads a typed value from a buffer at the given byte offset.
///
/// # Errors
///
/// Returns `Error::BufferTooShort` when the field would run past the end
/// of the buffer. The failure is a tagged error, never a NaN sentinel, so
/// it cannot be confused with a legitimately decoded value.
///
/// # Example
///
/// ```
/// use radiohead_bridge::codec::{read_value, DataType};
///
/// let buf = [0x01, 0x02, 0x00];
/// assert_eq!(read_value(&buf, DataType::Uint16Le, 0).unwrap(), 513.0);
/// assert!(read_value(&buf, DataType::Uint16Le, 2).is_err());
/// ```
pub fn read_value(buf: &[u8], ty: DataType, offset: usize) -> Result<f64> {
    let end = field_end(ty, offset, buf.len())?;
    let b = &buf[offset..end];

    let value = match ty {
        DataType::Int8 => b[0] as i8 as f64,
        DataType::Uint8 => b[0] as f64,
        DataType::Int16Le => i16::from_le_bytes([b[0], b[1]]) as f64,
        DataType::Int16Be => i16::from_be_bytes([b[0], b[1]]) as f64,
        DataType::Uint16Le => u16::from_le_bytes([b[0], b[1]]) as f64,
        DataType::Uint16Be => u16::from_be_bytes([b[0], b[1]]) as f64,
        DataType::Int32Le => i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64,
        DataType::Int32Be => i32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f64,
        DataType::Uint32Le => u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64,
        DataType::Uint32Be => u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f64,
        DataType::Float32Le => f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64,
        DataType::Float32Be => f32::from_be_bytes([b[0], b[1], b[2], b[3]]) as f64,
        DataType::Double64Le => {
            f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
        }
        DataType::Double64Be => {
            f64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
        }
    };

    Ok(value)
}

/// Writes a typed value into a buffer at the given byte offset.
///
/// Integer encodings use saturating float-to-int conversion (Rust `as`
/// cast semantics): out-of-range values clamp to the type's bounds and
/// NaN writes as 0.
///
/// # Errors
///
/// Returns `Error::BufferTooShort` when the field would run past the end
/// of the buffer. The bounds check happens before any byte is written, so
/// a failed write never mutates the buffer.
///
/// # Example
///
/// ```
/// use radiohead_bridge::codec::{write_value, DataType};
///
/// let mut buf = [0u8; 2];
/// write_value(513.0, &mut buf, DataType::Uint16Be, 0).unwrap();
/// assert_eq!(buf, [0x02, 0x01]);
/// ```
pub fn write_value(value: f64, buf: &mut [u8], ty: DataType, offset: usize) -> Result<()> {
    let end = field_end(ty, offset, buf.len())?;
    let field = &mut buf[offset..end];

    match ty {
        DataType::Int8 => field[0] = value as i8 as u8,
        DataType::Uint8 => field[0] = value as u8,
        DataType::Int16Le => field.copy_from_slice(&(value as i16).to_le_bytes()),
        DataType::Int16Be => field.copy_from_slice(&(value as i16).to_be_bytes()),
        DataType::Uint16Le => field.copy_from_slice(&(value as u16).to_le_bytes()),
        DataType::Uint16Be => field.copy_from_slice(&(value as u16).to_be_bytes()),
        DataType::Int32Le => field.copy_from_slice(&(value as i32).to_le_bytes()),
        DataType::Int32Be => field.copy_from_slice(&(value as i32).to_be_bytes()),
        DataType::Uint32Le => field.copy_from_slice(&(value as u32).to_le_bytes()),
        DataType::Uint32Be => field.copy_from_slice(&(value as u32).to_be_bytes()),
        DataType::Float32Le => field.copy_from_slice(&(value as f32).to_le_bytes()),
        DataType::Float32Be => field.copy_from_slice(&(value as f32).to_be_bytes()),
        DataType::Double64Le => field.copy_from_slice(&value.to_le_bytes()),
        DataType::Double64Be => field.copy_from_slice(&value.to_be_bytes()),
    }

    Ok(())
}

/// Rounds a value to the given number of decimals.
///
/// With `decimals == 0` this is `f64::round`, which rounds halfway cases
/// away from zero (`-2.5` rounds to `-3`). With `decimals > 0` the value
/// is scaled by 10 per decimal, rounded, and scaled back. The scale
/// factor is built by iterative multiplication rather than `powi`: the
/// two can differ in the last bit for some exponents, and the iterative
/// form is what existing configurations were rounded with.
///
/// # Example
///
/// ```
/// use radiohead_bridge::codec::round_to;
///
/// assert_eq!(round_to(1.2345, 2), 1.23);
/// assert_eq!(round_to(2.5, 0), 3.0);
/// assert_eq!(round_to(-2.5, 0), -3.0);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if decimals == 0 {
        return value.round();
    }

    let mut exp = 1.0_f64;
    for _ in 0..decimals {
        exp *= 10.0;
    }

    (value * exp).round() / exp
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TYPES: [DataType; 14] = [
        DataType::Int8,
        DataType::Uint8,
        DataType::Int16Le,
        DataType::Int16Be,
        DataType::Uint16Le,
        DataType::Uint16Be,
        DataType::Int32Le,
        DataType::Int32Be,
        DataType::Uint32Le,
        DataType::Uint32Be,
        DataType::Float32Le,
        DataType::Float32Be,
        DataType::Double64Le,
        DataType::Double64Be,
    ];

    #[test]
    fn test_parse_all_names() {
        for ty in ALL_TYPES {
            assert_eq!(ty.to_string().parse::<DataType>().unwrap(), ty);
        }
    }

    #[test]
    fn test_parse_unknown_name() {
        assert!(matches!(
            "uint24_le".parse::<DataType>(),
            Err(Error::UnknownDataType { .. })
        ));
        assert!("".parse::<DataType>().is_err());
        assert!("UINT8".parse::<DataType>().is_err());
    }

    #[test]
    fn test_widths() {
        assert_eq!(DataType::Int8.width(), 1);
        assert_eq!(DataType::Uint8.width(), 1);
        assert_eq!(DataType::Int16Le.width(), 2);
        assert_eq!(DataType::Uint16Be.width(), 2);
        assert_eq!(DataType::Int32Be.width(), 4);
        assert_eq!(DataType::Uint32Le.width(), 4);
        assert_eq!(DataType::Float32Le.width(), 4);
        assert_eq!(DataType::Double64Be.width(), 8);
    }

    #[test]
    fn test_read_signed() {
        assert_eq!(read_value(&[0xFF], DataType::Int8, 0).unwrap(), -1.0);
        assert_eq!(read_value(&[0xFF], DataType::Uint8, 0).unwrap(), 255.0);
        assert_eq!(
            read_value(&[0xFE, 0xFF], DataType::Int16Le, 0).unwrap(),
            -2.0
        );
        assert_eq!(
            read_value(&[0xFF, 0xFE], DataType::Int16Be, 0).unwrap(),
            -2.0
        );
    }

    #[test]
    fn test_read_endianness() {
        let buf = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(
            read_value(&buf, DataType::Uint32Be, 0).unwrap(),
            0x12345678 as f64
        );
        assert_eq!(
            read_value(&buf, DataType::Uint32Le, 0).unwrap(),
            0x78563412 as f64
        );
        assert_eq!(
            read_value(&buf, DataType::Uint16Be, 1).unwrap(),
            0x3456 as f64
        );
    }

    #[test]
    fn test_integer_round_trip() {
        let samples: [(DataType, f64); 10] = [
            (DataType::Int8, -128.0),
            (DataType::Uint8, 255.0),
            (DataType::Int16Le, -32768.0),
            (DataType::Int16Be, 12345.0),
            (DataType::Uint16Le, 65535.0),
            (DataType::Uint16Be, 513.0),
            (DataType::Int32Le, -2147483648.0),
            (DataType::Int32Be, 1234567.0),
            (DataType::Uint32Le, 4294967295.0),
            (DataType::Uint32Be, 0.0),
        ];
        for (ty, value) in samples {
            let mut buf = [0u8; 8];
            write_value(value, &mut buf, ty, 2).unwrap();
            assert_eq!(read_value(&buf, ty, 2).unwrap(), value, "{}", ty);
        }
    }

    #[test]
    fn test_float_round_trip_bit_exact() {
        for ty in [DataType::Float32Le, DataType::Float32Be] {
            let value = 3.5_f32 as f64;
            let mut buf = [0u8; 4];
            write_value(value, &mut buf, ty, 0).unwrap();
            assert_eq!(read_value(&buf, ty, 0).unwrap().to_bits(), value.to_bits());
        }
        for ty in [DataType::Double64Le, DataType::Double64Be] {
            let value = 0.1_f64;
            let mut buf = [0u8; 8];
            write_value(value, &mut buf, ty, 0).unwrap();
            assert_eq!(read_value(&buf, ty, 0).unwrap().to_bits(), value.to_bits());
        }
    }

    #[test]
    fn test_read_too_short() {
        for ty in ALL_TYPES {
            let buf = vec![0u8; ty.width()];
            assert!(read_value(&buf, ty, 0).is_ok());
            assert!(matches!(
                read_value(&buf, ty, 1),
                Err(Error::BufferTooShort { .. })
            ));
        }
    }

    #[test]
    fn test_write_too_short_no_mutation() {
        let mut buf = [0xAA, 0xBB, 0xCC];
        let err = write_value(1.0, &mut buf, DataType::Uint32Le, 1);
        assert!(matches!(err, Err(Error::BufferTooShort { .. })));
        assert_eq!(buf, [0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn test_offset_overflow_is_too_short() {
        let buf = [0u8; 4];
        assert!(read_value(&buf, DataType::Uint8, usize::MAX).is_err());
    }

    #[test]
    fn test_write_saturates_out_of_range() {
        let mut buf = [0u8; 1];
        write_value(300.0, &mut buf, DataType::Uint8, 0).unwrap();
        assert_eq!(buf[0], 255);
        write_value(-5.0, &mut buf, DataType::Uint8, 0).unwrap();
        assert_eq!(buf[0], 0);
    }

    #[test]
    fn test_round_to_zero_decimals() {
        assert_eq!(round_to(1.4, 0), 1.0);
        assert_eq!(round_to(1.5, 0), 2.0);
        // f64::round is half away from zero
        assert_eq!(round_to(-2.5, 0), -3.0);
    }

    #[test]
    fn test_round_to_decimals() {
        assert_eq!(round_to(1.2345, 2), 1.23);
        assert_eq!(round_to(1.2355, 2), 1.24);
        assert_eq!(round_to(12.34567, 4), 12.3457);
    }

    #[test]
    fn test_round_to_pins_iterative_multiplication() {
        // 1.005 * 100.0 == 100.49999999999999, so this rounds DOWN; the
        // value is pinned to the iterative-multiplication result.
        assert_eq!(1.005_f64 * 100.0, 100.49999999999999);
        assert_eq!(round_to(1.005, 2), 1.0);
    }
}
