//! Utility functions for number parsing and hex formatting.
//!
//! The address literal grammar is shared by the configuration surface and
//! the byte-pattern tokens: a `0x` prefix selects base 16, anything else
//! is parsed as base 10. The `*` wildcard is only valid in address
//! positions and is handled by [`parse_address`]; inside byte patterns the
//! same character means a per-byte wildcard and is handled by the pattern
//! compiler, not here.
//!
//! # Example
//!
//! ```
//! use radiohead_bridge::utils::{parse_number, parse_address, format_address};
//!
//! assert_eq!(parse_number("0x42"), Some(0x42));
//! assert_eq!(parse_number("127"), Some(127));
//!
//! assert_eq!(parse_address("*").unwrap(), None);
//! assert_eq!(parse_address("0x10").unwrap(), Some(0x10));
//!
//! assert_eq!(format_address(0x0A), "0x0A");
//! ```

use crate::error::{Error, Result};

/// Parses a hex or decimal number literal.
///
/// Literals starting with `0x` are parsed as base 16 (hex digits are
/// case-insensitive), everything else as base 10. Surrounding whitespace
/// is ignored. Returns `None` when the literal is not a number.
///
/// # Example
///
/// ```
/// use radiohead_bridge::utils::parse_number;
///
/// assert_eq!(parse_number("0xFF"), Some(255));
/// assert_eq!(parse_number("0xff"), Some(255));
/// assert_eq!(parse_number("42"), Some(42));
/// assert_eq!(parse_number("banana"), None);
/// ```
pub fn parse_number(literal: &str) -> Option<u32> {
    let literal = literal.trim();
    if let Some(hex) = literal.strip_prefix("0x") {
        u32::from_str_radix(hex, 16).ok()
    } else {
        literal.parse::<u32>().ok()
    }
}

/// Parses a node address literal.
///
/// `*` is the address wildcard and yields `None` ("any"). Other literals
/// follow the [`parse_number`] grammar and must fit a `u8`; the protocol
/// address space beyond that is a transport concern and not validated
/// here.
///
/// # Errors
///
/// Returns `Error::InvalidAddress` if the literal is neither `*` nor a
/// number in `0..=255`.
///
/// # Example
///
/// ```
/// use radiohead_bridge::utils::parse_address;
///
/// assert_eq!(parse_address("*").unwrap(), None);
/// assert_eq!(parse_address("0x7F").unwrap(), Some(0x7F));
/// assert!(parse_address("300").is_err());
/// ```
pub fn parse_address(literal: &str) -> Result<Option<u8>> {
    let literal = literal.trim();
    if literal == "*" {
        return Ok(None);
    }
    match parse_number(literal) {
        Some(n) if n <= u8::MAX as u32 => Ok(Some(n as u8)),
        _ => Err(Error::invalid_address(literal)),
    }
}

/// Formats a node address as a zero-padded hex literal.
///
/// # Example
///
/// ```
/// use radiohead_bridge::utils::format_address;
///
/// assert_eq!(format_address(0x05), "0x05");
/// assert_eq!(format_address(0xFE), "0xFE");
/// ```
pub fn format_address(address: u8) -> String {
    format!("0x{:02X}", address)
}

/// Formats a payload as a space-separated hex byte dump.
///
/// Used by the log-all-data path so logged frames read the same way the
/// patterns are written in the configuration.
///
/// # Example
///
/// ```
/// use radiohead_bridge::utils::format_payload_hex;
///
/// assert_eq!(format_payload_hex(&[0x01, 0xAB]), "0x01 0xAB");
/// assert_eq!(format_payload_hex(&[]), "");
/// ```
pub fn format_payload_hex(payload: &[u8]) -> String {
    payload
        .iter()
        .map(|b| format!("0x{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_decimal() {
        assert_eq!(parse_number("0"), Some(0));
        assert_eq!(parse_number("127"), Some(127));
        assert_eq!(parse_number(" 42 "), Some(42));
    }

    #[test]
    fn test_parse_number_hex() {
        assert_eq!(parse_number("0x00"), Some(0));
        assert_eq!(parse_number("0x42"), Some(0x42));
        assert_eq!(parse_number("0xAB"), Some(0xAB));
        assert_eq!(parse_number("0xab"), Some(0xAB));
    }

    #[test]
    fn test_parse_number_invalid() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("*"), None);
        assert_eq!(parse_number("0x"), None);
        assert_eq!(parse_number("0xGG"), None);
        assert_eq!(parse_number("12.5"), None);
        assert_eq!(parse_number("-1"), None);
    }

    #[test]
    fn test_parse_address_wildcard() {
        assert_eq!(parse_address("*").unwrap(), None);
        assert_eq!(parse_address(" * ").unwrap(), None);
    }

    #[test]
    fn test_parse_address_literal() {
        assert_eq!(parse_address("0").unwrap(), Some(0));
        assert_eq!(parse_address("0x10").unwrap(), Some(0x10));
        assert_eq!(parse_address("254").unwrap(), Some(254));
        assert_eq!(parse_address("255").unwrap(), Some(255));
    }

    #[test]
    fn test_parse_address_invalid() {
        assert!(parse_address("256").is_err());
        assert!(parse_address("whatever").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(0x00), "0x00");
        assert_eq!(format_address(0x0A), "0x0A");
        assert_eq!(format_address(0xFF), "0xFF");
    }

    #[test]
    fn test_format_payload_hex() {
        assert_eq!(format_payload_hex(&[0x01, 0x02, 0xFF]), "0x01 0x02 0xFF");
        assert_eq!(format_payload_hex(&[0xAB]), "0xAB");
        assert_eq!(format_payload_hex(&[]), "");
    }

    #[test]
    fn test_format_payload_hex_matches_hex_crate() {
        let payload = hex::decode("0102ff").unwrap();
        assert_eq!(format_payload_hex(&payload), "0x01 0x02 0xFF");
    }
}
