//! Byte-pattern compiler and matcher.
//!
//! A pattern is authored as comma-separated tokens, one per payload byte:
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `0x42` / `66` | byte must equal the literal |
//! | `*` | any byte, value ignored |
//! | `D` | any byte, marks where a decodable value begins |
//!
//! Patterns match a payload byte-by-byte from offset 0. A payload may be
//! longer than the pattern; trailing bytes are ignored. A payload shorter
//! than the pattern never matches, and an empty pattern never matches
//! anything (an empty configuration entry must not match every frame).
//!
//! # Example
//!
//! ```
//! use radiohead_bridge::Pattern;
//!
//! let pattern = Pattern::compile(&["0x01", "*", "D"]).unwrap();
//! assert!(pattern.matches(&[0x01, 0xFF, 0x10]));
//! assert!(pattern.matches(&[0x01, 0x00, 0x10, 0x99]));
//! assert!(!pattern.matches(&[0x02, 0x00, 0x10]));
//! assert_eq!(pattern.data_offset(), Some(2));
//! ```

use crate::error::{Error, Result};
use crate::utils::parse_number;

/// One position of a compiled byte pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRule {
    /// The payload byte must equal this value.
    Exact(u8),
    /// Any byte matches; the value is ignored (`*` token).
    Wildcard,
    /// Any byte matches; marks the offset where a decoded value begins
    /// (`D` token). Only the first marker in a pattern is meaningful as
    /// the decode offset; later markers behave as wildcards.
    DataMarker,
}

/// A compiled byte pattern: an ordered sequence of [`ByteRule`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    rules: Vec<ByteRule>,
}

impl Pattern {
    /// Compiles a token sequence into a pattern.
    ///
    /// The output has the same length as the input: `*` becomes
    /// [`ByteRule::Wildcard`], `D` becomes [`ByteRule::DataMarker`], and
    /// numeric literals (`0x`-prefixed hex or decimal, see
    /// [`parse_number`]) become [`ByteRule::Exact`]. Tokens are trimmed
    /// before classification.
    ///
    /// # Errors
    ///
    /// - `Error::EmptyPattern` if `tokens` is empty.
    /// - `Error::InvalidPatternToken` if a token is not `*`, `D` or a
    ///   numeric literal in `0..=255`.
    ///
    /// # Example
    ///
    /// ```
    /// use radiohead_bridge::{ByteRule, Pattern};
    ///
    /// let pattern = Pattern::compile(&["0x01", "255", "*", "D"]).unwrap();
    /// assert_eq!(pattern.len(), 4);
    /// assert_eq!(pattern.rules()[0], ByteRule::Exact(0x01));
    /// assert_eq!(pattern.rules()[1], ByteRule::Exact(0xFF));
    /// assert_eq!(pattern.rules()[2], ByteRule::Wildcard);
    /// assert_eq!(pattern.rules()[3], ByteRule::DataMarker);
    /// ```
    pub fn compile<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        if tokens.is_empty() {
            return Err(Error::EmptyPattern);
        }

        let mut rules = Vec::with_capacity(tokens.len());
        for token in tokens {
            let token = token.as_ref().trim();
            let rule = match token {
                "*" => ByteRule::Wildcard,
                "D" => ByteRule::DataMarker,
                _ => match parse_number(token) {
                    Some(n) if n <= u8::MAX as u32 => ByteRule::Exact(n as u8),
                    _ => return Err(Error::invalid_pattern_token(token)),
                },
            };
            rules.push(rule);
        }

        Ok(Self { rules })
    }

    /// Returns the number of byte positions in the pattern.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns whether the pattern has no positions.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the compiled byte rules.
    pub fn rules(&self) -> &[ByteRule] {
        &self.rules
    }

    /// Returns the offset of the first [`ByteRule::DataMarker`], if any.
    ///
    /// Linear scan, first marker wins.
    pub fn data_offset(&self) -> Option<usize> {
        self.rules
            .iter()
            .position(|rule| matches!(rule, ByteRule::DataMarker))
    }

    /// Checks the pattern against a payload.
    ///
    /// An empty pattern never matches. A payload shorter than the pattern
    /// never matches. Wildcard and data-marker positions match any byte.
    pub fn matches(&self, payload: &[u8]) -> bool {
        if self.rules.is_empty() {
            return false;
        }
        if payload.len() < self.rules.len() {
            return false;
        }
        self.rules.iter().zip(payload).all(|(rule, byte)| match rule {
            ByteRule::Exact(value) => value == byte,
            ByteRule::Wildcard | ByteRule::DataMarker => true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_preserves_length() {
        let pattern = Pattern::compile(&["0x01", "2", "*", "D", "0xFF"]).unwrap();
        assert_eq!(pattern.len(), 5);
    }

    #[test]
    fn test_compile_empty_fails() {
        let tokens: [&str; 0] = [];
        assert!(matches!(
            Pattern::compile(&tokens),
            Err(Error::EmptyPattern)
        ));
    }

    #[test]
    fn test_compile_rejects_bad_tokens() {
        assert!(Pattern::compile(&["0x01", "x"]).is_err());
        assert!(Pattern::compile(&["d"]).is_err());
        assert!(Pattern::compile(&["256"]).is_err());
        assert!(Pattern::compile(&[""]).is_err());
    }

    #[test]
    fn test_compile_trims_tokens() {
        let pattern = Pattern::compile(&[" 0x01", " * ", "D "]).unwrap();
        assert_eq!(pattern.rules()[0], ByteRule::Exact(0x01));
        assert_eq!(pattern.rules()[1], ByteRule::Wildcard);
        assert_eq!(pattern.rules()[2], ByteRule::DataMarker);
    }

    #[test]
    fn test_matches_exact() {
        let pattern = Pattern::compile(&["0x01", "0x02"]).unwrap();
        assert!(pattern.matches(&[0x01, 0x02]));
        assert!(pattern.matches(&[0x01, 0x02, 0x03]));
        assert!(!pattern.matches(&[0x01, 0x03]));
        assert!(!pattern.matches(&[0x02, 0x02]));
    }

    #[test]
    fn test_short_payload_never_matches() {
        let pattern = Pattern::compile(&["0x01", "0x02"]).unwrap();
        assert!(!pattern.matches(&[0x01]));
        assert!(!pattern.matches(&[]));
    }

    #[test]
    fn test_wildcard_and_marker_match_any_byte() {
        let pattern = Pattern::compile(&["*", "D"]).unwrap();
        assert!(pattern.matches(&[0xFF, 0x10]));
        assert!(pattern.matches(&[0x00, 0x10]));
        assert!(pattern.matches(&[0x00, 0x00]));
    }

    #[test]
    fn test_data_offset_first_marker_wins() {
        let pattern = Pattern::compile(&["0x01", "D", "D"]).unwrap();
        assert_eq!(pattern.data_offset(), Some(1));

        let pattern = Pattern::compile(&["0x01", "*"]).unwrap();
        assert_eq!(pattern.data_offset(), None);
    }

    #[test]
    fn test_later_marker_still_matches_any_byte() {
        // the second D is just a wildcard as far as matching goes
        let pattern = Pattern::compile(&["D", "D"]).unwrap();
        assert!(pattern.matches(&[0x12, 0x34]));
        assert_eq!(pattern.data_offset(), Some(0));
    }
}
