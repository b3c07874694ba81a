//! Error types for the bridge.

use thiserror::Error;

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling rules, coding buffers or talking
/// to the collaborators.
///
/// Configuration errors (`InvalidPatternToken`, `EmptyPattern`,
/// `UnknownDataType`, `InvalidAddress`) are local to one rule or
/// alternative: the loader skips the offending entry with a warning and
/// keeps going. Codec errors abort a single decode or send attempt.
/// Nothing in this taxonomy is fatal to the bridge process.
#[derive(Debug, Error)]
pub enum Error {
    /// A byte-pattern token is neither `*`, `D` nor a numeric literal
    /// that fits a byte.
    #[error("invalid pattern token '{token}'")]
    InvalidPatternToken {
        /// The offending token as written in the configuration.
        token: String,
    },

    /// A pattern contained no tokens at all.
    #[error("empty pattern")]
    EmptyPattern,

    /// The configured buffer data type is not one of the supported
    /// encodings.
    #[error("unknown data type '{name}'")]
    UnknownDataType {
        /// The unrecognized type name from the configuration.
        name: String,
    },

    /// An address literal could not be parsed or does not fit the
    /// address space.
    #[error("invalid address '{value}'")]
    InvalidAddress {
        /// The offending address literal.
        value: String,
    },

    /// A read or write would run past the end of the buffer.
    #[error("buffer too short: need {needed} byte(s) at offset {offset}, have {len}")]
    BufferTooShort {
        /// Bytes required by the data type.
        needed: usize,
        /// Offset at which the access starts.
        offset: usize,
        /// Actual buffer length.
        len: usize,
    },

    /// The radio transport failed to deliver a frame.
    #[error("send failed: {reason}")]
    Send {
        /// Description of the transport failure.
        reason: String,
    },

    /// The state store rejected an operation.
    #[error("store error: {reason}")]
    Store {
        /// Description of the store failure.
        reason: String,
    },
}

impl Error {
    /// Creates a new `InvalidPatternToken` error.
    ///
    /// # Example
    ///
    /// ```
    /// use radiohead_bridge::Error;
    ///
    /// let err = Error::invalid_pattern_token("0y12");
    /// ```
    pub fn invalid_pattern_token(token: impl Into<String>) -> Self {
        Self::InvalidPatternToken {
            token: token.into(),
        }
    }

    /// Creates a new `UnknownDataType` error.
    ///
    /// # Example
    ///
    /// ```
    /// use radiohead_bridge::Error;
    ///
    /// let err = Error::unknown_data_type("uint24_le");
    /// ```
    pub fn unknown_data_type(name: impl Into<String>) -> Self {
        Self::UnknownDataType { name: name.into() }
    }

    /// Creates a new `InvalidAddress` error.
    ///
    /// # Example
    ///
    /// ```
    /// use radiohead_bridge::Error;
    ///
    /// let err = Error::invalid_address("0xGG");
    /// ```
    pub fn invalid_address(value: impl Into<String>) -> Self {
        Self::InvalidAddress {
            value: value.into(),
        }
    }

    /// Creates a new `BufferTooShort` error.
    pub fn buffer_too_short(needed: usize, offset: usize, len: usize) -> Self {
        Self::BufferTooShort {
            needed,
            offset,
            len,
        }
    }

    /// Creates a new `Send` error.
    ///
    /// # Example
    ///
    /// ```
    /// use radiohead_bridge::Error;
    ///
    /// let err = Error::send("no route to node 0x05");
    /// ```
    pub fn send(reason: impl Into<String>) -> Self {
        Self::Send {
            reason: reason.into(),
        }
    }

    /// Creates a new `Store` error.
    ///
    /// # Example
    ///
    /// ```
    /// use radiohead_bridge::Error;
    ///
    /// let err = Error::store("connection lost");
    /// ```
    pub fn store(reason: impl Into<String>) -> Self {
        Self::Store {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_token_display() {
        let err = Error::invalid_pattern_token("0y12");
        assert_eq!(err.to_string(), "invalid pattern token '0y12'");
    }

    #[test]
    fn test_empty_pattern_display() {
        assert_eq!(Error::EmptyPattern.to_string(), "empty pattern");
    }

    #[test]
    fn test_unknown_data_type_display() {
        let err = Error::unknown_data_type("uint24_le");
        assert_eq!(err.to_string(), "unknown data type 'uint24_le'");
    }

    #[test]
    fn test_buffer_too_short_display() {
        let err = Error::buffer_too_short(4, 2, 3);
        assert_eq!(
            err.to_string(),
            "buffer too short: need 4 byte(s) at offset 2, have 3"
        );
    }

    #[test]
    fn test_send_display() {
        let err = Error::send("timeout");
        assert_eq!(err.to_string(), "send failed: timeout");
    }
}
