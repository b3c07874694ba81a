//! State-store collaborator boundary.
//!
//! The bridge does not own a database. It consumes a key/value object
//! store of the kind home-automation platforms provide: persisted
//! configuration objects (enumerated once at startup to build the rule
//! snapshot) and runtime states (read and written as logical signals
//! fire). The [`StateStore`] trait is that boundary; the bridge never
//! assumes anything about what is behind it.
//!
//! State writes carry an acknowledgement flag: the bridge sets
//! `ack = true` for every value it produces (a decoded frame, a confirmed
//! send), while unacknowledged writes are commands travelling towards the
//! radio.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A logical state value: the store side of the bridge only ever carries
/// booleans and numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean signal (switch, indicator, button).
    Bool(bool),
    /// A numeric signal, always carried as `f64`.
    Number(f64),
}

impl Value {
    /// Returns the truthiness of the value: `false` and `0.0` (including
    /// NaN) are falsy, everything else is truthy.
    ///
    /// # Example
    ///
    /// ```
    /// use radiohead_bridge::Value;
    ///
    /// assert!(Value::Bool(true).is_truthy());
    /// assert!(Value::Number(-1.0).is_truthy());
    /// assert!(!Value::Bool(false).is_truthy());
    /// assert!(!Value::Number(0.0).is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
        }
    }

    /// Returns the value as a number (`true` is 1, `false` is 0).
    pub fn as_number(&self) -> f64 {
        match self {
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
            Value::Number(n) => *n,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

/// A stored state: the value plus its acknowledgement flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateValue {
    /// The logical value.
    pub value: Value,
    /// Acknowledgement flag. `true` means the value was produced by the
    /// device side (the bridge); `false` means it is a pending command.
    pub ack: bool,
}

impl StateValue {
    /// Creates an acknowledged state value.
    pub fn acked(value: Value) -> Self {
        Self { value, ack: true }
    }

    /// Creates an unacknowledged (command) state value.
    pub fn command(value: Value) -> Self {
        Self { value, ack: false }
    }
}

/// Device-specific (`native`) configuration of one data object.
///
/// Field names follow the persisted object shape of the configuration
/// surface (camelCase on the wire).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NativeConfig {
    /// Source address literal: hex/decimal number or `*`.
    pub from_address: String,
    /// Destination address literal: hex/decimal number or `*`.
    pub to_address: String,
    /// Byte pattern string: `;`-separated alternatives of `,`-separated
    /// tokens.
    pub data: String,
    /// Buffer encoding name (`uint8`, `int16_le`, ...). Empty when the
    /// object never decodes or encodes a numeric field.
    pub data_type: String,
    /// Scale factor applied to decoded numbers.
    pub factor: Option<f64>,
    /// Offset added to decoded numbers after scaling.
    pub offset: Option<f64>,
    /// Decimals to round decoded numbers to.
    pub decimals: Option<u32>,
}

/// Platform-common configuration of one data object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonConfig {
    /// Behavioral role of the target (`button`, `switch`, `indicator`,
    /// or anything else for a generic value).
    pub role: String,
    /// Value type of the target (`boolean` or `number`).
    #[serde(rename = "type")]
    pub value_type: String,
}

/// One enumerated configuration object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// Object id; doubles as the state id the bridge reads and writes.
    pub id: String,
    /// Device-specific configuration.
    pub native: NativeConfig,
    /// Platform-common configuration.
    pub common: CommonConfig,
}

/// Key/value state store collaborator.
///
/// Implementations wrap whatever object database the surrounding platform
/// uses. All methods take `&self`; implementations are expected to handle
/// their own interior mutability and locking.
pub trait StateStore {
    /// Reads the current state of an object, if it has one.
    fn read_state(&self, id: &str) -> Result<Option<StateValue>>;

    /// Writes a state value with the given acknowledgement flag.
    fn write_state(&self, id: &str, value: Value, ack: bool) -> Result<()>;

    /// Enumerates the configuration objects whose ids start with `prefix`.
    ///
    /// Enumeration order is arbitrary but must be stable for one process
    /// lifetime; it defines the rule registration order.
    fn enumerate_objects(&self, prefix: &str) -> Result<Vec<ObjectEntry>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Number(1.0).is_truthy());
        assert!(Value::Number(-0.5).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Value::Bool(true).as_number(), 1.0);
        assert_eq!(Value::Bool(false).as_number(), 0.0);
        assert_eq!(Value::Number(14.0).as_number(), 14.0);
    }

    #[test]
    fn test_value_deserializes_untagged() {
        let v: Value = serde_json::from_str("true").unwrap();
        assert_eq!(v, Value::Bool(true));
        let v: Value = serde_json::from_str("2.5").unwrap();
        assert_eq!(v, Value::Number(2.5));
    }

    #[test]
    fn test_object_entry_from_json() {
        let entry: ObjectEntry = serde_json::from_str(
            r#"{
                "id": "data.in.temperature",
                "native": {
                    "fromAddress": "0x10",
                    "toAddress": "*",
                    "data": "0x01,D",
                    "dataType": "uint8",
                    "factor": 2,
                    "offset": 0,
                    "decimals": 0
                },
                "common": { "role": "value.temperature", "type": "number" }
            }"#,
        )
        .unwrap();

        assert_eq!(entry.id, "data.in.temperature");
        assert_eq!(entry.native.from_address, "0x10");
        assert_eq!(entry.native.to_address, "*");
        assert_eq!(entry.native.factor, Some(2.0));
        assert_eq!(entry.common.value_type, "number");
    }

    #[test]
    fn test_object_entry_defaults() {
        // sparse objects deserialize with empty native/common fields
        let entry: ObjectEntry = serde_json::from_str(
            r#"{ "id": "data.in.x", "native": {}, "common": {} }"#,
        )
        .unwrap();
        assert_eq!(entry.native.from_address, "");
        assert_eq!(entry.native.factor, None);
        assert_eq!(entry.common.role, "");
    }
}
