//! Rule model and compilation from configuration objects.
//!
//! Rules are compiled once at startup from the enumerated configuration
//! objects and held as an immutable snapshot for the bridge's process
//! lifetime. Configuration changes require a restart; there is no hot
//! reload. Compilation failures are local: a broken alternative or rule
//! is skipped with a warning and the rest of the configuration keeps
//! loading.
//!
//! An incoming rule carries one or more pattern *alternatives* (the
//! configured pattern string split on `;`) combined with OR semantics;
//! which alternative matched is significant and drives the toggle
//! behavior of switch-like roles. An outgoing rule carries one or two
//! byte *templates* rendered from the same syntax: template 0 is the
//! primary ("true") frame, template 1 the optional "false" frame.

use std::str::FromStr;

use tracing::warn;

use crate::codec::DataType;
use crate::error::{Error, Result};
use crate::pattern::Pattern;
use crate::store::ObjectEntry;
use crate::transport::DEFAULT_DESTINATION;
use crate::utils::parse_address;

/// Behavioral role of a logical target.
///
/// Resolved once from the configuration role string; matching and
/// encoding never dispatch on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Momentary pulse: a matched frame sets the target `true`.
    Button,
    /// Two-state target controlled by the radio side.
    Switch,
    /// Two-state target reflecting the radio side.
    Indicator,
    /// Generic value target: a matched frame carries a decodable payload.
    Generic,
}

impl Role {
    /// Maps a configuration role string to a role.
    ///
    /// Anything that is not a button, switch or indicator is a generic
    /// value target; role strings like `value.temperature` land here.
    pub fn from_config(role: &str) -> Self {
        match role {
            "button" => Role::Button,
            "switch" => Role::Switch,
            "indicator" => Role::Indicator,
            _ => Role::Generic,
        }
    }

    /// Returns whether the role has switch/indicator toggle semantics.
    pub fn is_toggle_like(self) -> bool {
        matches!(self, Role::Switch | Role::Indicator)
    }
}

/// Value type of a logical target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Boolean target: decoded bytes coerce nonzero-to-true, encoded
    /// values are always a single `0x01`/`0x00` byte.
    Boolean,
    /// Numeric target with scale/offset/rounding.
    Number,
}

impl ValueType {
    /// Maps a configuration type string to a value type.
    ///
    /// Absent or unknown types default to `Number`.
    pub fn from_config(value_type: &str) -> Self {
        match value_type {
            "boolean" => ValueType::Boolean,
            _ => ValueType::Number,
        }
    }
}

/// Parses the configured buffer encoding, defaulting to `uint8` when the
/// configuration carries none (roles that never decode don't set one).
fn parse_data_type(name: &str) -> Result<DataType> {
    if name.is_empty() {
        return Ok(DataType::Uint8);
    }
    DataType::from_str(name)
}

/// Splits a configured pattern string into compiled alternatives.
///
/// Empty parts are skipped with a warning; parts that fail to compile are
/// skipped with a warning. Fails with `Error::EmptyPattern` only when no
/// alternative survives.
fn compile_alternatives(id: &str, data: &str) -> Result<Vec<Pattern>> {
    let mut alternatives = Vec::new();
    for (index, part) in data.split(';').enumerate() {
        let part = part.trim();
        if part.is_empty() {
            warn!(id, part = index, "empty data part ignored");
            continue;
        }
        let tokens: Vec<&str> = part.split(',').collect();
        match Pattern::compile(&tokens) {
            Ok(pattern) => alternatives.push(pattern),
            Err(err) => warn!(id, part = index, %err, "data part skipped"),
        }
    }

    if alternatives.is_empty() {
        return Err(Error::EmptyPattern);
    }
    Ok(alternatives)
}

/// One compiled inbound matching rule.
#[derive(Debug, Clone)]
pub struct IncomingRule {
    /// Target state id.
    pub id: String,
    /// Source address filter; `None` matches any sender.
    pub from: Option<u8>,
    /// Destination address filter; `None` matches any destination.
    /// Forced to `None` at compile time unless the transport runs in
    /// promiscuous mode: destination filtering is only meaningful when
    /// frames not addressed to this node are delivered at all.
    pub to: Option<u8>,
    /// Pattern alternatives, OR-combined, order significant.
    pub alternatives: Vec<Pattern>,
    /// Behavioral role of the target.
    pub role: Role,
    /// Value type of the target.
    pub value_type: ValueType,
    /// Buffer encoding for decoded payload fields.
    pub data_type: DataType,
    /// Offset of the first data marker in the first alternative.
    pub data_offset: Option<usize>,
    /// Scale factor applied to decoded numbers.
    pub factor: f64,
    /// Offset added after scaling.
    pub offset: f64,
    /// Decimals to round to, if configured.
    pub decimals: Option<u32>,
}

impl IncomingRule {
    /// Compiles an inbound rule from a configuration object.
    ///
    /// # Errors
    ///
    /// Returns an error when the address literals or the buffer encoding
    /// are invalid, or when no pattern alternative survives compilation.
    /// The loader treats any of these as "skip this rule with a warning".
    pub fn compile(entry: &ObjectEntry, promiscuous: bool) -> Result<Self> {
        let from = parse_address(&entry.native.from_address)?;
        // outside promiscuous mode the transport only ever delivers
        // frames addressed to this node, so the filter would be dead
        let to = if promiscuous {
            parse_address(&entry.native.to_address)?
        } else {
            None
        };

        let alternatives = compile_alternatives(&entry.id, &entry.native.data)?;
        let data_offset = alternatives[0].data_offset();
        let data_type = parse_data_type(&entry.native.data_type)?;

        Ok(Self {
            id: entry.id.clone(),
            from,
            to,
            alternatives,
            role: Role::from_config(&entry.common.role),
            value_type: ValueType::from_config(&entry.common.value_type),
            data_type,
            data_offset,
            factor: entry.native.factor.unwrap_or(1.0),
            offset: entry.native.offset.unwrap_or(0.0),
            decimals: entry.native.decimals,
        })
    }
}

/// One compiled outbound rule.
#[derive(Debug, Clone)]
pub struct OutgoingRule {
    /// Source state id.
    pub id: String,
    /// Destination node address.
    pub to: u8,
    /// One or two byte templates: index 0 is the primary/"true" frame,
    /// index 1 the optional "false" frame for toggle-like roles.
    pub templates: Vec<Vec<u8>>,
    /// Behavioral role of the target.
    pub role: Role,
    /// Value type of the target.
    pub value_type: ValueType,
    /// Buffer encoding for the encoded value field.
    pub data_type: DataType,
    /// Offset of the first data marker in the first template.
    pub data_offset: Option<usize>,
}

impl OutgoingRule {
    /// Compiles an outbound rule from a configuration object.
    ///
    /// Templates are rendered to concrete bytes: exact positions keep
    /// their value, wildcard and data-marker positions render as `0x00`
    /// placeholders (the data position is overwritten at encode time).
    /// A wildcard or unresolvable destination falls back to
    /// [`DEFAULT_DESTINATION`].
    ///
    /// # Errors
    ///
    /// Same skippable error set as [`IncomingRule::compile`].
    pub fn compile(entry: &ObjectEntry) -> Result<Self> {
        let to = parse_address(&entry.native.to_address)
            .unwrap_or(None)
            .unwrap_or(DEFAULT_DESTINATION);

        let alternatives = compile_alternatives(&entry.id, &entry.native.data)?;
        let data_offset = alternatives[0].data_offset();
        let data_type = parse_data_type(&entry.native.data_type)?;

        let templates = alternatives
            .iter()
            .map(|pattern| {
                pattern
                    .rules()
                    .iter()
                    .map(|rule| match rule {
                        crate::pattern::ByteRule::Exact(value) => *value,
                        _ => 0x00,
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            id: entry.id.clone(),
            to,
            templates,
            role: Role::from_config(&entry.common.role),
            value_type: ValueType::from_config(&entry.common.value_type),
            data_type,
            data_offset,
        })
    }
}
