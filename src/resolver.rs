//! Outcome resolution for matched rules.
//!
//! [`resolve`] is a pure function from a match to the intended state
//! mutation; it performs no I/O, which keeps the behavioral matrix
//! testable without a store. The one outcome that depends on external
//! state, toggling a single-alternative switch, is expressed as
//! [`StateEffect::Toggle`] and left to the applier, since the prior value
//! lives in the store.
//!
//! Decode failures degrade to [`StateEffect::NoOp`] with a warning:
//! malformed frames from a noisy radio link are expected and must never
//! take the bridge down.

use tracing::warn;

use crate::codec::{read_value, round_to, DataType};
use crate::matcher::MatchedRule;
use crate::rule::{Role, ValueType};
use crate::store::Value;

/// The state mutation a matched rule asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateEffect {
    /// Set the target to `true`.
    SetTrue,
    /// Set the target to `false`.
    SetFalse,
    /// Negate the target's prior stored value.
    Toggle,
    /// Set the target to a decoded value.
    SetValue(Value),
    /// No state change (no decodable position configured, or the decode
    /// failed).
    NoOp,
}

/// Resolves a matched rule to its state effect.
///
/// Behavioral matrix over the rule's role:
///
/// - `Button` — always [`StateEffect::SetTrue`]; a button press is an
///   idempotent pulse with no memory of prior state.
/// - `Switch` / `Indicator` — one alternative means the frame is a
///   toggle command ([`StateEffect::Toggle`]); with two or more
///   alternatives, alternative 0 means `true` and any other means
///   `false`, regardless of prior state.
/// - `Generic` — no data offset yields [`StateEffect::NoOp`] (the
///   configuration declares no decodable position, which is not an
///   error). Otherwise the payload is decoded at the offset: boolean
///   targets read one `uint8` and coerce nonzero-to-true; numeric
///   targets decode with the configured encoding, apply
///   `value * factor + offset`, and round if decimals are configured.
///
/// # Example
///
/// ```
/// use radiohead_bridge::{match_rules, resolve, Datagram, IncomingRule, StateEffect, Value};
/// # use radiohead_bridge::{ObjectEntry, NativeConfig, CommonConfig};
/// # let entry = ObjectEntry {
/// #     id: "data.in.temp".into(),
/// #     native: NativeConfig {
/// #         from_address: "0x10".into(),
/// #         to_address: "*".into(),
/// #         data: "0x01,D".into(),
/// #         data_type: "uint8".into(),
/// #         factor: Some(2.0),
/// #         offset: Some(0.0),
/// #         decimals: Some(0),
/// #         ..NativeConfig::default()
/// #     },
/// #     common: CommonConfig { role: "value".into(), value_type: "number".into() },
/// # };
/// let rules = vec![IncomingRule::compile(&entry, false).unwrap()];
/// let datagram = Datagram::new(0x10, 0x02, 0, vec![0x01, 0x07]);
///
/// let matched: Vec<_> = match_rules(&datagram, &rules).collect();
/// assert_eq!(resolve(&matched[0]), StateEffect::SetValue(Value::Number(14.0)));
/// ```
pub fn resolve(matched: &MatchedRule<'_>) -> StateEffect {
    let rule = matched.rule;

    match rule.role {
        Role::Button => StateEffect::SetTrue,

        Role::Switch | Role::Indicator => {
            if rule.alternatives.len() == 1 {
                StateEffect::Toggle
            } else if matched.matched_part == 0 {
                StateEffect::SetTrue
            } else {
                StateEffect::SetFalse
            }
        }

        Role::Generic => {
            let Some(offset) = rule.data_offset else {
                return StateEffect::NoOp;
            };
            let payload = &matched.datagram.payload;

            match rule.value_type {
                ValueType::Boolean => match read_value(payload, DataType::Uint8, offset) {
                    Ok(raw) => StateEffect::SetValue(Value::Bool(raw != 0.0)),
                    Err(err) => {
                        warn!(id = %rule.id, %err, "decode failed, frame ignored");
                        StateEffect::NoOp
                    }
                },
                ValueType::Number => match read_value(payload, rule.data_type, offset) {
                    Ok(raw) => {
                        let mut value = raw * rule.factor + rule.offset;
                        if let Some(decimals) = rule.decimals {
                            value = round_to(value, decimals);
                        }
                        StateEffect::SetValue(Value::Number(value))
                    }
                    Err(err) => {
                        warn!(
                            id = %rule.id,
                            data_type = %rule.data_type,
                            %err,
                            "decode failed, frame ignored"
                        );
                        StateEffect::NoOp
                    }
                },
            }
        }
    }
}
