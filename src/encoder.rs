//! Outbound frame construction.
//!
//! [`encode`] turns a logical value into the exact bytes to transmit for
//! an outgoing rule. Template selection is an explicit priority
//! conditional: a second template is only ever used for falsy values on
//! switch-like roles; everything else takes template 0. The stored
//! templates are never mutated. Each call clones before writing, so the
//! configured frames stay pristine across calls.

use crate::codec::write_value;
use crate::error::{Error, Result};
use crate::rule::{OutgoingRule, ValueType};
use crate::store::Value;

/// Encodes a logical value into the frame bytes for an outgoing rule.
///
/// 1. Select the template: `templates[1]` iff the rule has two templates,
///    a switch-like role, and a falsy value; otherwise `templates[0]`.
///    The template is copied, never mutated in place.
/// 2. Without a data offset the copy is returned unmodified; sending
///    the frame is itself the signal.
/// 3. A boolean target writes exactly one byte at the offset, `0x01` for
///    truthy and `0x00` for falsy, overriding whatever width the
///    configured encoding declares.
/// 4. A numeric target writes the value at the offset with the
///    configured encoding.
///
/// # Errors
///
/// Returns `Error::BufferTooShort` when the value field would run past
/// the end of the selected template. Nothing is transmitted in that case;
/// a partially written frame never leaves the encoder.
///
/// # Example
///
/// ```
/// use radiohead_bridge::{encode, Value};
/// # use radiohead_bridge::{ObjectEntry, NativeConfig, CommonConfig, OutgoingRule};
/// # let entry = ObjectEntry {
/// #     id: "data.out.sw".into(),
/// #     native: NativeConfig {
/// #         from_address: "*".into(),
/// #         to_address: "0x20".into(),
/// #         data: "0x02,0xFF;0x02,0x00".into(),
/// #         data_type: "".into(),
/// #         ..NativeConfig::default()
/// #     },
/// #     common: CommonConfig { role: "switch".into(), value_type: "boolean".into() },
/// # };
/// let rule = OutgoingRule::compile(&entry).unwrap();
///
/// // falsy value on a two-template switch selects the second template whole
/// let frame = encode(&rule, &Value::Bool(false)).unwrap();
/// assert_eq!(frame, vec![0x02, 0x00]);
///
/// let frame = encode(&rule, &Value::Bool(true)).unwrap();
/// assert_eq!(frame, vec![0x02, 0xFF]);
/// ```
pub fn encode(rule: &OutgoingRule, value: &Value) -> Result<Vec<u8>> {
    let use_false_template =
        rule.templates.len() > 1 && rule.role.is_toggle_like() && !value.is_truthy();

    let template = if use_false_template {
        rule.templates.get(1)
    } else {
        rule.templates.first()
    };
    let mut frame = template.ok_or(Error::EmptyPattern)?.clone();

    let Some(offset) = rule.data_offset else {
        return Ok(frame);
    };

    match rule.value_type {
        ValueType::Boolean => {
            if offset >= frame.len() {
                return Err(Error::buffer_too_short(1, offset, frame.len()));
            }
            frame[offset] = if value.is_truthy() { 0x01 } else { 0x00 };
        }
        ValueType::Number => {
            write_value(value.as_number(), &mut frame, rule.data_type, offset)?;
        }
    }

    Ok(frame)
}
