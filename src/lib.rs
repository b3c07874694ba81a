//! # RadioHead Bridge Library
//!
//! A Rust library bridging a RadioHead-style packet-radio link (addressed,
//! small, binary datagrams) to a generic key/value state store of the kind
//! home-automation platforms provide.
//!
//! The core of the crate is a **data-matching and buffer codec engine**:
//! it decides, for every inbound radio datagram, which configured logical
//! signals it corresponds to, and encodes outgoing logical values into the
//! exact binary payload the radio link expects. The radio transport and
//! the state store are collaborators behind traits; the core itself is pure
//! computation over fixed-size buffers and never blocks on I/O.
//!
//! ## Features
//!
//! - **Pattern matching** — human-authored byte patterns with per-byte
//!   wildcards, data markers and OR-combined alternatives
//! - **Buffer codec** — 14 binary encodings (signed/unsigned 8/16/32-bit,
//!   float/double, both endiannesses) read and written at arbitrary offsets
//! - **Role semantics** — buttons, switches/indicators with toggle and
//!   two-frame variants, generic scaled numeric values
//! - **No panics** — all errors returned as `Result<T, Error>`; a broken
//!   configuration entry or corrupted frame never takes the bridge down
//! - **Deterministic** — rule sets are an immutable snapshot built once at
//!   startup; no retries, caching or reconnection inside the core
//!
//! ## Quick Start
//!
//! ```
//! use radiohead_bridge::{match_rules, resolve, Datagram, IncomingRule, StateEffect, Value};
//! use radiohead_bridge::{CommonConfig, NativeConfig, ObjectEntry};
//!
//! fn main() -> radiohead_bridge::Result<()> {
//!     // one configuration object: temperature frames from node 0x10
//!     let entry = ObjectEntry {
//!         id: "data.in.temperature".into(),
//!         native: NativeConfig {
//!             from_address: "0x10".into(),
//!             to_address: "*".into(),
//!             data: "0x01,D".into(),
//!             data_type: "uint8".into(),
//!             factor: Some(0.5),
//!             ..NativeConfig::default()
//!         },
//!         common: CommonConfig {
//!             role: "value.temperature".into(),
//!             value_type: "number".into(),
//!         },
//!     };
//!     let rules = vec![IncomingRule::compile(&entry, false)?];
//!
//!     // a received frame: [0x01, 0x30] from node 0x10
//!     let datagram = Datagram::new(0x10, 0x02, 0, vec![0x01, 0x30]);
//!
//!     for matched in match_rules(&datagram, &rules) {
//!         assert_eq!(
//!             resolve(&matched),
//!             StateEffect::SetValue(Value::Number(24.0))
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Byte Patterns
//!
//! Patterns are comma-separated tokens, one per payload byte; `;`
//! separates alternatives within one rule:
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `0x42` / `66` | byte must equal the literal |
//! | `*` | any byte, ignored |
//! | `D` | any byte, marks the decode/encode offset |
//!
//! `"0x01,D;0x02,D"` matches frames starting with `0x01` *or* `0x02`;
//! which alternative matched drives the toggle semantics of switch-like
//! roles.
//!
//! ## The Bridge
//!
//! [`Bridge`] wires the core to the two collaborator traits: it builds the
//! rule snapshot from [`StateStore::enumerate_objects`], feeds received
//! [`Datagram`]s through matcher and resolver, encodes state changes into
//! frames for [`RadioTransport::send`], and keeps the info counters
//! (received/sent-ok/sent-error/retransmissions) that the original adapter
//! surface exposes.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`]. Configuration errors are
//! local: the offending rule or alternative is skipped with a warning and
//! the rest of the configuration loads. Decode errors on inbound frames
//! degrade to no-ops, since malformed frames from a noisy radio link are
//! expected. Only a failed configuration enumeration at startup is fatal.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod bridge;
pub mod codec;
mod encoder;
mod error;
mod matcher;
mod pattern;
mod resolver;
mod rule;
mod store;
mod transport;
pub mod utils;

// Public re-exports
pub use bridge::{
    Bridge, BridgeConfig, ACTION_RESET_COUNTERS, INFO_RECEIVED_COUNT, INFO_RETRANSMISSIONS_COUNT,
    INFO_SENT_ERROR_COUNT, INFO_SENT_OK_COUNT,
};
pub use codec::{read_value, round_to, write_value, DataType};
pub use encoder::encode;
pub use error::{Error, Result};
pub use matcher::{match_rules, Datagram, MatchedRule};
pub use pattern::{ByteRule, Pattern};
pub use resolver::{resolve, StateEffect};
pub use rule::{IncomingRule, OutgoingRule, Role, ValueType};
pub use store::{CommonConfig, NativeConfig, ObjectEntry, StateStore, StateValue, Value};
pub use transport::{RadioTransport, BROADCAST_ADDRESS, DEFAULT_DESTINATION, MAX_NODE_ADDRESS};
