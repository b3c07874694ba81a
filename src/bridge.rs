//! Bridge orchestration: rule snapshot, counters, receive and send paths.
//!
//! The [`Bridge`] owns the compiled rule sets and wires the pure core
//! (matcher, resolver, encoder) to the two collaborators. It is built
//! once at startup: the rule snapshot is immutable for the process
//! lifetime and safe for unsynchronized concurrent reads; configuration
//! changes require a restart.
//!
//! Event flow:
//!
//! - one inbound datagram → [`Bridge::handle_received`] → zero or more
//!   resolved effects → state writes with `ack = true`;
//! - one state change → [`Bridge::handle_state_change`] → at most one
//!   encoded frame → one transport send.
//!
//! Info counters (received/sent-ok/sent-error/retransmissions) are
//! atomics, safe against concurrent handlers, loaded from the store at
//! startup and mirrored back on every change. The retransmission total is
//! derived: the value persisted before startup plus whatever the
//! transport has counted since.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::encoder::encode;
use crate::error::{Error, Result};
use crate::matcher::{match_rules, Datagram};
use crate::resolver::{resolve, StateEffect};
use crate::rule::{IncomingRule, OutgoingRule};
use crate::store::{StateStore, StateValue, Value};
use crate::transport::{RadioTransport, MAX_NODE_ADDRESS};
use crate::utils::{format_address, format_payload_hex};

/// State id of the received-frames counter.
pub const INFO_RECEIVED_COUNT: &str = "info.receivedCount";
/// State id of the successful-sends counter.
pub const INFO_SENT_OK_COUNT: &str = "info.sentOkCount";
/// State id of the failed-sends counter.
pub const INFO_SENT_ERROR_COUNT: &str = "info.sentErrorCount";
/// State id of the derived retransmissions counter.
pub const INFO_RETRANSMISSIONS_COUNT: &str = "info.retransmissionsCount";
/// State id of the counter-reset action.
pub const ACTION_RESET_COUNTERS: &str = "actions.resetCounters";

/// Configuration of a bridge instance.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// This node's radio address (`0x00..=0xFE`).
    pub address: u8,
    /// Whether the transport delivers frames not addressed to this node.
    /// Only in this mode is destination filtering meaningful.
    pub promiscuous: bool,
    /// Whether to log every received and sent frame as hex.
    pub log_all_data: bool,
    /// Object id prefix of the inbound data objects.
    pub incoming_prefix: String,
    /// Object id prefix of the outbound data objects.
    pub outgoing_prefix: String,
}

impl BridgeConfig {
    /// Creates a configuration with the given node address and defaults:
    /// promiscuous off, frame logging off, `data.in.`/`data.out.`
    /// prefixes.
    ///
    /// # Example
    ///
    /// ```
    /// use radiohead_bridge::BridgeConfig;
    ///
    /// let config = BridgeConfig::new(0x01)
    ///     .with_promiscuous(true)
    ///     .with_log_all_data(true);
    /// assert_eq!(config.address, 0x01);
    /// assert!(config.promiscuous);
    /// ```
    pub fn new(address: u8) -> Self {
        Self {
            address,
            promiscuous: false,
            log_all_data: false,
            incoming_prefix: "data.in.".to_string(),
            outgoing_prefix: "data.out.".to_string(),
        }
    }

    /// Enables or disables promiscuous destination filtering.
    pub fn with_promiscuous(mut self, promiscuous: bool) -> Self {
        self.promiscuous = promiscuous;
        self
    }

    /// Enables or disables hex logging of every frame.
    pub fn with_log_all_data(mut self, log_all_data: bool) -> Self {
        self.log_all_data = log_all_data;
        self
    }

    /// Sets a custom inbound object id prefix.
    pub fn with_incoming_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.incoming_prefix = prefix.into();
        self
    }

    /// Sets a custom outbound object id prefix.
    pub fn with_outgoing_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.outgoing_prefix = prefix.into();
        self
    }
}

#[derive(Debug, Default)]
struct Counters {
    received: AtomicU64,
    sent_ok: AtomicU64,
    sent_error: AtomicU64,
    retransmissions: AtomicU64,
}

/// Bridge between a packet-radio transport and a key/value state store.
pub struct Bridge<T: RadioTransport, S: StateStore> {
    config: BridgeConfig,
    transport: T,
    store: S,
    incoming: Vec<IncomingRule>,
    outgoing: HashMap<String, OutgoingRule>,
    counters: Counters,
    /// Persisted retransmission total at startup; the live transport
    /// counter is added on top of this.
    retransmissions_start: AtomicU64,
}

impl<T: RadioTransport, S: StateStore> Bridge<T, S> {
    /// Builds a bridge: validates the node address, compiles the rule
    /// snapshot from the store's configuration objects and loads the
    /// persisted info counters.
    ///
    /// Per-object compile failures are skipped with a warning; a broken
    /// configuration entry never takes the rest of the configuration
    /// down. A failed object enumeration is the one fatal path and is
    /// escalated to the caller.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAddress` for an address outside
    /// `0x00..=0xFE`, or a store error when the configuration objects
    /// cannot be enumerated at all.
    pub fn new(config: BridgeConfig, transport: T, store: S) -> Result<Self> {
        if config.address > MAX_NODE_ADDRESS {
            return Err(Error::invalid_address(format_address(config.address)));
        }

        let mut incoming = Vec::new();
        for entry in store.enumerate_objects(&config.incoming_prefix)? {
            match IncomingRule::compile(&entry, config.promiscuous) {
                Ok(rule) => incoming.push(rule),
                Err(err) => warn!(id = %entry.id, %err, "incoming rule skipped"),
            }
        }

        let mut outgoing = HashMap::new();
        for entry in store.enumerate_objects(&config.outgoing_prefix)? {
            match OutgoingRule::compile(&entry) {
                Ok(rule) => {
                    outgoing.insert(entry.id.clone(), rule);
                }
                Err(err) => warn!(id = %entry.id, %err, "outgoing rule skipped"),
            }
        }

        info!(
            address = %format_address(config.address),
            incoming = incoming.len(),
            outgoing = outgoing.len(),
            "rule snapshot built"
        );

        let counters = Counters::default();
        for (id, counter) in [
            (INFO_RECEIVED_COUNT, &counters.received),
            (INFO_SENT_OK_COUNT, &counters.sent_ok),
            (INFO_SENT_ERROR_COUNT, &counters.sent_error),
            (INFO_RETRANSMISSIONS_COUNT, &counters.retransmissions),
        ] {
            match store.read_state(id)? {
                Some(state) => counter.store(state.value.as_number() as u64, Ordering::Relaxed),
                None => store.write_state(id, Value::Number(0.0), true)?,
            }
        }

        let retransmissions_start =
            AtomicU64::new(counters.retransmissions.load(Ordering::Relaxed));

        Ok(Self {
            config,
            transport,
            store,
            incoming,
            outgoing,
            counters,
            retransmissions_start,
        })
    }

    /// Returns this node's radio address.
    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Returns the compiled inbound rules in registration order.
    pub fn incoming_rules(&self) -> &[IncomingRule] {
        &self.incoming
    }

    /// Returns the compiled outbound rules keyed by state id.
    pub fn outgoing_rules(&self) -> &HashMap<String, OutgoingRule> {
        &self.outgoing
    }

    /// Returns the received-frames counter.
    pub fn received_count(&self) -> u64 {
        self.counters.received.load(Ordering::Relaxed)
    }

    /// Returns the successful-sends counter.
    pub fn sent_ok_count(&self) -> u64 {
        self.counters.sent_ok.load(Ordering::Relaxed)
    }

    /// Returns the failed-sends counter.
    pub fn sent_error_count(&self) -> u64 {
        self.counters.sent_error.load(Ordering::Relaxed)
    }

    /// Returns the derived retransmission total.
    pub fn retransmissions_count(&self) -> u64 {
        self.counters.retransmissions.load(Ordering::Relaxed)
    }

    /// Handles one received datagram.
    ///
    /// Increments the received counter, matches the datagram against the
    /// inbound rule set and applies every resolved effect to the store
    /// with `ack = true`. All failures along the way (decode errors,
    /// store write errors) are logged and skipped: a single corrupted
    /// frame or failing target must not halt the remaining matches, and
    /// nothing on this path is fatal.
    pub fn handle_received(&self, datagram: &Datagram) {
        let received = self.counters.received.fetch_add(1, Ordering::Relaxed) + 1;
        self.mirror_counter(INFO_RECEIVED_COUNT, received);

        if self.config.log_all_data {
            info!(
                "received <{}> from {} to {} msgID {}",
                format_payload_hex(&datagram.payload),
                format_address(datagram.from),
                format_address(datagram.to),
                format_address(datagram.id),
            );
        }

        for matched in match_rules(datagram, &self.incoming) {
            let id = &matched.rule.id;
            match resolve(&matched) {
                StateEffect::NoOp => {}
                StateEffect::SetTrue => self.apply_write(id, Value::Bool(true)),
                StateEffect::SetFalse => self.apply_write(id, Value::Bool(false)),
                StateEffect::SetValue(value) => self.apply_write(id, value),
                StateEffect::Toggle => self.apply_toggle(id),
            }
        }
    }

    /// Handles one state change from the store side.
    ///
    /// Acknowledged changes are ignored (they are values the bridge
    /// itself produced). The counter-reset action zeroes all counters.
    /// A change on an outgoing data object is encoded and sent; anything
    /// else is not the bridge's business and is ignored.
    ///
    /// # Errors
    ///
    /// Returns the encode or transport error of a failed send attempt.
    /// The failure is already counted and logged; the caller decides
    /// whether to surface it further.
    pub fn handle_state_change(&self, id: &str, state: &StateValue) -> Result<()> {
        debug!(id, ack = state.ack, "state change");
        if state.ack {
            return Ok(());
        }

        if id == ACTION_RESET_COUNTERS {
            self.reset_counters();
            // acknowledge the action itself
            self.apply_write(id, state.value);
            return Ok(());
        }

        let Some(rule) = self.outgoing.get(id) else {
            return Ok(());
        };

        let frame = encode(rule, &state.value)?;
        self.transmit(rule.to, &frame)?;

        // confirmed over the air; set the ack flag on the source state
        if let Err(err) = self.store.write_state(id, state.value, true) {
            warn!(id, %err, "ack write failed");
        }
        Ok(())
    }

    /// Sends a raw payload to a node, with the same counter bookkeeping
    /// as rule-driven sends.
    ///
    /// # Errors
    ///
    /// Rejects an empty payload with `Error::Send`; otherwise returns
    /// whatever the transport send returns.
    pub fn send_raw(&self, to: u8, payload: &[u8]) -> Result<()> {
        if payload.is_empty() {
            return Err(Error::send("empty payload"));
        }
        self.transmit(to, payload)
    }

    /// Zeroes all info counters, the persisted retransmission baseline
    /// and the transport's own retransmission counter.
    pub fn reset_counters(&self) {
        info!("reset information counters");

        self.retransmissions_start.store(0, Ordering::Relaxed);
        self.transport.reset_retransmissions();

        for (id, counter) in [
            (INFO_RECEIVED_COUNT, &self.counters.received),
            (INFO_SENT_OK_COUNT, &self.counters.sent_ok),
            (INFO_SENT_ERROR_COUNT, &self.counters.sent_error),
            (INFO_RETRANSMISSIONS_COUNT, &self.counters.retransmissions),
        ] {
            counter.store(0, Ordering::Relaxed);
            self.mirror_counter(id, 0);
        }
    }

    /// Sends a frame and updates the send counters.
    fn transmit(&self, to: u8, payload: &[u8]) -> Result<()> {
        if self.config.log_all_data {
            info!(
                "sending <{}> to {}",
                format_payload_hex(payload),
                format_address(to),
            );
        }

        let result = self.transport.send(to, payload);
        match &result {
            Ok(()) => {
                let sent = self.counters.sent_ok.fetch_add(1, Ordering::Relaxed) + 1;
                self.mirror_counter(INFO_SENT_OK_COUNT, sent);
            }
            Err(err) => {
                let failed = self.counters.sent_error.fetch_add(1, Ordering::Relaxed) + 1;
                self.mirror_counter(INFO_SENT_ERROR_COUNT, failed);
                warn!(to = %format_address(to), %err, "send failed");
            }
        }
        self.update_retransmissions();
        result
    }

    /// Refreshes the derived retransmission total from the transport.
    fn update_retransmissions(&self) {
        let total = self.retransmissions_start.load(Ordering::Relaxed)
            + self.transport.retransmissions() as u64;
        if total != self.counters.retransmissions.load(Ordering::Relaxed) {
            self.counters.retransmissions.store(total, Ordering::Relaxed);
            self.mirror_counter(INFO_RETRANSMISSIONS_COUNT, total);
        }
    }

    /// Writes a resolved value with the acknowledgement flag set.
    fn apply_write(&self, id: &str, value: Value) {
        if let Err(err) = self.store.write_state(id, value, true) {
            warn!(id, %err, "state write failed");
        }
    }

    /// Negates the prior stored value of a target.
    ///
    /// Read-then-write; not atomic with respect to other writers of the
    /// same target. Radio frames for one physical switch are not expected
    /// to race against themselves at sub-millisecond intervals.
    fn apply_toggle(&self, id: &str) {
        let prior = match self.store.read_state(id) {
            Ok(state) => state.map(|s| s.value.is_truthy()).unwrap_or(false),
            Err(err) => {
                warn!(id, %err, "state read failed, toggle skipped");
                return;
            }
        };
        self.apply_write(id, Value::Bool(!prior));
    }

    /// Mirrors a counter value to its info state.
    fn mirror_counter(&self, id: &str, value: u64) {
        if let Err(err) = self.store.write_state(id, Value::Number(value as f64), true) {
            warn!(id, %err, "counter write failed");
        }
    }
}
