//! Radio transport collaborator boundary.
//!
//! The bridge treats the packet-radio link as an opaque collaborator:
//! frames go out through [`RadioTransport::send`], frames come in as
//! [`Datagram`](crate::Datagram)s handed to the bridge by the surrounding
//! runtime. Serial framing, acknowledgement, addressing protocol and
//! retry/backoff all live behind this trait; the bridge only counts
//! outcomes and reads the retransmission counter to derive a total.
//!
//! # Addressing
//!
//! Node addresses are one byte. `0xFF` is the protocol broadcast address;
//! a node's own address must stay in `0x00..=0xFE`. Outgoing rules whose
//! destination is unresolvable fall back to [`DEFAULT_DESTINATION`].

use crate::error::Result;

/// Protocol broadcast address.
pub const BROADCAST_ADDRESS: u8 = 0xFF;

/// Highest address a node may claim for itself.
pub const MAX_NODE_ADDRESS: u8 = 0xFE;

/// Destination used by outgoing rules with no resolvable address.
pub const DEFAULT_DESTINATION: u8 = 0x00;

/// Packet-radio transport collaborator.
///
/// All methods take `&self`; implementations handle their own interior
/// mutability. `send` is expected to block until the transport has
/// accepted or rejected the frame (acknowledged delivery is a transport
/// configuration, not a bridge concern).
pub trait RadioTransport {
    /// Sends a payload to the given node address.
    ///
    /// # Errors
    ///
    /// Returns `Error::Send` when the frame could not be delivered. The
    /// bridge reports the failure and increments its error counter; it
    /// never retries by itself.
    fn send(&self, to: u8, payload: &[u8]) -> Result<()>;

    /// Returns the transport's monotonic retransmission counter.
    fn retransmissions(&self) -> u32;

    /// Zeroes the transport's retransmission counter.
    ///
    /// Only invoked by the explicit counter-reset action.
    fn reset_retransmissions(&self);
}
