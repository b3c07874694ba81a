//! Inbound datagram matching.
//!
//! Every received datagram is checked against the full inbound rule set
//! in registration order. Rules are evaluated independently: one physical
//! frame may drive several logical signals (a button press and a numeric
//! field can share a frame), so a matching rule never short-circuits the
//! evaluation of the rules after it.
//!
//! Within a single rule the alternatives are ordered: the first
//! alternative that fully matches wins and its index becomes
//! [`MatchedRule::matched_part`], which drives the toggle semantics of
//! switch-like roles.

use tracing::debug;

use crate::rule::IncomingRule;

/// One received radio frame.
///
/// Owned by the caller; the matcher borrows it for the duration of one
/// match pass and does not retain it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    /// Source node address.
    pub from: u8,
    /// Destination node address.
    pub to: u8,
    /// Transport sequence id of the frame.
    pub id: u8,
    /// Payload bytes.
    pub payload: Vec<u8>,
}

impl Datagram {
    /// Creates a new datagram.
    pub fn new(from: u8, to: u8, id: u8, payload: Vec<u8>) -> Self {
        Self {
            from,
            to,
            id,
            payload,
        }
    }
}

/// A rule that matched a datagram, with the index of the alternative that
/// matched.
#[derive(Debug, Clone)]
pub struct MatchedRule<'a> {
    /// The matched rule.
    pub rule: &'a IncomingRule,
    /// Index of the alternative that matched.
    pub matched_part: usize,
    /// The datagram that matched, for payload decoding.
    pub datagram: &'a Datagram,
}

/// Matches a datagram against a rule set.
///
/// Returns a lazy iterator over the matching rules in registration
/// order. A datagram may match zero, one or many rules.
///
/// Per rule:
/// 1. reject if the source filter is set and does not equal the
///    datagram's source;
/// 2. reject if the destination filter is set and does not equal the
///    datagram's destination (outside promiscuous mode the filter is
///    compiled to "any", making this a no-op by construction);
/// 3. try the alternatives in order against the payload; the first full
///    match wins.
///
/// # Example
///
/// ```
/// use radiohead_bridge::{match_rules, Datagram, IncomingRule};
/// # use radiohead_bridge::{ObjectEntry, NativeConfig, CommonConfig};
/// # let entry = ObjectEntry {
/// #     id: "data.in.x".into(),
/// #     native: NativeConfig {
/// #         from_address: "*".into(),
/// #         to_address: "*".into(),
/// #         data: "0x01,D;0x02,D".into(),
/// #         data_type: "uint8".into(),
/// #         ..NativeConfig::default()
/// #     },
/// #     common: CommonConfig { role: "switch".into(), value_type: "boolean".into() },
/// # };
/// let rules = vec![IncomingRule::compile(&entry, false).unwrap()];
/// let datagram = Datagram::new(0x10, 0x02, 0, vec![0x02, 0x05]);
///
/// let matched: Vec<_> = match_rules(&datagram, &rules).collect();
/// assert_eq!(matched.len(), 1);
/// assert_eq!(matched[0].matched_part, 1);
/// ```
pub fn match_rules<'a>(
    datagram: &'a Datagram,
    rules: &'a [IncomingRule],
) -> impl Iterator<Item = MatchedRule<'a>> {
    rules.iter().filter_map(move |rule| {
        if let Some(from) = rule.from {
            if datagram.from != from {
                return None;
            }
        }
        if let Some(to) = rule.to {
            if datagram.to != to {
                return None;
            }
        }

        let matched_part = rule
            .alternatives
            .iter()
            .position(|pattern| pattern.matches(&datagram.payload))?;

        debug!(id = %rule.id, matched_part, "datagram matched");
        Some(MatchedRule {
            rule,
            matched_part,
            datagram,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CommonConfig, NativeConfig, ObjectEntry};

    fn rule(id: &str, from: &str, to: &str, data: &str, promiscuous: bool) -> IncomingRule {
        let entry = ObjectEntry {
            id: id.to_string(),
            native: NativeConfig {
                from_address: from.to_string(),
                to_address: to.to_string(),
                data: data.to_string(),
                data_type: "uint8".to_string(),
                ..NativeConfig::default()
            },
            common: CommonConfig {
                role: "switch".to_string(),
                value_type: "boolean".to_string(),
            },
        };
        IncomingRule::compile(&entry, promiscuous).unwrap()
    }

    #[test]
    fn test_source_filter() {
        let rules = vec![rule("a", "0x10", "*", "0x01", false)];
        let hit = Datagram::new(0x10, 0x02, 0, vec![0x01]);
        let miss = Datagram::new(0x11, 0x02, 0, vec![0x01]);

        assert_eq!(match_rules(&hit, &rules).count(), 1);
        assert_eq!(match_rules(&miss, &rules).count(), 0);
    }

    #[test]
    fn test_source_wildcard_matches_all() {
        let rules = vec![rule("a", "*", "*", "0x01", false)];
        for from in [0x00, 0x10, 0xFE] {
            let datagram = Datagram::new(from, 0x02, 0, vec![0x01]);
            assert_eq!(match_rules(&datagram, &rules).count(), 1);
        }
    }

    #[test]
    fn test_destination_filter_noop_outside_promiscuous() {
        // compiled with toAddress = 5 but promiscuous off: filter is dead
        let rules = vec![rule("a", "*", "5", "0x01", false)];
        let datagram = Datagram::new(0x10, 9, 0, vec![0x01]);
        assert_eq!(match_rules(&datagram, &rules).count(), 1);
    }

    #[test]
    fn test_destination_filter_enforced_in_promiscuous() {
        let rules = vec![rule("a", "*", "5", "0x01", true)];
        let hit = Datagram::new(0x10, 5, 0, vec![0x01]);
        let miss = Datagram::new(0x10, 9, 0, vec![0x01]);

        assert_eq!(match_rules(&hit, &rules).count(), 1);
        assert_eq!(match_rules(&miss, &rules).count(), 0);
    }

    #[test]
    fn test_alternative_order_dependence() {
        let rules = vec![rule("a", "*", "*", "0x01,D;0x02,D", false)];
        let datagram = Datagram::new(0x10, 0x02, 0, vec![0x02, 0x05]);

        let matched: Vec<_> = match_rules(&datagram, &rules).collect();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].matched_part, 1);
    }

    #[test]
    fn test_first_matching_alternative_wins() {
        // both alternatives match; the first one is reported
        let rules = vec![rule("a", "*", "*", "*,D;0x02,D", false)];
        let datagram = Datagram::new(0x10, 0x02, 0, vec![0x02, 0x05]);

        let matched: Vec<_> = match_rules(&datagram, &rules).collect();
        assert_eq!(matched[0].matched_part, 0);
    }

    #[test]
    fn test_multiple_rules_match_one_datagram() {
        let rules = vec![
            rule("a", "*", "*", "0x01", false),
            rule("b", "0x99", "*", "0x01", false),
            rule("c", "*", "*", "0x01,*", false),
        ];
        let datagram = Datagram::new(0x10, 0x02, 0, vec![0x01, 0x42]);

        let ids: Vec<_> = match_rules(&datagram, &rules)
            .map(|m| m.rule.id.clone())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_no_match_on_payload_mismatch() {
        let rules = vec![rule("a", "*", "*", "0x01,0x02", false)];
        let datagram = Datagram::new(0x10, 0x02, 0, vec![0x01, 0x03]);
        assert_eq!(match_rules(&datagram, &rules).count(), 0);
    }
}
