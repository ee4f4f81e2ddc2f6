//! Append-only log of emitted events.
//!
//! Events are stored in their encoded form, the same topics and data an
//! Ethereum log carries, so a consumer can decode them with the matching
//! [`SolEvent`] type.

use alloy_primitives::LogData;
use alloy_sol_types::SolEvent;

/// Ordered record of every event emitted by a contract.
///
/// Entries are only ever appended. Operations that fail must not emit, so the
/// log always reflects successful calls in the order they completed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    entries: Vec<LogData>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends `event` to the log.
    pub fn emit<E: SolEvent>(&mut self, event: &E) {
        self.entries.push(event.encode_log_data());
    }

    /// Returns every entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[LogData] {
        &self.entries
    }

    /// Returns the most recently emitted entry.
    #[must_use]
    pub fn last(&self) -> Option<&LogData> {
        self.entries.last()
    }

    /// Number of emitted entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `expected` was emitted at any point.
    #[must_use]
    pub fn emitted<E: SolEvent>(&self, expected: &E) -> bool {
        let expected = expected.encode_log_data();
        self.entries.iter().rev().any(|entry| *entry == expected)
    }

    /// Decodes every entry that matches the event type `E`, oldest first.
    #[must_use]
    pub fn decode_all<E: SolEvent>(&self) -> Vec<E> {
        self.entries
            .iter()
            .filter(|entry| entry.topics().first() == Some(&E::SIGNATURE_HASH))
            .filter_map(|entry| E::decode_log_data(entry).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, Address};
    use alloy_sol_macro::sol;
    use alloy_sol_types::SolEvent;

    use super::EventLog;

    sol! {
        #[derive(Debug, PartialEq)]
        event Ping(address indexed from);
        #[derive(Debug, PartialEq)]
        event Pong(address indexed to);
    }

    const ALICE: Address = address!("A11CEacF9aa32246d767FCCD72e02d6bCbcC375d");
    const BOB: Address = address!("B0B0cB49ec2e96DF5F5fFB081acaE66A2cBBc2e2");

    #[test]
    fn keeps_emission_order() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.emit(&Ping { from: ALICE });
        log.emit(&Pong { to: BOB });
        log.emit(&Ping { from: BOB });

        assert_eq!(log.len(), 3);
        assert!(log.emitted(&Pong { to: BOB }));
        assert!(!log.emitted(&Pong { to: ALICE }));
        assert_eq!(
            log.decode_all::<Ping>(),
            vec![Ping { from: ALICE }, Ping { from: BOB }]
        );
        assert_eq!(log.last(), Some(&Ping { from: BOB }.encode_log_data()));
    }
}
