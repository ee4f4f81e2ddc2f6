//! Call context handed to every registry operation.

use alloy_primitives::{Address, U256};

/// The caller and the value attached to the call currently being processed.
///
/// This plays the role of `msg.sender` and `msg.value`: the sender is checked
/// by privileged operations, and the value is forwarded untouched when a call
/// is dispatched to an implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Msg {
    /// The account that originated the call.
    pub sender: Address,
    /// Value transferred along with the call.
    pub value: U256,
}

impl Msg {
    /// Creates a context for a call from `sender` carrying no value.
    #[must_use]
    pub const fn new(sender: Address) -> Self {
        Self { sender, value: U256::ZERO }
    }

    /// Returns the same context with `value` attached.
    #[must_use]
    pub const fn with_value(self, value: U256) -> Self {
        Self { value, ..self }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, uint, U256};

    use super::Msg;

    #[test]
    fn new_carries_no_value() {
        let alice = address!("A11CEacF9aa32246d767FCCD72e02d6bCbcC375d");
        let msg = Msg::new(alice);
        assert_eq!(msg.sender, alice);
        assert_eq!(msg.value, U256::ZERO);

        let msg = msg.with_value(uint!(7_U256));
        assert_eq!(msg.sender, alice);
        assert_eq!(msg.value, uint!(7_U256));
    }
}
