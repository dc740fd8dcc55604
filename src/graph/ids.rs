use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines opaque, copyable entity identifiers that print with a one-letter prefix.
macro_rules! define_ids {
    ( $( $(#[$meta:meta])* ($name:ident, $prefix:expr) ),* $(,)? ) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            pub struct $name(u64);

            impl $name {
                pub(crate) fn new(raw: u64) -> Self {
                    Self(raw)
                }

                /// The raw counter value behind this id.
                pub fn raw(self) -> u64 {
                    self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}{}", $prefix, self.0)
                }
            }
        )*
    };
}

define_ids! {
    /// Stable handle to a process. Never reused after removal.
    (ProcessId, "P"),
    /// Stable handle to a resource. Never reused after removal.
    (ResourceId, "R"),
    /// Stable handle to a flow. Never reused after removal.
    (FlowId, "F"),
}

/// Monotonic id source, one per entity kind. A 64-bit counter cannot wrap
/// within the life of a graph.
#[derive(Debug, Clone, Default)]
pub(crate) struct IdCounter {
    next: u64,
}

impl IdCounter {
    pub(crate) fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_runs_past_u32_range() {
        let mut counter = IdCounter {
            next: u64::from(u32::MAX),
        };
        assert_eq!(counter.allocate(), u64::from(u32::MAX));
        assert_eq!(counter.allocate(), u64::from(u32::MAX) + 1);
        assert_eq!(ProcessId::new(counter.allocate()).to_string(), "P4294967297");
    }
}
