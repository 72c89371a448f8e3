// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Running counters for one coordinator.
///
/// Counters accumulate across model updates; call
/// [`DeliveryCoordinator::reset_stats`](crate::DeliveryCoordinator::reset_stats)
/// to start over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeliveryStats {
    /// Piece requests issued.
    pub requested: u64,
    /// Responses matching the in-flight request.
    pub received: u64,
    /// Fragments spliced into the tree.
    pub patched: u64,
    /// Fragments with no placeholder left in the tree.
    pub dropped: u64,
    /// Responses that did not match the in-flight request.
    pub stale: u64,
    /// Child pieces the manager refused to enqueue.
    pub rejected: u64,
}

impl DeliveryStats {
    /// Returns `true` if every received response was either patched or dropped.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.received == self.patched + self.dropped
    }
}
