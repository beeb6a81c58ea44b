//! Overlap sets → enter/stay contact edges.
//!
//! Physics engines report a contact once when it begins and then once per
//! step while it persists.  The agent logic depends on that distinction:
//! boundary penalties fire on enter only, feeding fires on every step.

use std::collections::BTreeSet;

use hb_core::ColliderId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContactPhase {
    /// First tick of contact.
    Enter,
    /// Contact carried over from the previous tick.
    Stay,
}

/// Tracks which colliders one sensor touched on the previous tick.
#[derive(Clone, Debug, Default)]
pub struct ContactTracker {
    previous: BTreeSet<ColliderId>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's overlap set; returns `(collider, phase)` pairs in
    /// ascending collider order.  Contacts that ended produce nothing.
    pub fn update(
        &mut self,
        touching: impl IntoIterator<Item = ColliderId>,
    ) -> Vec<(ColliderId, ContactPhase)> {
        let current: BTreeSet<ColliderId> = touching.into_iter().collect();
        let edges = current
            .iter()
            .map(|&id| {
                let phase = if self.previous.contains(&id) {
                    ContactPhase::Stay
                } else {
                    ContactPhase::Enter
                };
                (id, phase)
            })
            .collect();
        self.previous = current;
        edges
    }

    /// Forget all contacts (used after teleporting the sensor).
    pub fn clear(&mut self) {
        self.previous.clear();
    }

    pub fn is_touching(&self, id: ColliderId) -> bool {
        self.previous.contains(&id)
    }
}
