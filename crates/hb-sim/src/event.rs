//! Per-tick contact events.
//!
//! Contacts are detected for every agent first and only then dispatched, so
//! an agent emptying a flower cannot change what another agent touched on
//! the same tick.  Dispatch re-checks the collider's enabled flag instead.

use std::collections::VecDeque;

use hb_core::{AgentId, ColliderId};
use hb_world::ContactPhase;

/// Which sensor produced a contact.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContactKind {
    /// The agent's trigger sphere overlapped a trigger collider.
    Trigger,
    /// The agent's body touched a solid collider.
    Collision,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ContactEvent {
    pub agent:    AgentId,
    pub collider: ColliderId,
    pub kind:     ContactKind,
    pub phase:    ContactPhase,
}

/// FIFO of contacts detected this tick.  Agents push in ascending ID order
/// and each agent's contacts are in ascending collider order, so dispatch
/// order is deterministic.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<ContactEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ContactEvent) {
        self.events.push_back(event);
    }

    /// Append one agent's contact edges from a tracker update.
    pub fn extend_from_edges(
        &mut self,
        agent: AgentId,
        kind:  ContactKind,
        edges: Vec<(ColliderId, ContactPhase)>,
    ) {
        self.events.extend(
            edges
                .into_iter()
                .map(|(collider, phase)| ContactEvent { agent, collider, kind, phase }),
        );
    }

    pub fn pop(&mut self) -> Option<ContactEvent> {
        self.events.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
